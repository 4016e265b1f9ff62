/// Binary Text Classification
pub mod binary_classification;
