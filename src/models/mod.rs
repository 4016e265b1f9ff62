/// BERT variants
pub mod bert;

/// Pretrained encoder file locations
pub mod pretrained;

pub use pretrained::PretrainedFiles;
