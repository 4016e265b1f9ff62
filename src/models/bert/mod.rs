/// BERT for Binary Classification (such as sentiment polarity)
pub mod binary_classification;

/// Reading BERT weights from safetensors checkpoints
pub mod loader;
