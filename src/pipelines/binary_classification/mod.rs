/// Common model config and traits for binary classification
pub mod model;

/// Batcher
pub mod batcher;

/// Encoded Items
pub mod item;

/// Pipeline and experiment configuration
pub mod config;

/// Binary Classification Training
pub mod training;

/// Binary Classification Inference
pub mod inference;

pub use batcher::{Batcher, Infer, Train};
pub use config::{Config, Training};
pub use inference::infer;
pub use item::{EncodedDataset, Item, Sequence};
pub use model::{Model, ModelConfig};
pub use training::{evaluate, train, Evaluation};

/// The unique string token that identifies this pipeline
pub static PIPELINE: &str = "binary-classification";
