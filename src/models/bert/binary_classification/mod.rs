/// BERT for Binary Classification Configuration
pub mod config;

/// BERT for Binary Classification
pub mod model;

/// Training and validation steps
pub mod train;

pub use config::Config;
pub use model::{Model, ModelRecord};
