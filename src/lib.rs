//! # Burn BERT Classifier
#![forbid(unsafe_code)]

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// Datasets
pub mod datasets;

/// Tokenization
pub mod tokenization;

/// Utilities
pub mod utils;

/// Error macros
#[macro_use]
extern crate anyhow;
