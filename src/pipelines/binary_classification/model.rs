use std::{fmt::Display, path::PathBuf};

use burn::{
    module::AutodiffModule,
    tensor::{backend::AutodiffBackend, Tensor},
    train::{ClassificationOutput, TrainStep},
};

use super::{
    batcher::{Infer, Train},
    Config,
};

/// A trait for encoder models that can be fine-tuned for binary classification
pub trait Model<B>: AutodiffModule<B> + TrainStep<Train<B>, ClassificationOutput<B>> + Display
where
    B: AutodiffBackend,
{
    /// The model configuration
    type Config: ModelConfig;

    /// Perform a forward pass, with loss, over a training batch
    fn forward(&self, item: Train<B>) -> ClassificationOutput<B>;

    /// Positive-class probability for each row: [batch_size]
    fn infer(&self, input: Infer<B>) -> Tensor<B, 1>;

    /// Build the model with encoder weights read from a checkpoint
    fn load_pretrained(
        device: &B::Device,
        checkpoint: PathBuf,
        config: Self::Config,
    ) -> anyhow::Result<Self>;
}

/// A trait for configs that can be used for binary classification models
pub trait ModelConfig: burn::config::Config + Clone {
    /// Load a pretrained encoder configuration, sized for `max_seq_len` inputs
    fn load_pretrained(
        config_file: PathBuf,
        max_seq_len: usize,
        with_pooling_layer: bool,
    ) -> anyhow::Result<Self>;

    /// Return the Config needed for the binary classification pipeline
    fn get_config(&self) -> Config;
}
