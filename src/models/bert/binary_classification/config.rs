//! Adapt Bert to the Binary Classification pipeline

use std::path::PathBuf;

use bert_burn::model::BertModelConfig;
use burn::{config::Config as _, nn::LinearConfig, tensor::backend::Backend};

use crate::pipelines::binary_classification;

use super::Model;

/// Number of output units of the classification head
pub const N_OUTPUTS: usize = 1;

/// The Model Configuration
#[derive(burn::config::Config)]
pub struct Config {
    /// The base BERT config
    pub model: BertModelConfig,
}

impl Config {
    /// Initialize the model with random weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let model = self.model.init(device);

        let output = LinearConfig::new(self.model.hidden_size, N_OUTPUTS).init(device);

        Model { model, output }
    }
}

impl binary_classification::ModelConfig for Config {
    /// Load a pretrained model configuration
    fn load_pretrained(
        config_file: PathBuf,
        max_seq_len: usize,
        with_pooling_layer: bool,
    ) -> anyhow::Result<Self> {
        let mut bert_config = BertModelConfig::load(&config_file)
            .map_err(|e| anyhow!("Unable to load Hugging Face Config file: {}", e))?;

        if max_seq_len > bert_config.max_position_embeddings {
            return Err(anyhow!(
                "max_seq_len {} exceeds the encoder's {} position embeddings",
                max_seq_len,
                bert_config.max_position_embeddings
            ));
        }

        bert_config.max_seq_len = Some(max_seq_len);
        bert_config.with_pooling_layer = Some(with_pooling_layer);

        Ok(Config::new(bert_config))
    }

    fn get_config(&self) -> binary_classification::Config {
        binary_classification::Config {
            pad_token_id: self.model.pad_token_id,
            max_seq_len: self
                .model
                .max_seq_len
                .unwrap_or(self.model.max_position_embeddings),
        }
    }
}
