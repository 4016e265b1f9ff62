use burn::{data::dataloader::batcher::Batcher as _, tensor::backend::AutodiffBackend};
use log::info;

use crate::{models::PretrainedFiles, tokenization::Encoded};

use super::{Batcher, Infer, Model, ModelConfig};

/// Define inference function: build the model from its pretrained checkpoint
/// and return the positive-class probability of each encoded row
pub fn infer<B, M>(
    device: B::Device,        // Device on which to perform computation (e.g., CPU or CUDA device)
    files: &PretrainedFiles,  // Pretrained encoder files
    encoded: Encoded,         // Already tokenized inputs
    with_pooling_layer: bool, // Classify from the pooler output
) -> anyhow::Result<Vec<f32>>
where
    B: AutodiffBackend,
    M: Model<B>,
{
    // The input width fixes the sequence length
    let max_seq_len = match encoded.seq_len() {
        Some(0) | None => return Err(anyhow!("Nothing to classify: inputs are empty")),
        Some(max_seq_len) => max_seq_len,
    };

    files.ensure_exists()?;

    let config = M::Config::load_pretrained(files.config.clone(), max_seq_len, with_pooling_layer)
        .map_err(|e| anyhow!("Unable to load config file: {}", e))?;

    // Initialize batcher for batching samples
    let batcher = Batcher::<B>::new(config.get_config(), device.clone());

    info!("Loading weights...");

    let model = M::load_pretrained(&device, files.checkpoint.clone(), config)?;

    info!("Running inference...");

    let item: Infer<B> = batcher.batch(encoded.into_sequences());

    let probabilities = model.infer(item).into_data().convert::<f32>().value;

    Ok(probabilities)
}
