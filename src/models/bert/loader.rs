use std::{collections::HashMap, path::Path};

use bert_burn::{
    loader::{
        load_embeddings_from_safetensors, load_encoder_from_safetensors,
        load_pooler_from_safetensors,
    },
    model::{BertModelConfig, BertModelRecord},
};
use burn::tensor::backend::Backend;
use candle_core::{safetensors, Device};
use log::debug;

/// Read encoder weights from a safetensors checkpoint.
///
/// The pooler is only loaded when the config enables the pooling layer.
pub fn from_safetensors<B: Backend>(
    file_path: &Path,
    device: &B::Device,
    config: &BertModelConfig,
) -> anyhow::Result<BertModelRecord<B>> {
    // Tensors are staged on the CPU and copied onto the burn device afterwards
    let weights = safetensors::load(file_path, &Device::Cpu).map_err(|e| {
        anyhow!(
            "Unable to load checkpoint {}: {}",
            file_path.display(),
            e
        )
    })?;

    // Weights are stored in a HashMap<String, Tensor>
    // For each layer, it will either be prefixed with "encoder.layer.", "embeddings." or "pooler."
    let mut encoder_layers: HashMap<String, candle_core::Tensor> = HashMap::new();
    let mut embeddings_layers: HashMap<String, candle_core::Tensor> = HashMap::new();
    let mut pooler_layers: HashMap<String, candle_core::Tensor> = HashMap::new();

    // Strip the model name prefix so keys load consistently across variants (bert, roberta etc.)
    let prefix = format!("{}.", config.model_type);

    for (key, value) in weights {
        let key_without_prefix = key.strip_prefix(&prefix).unwrap_or(&key).to_string();

        if key_without_prefix.starts_with("encoder.layer.") {
            encoder_layers.insert(key_without_prefix, value);
        } else if key_without_prefix.starts_with("embeddings.") {
            embeddings_layers.insert(key_without_prefix, value);
        } else if key_without_prefix.starts_with("pooler.") {
            pooler_layers.insert(key_without_prefix, value);
        } else {
            debug!("Skipping checkpoint tensor {}", key);
        }
    }

    if embeddings_layers.is_empty() || encoder_layers.is_empty() {
        return Err(anyhow!(
            "Checkpoint {} has no BERT embedding or encoder weights",
            file_path.display()
        ));
    }

    let pooler = if config.with_pooling_layer.unwrap_or(false) {
        if pooler_layers.is_empty() {
            return Err(anyhow!(
                "Checkpoint {} has no pooler weights",
                file_path.display()
            ));
        }

        Some(load_pooler_from_safetensors(pooler_layers, device))
    } else {
        None
    };

    Ok(BertModelRecord {
        embeddings: load_embeddings_from_safetensors(embeddings_layers, device),
        encoder: load_encoder_from_safetensors(encoder_layers, device),
        pooler,
    })
}
