use std::path::Path;

use hf_hub::api::tokio::Api;
use log::info;

use crate::models::PretrainedFiles;

/// Download the encoder config, weights and vocabulary from Hugging Face Hub,
/// using the file names in `names` as paths within the repository.
/// If a file exists in the cache, it will not be downloaded again
// NOTE: Uses the tokio API to work within an already-async context
pub async fn download_hf_model(
    model_name: &str,
    names: &PretrainedFiles,
) -> anyhow::Result<PretrainedFiles> {
    let api = Api::new().map_err(|e| anyhow!("Unable to reach Hugging Face Hub: {}", e))?;
    let repo = api.model(model_name.to_string());

    let fetch = |file_name: &Path| {
        let repo = &repo;
        let file_name = file_name.to_string_lossy().into_owned();

        async move {
            info!("Fetching {} from {}", file_name, model_name);

            repo.get(&file_name).await.map_err(|e| {
                anyhow!(
                    "Failed to download: {} file {} from Hugging Face Hub: {}",
                    model_name,
                    file_name,
                    e
                )
            })
        }
    };

    let tokenizer = match &names.tokenizer {
        Some(name) => Some(fetch(name.as_path()).await?),
        None => None,
    };

    Ok(PretrainedFiles {
        config: fetch(names.config.as_path()).await?,
        checkpoint: fetch(names.checkpoint.as_path()).await?,
        vocab: fetch(names.vocab.as_path()).await?,
        tokenizer,
    })
}
