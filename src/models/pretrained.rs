use std::path::{Path, PathBuf};

use crate::tokenization::TokenizerSource;

/// Files making up a pretrained encoder
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PretrainedFiles {
    /// JSON encoder configuration
    pub config: PathBuf,

    /// Safetensors checkpoint
    pub checkpoint: PathBuf,

    /// Newline-separated vocabulary
    pub vocab: PathBuf,

    /// Optional Hugging Face tokenizer, preferred over `vocab` when present
    pub tokenizer: Option<PathBuf>,
}

impl PretrainedFiles {
    /// Locate the named files inside `dir`
    pub fn in_dir(
        dir: impl AsRef<Path>,
        config: &str,
        checkpoint: &str,
        vocab: &str,
        tokenizer: Option<&str>,
    ) -> Self {
        let dir = dir.as_ref();

        Self {
            config: dir.join(config),
            checkpoint: dir.join(checkpoint),
            vocab: dir.join(vocab),
            tokenizer: tokenizer.map(|name| dir.join(name)),
        }
    }

    /// Fail on the first file that does not exist
    pub fn ensure_exists(&self) -> anyhow::Result<()> {
        let required = [&self.config, &self.checkpoint, &self.vocab];

        for path in required.into_iter().chain(self.tokenizer.as_ref()) {
            if !path.is_file() {
                return Err(anyhow!("Pretrained model file not found: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Where tokenization workers should load their tokenizer from
    pub fn tokenizer_source(&self, lower_case: bool) -> TokenizerSource {
        match &self.tokenizer {
            Some(path) => TokenizerSource::HuggingFace { path: path.clone() },
            None => TokenizerSource::Vocab {
                path: self.vocab.clone(),
                lower_case,
            },
        }
    }
}
