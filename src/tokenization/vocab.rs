use std::path::Path;

use rust_tokenizers::{
    tokenizer::{BertTokenizer, Tokenizer},
    vocab::Vocab,
};

use super::{SubwordTokenizer, TokenizationError};

/// BERT WordPiece tokenizer backed by a `vocab.txt` file.
///
/// The token id is the line index in the vocabulary file.
pub struct VocabTokenizer {
    tokenizer: BertTokenizer,
}

impl VocabTokenizer {
    /// Load a vocabulary file. Lowercasing also strips accents, as the
    /// reference BERT tokenizer does.
    pub fn from_file(path: impl AsRef<Path>, lower_case: bool) -> Result<Self, TokenizationError> {
        let path = path.as_ref();

        let tokenizer = BertTokenizer::from_file(path, lower_case, lower_case).map_err(|e| {
            TokenizationError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        Ok(Self { tokenizer })
    }

    /// Number of entries in the vocabulary
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.vocab().values().len()
    }
}

impl SubwordTokenizer for VocabTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizationError> {
        Ok(self.tokenizer.tokenize(text))
    }

    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Vec<u32> {
        self.tokenizer
            .convert_tokens_to_ids(tokens)
            .into_iter()
            .map(|id| id as u32)
            .collect()
    }

    fn convert_ids_to_tokens(&self, ids: &[u32]) -> Vec<String> {
        let vocab = self.tokenizer.vocab();

        ids.iter()
            .map(|id| vocab.id_to_token(&(*id as i64)))
            .collect()
    }
}
