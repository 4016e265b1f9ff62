use std::path::Path;

use tokenizers::Tokenizer;

use super::{SubwordTokenizer, TokenizationError, PAD_TOKEN_ID, UNK_TOKEN};

/// A tokenizer loaded from a Hugging Face `tokenizer.json`
pub struct HuggingFaceTokenizer {
    tokenizer: Tokenizer,

    /// Fallback id for tokens missing from the vocabulary
    unk_token_id: u32,
}

impl HuggingFaceTokenizer {
    /// Load a serialized tokenizer
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TokenizationError> {
        let path = path.as_ref();

        let tokenizer = Tokenizer::from_file(path).map_err(|e| TokenizationError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self::new(tokenizer))
    }

    /// Wrap an already constructed tokenizer
    pub fn new(tokenizer: Tokenizer) -> Self {
        let unk_token_id = tokenizer.token_to_id(UNK_TOKEN).unwrap_or(PAD_TOKEN_ID);

        Self {
            tokenizer,
            unk_token_id,
        }
    }
}

impl SubwordTokenizer for HuggingFaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizationError> {
        // Special tokens are added by the encoder, not the tokenizer's post-processor
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| TokenizationError::Encode(e.to_string()))?;

        Ok(encoding.get_tokens().to_vec())
    }

    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Vec<u32> {
        tokens
            .iter()
            .map(|token| {
                self.tokenizer
                    .token_to_id(token)
                    .unwrap_or(self.unk_token_id)
            })
            .collect()
    }

    fn convert_ids_to_tokens(&self, ids: &[u32]) -> Vec<String> {
        ids.iter()
            .map(|id| {
                self.tokenizer
                    .id_to_token(*id)
                    .unwrap_or_else(|| UNK_TOKEN.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use tokenizers::{
        models::wordpiece::WordPiece,
        pre_tokenizers::{whitespace::Whitespace, PreTokenizerWrapper},
    };

    use super::*;

    fn tokenizer() -> HuggingFaceTokenizer {
        let vocab: HashMap<String, u32> = ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "good", "product", "##s"]
            .iter()
            .enumerate()
            .map(|(id, token)| (token.to_string(), id as u32))
            .collect();

        let model = WordPiece::builder()
            .vocab(vocab)
            .unk_token(UNK_TOKEN.to_string())
            .build()
            .unwrap();

        let mut tokenizer = Tokenizer::new(model);
        tokenizer.with_pre_tokenizer(PreTokenizerWrapper::from(Whitespace::default()));

        HuggingFaceTokenizer::new(tokenizer)
    }

    #[test]
    fn tokenizes_without_special_tokens() {
        let tokenizer = tokenizer();

        let tokens = tokenizer.tokenize("good products").unwrap();

        assert_eq!(tokens, vec!["good", "product", "##s"]);
    }

    #[test]
    fn unknown_tokens_map_to_unk() {
        let tokenizer = tokenizer();

        let ids = tokenizer.convert_tokens_to_ids(&["[CLS]".to_string(), "terrible".to_string()]);

        assert_eq!(ids, vec![2, 1]);
        assert_eq!(tokenizer.convert_ids_to_tokens(&[2, 99]), vec!["[CLS]", "[UNK]"]);
    }
}
