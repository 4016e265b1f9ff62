use std::path::PathBuf;

use crate::datasets::SplitKind;

/// WordPiece tokenization from a `vocab.txt` file
pub mod vocab;

/// Tokenization from a Hugging Face `tokenizer.json` file
pub mod hugging_face;

/// Fixed-length id sequences
pub mod encoder;

/// Tokenization of every split on a bounded worker pool
pub mod parallel;

pub use encoder::{encode, encode_batch, max_seq_len_from_texts, Encoded};
pub use hugging_face::HuggingFaceTokenizer;
pub use parallel::tokenize_splits;
pub use vocab::VocabTokenizer;

/// Sequence start token
pub static CLS_TOKEN: &str = "[CLS]";

/// Sequence boundary token
pub static SEP_TOKEN: &str = "[SEP]";

/// Out-of-vocabulary token
pub static UNK_TOKEN: &str = "[UNK]";

/// Id used to right-pad short sequences
pub const PAD_TOKEN_ID: u32 = 0;

/// Id written to every position of the segment sequence
pub const SEGMENT_ID: u32 = 0;

/// A subword tokenizer with a fixed vocabulary
pub trait SubwordTokenizer: Send + Sync {
    /// Split text into subword tokens, without special tokens
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizationError>;

    /// Look up the id of each token, mapping unknown tokens to `[UNK]`
    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Vec<u32>;

    /// Look up the token for each id
    fn convert_ids_to_tokens(&self, ids: &[u32]) -> Vec<String>;
}

/// Where a tokenizer is loaded from. Each worker loads its own copy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenizerSource {
    /// A newline-separated vocabulary file
    Vocab {
        /// Path to `vocab.txt`
        path: PathBuf,

        /// Lowercase (and strip accents from) text before tokenizing
        lower_case: bool,
    },

    /// A serialized Hugging Face tokenizer
    HuggingFace {
        /// Path to `tokenizer.json`
        path: PathBuf,
    },
}

impl TokenizerSource {
    /// Load the tokenizer
    pub fn load(&self) -> Result<Box<dyn SubwordTokenizer>, TokenizationError> {
        Ok(match self {
            TokenizerSource::Vocab { path, lower_case } => {
                Box::new(VocabTokenizer::from_file(path, *lower_case)?)
            }
            TokenizerSource::HuggingFace { path } => Box::new(HuggingFaceTokenizer::from_file(path)?),
        })
    }
}

/// Tokenization Error
#[derive(thiserror::Error, Debug)]
pub enum TokenizationError {
    /// The tokenizer could not be constructed from its file
    #[error("unable to load tokenizer from {path}: {message}")]
    Load {
        /// The tokenizer file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// The tokenizer rejected an input text
    #[error("unable to tokenize text: {0}")]
    Encode(String),

    /// A pool worker panicked or was cancelled
    #[error("tokenization worker for the {split} split failed: {source}")]
    Worker {
        /// The split the worker was tokenizing
        split: SplitKind,
        /// The join failure
        source: tokio::task::JoinError,
    },

    /// The worker pool was shut down while tasks were waiting
    #[error("tokenization pool closed: {0}")]
    PoolClosed(#[from] tokio::sync::AcquireError),
}
