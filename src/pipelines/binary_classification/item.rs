use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{
    datasets::{DatasetError, SplitKind},
    tokenization::Encoded,
};

/// One encoded text, ready to be batched
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, new)]
pub struct Sequence {
    /// Token ids, `max_seq_len` long
    pub input_ids: Vec<u32>,

    /// Segment ids, `max_seq_len` long
    pub token_type_ids: Vec<u32>,
}

/// An encoded text with its binary label
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, new)]
pub struct Item {
    /// The encoded text
    pub sequence: Sequence,

    /// The 0/1 class label
    pub label: i64,
}

impl Encoded {
    /// Split the batch into per-text sequences
    pub fn into_sequences(self) -> Vec<Sequence> {
        self.input_ids
            .into_iter()
            .zip(self.token_type_ids)
            .map(|(input_ids, token_type_ids)| Sequence::new(input_ids, token_type_ids))
            .collect()
    }
}

/// An in-memory dataset of encoded, labelled texts
pub struct EncodedDataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

impl EncodedDataset {
    /// Pair each encoded text with its label
    pub fn new(split: SplitKind, encoded: Encoded, labels: &[i64]) -> Result<Self, DatasetError> {
        if encoded.len() != labels.len() {
            return Err(DatasetError::LengthMismatch {
                split,
                texts: encoded.len(),
                labels: labels.len(),
            });
        }

        let items = encoded
            .into_sequences()
            .into_iter()
            .zip(labels)
            .map(|(sequence, label)| Item::new(sequence, *label))
            .collect();

        Ok(Self {
            dataset: InMemDataset::new(items),
        })
    }
}

/// Implement the Dataset trait for the encoded dataset
impl dataset::Dataset<Item> for EncodedDataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}
