use burn::{
    data::dataloader,
    tensor::{backend::Backend, Bool, Int, Tensor},
};
use derive_new::new;

use crate::utils::tensors::{from_labels, from_rows};

use super::{Config, Item, Sequence};

/// An inference batch for binary classification
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Token ids as 2D tensor: [batch_size, max_seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Segment ids as 2D tensor: [batch_size, max_seq_len], all zero.
    ///
    /// The BERT encoder takes no segment input and embeds segment 0 at every
    /// position, so it does not read this field.
    pub token_type_ids: Tensor<B, 2, Int>,

    /// Padding mask, true at padding positions
    pub mask_pad: Tensor<B, 2, Bool>,
}

/// A training batch for binary classification
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Model input
    pub input: Infer<B>,

    /// 0/1 labels for the batch
    pub targets: Tensor<B, 1, Int>,
}

/// Struct for batching encoded sequences
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// ID of the padding token
    pub pad_token_id: usize,

    /// Width of every input row
    pub max_seq_len: usize,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(config: Config, device: B::Device) -> Self {
        Self {
            pad_token_id: config.pad_token_id,
            max_seq_len: config.max_seq_len,
            device,
        }
    }
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<Sequence, Infer<B>> for Batcher<B> {
    /// Collects encoded sequences into an inference batch
    fn batch(&self, items: Vec<Sequence>) -> Infer<B> {
        let (input_ids, token_type_ids): (Vec<_>, Vec<_>) = items
            .into_iter()
            .map(|sequence| (sequence.input_ids, sequence.token_type_ids))
            .unzip();

        let input_ids = from_rows::<B>(input_ids, self.max_seq_len, &self.device);
        let token_type_ids = from_rows::<B>(token_type_ids, self.max_seq_len, &self.device);
        let mask_pad = input_ids.clone().equal_elem(self.pad_token_id as i64);

        Infer {
            input_ids,
            token_type_ids,
            mask_pad,
        }
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend> dataloader::batcher::Batcher<Item, Train<B>> for Batcher<B> {
    /// Collects labelled sequences into a training batch
    fn batch(&self, items: Vec<Item>) -> Train<B> {
        let (sequences, labels): (Vec<_>, Vec<_>) = items
            .into_iter()
            .map(|item| (item.sequence, item.label))
            .unzip();

        let input: Infer<B> = self.batch(sequences);
        let targets = from_labels::<B>(labels, &self.device);

        Train { input, targets }
    }
}

#[cfg(test)]
mod tests {
    use burn::{backend::NdArray, data::dataloader::batcher::Batcher as _};
    use pretty_assertions::assert_eq;

    use super::*;

    type B = NdArray;

    fn batcher() -> Batcher<B> {
        let config = Config {
            pad_token_id: 0,
            max_seq_len: 4,
        };

        Batcher::new(config, Default::default())
    }

    fn item(input_ids: Vec<u32>, label: i64) -> Item {
        Item::new(Sequence::new(input_ids, vec![0; 4]), label)
    }

    #[test]
    fn builds_fixed_width_training_batches() {
        let batch: Train<B> =
            batcher().batch(vec![item(vec![2, 5, 3, 0], 1), item(vec![2, 6, 7, 3], 0)]);

        assert_eq!(batch.input.input_ids.dims(), [2, 4]);
        assert_eq!(batch.input.token_type_ids.dims(), [2, 4]);
        assert_eq!(batch.targets.into_data().convert::<i64>().value, vec![1, 0]);
        assert_eq!(
            batch
                .input
                .token_type_ids
                .sum()
                .into_data()
                .convert::<i64>()
                .value,
            vec![0]
        );
    }

    #[test]
    fn masks_only_padding_positions() {
        let batch: Infer<B> = batcher().batch(vec![Sequence::new(vec![2, 5, 0, 0], vec![0; 4])]);

        assert_eq!(
            batch.mask_pad.into_data().value,
            vec![false, false, true, true]
        );
    }
}
