use burn::tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor};

/// Stack equal-length id rows into a `[rows, seq_length]` tensor
pub fn from_rows<B: Backend>(
    rows: Vec<Vec<u32>>,
    seq_length: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = rows.len();

    let values = rows
        .into_iter()
        .flat_map(|row| {
            debug_assert_eq!(row.len(), seq_length, "ragged row in a fixed-length batch");
            row
        })
        .map(|id| (id as i64).elem())
        .collect();

    Tensor::from_data(Data::new(values, Shape::new([batch_size, seq_length])), device)
}

/// Build a 1D int tensor from labels
pub fn from_labels<B: Backend>(labels: Vec<i64>, device: &B::Device) -> Tensor<B, 1, Int> {
    let batch_size = labels.len();

    Tensor::from_data(
        Data::new(
            labels.into_iter().map(|label| label.elem()).collect(),
            Shape::new([batch_size]),
        ),
        device,
    )
}

/// Expand positive-class probabilities into `[1 - p, p]` class scores,
/// so that `argmax` over dimension 1 yields the predicted label
pub fn class_scores<B: Backend>(probabilities: Tensor<B, 1>) -> Tensor<B, 2> {
    let [batch_size] = probabilities.dims();

    let positive = probabilities.reshape([batch_size, 1]);
    let negative = positive.clone().neg().add_scalar(1.0);

    Tensor::cat(vec![negative, positive], 1)
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    use super::*;

    type B = NdArray;

    #[test]
    fn stacks_rows_in_order() {
        let device = Default::default();

        let tensor = from_rows::<B>(vec![vec![2, 5, 3], vec![2, 0, 0]], 3, &device);

        assert_eq!(tensor.dims(), [2, 3]);
        assert_eq!(
            tensor.into_data().convert::<i64>().value,
            vec![2, 5, 3, 2, 0, 0]
        );
    }

    #[test]
    fn labels_keep_their_values() {
        let device = Default::default();

        let tensor = from_labels::<B>(vec![1, 0, 1], &device);

        assert_eq!(tensor.into_data().convert::<i64>().value, vec![1, 0, 1]);
    }

    #[test]
    fn class_scores_pick_the_likelier_label() {
        let device = Default::default();
        let probabilities = Tensor::<B, 1>::from_floats([0.9, 0.2, 0.5], &device);

        let scores = class_scores(probabilities);
        let predicted = scores.clone().argmax(1).into_data().convert::<i64>().value;

        assert_eq!(scores.dims(), [3, 2]);
        assert_eq!(predicted[0], 1);
        assert_eq!(predicted[1], 0);

        let sums = scores.sum_dim(1).into_data().convert::<f32>().value;
        assert!(sums.iter().all(|sum| (sum - 1.0).abs() < 1e-6));
    }
}
