use burn::{
    tensor::backend::{AutodiffBackend, Backend},
    train::{ClassificationOutput, TrainOutput, TrainStep, ValidStep},
};

use crate::pipelines::binary_classification::batcher::Train;

use super::Model;

/// Define training step
impl<B: AutodiffBackend> TrainStep<Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: Train<B>) -> TrainOutput<ClassificationOutput<B>> {
        // Run forward pass, calculate gradients and return them along with the output
        let output = self.forward(item.input, item.targets);
        let grads = output.loss.backward();

        TrainOutput::new(self, grads, output)
    }
}

/// Define validation step
impl<B: Backend> ValidStep<Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: Train<B>) -> ClassificationOutput<B> {
        // Run forward pass and return the output
        self.forward(item.input, item.targets)
    }
}
