use std::path::PathBuf;

use bert_burn::{
    data::BertInferenceBatch,
    model::{BertModel, BertModelOutput},
};
use burn::{
    module::Module,
    nn::{loss::BinaryCrossEntropyLossConfig, Linear, LinearRecord},
    tensor::{
        activation::sigmoid,
        backend::{AutodiffBackend, Backend},
        Int, Tensor,
    },
    train::ClassificationOutput,
};
use derive_new::new;

use crate::{
    models::bert::loader::from_safetensors,
    pipelines::binary_classification::{self, Infer, Train},
    utils::tensors::class_scores,
};

use super::{config::N_OUTPUTS, Config};

/// BERT for Binary Classification
#[derive(Module, Debug, new)]
pub struct Model<B: Backend> {
    /// The base BERT model
    pub model: BertModel<B>,

    /// Single-unit dense layer over the first output position
    pub output: Linear<B>,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Raw classification scores, before the sigmoid: [batch_size]
    pub fn logits(&self, input: Infer<B>) -> Tensor<B, 1> {
        let [batch_size, _seq_length] = input.input_ids.dims();

        let BertModelOutput {
            pooled_output,
            hidden_states,
        } = self.model.forward(BertInferenceBatch {
            tokens: input.input_ids,
            mask_pad: input.mask_pad,
        });

        self.output
            .forward(pooled_output.unwrap_or(hidden_states))
            .slice([0..batch_size, 0..1])
            .reshape([batch_size * N_OUTPUTS])
    }

    /// Defines forward pass for training
    pub fn forward(&self, input: Infer<B>, targets: Tensor<B, 1, Int>) -> ClassificationOutput<B> {
        let device = &self.model.devices()[0];

        let targets = targets.to_device(device);
        let logits = self.logits(input);

        let loss = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device())
            .forward(logits.clone(), targets.clone());

        ClassificationOutput {
            loss,
            output: class_scores(sigmoid(logits)),
            targets,
        }
    }

    /// Defines forward pass for inference
    pub fn infer(&self, input: Infer<B>) -> Tensor<B, 1> {
        sigmoid(self.logits(input))
    }
}

impl<B: AutodiffBackend> binary_classification::Model<B> for Model<B> {
    /// The model configuration
    type Config = Config;

    /// Load a model from a checkpoint, with a freshly initialized output layer
    fn load_pretrained(
        device: &B::Device,
        checkpoint: PathBuf,
        config: Self::Config,
    ) -> anyhow::Result<Self> {
        let model = config.init(device);
        let output = model.output.clone();

        let record = ModelRecord {
            model: from_safetensors(&checkpoint, device, &config.model)?,
            output: LinearRecord {
                weight: output.weight,
                bias: output.bias,
            },
        };

        Ok(model.load_record(record))
    }

    /// Perform a forward pass
    fn forward(&self, item: Train<B>) -> ClassificationOutput<B> {
        self.forward(item.input, item.targets)
    }

    /// Defines forward pass for inference
    fn infer(&self, input: Infer<B>) -> Tensor<B, 1> {
        self.infer(input)
    }
}
