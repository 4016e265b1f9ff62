use std::{fmt::Display, sync::Arc};

use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::AdamConfig,
    tensor::{
        backend::{AutodiffBackend, Backend},
        ElementConversion,
    },
    train::{
        metric::{AccuracyMetric, LossMetric},
        ClassificationOutput, LearnerBuilder, ValidStep,
    },
};
use log::{info, warn};
use serde::Serialize;

use crate::{
    datasets::{SplitKind, Splits},
    models::PretrainedFiles,
    tokenization::{max_seq_len_from_texts, tokenize_splits},
    utils::{hugging_face::download_hf_model, renderer::Simple},
};

use super::{batcher::Train, Batcher, EncodedDataset, Model, ModelConfig};

/// Training Config
pub type Config = super::config::Training;

/// Loss and accuracy over the test split
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Evaluation {
    /// Mean binary cross-entropy
    pub loss: f64,

    /// Fraction of correctly classified examples
    pub accuracy: f64,

    /// Number of examples evaluated
    pub items: usize,
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "loss: {:.4} - accuracy: {:.4} ({} items)",
            self.loss, self.accuracy, self.items
        )
    }
}

/// Define train function: fit on train, validate on dev each epoch, evaluate on test
pub async fn train<B, M>(
    devices: Vec<B::Device>, // Devices on which to perform computation (e.g., CPU or CUDA device)
    config: Config,          // Experiment configuration
    use_tui: bool,           // Render progress with the TUI instead of the log
) -> anyhow::Result<Evaluation>
where
    B: AutodiffBackend,
    M: Model<B> + 'static,
    M::InnerModule: ValidStep<
        Train<<B as AutodiffBackend>::InnerBackend>,
        ClassificationOutput<<B as AutodiffBackend>::InnerBackend>,
    >,
{
    let device = devices
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("At least one training device is required"))?;

    info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let splits = Splits::load(&config.data_dir, config.split_files())
        .await
        .map_err(|e| anyhow!("Unable to load dataset: {}", e))?;

    for split in splits.iter() {
        info!("{} split: {} examples", split.kind, split.len());
    }

    let max_seq_len = config.max_seq_len.unwrap_or_else(|| {
        max_seq_len_from_texts(&splits.train.texts, config.length_threshold)
    });

    if max_seq_len == 0 {
        warn!(
            "max_seq_len is 0: no training text is longer than {} characters",
            config.length_threshold
        );
    }

    let files = pretrained_files(&config).await?;
    let source = files.tokenizer_source(config.lower_case);

    let [encoded_train, encoded_test, encoded_dev] =
        tokenize_splits(&splits, max_seq_len, &source, config.num_workers).await?;

    info!(
        "input_ids shape: train [{}, {}], test [{}, {}], dev [{}, {}]",
        encoded_train.len(),
        max_seq_len,
        encoded_test.len(),
        max_seq_len,
        encoded_dev.len(),
        max_seq_len
    );

    if max_seq_len == 0 {
        return Err(anyhow!(
            "Refusing to build a model for empty sequences (max_seq_len is 0); set max_seq_len explicitly"
        ));
    }

    let model_config =
        M::Config::load_pretrained(files.config.clone(), max_seq_len, config.with_pooling_layer)
            .map_err(|e| anyhow!("Unable to load pre-trained model config file: {}", e))?;

    let model = M::load_pretrained(&device, files.checkpoint.clone(), model_config.clone())?;

    info!("{}", model);

    let dataset_train = EncodedDataset::new(SplitKind::Train, encoded_train, &splits.train.labels)?;
    let dataset_test = EncodedDataset::new(SplitKind::Test, encoded_test, &splits.test.labels)?;
    let dataset_dev = EncodedDataset::new(SplitKind::Dev, encoded_dev, &splits.dev.labels)?;

    // Initialize batchers for training and held-out data
    let batcher_train = Batcher::<B>::new(model_config.get_config(), device.clone());
    let batcher_valid =
        Batcher::<B::InnerBackend>::new(model_config.get_config(), device.clone());

    let workers: usize = std::thread::available_parallelism()?.into();

    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(workers)
        .build(dataset_train);

    let dataloader_dev = DataLoaderBuilder::new(batcher_valid.clone())
        .batch_size(config.batch_size)
        .num_workers(workers)
        .build(dataset_dev);

    let dataloader_test = DataLoaderBuilder::new(batcher_valid)
        .batch_size(config.batch_size)
        .num_workers(workers)
        .build(dataset_test);

    // Initialize optimizer
    let optimizer = AdamConfig::new().with_epsilon(config.adam_epsilon).init();

    // Initialize learner, without checkpointing or a learning rate schedule
    let builder = LearnerBuilder::new(&config.artifact_dir)
        .metric_train_numeric(AccuracyMetric::new())
        .metric_valid_numeric(AccuracyMetric::new())
        .metric_train_numeric(LossMetric::new())
        .metric_valid_numeric(LossMetric::new())
        .devices(devices)
        .num_epochs(config.num_epochs)
        .summary();

    let builder = if use_tui {
        builder
    } else {
        builder.renderer(Simple::new())
    };

    let learner = builder.build(model, optimizer, config.learning_rate);

    // Train the model
    let model_trained = learner.fit(dataloader_train, dataloader_dev);

    let evaluation = evaluate(&model_trained.valid(), dataloader_test);

    info!("test {}", evaluation);

    Ok(evaluation)
}

/// Run the model over every batch once, accumulating loss and accuracy
pub fn evaluate<B, M>(model: &M, dataloader: Arc<dyn DataLoader<Train<B>>>) -> Evaluation
where
    B: Backend,
    M: ValidStep<Train<B>, ClassificationOutput<B>>,
{
    let mut loss_sum = 0.0;
    let mut correct = 0;
    let mut items = 0;

    for batch in dataloader.iter() {
        let output = model.step(batch);
        let [batch_size] = output.targets.dims();

        let predicted = output.output.argmax(1).reshape([batch_size]);

        correct += predicted
            .equal(output.targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        loss_sum += output.loss.into_scalar().elem::<f64>() * batch_size as f64;
        items += batch_size;
    }

    if items == 0 {
        return Evaluation::default();
    }

    Evaluation {
        loss: loss_sum / items as f64,
        accuracy: correct as f64 / items as f64,
        items,
    }
}

/// Resolve the pretrained files from the Hub or the local model directory
async fn pretrained_files(config: &Config) -> anyhow::Result<PretrainedFiles> {
    let files = match &config.hub_model {
        Some(model_name) => download_hf_model(model_name, &config.file_names()).await?,
        None => config.local_files(),
    };

    files.ensure_exists()?;

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use burn::backend::{Autodiff, NdArray};
    use tempfile::TempDir;

    use crate::{models::bert, tokenization::vocab::tests::write_vocab};

    use super::*;

    type B = Autodiff<NdArray>;

    #[tokio::test]
    async fn refuses_to_build_a_model_for_short_corpora() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("train.txt"),
            "good product\tx\t1\nbad product\tx\t0\n",
        )
        .unwrap();
        fs::write(dir.path().join("test.txt"), "").unwrap();
        fs::write(dir.path().join("dev.txt"), "").unwrap();
        write_vocab(&dir);

        // Neither file is valid, so reading either one would fail differently
        fs::write(dir.path().join("config.json"), "not json").unwrap();
        fs::write(dir.path().join("model.safetensors"), "not a checkpoint").unwrap();

        let root = dir.path().to_string_lossy().into_owned();
        let config = Config::new(root.clone(), root).with_num_workers(1);

        let err = train::<B, bert::binary_classification::Model<B>>(
            vec![Default::default()],
            config,
            false,
        )
        .await
        .unwrap_err();

        assert!(
            err.to_string().contains("max_seq_len is 0"),
            "unexpected error: {err}"
        );
    }
}
