//! Command line tool to fine-tune BERT for binary classification

use anyhow::anyhow;
use burn::{
    backend::{libtorch::LibTorchDevice, Autodiff, LibTorch},
    config::Config as _,
};
use burn_bert_classifier::{
    models::bert,
    pipelines::binary_classification::{self, Training},
};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Usage: train [OPTIONS]

Options:
  -h, --help           Print help
  -c, --config         A JSON training config file; flags below override it
  -d, --data-dir       Directory holding train.txt, test.txt and dev.txt
  -m, --model-dir      Directory holding config.json, model.safetensors and vocab.txt
  --hub-model          Download the pretrained files from Hugging Face Hub instead (e.g., 'bert-base-uncased')
  -n, --num-epochs     Number of epochs to train for
  -b, --batch-size     Batch size
  -w, --workers        Size of the tokenization worker pool
  -l, --max-seq-len    Explicit sequence length, instead of deriving it from the training texts
  --cpu                Train on the CPU instead of the first CUDA device
  --no-tui             Disable TUI
";

#[derive(Debug)]
struct Args {
    config: Option<String>,
    data_dir: Option<String>,
    model_dir: Option<String>,
    hub_model: Option<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    workers: Option<usize>,
    max_seq_len: Option<usize>,
    use_cpu: bool,
    use_tui: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            model_dir: pargs.opt_value_from_str(["-m", "--model-dir"])?,
            hub_model: pargs.opt_value_from_str("--hub-model")?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            workers: pargs.opt_value_from_str(["-w", "--workers"])?,
            max_seq_len: pargs.opt_value_from_str(["-l", "--max-seq-len"])?,
            use_cpu: pargs.contains("--cpu"),
            use_tui: !(pargs.contains("--no-tui")),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }

    /// Build the training config from the config file, then apply flag overrides
    fn training_config(&self) -> anyhow::Result<Training> {
        let mut config = match &self.config {
            Some(path) => Training::load(path)
                .map_err(|e| anyhow!("Unable to load training config {}: {}", path, e))?,
            None => {
                let data_dir = self
                    .data_dir
                    .clone()
                    .ok_or_else(|| anyhow!("Missing required argument: --data-dir"))?;
                let model_dir = self.model_dir.clone().unwrap_or_default();

                Training::new(data_dir, model_dir)
            }
        };

        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }

        if let Some(model_dir) = &self.model_dir {
            config.model_dir = model_dir.clone();
        }

        if self.hub_model.is_some() {
            config.hub_model = self.hub_model.clone();
        }

        if let Some(num_epochs) = self.num_epochs {
            config.num_epochs = num_epochs;
        }

        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        if let Some(workers) = self.workers {
            config.num_workers = workers;
        }

        if self.max_seq_len.is_some() {
            config.max_seq_len = self.max_seq_len;
        }

        if config.model_dir.is_empty() && config.hub_model.is_none() {
            return Err(anyhow!(
                "Missing required argument: --model-dir or --hub-model"
            ));
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let config = args.training_config()?;

    let device = if args.use_cpu {
        LibTorchDevice::Cpu
    } else {
        LibTorchDevice::Cuda(0)
    };

    info!(
        "Running the {} pipeline on {:?}",
        binary_classification::PIPELINE,
        device
    );

    let evaluation = binary_classification::train::<
        Autodiff<LibTorch>,
        bert::binary_classification::Model<Autodiff<LibTorch>>,
    >(vec![device], config, args.use_tui)
    .await?;

    println!("{}", evaluation);

    Ok(())
}
