//! Command line tool for inference with a pretrained BERT binary classifier

use anyhow::{anyhow, Result};
use burn::backend::{libtorch::LibTorchDevice, Autodiff, LibTorch};
use burn_bert_classifier::{
    models::{bert, PretrainedFiles},
    pipelines::binary_classification::infer,
    tokenization::encode_batch,
};
use pico_args::Arguments;
use serde::Serialize;

const HELP: &str = "\
Usage: infer [OPTIONS] TEXT...

Arguments:
  TEXT                 One or more texts to classify

Options:
  -h, --help           Print help
  -m, --model-dir      Directory holding config.json, model.safetensors and vocab.txt
  -l, --max-seq-len    Sequence length to encode texts to (defaults to 128)
  --cased              Do not lowercase text before tokenizing
  --pooler             Classify from the pooler output
  --cpu                Run on the CPU instead of the first CUDA device
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The pretrained model directory
    model_dir: Option<String>,

    /// The sequence length
    max_seq_len: usize,

    /// Keep case when tokenizing
    cased: bool,

    /// Use the pooling layer
    pooler: bool,

    /// Use the CPU device
    cpu: bool,

    /// The texts to classify
    texts: Vec<String>,
}

#[derive(Serialize)]
struct Prediction<'a> {
    text: &'a str,
    probability: f32,
    label: u8,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let mut args = Args {
        help: pargs.contains(["-h", "--help"]),
        model_dir: pargs.opt_value_from_str(["-m", "--model-dir"])?,
        max_seq_len: pargs
            .opt_value_from_str(["-l", "--max-seq-len"])?
            .unwrap_or(128),
        cased: pargs.contains("--cased"),
        pooler: pargs.contains("--pooler"),
        cpu: pargs.contains("--cpu"),
        texts: Vec::new(),
    };

    while let Some(text) = pargs.opt_free_from_str()? {
        args.texts.push(text);
    }

    Ok(args)
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    let model_dir = args
        .model_dir
        .ok_or_else(|| anyhow!("Missing required argument: --model-dir"))?;

    if args.texts.is_empty() {
        return Err(anyhow!("Missing required argument: TEXT"));
    }

    let files = PretrainedFiles::in_dir(
        &model_dir,
        "config.json",
        "model.safetensors",
        "vocab.txt",
        None,
    );

    let tokenizer = files.tokenizer_source(!args.cased).load()?;
    let encoded = encode_batch(tokenizer.as_ref(), &args.texts, args.max_seq_len)?;

    let device = if args.cpu {
        LibTorchDevice::Cpu
    } else {
        LibTorchDevice::Cuda(0)
    };

    // Get model predictions
    let probabilities = infer::<
        Autodiff<LibTorch>,
        bert::binary_classification::Model<Autodiff<LibTorch>>,
    >(device, &files, encoded, args.pooler)?;

    // Print out one JSON line per text
    for (text, probability) in args.texts.iter().zip(probabilities) {
        let prediction = Prediction {
            text,
            probability,
            label: u8::from(probability >= 0.5),
        };

        println!("{}", serde_json::to_string(&prediction)?);
    }

    Ok(())
}
