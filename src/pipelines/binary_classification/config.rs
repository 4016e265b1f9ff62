use burn::LearningRate;

use crate::{datasets::SplitKind, models::PretrainedFiles};

/// The common model configuration properties needed for the pipeline
#[derive(Clone, Debug)]
pub struct Config {
    /// The padding token ID
    pub pad_token_id: usize,

    /// The width every input row has
    pub max_seq_len: usize,
}

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct Training {
    /// Batch size
    #[config(default = 16)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 10)]
    pub num_epochs: usize,

    /// Adam learning rate, held constant for the whole run
    #[config(default = 1e-5)]
    pub learning_rate: LearningRate,

    /// Adam epsilon
    #[config(default = 1e-7)]
    pub adam_epsilon: f32,

    /// Size of the tokenization worker pool
    #[config(default = 3)]
    pub num_workers: usize,

    /// Texts longer than this many characters count toward the derived sequence length
    #[config(default = 256)]
    pub length_threshold: usize,

    /// Explicit sequence length, used instead of the derived one
    pub max_seq_len: Option<usize>,

    /// Lowercase and strip accents before WordPiece tokenization
    #[config(default = true)]
    pub lower_case: bool,

    /// Classify from the pooler output instead of the `[CLS]` hidden state
    #[config(default = false)]
    pub with_pooling_layer: bool,

    /// Seed for shuffling the training data each epoch
    #[config(default = 42)]
    pub seed: u64,

    /// Training split file name
    #[config(default = "\"train.txt\".to_string()")]
    pub train_file: String,

    /// Test split file name
    #[config(default = "\"test.txt\".to_string()")]
    pub test_file: String,

    /// Dev split file name
    #[config(default = "\"dev.txt\".to_string()")]
    pub dev_file: String,

    /// Encoder configuration file name within the model directory
    #[config(default = "\"config.json\".to_string()")]
    pub config_file: String,

    /// Checkpoint file name within the model directory
    #[config(default = "\"model.safetensors\".to_string()")]
    pub checkpoint_file: String,

    /// Vocabulary file name within the model directory
    #[config(default = "\"vocab.txt\".to_string()")]
    pub vocab_file: String,

    /// Optional `tokenizer.json` file name, used instead of the vocabulary
    pub tokenizer_file: Option<String>,

    /// Where the learner writes its logs
    #[config(default = "\"artifacts\".to_string()")]
    pub artifact_dir: String,

    /// Directory holding the split files
    pub data_dir: String,

    /// Directory holding the pretrained encoder files
    pub model_dir: String,

    /// Hugging Face Hub model to download instead of reading `model_dir`
    pub hub_model: Option<String>,
}

impl Training {
    /// Split file names in train, test, dev order
    pub fn split_files(&self) -> [&str; 3] {
        SplitKind::ALL.map(|kind| match kind {
            SplitKind::Train => self.train_file.as_str(),
            SplitKind::Test => self.test_file.as_str(),
            SplitKind::Dev => self.dev_file.as_str(),
        })
    }

    /// The pretrained file locations within `model_dir`
    pub fn local_files(&self) -> PretrainedFiles {
        self.pretrained_files_in(&self.model_dir)
    }

    /// The bare pretrained file names, as paths within a Hub repository
    pub fn file_names(&self) -> PretrainedFiles {
        self.pretrained_files_in("")
    }

    fn pretrained_files_in(&self, dir: &str) -> PretrainedFiles {
        PretrainedFiles::in_dir(
            dir,
            &self.config_file,
            &self.checkpoint_file,
            &self.vocab_file,
            self.tokenizer_file.as_deref(),
        )
    }
}
