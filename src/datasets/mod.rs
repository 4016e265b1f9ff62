use std::path::PathBuf;

/// Tab-separated train/test/dev splits
pub mod tsv;

pub use tsv::{split_x_y, Row, Split, SplitKind, Splits};

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The split file could not be read
    #[error("unable to read {path}: {source}")]
    Io {
        /// The file that failed
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// A row is too short to hold a label
    #[error("{path}:{line}: expected a label in column {column}, found {found} column(s)")]
    MissingColumn {
        /// The file containing the row
        path: PathBuf,
        /// 1-based line number
        line: u64,
        /// The column that was expected
        column: usize,
        /// Number of columns actually present
        found: usize,
    },

    /// A label column does not hold 0 or 1
    #[error("{path}:{line}: label {value:?} is not 0 or 1")]
    InvalidLabel {
        /// The file containing the row
        path: PathBuf,
        /// 1-based line number
        line: u64,
        /// The raw label text
        value: String,
    },

    /// Texts and labels ended up with different lengths
    #[error("{split} split has {texts} texts but {labels} labels")]
    LengthMismatch {
        /// The offending split
        split: SplitKind,
        /// Number of texts
        texts: usize,
        /// Number of labels
        labels: usize,
    },
}
