use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use derive_new::new;
use log::debug;
use tokio::{
    fs::File,
    io::{self, AsyncBufReadExt},
};

use super::DatasetError;

/// The column holding the example text
pub const TEXT_COLUMN: usize = 0;

/// The column holding the integer label
pub const LABEL_COLUMN: usize = 2;

/// The three splits of a classification dataset
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SplitKind {
    /// Data the model is fit on
    Train,

    /// Held-out data evaluated once after training
    Test,

    /// Data validated against after each epoch
    Dev,
}

impl SplitKind {
    /// All splits, in the order they are loaded and tokenized
    pub const ALL: [SplitKind; 3] = [SplitKind::Train, SplitKind::Test, SplitKind::Dev];

    /// The conventional file name for this split
    pub fn default_file_name(&self) -> &'static str {
        match self {
            SplitKind::Train => "train.txt",
            SplitKind::Test => "test.txt",
            SplitKind::Dev => "dev.txt",
        }
    }
}

impl Display for SplitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SplitKind::Train => "train",
            SplitKind::Test => "test",
            SplitKind::Dev => "dev",
        };

        write!(f, "{}", name)
    }
}

/// One raw line of a split file
#[derive(Clone, Debug, Eq, PartialEq, new)]
pub struct Row {
    /// 1-based line number within the file
    pub line: u64,

    /// Tab-separated fields
    pub fields: Vec<String>,
}

/// Parallel texts and labels for one split
#[derive(Clone, Debug)]
pub struct Split {
    /// Which split this is
    pub kind: SplitKind,

    /// Example texts
    pub texts: Vec<String>,

    /// Example labels, index-aligned with `texts`
    pub labels: Vec<i64>,
}

impl Split {
    /// Pair texts with labels, refusing mismatched lengths
    pub fn new(kind: SplitKind, texts: Vec<String>, labels: Vec<i64>) -> Result<Self, DatasetError> {
        if texts.len() != labels.len() {
            return Err(DatasetError::LengthMismatch {
                split: kind,
                texts: texts.len(),
                labels: labels.len(),
            });
        }

        Ok(Self {
            kind,
            texts,
            labels,
        })
    }

    /// Read and parse a split file
    pub async fn load(path: impl AsRef<Path>, kind: SplitKind) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let rows = read_tsv(path).await?;
        let (texts, labels) = split_x_y(path, &rows)?;

        debug!("Loaded {} {} examples from {}", texts.len(), kind, path.display());

        Self::new(kind, texts, labels)
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the split has no examples
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// The train, test and dev splits of one dataset directory
#[derive(Clone, Debug)]
pub struct Splits {
    /// Training split
    pub train: Split,

    /// Test split
    pub test: Split,

    /// Dev (validation) split
    pub dev: Split,
}

impl Splits {
    /// Load all three splits from `data_dir`, with file names given in train, test, dev order
    pub async fn load(data_dir: impl AsRef<Path>, file_names: [&str; 3]) -> Result<Self, DatasetError> {
        let data_dir = data_dir.as_ref();
        let [train, test, dev] = file_names;

        Ok(Self {
            train: Split::load(data_dir.join(train), SplitKind::Train).await?,
            test: Split::load(data_dir.join(test), SplitKind::Test).await?,
            dev: Split::load(data_dir.join(dev), SplitKind::Dev).await?,
        })
    }

    /// Load the splits using the conventional file names
    pub async fn load_default(data_dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        Self::load(data_dir, SplitKind::ALL.map(|kind| kind.default_file_name())).await
    }

    /// The splits in train, test, dev order
    pub fn iter(&self) -> impl Iterator<Item = &Split> {
        [&self.train, &self.test, &self.dev].into_iter()
    }
}

/// Read a tab-separated file into rows. Quote characters are kept as text.
///
/// Each line is trimmed before splitting, so a blank line becomes a row with
/// a single empty field. Only the final line terminator is optional.
pub async fn read_tsv(path: &Path) -> Result<Vec<Row>, DatasetError> {
    let io_error = |source: io::Error| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).await.map_err(io_error)?;
    let mut lines = io::BufReader::new(file).lines();

    let mut rows = Vec::new();
    let mut line = 0;

    while let Some(text) = lines.next_line().await.map_err(io_error)? {
        line += 1;

        let fields = text.trim().split('\t').map(str::to_string).collect();

        rows.push(Row::new(line, fields));
    }

    Ok(rows)
}

/// Split rows into texts (column 0) and 0/1 labels (column 2)
pub fn split_x_y(path: &Path, rows: &[Row]) -> Result<(Vec<String>, Vec<i64>), DatasetError> {
    let mut texts = Vec::with_capacity(rows.len());
    let mut labels = Vec::with_capacity(rows.len());

    for row in rows {
        let value = row
            .fields
            .get(LABEL_COLUMN)
            .ok_or_else(|| missing_column(path, row))?;

        let label = match value.trim().parse::<i64>() {
            Ok(label @ (0 | 1)) => label,
            _ => {
                return Err(DatasetError::InvalidLabel {
                    path: path.to_path_buf(),
                    line: row.line,
                    value: value.clone(),
                })
            }
        };

        // A row that reached the label column always has a text column
        texts.push(row.fields[TEXT_COLUMN].trim_start().to_string());
        labels.push(label);
    }

    Ok((texts, labels))
}

fn missing_column(path: &Path, row: &Row) -> DatasetError {
    DatasetError::MissingColumn {
        path: PathBuf::from(path),
        line: row.line,
        column: LABEL_COLUMN,
        found: row.fields.len(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn row(line: u64, fields: &[&str]) -> Row {
        Row::new(line, fields.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn splits_text_and_label_columns() {
        let rows = vec![
            row(1, &["good product", "x", "1"]),
            row(2, &["bad product", "x", "0"]),
        ];

        let (texts, labels) = split_x_y(Path::new("train.txt"), &rows).unwrap();

        assert_eq!(texts, vec!["good product", "bad product"]);
        assert_eq!(labels, vec![1, 0]);
        assert_eq!(texts.len(), labels.len());
    }

    #[test]
    fn ignores_columns_past_the_label() {
        let rows = vec![row(1, &["text", "x", " 1 ", "extra", "more"])];

        let (texts, labels) = split_x_y(Path::new("train.txt"), &rows).unwrap();

        assert_eq!(texts, vec!["text"]);
        assert_eq!(labels, vec![1]);
    }

    #[test]
    fn rejects_rows_without_a_label_column() {
        let rows = vec![row(1, &["fine", "x", "1"]), row(2, &["short", "x"])];

        let err = split_x_y(Path::new("dev.txt"), &rows).unwrap_err();

        match err {
            DatasetError::MissingColumn { line, found, .. } => {
                assert_eq!(line, 2);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_integer_labels() {
        let rows = vec![row(7, &["text", "x", "positive"])];

        let err = split_x_y(Path::new("test.txt"), &rows).unwrap_err();

        assert!(matches!(
            err,
            DatasetError::InvalidLabel { line: 7, ref value, .. } if value == "positive"
        ));
    }

    #[test]
    fn split_refuses_mismatched_lengths() {
        let err = Split::new(SplitKind::Train, vec!["a".to_string()], vec![]).unwrap_err();

        assert!(matches!(
            err,
            DatasetError::LengthMismatch {
                texts: 1,
                labels: 0,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn loads_all_three_splits() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("train.txt"),
            "good product\tx\t1\n\"quoted\" text\tx\t0\n",
        )
        .unwrap();
        fs::write(dir.path().join("test.txt"), "  padded\tx\t1\r\n").unwrap();
        fs::write(dir.path().join("dev.txt"), "").unwrap();

        let splits = Splits::load_default(dir.path()).await.unwrap();

        assert_eq!(splits.train.texts, vec!["good product", "\"quoted\" text"]);
        assert_eq!(splits.train.labels, vec![1, 0]);
        assert_eq!(splits.test.texts, vec!["padded"]);
        assert!(splits.dev.is_empty());
        assert_eq!(
            splits.iter().map(|split| split.kind).collect::<Vec<_>>(),
            SplitKind::ALL.to_vec()
        );
    }

    #[tokio::test]
    async fn missing_split_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("train.txt"), "a\tx\t1\n").unwrap();

        let err = Splits::load_default(dir.path()).await.unwrap_err();

        match err {
            DatasetError::Io { path, .. } => assert!(path.ends_with("test.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn reports_the_line_of_a_bad_label() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train.txt");
        fs::write(&path, "a\tx\t1\nb\tx\tnope\n").unwrap();

        let err = Split::load(&path, SplitKind::Train).await.unwrap_err();

        assert!(matches!(err, DatasetError::InvalidLabel { line: 2, .. }));
    }

    #[test]
    fn rejects_labels_outside_zero_and_one() {
        let rows = vec![row(1, &["fine", "x", "1"]), row(2, &["odd", "x", "2"])];

        let err = split_x_y(Path::new("train.txt"), &rows).unwrap_err();

        assert!(matches!(
            err,
            DatasetError::InvalidLabel { line: 2, ref value, .. } if value == "2"
        ));
    }

    #[tokio::test]
    async fn blank_line_is_a_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train.txt");
        fs::write(&path, "a\tx\t1\n\nb\tx\t0\n").unwrap();

        let err = Split::load(&path, SplitKind::Train).await.unwrap_err();

        match err {
            DatasetError::MissingColumn { line, found, .. } => {
                assert_eq!(line, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn trailing_newline_is_not_a_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dev.txt");
        fs::write(&path, "a\tx\t1\nb\tx\t0\n").unwrap();

        let rows = read_tsv(&path).await.unwrap();

        assert_eq!(rows, vec![row(1, &["a", "x", "1"]), row(2, &["b", "x", "0"])]);
    }

    #[tokio::test]
    async fn blank_line_at_the_end_is_a_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        fs::write(&path, "a\tx\t1\n\n").unwrap();

        let err = Split::load(&path, SplitKind::Test).await.unwrap_err();

        assert!(matches!(err, DatasetError::MissingColumn { line: 2, found: 1, .. }));
    }
}
