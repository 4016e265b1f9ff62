use std::sync::Arc;

use futures::future::try_join_all;
use log::debug;
use tokio::{sync::Semaphore, task};

use crate::datasets::{SplitKind, Splits};

use super::{encode_batch, Encoded, TokenizationError, TokenizerSource};

/// Tokenize the train, test and dev splits concurrently.
///
/// One task per split runs on the blocking pool, with at most `num_workers`
/// running at once. Each task loads its own tokenizer from `source`. The
/// result is in submission order: `[train, test, dev]`. The first failure
/// aborts the whole call.
pub async fn tokenize_splits(
    splits: &Splits,
    max_seq_len: usize,
    source: &TokenizerSource,
    num_workers: usize,
) -> Result<[Encoded; 3], TokenizationError> {
    let jobs = splits
        .iter()
        .map(|split| (split.kind, split.texts.clone()))
        .collect();

    let mut encoded = tokenize_all(jobs, max_seq_len, source, num_workers)
        .await?
        .into_iter();

    // tokenize_all returns exactly one result per job
    let mut next = || encoded.next().unwrap_or_default();

    Ok([next(), next(), next()])
}

/// Tokenize each `(split, texts)` job on a pool of `num_workers`, keeping job order
pub async fn tokenize_all(
    jobs: Vec<(SplitKind, Vec<String>)>,
    max_seq_len: usize,
    source: &TokenizerSource,
    num_workers: usize,
) -> Result<Vec<Encoded>, TokenizationError> {
    let pool = Arc::new(Semaphore::new(num_workers.max(1)));

    let tasks = jobs.into_iter().map(|(split, texts)| {
        let pool = Arc::clone(&pool);
        let source = source.clone();

        async move {
            let _permit = pool.acquire_owned().await?;

            debug!("Tokenizing {} {} texts", texts.len(), split);

            let handle = task::spawn_blocking(move || {
                let tokenizer = source.load()?;

                encode_batch(tokenizer.as_ref(), &texts, max_seq_len)
            });

            let encoded = handle
                .await
                .map_err(|source| TokenizationError::Worker { split, source })??;

            Ok::<_, TokenizationError>(encoded)
        }
    });

    try_join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::{
        datasets::Split,
        tokenization::{vocab::tests::write_vocab, PAD_TOKEN_ID},
    };

    use super::*;

    fn split(kind: SplitKind, texts: &[&str]) -> Split {
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let labels = vec![1; texts.len()];

        Split::new(kind, texts, labels).unwrap()
    }

    fn splits() -> Splits {
        Splits {
            train: split(SplitKind::Train, &["good product", "bad product", "very good"]),
            test: split(SplitKind::Test, &["great"]),
            dev: split(SplitKind::Dev, &["bad", "good"]),
        }
    }

    #[tokio::test]
    async fn results_follow_split_order() {
        let dir = TempDir::new().unwrap();
        let source = TokenizerSource::Vocab {
            path: write_vocab(&dir),
            lower_case: true,
        };

        let [train, test, dev] = tokenize_splits(&splits(), 6, &source, 3).await.unwrap();

        assert_eq!(train.len(), 3);
        assert_eq!(test.len(), 1);
        assert_eq!(dev.len(), 2);
        assert_eq!(test.input_ids[0], vec![2, 9, 3, 0, 0, 0]);
        assert_eq!(dev.input_ids[1][1], 5);
        assert!(train
            .input_ids
            .iter()
            .all(|ids| ids.len() == 6 && ids[0] == 2));
    }

    #[tokio::test]
    async fn a_single_worker_gives_the_same_result() {
        let dir = TempDir::new().unwrap();
        let source = TokenizerSource::Vocab {
            path: write_vocab(&dir),
            lower_case: true,
        };

        let pooled = tokenize_splits(&splits(), 4, &source, 3).await.unwrap();
        let serial = tokenize_splits(&splits(), 4, &source, 1).await.unwrap();

        assert_eq!(pooled, serial);
        assert!(pooled[0].input_ids.iter().all(|ids| ids.len() == 4));
        assert_eq!(pooled[2].input_ids[0], vec![2, 6, 3, PAD_TOKEN_ID]);
    }

    #[tokio::test]
    async fn worker_failure_aborts_the_run() {
        let dir = TempDir::new().unwrap();
        let source = TokenizerSource::Vocab {
            path: dir.path().join("missing.txt"),
            lower_case: true,
        };

        let result = tokenize_splits(&splits(), 8, &source, 3).await;

        assert!(matches!(result, Err(TokenizationError::Load { .. })));
    }
}
