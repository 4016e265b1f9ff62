use std::collections::HashMap;

use burn_bert_classifier::tokenization::{encode_batch, SubwordTokenizer, TokenizationError};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Whitespace tokenizer over a fixed word list, so the benchmark measures encoding only
struct Words {
    ids: HashMap<String, u32>,
}

impl Words {
    fn new() -> Self {
        let ids = ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "good", "bad", "product", "very"]
            .iter()
            .enumerate()
            .map(|(id, word)| (word.to_string(), id as u32))
            .collect();

        Self { ids }
    }
}

impl SubwordTokenizer for Words {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizationError> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Vec<u32> {
        tokens.iter().map(|t| *self.ids.get(t).unwrap_or(&1)).collect()
    }

    fn convert_ids_to_tokens(&self, _ids: &[u32]) -> Vec<String> {
        Vec::new()
    }
}

fn bench_encode(c: &mut Criterion) {
    let tokenizer = Words::new();
    let texts: Vec<String> = (0..1_000)
        .map(|i| "very good product ".repeat(i % 40 + 1))
        .collect();

    let mut group = c.benchmark_group("encode_batch");

    for max_seq_len in [64, 256] {
        group.bench_function(format!("max_seq_len_{max_seq_len}"), |b| {
            b.iter(|| encode_batch(&tokenizer, black_box(texts.as_slice()), max_seq_len))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
