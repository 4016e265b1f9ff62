use derive_new::new;

use super::{SubwordTokenizer, TokenizationError, CLS_TOKEN, PAD_TOKEN_ID, SEGMENT_ID, SEP_TOKEN};

/// Token ids and segment ids for a batch of texts, every row `max_seq_len` long
#[derive(Clone, Debug, Default, Eq, PartialEq, new)]
pub struct Encoded {
    /// `[CLS] tokens [SEP]` ids, truncated or zero-padded
    pub input_ids: Vec<Vec<u32>>,

    /// All-zero segment ids
    pub token_type_ids: Vec<Vec<u32>>,
}

impl Encoded {
    /// Number of encoded texts
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Row width, or `None` for an empty batch
    pub fn seq_len(&self) -> Option<usize> {
        self.input_ids.first().map(Vec::len)
    }
}

/// Encode one text into `(input_ids, token_type_ids)` of length `max_seq_len`.
///
/// The sequence is `[CLS] + tokenize(text) + [SEP]`. When that is longer
/// than `max_seq_len` the ids are cut at `max_seq_len`, which drops the
/// trailing `[SEP]`; otherwise they are right-padded with
/// [`PAD_TOKEN_ID`](super::PAD_TOKEN_ID).
pub fn encode<T>(
    tokenizer: &T,
    text: &str,
    max_seq_len: usize,
) -> Result<(Vec<u32>, Vec<u32>), TokenizationError>
where
    T: SubwordTokenizer + ?Sized,
{
    let subwords = tokenizer.tokenize(text)?;

    let mut tokens = Vec::with_capacity(subwords.len() + 2);
    tokens.push(CLS_TOKEN.to_string());
    tokens.extend(subwords);
    tokens.push(SEP_TOKEN.to_string());

    let mut input_ids = tokenizer.convert_tokens_to_ids(&tokens);

    if tokens.len() > max_seq_len {
        input_ids.truncate(max_seq_len);
    } else {
        input_ids.resize(max_seq_len, PAD_TOKEN_ID);
    }

    let token_type_ids = vec![SEGMENT_ID; max_seq_len];

    Ok((input_ids, token_type_ids))
}

/// Encode every text in order
pub fn encode_batch<T, S>(
    tokenizer: &T,
    texts: &[S],
    max_seq_len: usize,
) -> Result<Encoded, TokenizationError>
where
    T: SubwordTokenizer + ?Sized,
    S: AsRef<str>,
{
    let mut encoded = Encoded {
        input_ids: Vec::with_capacity(texts.len()),
        token_type_ids: Vec::with_capacity(texts.len()),
    };

    for text in texts {
        let (input_ids, token_type_ids) = encode(tokenizer, text.as_ref(), max_seq_len)?;

        encoded.input_ids.push(input_ids);
        encoded.token_type_ids.push(token_type_ids);
    }

    Ok(encoded)
}

/// Derive the shared sequence length from the training texts.
///
/// This counts the texts longer than `threshold` characters; it does not
/// measure the longest text. Short corpora therefore get a length of 0.
pub fn max_seq_len_from_texts<S: AsRef<str>>(texts: &[S], threshold: usize) -> usize {
    texts
        .iter()
        .filter(|text| text.as_ref().chars().count() > threshold)
        .count()
}
