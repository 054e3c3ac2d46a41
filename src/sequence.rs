//! Symbol sequence encoding — finished tokens to embedding-table ids and
//! back.

use crate::error::TextError;
use crate::symbols::{Vocabulary, EOS, PAD};

/// Encode a token sequence against a vocabulary and append the eos id.
///
/// Empty tokens are skipped. Any token outside the vocabulary is a hard
/// error, never a silent drop: an unencodable symbol means the pipeline and
/// the vocabulary disagree, and the sequence must not reach training data.
/// Literal pad/eos text is rejected for the same reason — neither is ever a
/// legitimate transcript token.
pub fn encode<'a, I>(tokens: I, vocab: &Vocabulary) -> Result<Vec<usize>, TextError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids = Vec::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if token == PAD || token == EOS {
            return Err(TextError::UnknownSymbol(token.to_string()));
        }
        ids.push(vocab.id_of(token)?);
    }
    ids.push(vocab.eos_id());
    Ok(ids)
}

/// Encode a whitespace-joined symbol string (the human-readable
/// intermediate form).
pub fn encode_text(text: &str, vocab: &Vocabulary) -> Result<Vec<usize>, TextError> {
    encode(text.split_whitespace(), vocab)
}

/// Decode ids back to their symbols, concatenated with no separator
/// (symbols are self-delimiting by construction). Pad and eos ids are
/// skipped; an id past the vocabulary end is `OutOfRange`.
pub fn decode(ids: &[usize], vocab: &Vocabulary) -> Result<String, TextError> {
    let mut text = String::new();
    for &id in ids {
        if id == vocab.pad_id() || id == vocab.eos_id() {
            continue;
        }
        text.push_str(vocab.symbol_of(id)?);
    }
    Ok(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
