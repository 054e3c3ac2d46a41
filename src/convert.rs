//! Prosody-aware tokenizer — one annotated transcript text to symbols.
//!
//! The text field of a transcript line is whitespace-split into raw tokens:
//! lowercase pinyin fragments, standalone digits `1`-`4` marking prosodic
//! boundary strength, and `.` marking syllable boundaries inside a prosodic
//! word. Fragments accumulate into a pending run; each digit or `.` flushes
//! the run through the pinyin splitter and then appends its own symbol.
//!
//! Lines embedding English (any uppercase letter) are not handled here and
//! yield no result, so the caller can drop them and continue.

use crate::error::TextError;
use crate::pinyin::split_pinyin;
use crate::symbols::VocabularyScheme;

/// Append one split syllable to the output per the active scheme: the toned
/// final as-is, or the bare final with its tone detached into a standalone
/// symbol. Empty initials are dropped.
pub(crate) fn push_syllable(
    out: &mut Vec<String>,
    initial: &str,
    toned_final: &str,
    scheme: VocabularyScheme,
) {
    if !initial.is_empty() {
        out.push(initial.to_string());
    }
    match scheme {
        VocabularyScheme::ToneInFinal => out.push(toned_final.to_string()),
        VocabularyScheme::ToneMarker => {
            let base_len = toned_final
                .trim_end_matches(|c: char| c.is_ascii_digit())
                .len();
            out.push(toned_final[..base_len].to_string());
            // Implicit neutral tone leaves no standalone tone symbol.
            if base_len < toned_final.len() {
                out.push(toned_final[base_len..].to_string());
            }
        }
    }
}

fn flush(
    out: &mut Vec<String>,
    pending: &[&str],
    scheme: VocabularyScheme,
) -> Result<(), TextError> {
    if pending.is_empty() {
        return Ok(());
    }
    let run = pending.concat();
    for (initial, final_) in split_pinyin(&run)? {
        push_syllable(out, initial, final_, scheme);
    }
    Ok(())
}

/// Convert the annotated text of one transcript line into symbol tokens.
///
/// Returns `Ok(None)` for lines this tokenizer does not support: embedded
/// uppercase English anywhere, or raw tokens with no letters that are
/// neither boundary digits nor `.` (stray punctuation). Format violations —
/// a trailing run with no closing marker, a digit token outside `1`-`4`, a
/// syllable missing its tone digit — are hard errors.
pub fn convert_text(
    text: &str,
    scheme: VocabularyScheme,
) -> Result<Option<Vec<String>>, TextError> {
    let raw: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::new();
    let mut head = 0;
    for (i, token) in raw.iter().enumerate() {
        if token.chars().all(|c| c.is_ascii_digit()) {
            flush(&mut out, &raw[head..i], scheme)?;
            let marker = token
                .chars()
                .next()
                .filter(|_| token.len() == 1)
                .and_then(|d| scheme.boundary_marker(d))
                .ok_or_else(|| {
                    TextError::MalformedTranscript(format!(
                        "stray digit token {token:?} is not a boundary marker"
                    ))
                })?;
            out.push(marker.to_string());
            head = i + 1;
        } else if *token == "." {
            flush(&mut out, &raw[head..i], scheme)?;
            out.push(scheme.separator().to_string());
            head = i + 1;
        } else if token.chars().any(char::is_uppercase) {
            // Embedded English is handled by the upstream segmenter, not here.
            return Ok(None);
        } else if token.chars().any(char::is_alphabetic) {
            // Lowercase pinyin fragment: extends the pending run.
        } else {
            return Ok(None);
        }
    }
    if head != raw.len() {
        return Err(TextError::MalformedTranscript(format!(
            "trailing syllables {:?} with no closing boundary marker",
            raw[head..].join(" ")
        )));
    }
    Ok(Some(out))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
