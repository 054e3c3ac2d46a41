//! Mixed-script segmentation of annotated dataset metadata.
//!
//! Dataset utterances arrive as a hanzi text line (with embedded prosody
//! digits once the `#` annotation sigils are stripped) plus a parallel
//! annotation stream: one pinyin syllable per Chinese character, and
//! `/`-delimited runs of uppercase phonemes for embedded English words.
//! The scan walks the text character by character, keeping the annotation
//! cursor in step, and emits the same symbol alphabet the line converter
//! produces: split initials/finals, separators between syllables inside a
//! prosodic word, boundary markers, spliced foreign phonemes.
//!
//! The one piece of phonology here is er-hua: a 儿 whose sound is already
//! folded into the preceding er-suffixed final consumes no annotation token
//! and emits nothing.

use crate::convert::push_syllable;
use crate::error::TextError;
use crate::pinyin::split_syllable;
use crate::symbols::{is_er_suppressed, VocabularyScheme};

/// CJK punctuation removed before scanning, along with the `#` sigil that
/// precedes prosody digits in raw metadata.
const PUNCTUATION: &[char] = &[
    '“', '”', '、', '，', '。', '：', '；', '？', '！', '—', '…', '#',
];

pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !PUNCTUATION.contains(c)).collect()
}

/// Segment one utterance into symbol tokens.
///
/// `annotation` must hold exactly the syllables and `/`-delimited phoneme
/// runs the text calls for; running dry or leaving tokens unconsumed is a
/// malformed utterance.
pub fn segment_annotated(
    text: &str,
    annotation: &[&str],
    scheme: VocabularyScheme,
) -> Result<Vec<String>, TextError> {
    let clean = strip_punctuation(text);
    let chars: Vec<char> = clean.chars().collect();

    let mut out: Vec<String> = Vec::new();
    let mut next = 0; // annotation cursor
    let mut suppress_sep = true; // at start and right after a boundary marker
    let mut last_final: Option<String> = None;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let marker = scheme.boundary_marker(c).ok_or_else(|| {
                TextError::MalformedTranscript(format!(
                    "digit {c:?} in {text:?} is not a boundary marker"
                ))
            })?;
            out.push(marker.to_string());
            suppress_sep = true;
            last_final = None;
            i += 1;
        } else if c.is_ascii_alphabetic() {
            // English word: skip its letters, splice its phoneme run.
            if !suppress_sep {
                out.push(scheme.separator().to_string());
            }
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            if annotation.get(next) == Some(&"/") {
                next += 1;
            }
            while let Some(phoneme) = annotation.get(next) {
                if *phoneme == "/" {
                    break;
                }
                out.push((*phoneme).to_string());
                next += 1;
            }
            match annotation.get(next) {
                Some(&"/") => next += 1,
                _ => {
                    return Err(TextError::MalformedTranscript(format!(
                        "unterminated phoneme run in annotation for {text:?}"
                    )))
                }
            }
            suppress_sep = false;
            last_final = None;
        } else if c == '儿' && last_final.as_deref().is_some_and(is_er_suppressed) {
            // Retroflex already folded into the preceding final.
            i += 1;
        } else {
            let syllable = annotation.get(next).ok_or_else(|| {
                TextError::MalformedTranscript(format!(
                    "annotation stream exhausted at {c:?} in {text:?}"
                ))
            })?;
            let (initial, final_) = split_syllable(syllable)?;
            if !suppress_sep {
                out.push(scheme.separator().to_string());
            }
            push_syllable(&mut out, initial, final_, scheme);
            last_final = Some(final_.to_string());
            suppress_sep = false;
            next += 1;
            i += 1;
        }
    }

    if next != annotation.len() {
        return Err(TextError::MalformedTranscript(format!(
            "{} unconsumed annotation tokens for {text:?}",
            annotation.len() - next
        )));
    }
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
