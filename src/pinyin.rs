//! Pinyin syllable splitting.
//!
//! One romanized syllable (with its trailing tone digit) is cut into an
//! (initial, final) pair by longest match over the initials table: try a
//! two-character initial, then a single character, with a carve-out for the
//! syllabic nasal `ng`. Flushed runs of concatenated syllables (`ni3hao3`)
//! are regrouped at tone digits before splitting.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TextError;
use crate::symbols::INITIALS;

/// Two-character initials (`zh`, `ch`, `sh`), matched before any single
/// character so `zhi` never splits as (`z`, `hi`).
static TWO_CHAR_INITIALS: Lazy<Vec<&'static str>> =
    Lazy::new(|| INITIALS.iter().copied().filter(|i| i.len() == 2).collect());

/// Single-character initials.
static ONE_CHAR_INITIALS: Lazy<HashSet<char>> = Lazy::new(|| {
    INITIALS
        .iter()
        .filter(|i| i.len() == 1)
        .filter_map(|i| i.chars().next())
        .collect()
});

/// One syllable inside a flushed run: letters closed by a tone digit.
static RE_SYLLABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+[1-5]").unwrap());

/// Split one syllable into its (initial, final) pair.
///
/// The initial may be empty (vowel-initial syllables, and the syllabic
/// nasal `ng` which is all final). Syllables shorter than two characters
/// are invalid: even a single-vowel syllable carries its tone digit. So is
/// any syllable whose final would hold no letters, like a bare consonant
/// plus tone digit (`n5`) or a non-romanized token.
pub fn split_syllable(syllable: &str) -> Result<(&str, &str), TextError> {
    if syllable.chars().count() < 2 {
        return Err(TextError::InvalidSyllable(syllable.to_string()));
    }
    let (initial, final_) = if TWO_CHAR_INITIALS.iter().any(|i| syllable.starts_with(i)) {
        syllable.split_at(2)
    } else {
        // An `n` directly followed by `g` spells the syllabic nasal, not a
        // consonant-initial `n`; the whole syllable is the final.
        match syllable.chars().next() {
            Some(first) if ONE_CHAR_INITIALS.contains(&first) && !syllable.starts_with("ng") => {
                syllable.split_at(first.len_utf8())
            }
            _ => ("", syllable),
        }
    };
    if !final_.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(TextError::InvalidSyllable(syllable.to_string()));
    }
    Ok((initial, final_))
}

/// Regroup a run of concatenated toned syllables (`ni3hao3`) and split each.
///
/// Returns (initial, final-with-tone) pairs in order; initials may be empty.
/// Any characters not consumed as `letters + tone digit` make the run
/// malformed — most commonly a trailing syllable missing its tone digit.
pub fn split_pinyin(run: &str) -> Result<Vec<(&str, &str)>, TextError> {
    let mut pairs = Vec::new();
    let mut consumed = 0;
    for m in RE_SYLLABLE.find_iter(run) {
        if m.start() != consumed {
            return Err(TextError::MalformedTranscript(format!(
                "unparsable characters {:?} in pinyin run {run:?}",
                &run[consumed..m.start()]
            )));
        }
        pairs.push(split_syllable(m.as_str())?);
        consumed = m.end();
    }
    if consumed != run.len() {
        return Err(TextError::MalformedTranscript(format!(
            "pinyin run {run:?} does not end with a tone digit"
        )));
    }
    Ok(pairs)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
