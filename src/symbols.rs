//! Symbol vocabulary — the closed, ordered set of output symbols.
//!
//! A symbol is one of: padding, end-of-sequence, separator, a consonant
//! initial, a tone-marked final, a prosodic-boundary marker, or a foreign
//! (ARPAbet) phoneme for embedded English. Finals are generated, not
//! hand-enumerated: every base final receives five tone variants and an
//! er-suffixed (retroflex) counterpart, so the inventory cannot drift from
//! the base tables.
//!
//! Two vocabulary layouts exist in the wild and are not interchangeable;
//! [`VocabularyScheme`] selects one explicitly. A [`Vocabulary`] is built
//! once, is immutable, and assigns every symbol the integer id equal to its
//! position in the canonical ordering.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::TextError;

// ─────────────────────────────────────────────────────────────────────────────
// Fixed tables
// ─────────────────────────────────────────────────────────────────────────────

/// Padding symbol; id 0 in every scheme.
pub const PAD: &str = "_";

/// End-of-sequence symbol, appended by the encoder; id 1 in every scheme.
pub const EOS: &str = "~";

/// Consonant initials. Two-character clusters are listed alongside their
/// single-character entries; the splitter tries them first.
pub const INITIALS: &[&str] = &[
    "b", "p", "f", "m", //
    "d", "t", "n", "l", //
    "g", "k", "h", //
    "j", "q", "x", //
    "zh", "ch", "sh", "r", //
    "z", "c", "s", //
    "w", "y",
];

/// Base finals (nucleus + coda), before tone numbering and er-form
/// generation. Both full and contracted spellings are carried (`iou`/`iu`,
/// `uei`/`ui`, `uen`/`un`).
const BASE_FINALS: &[&str] = &[
    "a", "ai", "an", "ang", "ao", //
    "e", "ei", "en", "eng", "er", "ev", //
    "i", "ia", "ian", "iang", "iao", //
    "ie", "in", "ing", "iong", "iou", "iu", //
    "o", "ong", "ou", //
    "u", "ua", "uai", "uan", "uang", //
    "uei", "uen", "ueng", //
    "ue", "ui", "un", "uo", //
    "v", "van", "ve", "vn",
];

/// The syllabic nasal, a final with no nucleus vowel.
const SYLLABIC_NASAL: &str = "ng";

/// Lexical tones 1-4 plus 5 for the neutral tone.
const TONES: RangeInclusive<u8> = 1..=5;

/// Auxiliary phoneme inventory for embedded English words: ARPAbet, with
/// stress-digit variants for the vowels. All-uppercase, so none of these
/// collide with the pinyin symbols.
pub const FOREIGN_PHONEMES: &[&str] = &[
    "AA", "AA0", "AA1", "AA2", "AE", "AE0", "AE1", "AE2", "AH", "AH0", "AH1",
    "AH2", "AO", "AO0", "AO1", "AO2", "AW", "AW0", "AW1", "AW2", "AY", "AY0",
    "AY1", "AY2", "B", "CH", "D", "DH", "EH", "EH0", "EH1", "EH2", "ER",
    "ER0", "ER1", "ER2", "EY", "EY0", "EY1", "EY2", "F", "G", "HH", "IH",
    "IH0", "IH1", "IH2", "IY", "IY0", "IY1", "IY2", "JH", "K", "L", "M", "N",
    "NG", "OW", "OW0", "OW1", "OW2", "OY", "OY0", "OY1", "OY2", "P", "R",
    "S", "SH", "T", "TH", "UH", "UH0", "UH1", "UH2", "UW", "UW0", "UW1",
    "UW2", "V", "W", "Y", "Z", "ZH",
];

/// Er-suffixed forms of the base finals. A preceding final from this set
/// already carries the retroflex colouring, so a following 儿 character adds
/// no phoneme of its own.
static ER_FINALS: Lazy<HashSet<String>> = Lazy::new(|| er_forms().collect());

/// Er-form generation: append `r` to every base final not already ending in
/// `r`. Note the er-form of `e` spells `er`, the same string as the base
/// final `er`.
fn er_forms() -> impl Iterator<Item = String> {
    BASE_FINALS
        .iter()
        .filter(|f| !f.ends_with('r'))
        .map(|f| format!("{f}r"))
}

/// Full final inventory before tone numbering: base finals, er-forms, and
/// the syllabic nasal. The er-form `er` duplicates the base final `er` and
/// is emitted once to keep the vocabulary a set.
fn net_finals() -> Vec<String> {
    let mut finals: Vec<String> = BASE_FINALS.iter().map(|f| f.to_string()).collect();
    for er in er_forms() {
        if !finals.contains(&er) {
            finals.push(er);
        }
    }
    finals.push(SYLLABIC_NASAL.to_string());
    finals
}

/// Whether a final already folds in the retroflex suffix, so that a
/// directly following 儿 character is silent. Accepts the final with or
/// without its trailing tone digit.
pub fn is_er_suppressed(preceding_final: &str) -> bool {
    let base = preceding_final.trim_end_matches(|c: char| c.is_ascii_digit());
    ER_FINALS.contains(base)
}

// ─────────────────────────────────────────────────────────────────────────────
// Vocabulary schemes
// ─────────────────────────────────────────────────────────────────────────────

/// The two vocabulary layouts found in trained checkpoints. They are not
/// backward compatible; callers must pick the one their embedding table was
/// trained with. There is deliberately no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyScheme {
    /// Tone folded into the final symbol (`ong1`). Boundary markers are the
    /// digit symbols `1`-`4` and the separator is `.`; no standalone tone
    /// symbols exist.
    ToneInFinal,
    /// Bare finals (`ong`) followed by a standalone tone symbol `1`-`5`.
    /// Digits are taken by the tones, so the boundary markers are the four
    /// glyphs `` ` `` `/` `,` `.` (weakest to strongest) and the separator
    /// is `-`.
    ToneMarker,
}

impl VocabularyScheme {
    /// The intra-word syllable separator symbol.
    pub fn separator(self) -> &'static str {
        match self {
            VocabularyScheme::ToneInFinal => ".",
            VocabularyScheme::ToneMarker => "-",
        }
    }

    /// Prosodic-boundary marker symbols, weakest to strongest.
    pub fn boundary_markers(self) -> [&'static str; 4] {
        match self {
            VocabularyScheme::ToneInFinal => ["1", "2", "3", "4"],
            VocabularyScheme::ToneMarker => ["`", "/", ",", "."],
        }
    }

    /// The marker symbol for a boundary-strength digit `1`-`4`, or `None`
    /// for any other character.
    pub fn boundary_marker(self, strength: char) -> Option<&'static str> {
        let n = strength.to_digit(10)?;
        if (1..=4).contains(&n) {
            Some(self.boundary_markers()[n as usize - 1])
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VocabularyScheme::ToneInFinal => "tone_in_final",
            VocabularyScheme::ToneMarker => "tone_marker",
        }
    }

    /// The canonical symbol ordering for this scheme: pad, eos, separator,
    /// initials, finals, tones (tone-marker only), boundary markers, foreign
    /// phonemes.
    fn build_symbols(self) -> Vec<String> {
        let mut symbols: Vec<String> =
            vec![PAD.to_string(), EOS.to_string(), self.separator().to_string()];
        symbols.extend(INITIALS.iter().map(|s| s.to_string()));
        match self {
            VocabularyScheme::ToneInFinal => {
                for f in net_finals() {
                    for tone in TONES {
                        symbols.push(format!("{f}{tone}"));
                    }
                }
            }
            VocabularyScheme::ToneMarker => {
                symbols.extend(net_finals());
                symbols.extend(TONES.map(|tone| tone.to_string()));
            }
        }
        symbols.extend(self.boundary_markers().iter().map(|s| s.to_string()));
        symbols.extend(FOREIGN_PHONEMES.iter().map(|s| s.to_string()));
        symbols
    }
}

impl fmt::Display for VocabularyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VocabularyScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tone_in_final" => Ok(VocabularyScheme::ToneInFinal),
            "tone_marker" => Ok(VocabularyScheme::ToneMarker),
            other => Err(format!(
                "unknown vocabulary scheme {other:?} (expected tone_in_final or tone_marker)"
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ─────────────────────────────────────────────────────────────────────────────

/// The closed symbol inventory with its id assignment.
///
/// Ids are positions in the canonical ordering, contiguous in
/// `[0, len)`, and stable across runs so persisted id sequences stay valid.
/// A `Vocabulary` is never mutated after construction and is `Send + Sync`;
/// clone it or share a reference across worker threads freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    scheme: VocabularyScheme,
    symbols: Vec<String>,
    ids: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new(scheme: VocabularyScheme) -> Self {
        let symbols = scheme.build_symbols();
        let ids = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Vocabulary {
            scheme,
            symbols,
            ids,
        }
    }

    pub fn scheme(&self) -> VocabularyScheme {
        self.scheme
    }

    /// All symbols in canonical order; a symbol's position is its id.
    pub fn all_symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.ids.contains_key(symbol)
    }

    /// The id of a symbol, or `UnknownSymbol` if it is not in the inventory.
    pub fn id_of(&self, symbol: &str) -> Result<usize, TextError> {
        self.ids
            .get(symbol)
            .copied()
            .ok_or_else(|| TextError::UnknownSymbol(symbol.to_string()))
    }

    /// The symbol at an id, or `OutOfRange` if the id is past the end.
    pub fn symbol_of(&self, id: usize) -> Result<&str, TextError> {
        self.symbols
            .get(id)
            .map(String::as_str)
            .ok_or(TextError::OutOfRange {
                id,
                size: self.symbols.len(),
            })
    }

    /// Id of the padding symbol. `pad` heads the canonical ordering.
    pub fn pad_id(&self) -> usize {
        0
    }

    /// Id of the end-of-sequence symbol, second in the canonical ordering.
    pub fn eos_id(&self) -> usize {
        1
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMES: [VocabularyScheme; 2] =
        [VocabularyScheme::ToneInFinal, VocabularyScheme::ToneMarker];

    #[test]
    fn test_pad_and_eos_head_the_ordering() {
        for scheme in SCHEMES {
            let vocab = Vocabulary::new(scheme);
            assert_eq!(vocab.id_of(PAD), Ok(0), "{scheme}");
            assert_eq!(vocab.id_of(EOS), Ok(1), "{scheme}");
            assert_eq!(vocab.pad_id(), 0);
            assert_eq!(vocab.eos_id(), 1);
        }
    }

    #[test]
    fn test_vocab_uniqueness() {
        for scheme in SCHEMES {
            let vocab = Vocabulary::new(scheme);
            let mut seen = HashSet::new();
            for symbol in vocab.all_symbols() {
                assert!(seen.insert(symbol), "duplicate symbol {symbol:?} in {scheme}");
            }
        }
    }

    #[test]
    fn test_ids_contiguous() {
        for scheme in SCHEMES {
            let vocab = Vocabulary::new(scheme);
            for id in 0..vocab.len() {
                let symbol = vocab.symbol_of(id).unwrap();
                assert_eq!(vocab.id_of(symbol), Ok(id));
            }
            assert!(matches!(
                vocab.symbol_of(vocab.len()),
                Err(TextError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_inventory_sizes() {
        // 3 specials + 23 initials + 81 finals (41 base + 40 er-forms - 1
        // duplicate "er" + "ng") x 5 tones + 4 markers + 84 foreign.
        assert_eq!(Vocabulary::new(VocabularyScheme::ToneInFinal).len(), 519);
        // Same, with bare finals and 5 standalone tone symbols.
        assert_eq!(Vocabulary::new(VocabularyScheme::ToneMarker).len(), 200);
    }

    #[test]
    fn test_er_forms_generated() {
        let vocab = Vocabulary::new(VocabularyScheme::ToneInFinal);
        for toned in ["ar1", "ar5", "uangr3", "iaor2"] {
            assert!(vocab.contains(toned), "missing er-form {toned:?}");
        }
        // "er" already ends in r, so no "err" form is generated; "ng" gets
        // no er-form either since it is appended after generation.
        assert!(!vocab.contains("err1"));
        assert!(!vocab.contains("ngr1"));
    }

    #[test]
    fn test_er_duplicate_emitted_once() {
        for scheme in SCHEMES {
            let vocab = Vocabulary::new(scheme);
            let probe = match scheme {
                VocabularyScheme::ToneInFinal => "er2",
                VocabularyScheme::ToneMarker => "er",
            };
            let count = vocab
                .all_symbols()
                .iter()
                .filter(|s| s.as_str() == probe)
                .count();
            assert_eq!(count, 1, "{scheme}");
        }
    }

    #[test]
    fn test_syllabic_nasal_is_a_final() {
        assert!(Vocabulary::new(VocabularyScheme::ToneInFinal).contains("ng5"));
        assert!(Vocabulary::new(VocabularyScheme::ToneMarker).contains("ng"));
    }

    #[test]
    fn test_foreign_phonemes_present() {
        for scheme in SCHEMES {
            let vocab = Vocabulary::new(scheme);
            for phoneme in ["AA1", "HH", "NG", "ZH", "AH0"] {
                assert!(vocab.contains(phoneme), "missing {phoneme:?} in {scheme}");
            }
        }
    }

    #[test]
    fn test_boundary_markers_and_separator() {
        let newer = Vocabulary::new(VocabularyScheme::ToneInFinal);
        for marker in ["1", "2", "3", "4"] {
            assert!(newer.contains(marker));
        }
        assert!(newer.contains("."));
        assert!(!newer.contains("5"), "no standalone tone symbols");

        let older = Vocabulary::new(VocabularyScheme::ToneMarker);
        for marker in ["`", "/", ",", "."] {
            assert!(older.contains(marker));
        }
        assert!(older.contains("-"));
        for tone in ["1", "2", "3", "4", "5"] {
            assert!(older.contains(tone), "tone {tone:?} is a symbol");
        }

        assert_eq!(VocabularyScheme::ToneInFinal.boundary_marker('1'), Some("1"));
        assert_eq!(VocabularyScheme::ToneMarker.boundary_marker('1'), Some("`"));
        assert_eq!(VocabularyScheme::ToneMarker.boundary_marker('4'), Some("."));
        assert_eq!(VocabularyScheme::ToneMarker.boundary_marker('5'), None);
        assert_eq!(VocabularyScheme::ToneInFinal.boundary_marker('x'), None);
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let vocab = Vocabulary::new(VocabularyScheme::ToneInFinal);
        assert_eq!(
            vocab.id_of("nga1"),
            Err(TextError::UnknownSymbol("nga1".to_string()))
        );
    }

    #[test]
    fn test_er_suppression_predicate() {
        for suppressing in ["ar", "ar1", "uanr2", "er3", "er", "ianr5"] {
            assert!(is_er_suppressed(suppressing), "{suppressing:?}");
        }
        for plain in ["an4", "a1", "ang", "ng5", "e2", "", "3", "AH0"] {
            assert!(!is_er_suppressed(plain), "{plain:?}");
        }
    }

    #[test]
    fn test_scheme_parse_and_serde() {
        assert_eq!(
            "tone_in_final".parse::<VocabularyScheme>(),
            Ok(VocabularyScheme::ToneInFinal)
        );
        assert_eq!(
            "tone_marker".parse::<VocabularyScheme>(),
            Ok(VocabularyScheme::ToneMarker)
        );
        assert!("pinyin".parse::<VocabularyScheme>().is_err());

        let json = serde_json::to_string(&VocabularyScheme::ToneInFinal).unwrap();
        assert_eq!(json, "\"tone_in_final\"");
        let back: VocabularyScheme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VocabularyScheme::ToneInFinal);
    }
}
