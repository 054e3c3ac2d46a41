//! # mandarin-text
//!
//! Mandarin text frontend for speech synthesis — converts prosody-annotated
//! pinyin transcripts into the phoneme symbol sequences a synthesis model
//! consumes.
//!
//! ## Quick start
//!
//! ```
//! use mandarin_text::{convert_text, encode, Vocabulary, VocabularyScheme};
//!
//! let vocab = Vocabulary::new(VocabularyScheme::ToneInFinal);
//!
//! // "ni3 hao3 . shi4 jie4 1" — two prosodic words and a boundary marker.
//! let tokens = convert_text("ni3 hao3 . shi4 jie4 1", vocab.scheme())
//!     .unwrap()
//!     .expect("plain Mandarin line");
//! assert_eq!(tokens, ["n", "i3", "h", "ao3", ".", "sh", "i4", "j", "ie4", "1"]);
//!
//! // Symbol tokens map to contiguous ids; end-of-sequence is appended.
//! let ids = encode(tokens.iter().map(String::as_str), &vocab).unwrap();
//! assert_eq!(ids.len(), tokens.len() + 1);
//! assert_eq!(*ids.last().unwrap(), vocab.eos_id());
//! ```
//!
//! ## Pipeline
//! 1. **Tokenisation** — whitespace tokens scanned left to right; prosody
//!    digits become boundary markers, `.` becomes a syllable separator.
//! 2. **Syllable regrouping** — consecutive pinyin tokens are concatenated
//!    and re-split on tone digits, so transcripts survive inconsistent
//!    spacing.
//! 3. **Initial/final split** — each syllable is cut after its longest
//!    matching initial; the tone stays on the final or becomes its own
//!    symbol, depending on the [`VocabularyScheme`].
//! 4. **Encoding** — symbols map to contiguous ids against a fixed
//!    [`Vocabulary`]; decoding skips padding and end-of-sequence.
//!
//! Dataset preparation (metadata segmentation, feature extraction seams,
//! train.txt assembly) lives in [`segment`], [`features`], and [`dataset`].

pub mod convert;
pub mod dataset;
pub mod emotion;
pub mod error;
pub mod features;
pub mod pinyin;
pub mod segment;
pub mod sequence;
pub mod symbols;
pub mod transcript;

// ─── Re-exports for convenience ─────────────────────────────────────────────

/// Error type shared by every fallible operation in the crate.
pub use error::TextError;

/// Symbol table handle — construct one per [`VocabularyScheme`].
pub use symbols::{Vocabulary, VocabularyScheme};

pub use convert::convert_text;
pub use sequence::{decode, encode, encode_text};
pub use transcript::{ConvertStats, TranscriptConverter, TranscriptLine};
