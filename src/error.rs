//! Error types for the conversion pipeline.
//!
//! A line the tokenizer cannot handle (embedded uppercase English) is not an
//! error: it is reported as "no result" (`Ok(None)`) so file-level callers
//! can drop the line and keep going. Everything here is a real defect in the
//! input data or the pipeline configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// A syllable shorter than two characters reached the splitter.
    #[error("invalid pinyin syllable {0:?}")]
    InvalidSyllable(String),

    /// A token absent from the vocabulary at encode time. Always fatal for
    /// the run: it means the pipeline and the vocabulary disagree, and the
    /// sequence must not reach training data.
    #[error("unknown symbol {0:?}")]
    UnknownSymbol(String),

    /// An id outside the vocabulary range at decode time.
    #[error("symbol id {id} out of range for vocabulary of size {size}")]
    OutOfRange { id: usize, size: usize },

    /// Input that violates the transcript format: a trailing run with no
    /// closing boundary marker, letters without a tone digit, stray digit
    /// tokens, or an annotation stream out of step with its text.
    #[error("malformed transcript: {0}")]
    MalformedTranscript(String),
}
