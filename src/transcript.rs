//! Transcript file processing — the pipe-delimited record boundary.
//!
//! Records look like `000001|N|ka3 er3 pu3 2 ...`: any number of opaque
//! leading fields (utterance id, speaker/emotion label) and the annotated
//! text last. Conversion rewrites only the text field. Per-line failures
//! drop the line with a diagnostic and the file keeps going; an unknown
//! symbol at encode time aborts the run instead, because it means the file
//! and the vocabulary disagree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::convert::convert_text;
use crate::error::TextError;
use crate::sequence;
use crate::symbols::Vocabulary;

/// One pipe-delimited transcript record. The last field is the annotated
/// text; earlier fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub fields: Vec<String>,
}

impl TranscriptLine {
    /// Split a raw line at `|`. Splitting always yields at least one field,
    /// so a line without pipes is a bare text field.
    pub fn parse(line: &str) -> Self {
        TranscriptLine {
            fields: line.split('|').map(str::to_string).collect(),
        }
    }

    /// The annotated text field.
    pub fn text(&self) -> &str {
        self.fields.last().map(String::as_str).unwrap_or("")
    }

    pub fn set_text(&mut self, text: String) {
        match self.fields.last_mut() {
            Some(last) => *last = text,
            None => self.fields.push(text),
        }
    }

    pub fn to_line(&self) -> String {
        self.fields.join("|")
    }
}

/// Counts reported by one file conversion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    pub read: usize,
    pub written: usize,
    pub unsupported: usize,
    pub malformed: usize,
}

/// Converts transcript files against one fixed vocabulary.
///
/// The vocabulary is immutable, so a single converter can be shared across
/// worker threads and files without coordination.
#[derive(Debug, Clone)]
pub struct TranscriptConverter {
    vocab: Vocabulary,
}

impl TranscriptConverter {
    pub fn new(vocab: Vocabulary) -> Self {
        TranscriptConverter { vocab }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Convert one raw record into the human-readable intermediate form
    /// (space-joined symbols in the text field).
    ///
    /// `Ok(None)` mirrors the tokenizer: an unsupported line produces no
    /// record.
    pub fn convert_line(&self, line: &str) -> Result<Option<TranscriptLine>, TextError> {
        let mut record = TranscriptLine::parse(line);
        match convert_text(record.text(), self.vocab.scheme())? {
            Some(tokens) => {
                record.set_text(tokens.join(" "));
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Encode one already-converted record into the model-ready form
    /// (space-joined integer ids in the text field).
    pub fn encode_line(&self, line: &str) -> Result<TranscriptLine, TextError> {
        let mut record = TranscriptLine::parse(line);
        let ids = sequence::encode_text(record.text(), &self.vocab)?;
        let id_text = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        record.set_text(id_text);
        Ok(record)
    }

    /// Convert a whole transcript file, dropping unsupported and malformed
    /// lines with a warning each.
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<ConvertStats> {
        let content = fs::read_to_string(input)
            .with_context(|| format!("reading transcript {}", input.display()))?;
        let mut stats = ConvertStats::default();
        let mut out = String::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            stats.read += 1;
            match self.convert_line(line) {
                Ok(Some(record)) => {
                    out.push_str(&record.to_line());
                    out.push('\n');
                    stats.written += 1;
                }
                Ok(None) => {
                    stats.unsupported += 1;
                    log::warn!("dropped line {}: embedded English or stray punctuation", lineno + 1);
                }
                Err(err) => {
                    stats.malformed += 1;
                    log::warn!("dropped line {}: {err}", lineno + 1);
                }
            }
        }
        fs::write(output, out)
            .with_context(|| format!("writing transcript {}", output.display()))?;
        log::info!(
            "converted {}: {} of {} lines written ({} unsupported, {} malformed)",
            input.display(),
            stats.written,
            stats.read,
            stats.unsupported,
            stats.malformed
        );
        Ok(stats)
    }

    /// Encode a converted transcript file into id sequences. Any unknown
    /// symbol aborts the whole run rather than dropping the line.
    pub fn encode_file(&self, input: &Path, output: &Path) -> Result<usize> {
        let content = fs::read_to_string(input)
            .with_context(|| format!("reading transcript {}", input.display()))?;
        let mut out = String::new();
        let mut written = 0;
        for (lineno, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let record = self
                .encode_line(line)
                .with_context(|| format!("line {} of {}", lineno + 1, input.display()))?;
            out.push_str(&record.to_line());
            out.push('\n');
            written += 1;
        }
        fs::write(output, out)
            .with_context(|| format!("writing transcript {}", output.display()))?;
        log::info!("encoded {written} lines from {}", input.display());
        Ok(written)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
