//! Acoustic feature extraction seam for the dataset builder.
//!
//! The builder itself never touches audio. Per utterance it hands a wav path
//! to a [`FeatureExtractor`], which either writes the feature artifacts
//! (`audio-*.npy`, `mel-*.npy`, optionally `linear-*.npy`) and reports their
//! names and sizes, or reports a [`SkipReason`] for utterances that should be
//! dropped without failing the run. [`AudioConfig`] carries the signal
//! parameters extractors and trainers must agree on.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Audio configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Signal-processing parameters shared between preprocessing and training.
///
/// Every field has a serde default, so a config file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub n_fft: usize,
    /// Samples between successive frames.
    pub hop_size: usize,
    pub win_size: usize,
    pub num_mels: usize,
    /// Rescale peak amplitude to `rescaling_max` before feature extraction.
    pub rescale: bool,
    pub rescaling_max: f32,
    pub trim_silence: bool,
    /// Utterances whose mel spectrogram exceeds this many frames are skipped
    /// when `clip_mels_length` is set.
    pub max_mel_frames: u64,
    pub clip_mels_length: bool,
    /// Also write linear spectrograms for a post-net target.
    pub predict_linear: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            sample_rate: 22050,
            n_fft: 2048,
            hop_size: 275,
            win_size: 1100,
            num_mels: 80,
            rescale: true,
            rescaling_max: 0.999,
            trim_silence: true,
            max_mel_frames: 900,
            clip_mels_length: true,
            predict_linear: false,
        }
    }
}

impl AudioConfig {
    pub fn from_file(path: &Path) -> Result<AudioConfig> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Cannot read audio config: {}", path.display()))?;
        let config = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse audio config: {}", path.display()))?;
        Ok(config)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Artifact naming
// ─────────────────────────────────────────────────────────────────────────────

// Artifact names embed the utterance id so train.txt rows and .npy files can
// be matched by eye.

pub fn audio_filename(index: &str) -> String {
    format!("audio-{index}.npy")
}

pub fn mel_filename(index: &str) -> String {
    format!("mel-{index}.npy")
}

pub fn linear_filename(index: &str) -> String {
    format!("linear-{index}.npy")
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Why an utterance was dropped from the training set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The wav file named by the metadata does not exist.
    MissingAudio,
    /// The mel spectrogram is longer than the configured frame limit.
    TooManyFrames { frames: u64, limit: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingAudio => write!(f, "audio file missing from wav folder"),
            SkipReason::TooManyFrames { frames, limit } => {
                write!(f, "mel spectrogram has {frames} frames, limit is {limit}")
            }
        }
    }
}

/// Sizes and artifact names for one successfully processed utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceSummary {
    pub audio_filename: String,
    pub mel_filename: String,
    /// Empty when no linear spectrogram was written.
    pub linear_filename: String,
    /// Padded sample count, always a multiple of the hop size.
    pub time_steps: u64,
    pub mel_frames: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureOutcome {
    Features(UtteranceSummary),
    Skip(SkipReason),
}

/// Per-utterance audio front end.
///
/// Implementations load the wav, compute features, and write the artifacts
/// under their own output directories. Conditions that make a single
/// utterance unusable are reported as [`FeatureOutcome::Skip`] so the caller
/// can drop the record and continue; `Err` is reserved for faults that
/// should abort the whole run.
pub trait FeatureExtractor {
    fn extract(&self, wav_path: &Path, index: &str) -> Result<FeatureOutcome>;
}
