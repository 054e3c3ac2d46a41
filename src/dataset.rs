//! Training-set construction from annotated speech corpora.
//!
//! A corpus directory holds a `metadata.txt` of line pairs (an `<id> <text>`
//! header line, then the annotation line of pinyin syllables and phoneme
//! runs) and a `wav/` folder of recordings named by utterance id. The
//! builder segments each utterance into symbol tokens, runs the
//! [`FeatureExtractor`] over its wav, and collects one [`TrainExample`] per
//! utterance that survives. The resulting `train.txt` is the input to the
//! training feeder.
//!
//! Corrupt metadata aborts the build; per-utterance extraction skips
//! (missing audio, over-long spectrograms) drop the record with a warning
//! and continue.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::emotion::{label_to_id, MissingLabelPolicy};
use crate::error::TextError;
use crate::features::{FeatureExtractor, FeatureOutcome};
use crate::segment::segment_annotated;
use crate::symbols::VocabularyScheme;

// ─────────────────────────────────────────────────────────────────────────────
// Training metadata records
// ─────────────────────────────────────────────────────────────────────────────

/// One row of `train.txt`: artifact names, sizes, emotion id, and the
/// space-joined symbol tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainExample {
    pub audio_filename: String,
    pub mel_filename: String,
    /// Empty when no linear spectrogram was written.
    pub linear_filename: String,
    pub time_steps: u64,
    pub mel_frames: u64,
    pub emotion_id: i32,
    pub text: String,
}

impl TrainExample {
    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.audio_filename,
            self.mel_filename,
            self.linear_filename,
            self.time_steps,
            self.mel_frames,
            self.emotion_id,
            self.text
        )
    }

    pub fn parse(line: &str) -> Result<TrainExample, TextError> {
        let fields: Vec<&str> = line.split('|').collect();
        let &[audio, mel, linear, time_steps, mel_frames, emotion, text] = fields.as_slice()
        else {
            return Err(TextError::MalformedTranscript(format!(
                "expected 7 train fields, got {} in {line:?}",
                fields.len()
            )));
        };
        let numeric = |field: &str, name: &str| {
            field.parse::<u64>().map_err(|_| {
                TextError::MalformedTranscript(format!("bad {name} {field:?} in {line:?}"))
            })
        };
        Ok(TrainExample {
            audio_filename: audio.to_string(),
            mel_filename: mel.to_string(),
            linear_filename: linear.to_string(),
            time_steps: numeric(time_steps, "time_steps")?,
            mel_frames: numeric(mel_frames, "mel_frames")?,
            emotion_id: emotion.parse::<i32>().map_err(|_| {
                TextError::MalformedTranscript(format!("bad emotion id {emotion:?} in {line:?}"))
            })?,
            text: text.to_string(),
        })
    }
}

/// Write `train.txt`, one pipe-joined example per line.
pub fn write_train_file(examples: &[TrainExample], path: &Path) -> Result<()> {
    let mut out = String::new();
    for example in examples {
        out.push_str(&example.to_line());
        out.push('\n');
    }
    std::fs::write(path, out)
        .with_context(|| format!("Cannot write train file: {}", path.display()))?;
    let max_frames = examples.iter().map(|e| e.mel_frames).max().unwrap_or(0);
    log::info!(
        "wrote {} examples to {} (longest mel: {} frames)",
        examples.len(),
        path.display(),
        max_frames
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Corpus metadata
// ─────────────────────────────────────────────────────────────────────────────

/// A corpus directory plus the emotion label applied to all its utterances
/// (`"NONE"` for unlabeled corpora).
#[derive(Debug, Clone)]
pub struct CorpusDir {
    pub path: PathBuf,
    pub label: String,
}

impl CorpusDir {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> CorpusDir {
        CorpusDir { path: path.into(), label: label.into() }
    }
}

/// One utterance from `metadata.txt`: header fields plus the annotation
/// tokens from the following line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub index: String,
    pub text: String,
    pub annotation: Vec<String>,
}

/// Parse `metadata.txt` content as line pairs.
pub fn parse_metadata(content: &str) -> Result<Vec<MetadataEntry>, TextError> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() % 2 != 0 {
        return Err(TextError::MalformedTranscript(
            "metadata has an odd number of lines".to_string(),
        ));
    }
    let mut entries = Vec::with_capacity(lines.len() / 2);
    for pair in lines.chunks(2) {
        let mut fields = pair[0].split_whitespace();
        let (Some(index), Some(text), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(TextError::MalformedTranscript(format!(
                "expected \"<id> <text>\" header, got {:?}",
                pair[0]
            )));
        };
        entries.push(MetadataEntry {
            index: index.to_string(),
            text: text.to_string(),
            annotation: pair[1].split_whitespace().map(str::to_string).collect(),
        });
    }
    Ok(entries)
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

pub struct DatasetBuilder<E> {
    extractor: E,
    scheme: VocabularyScheme,
    missing_label: MissingLabelPolicy,
}

impl<E: FeatureExtractor> DatasetBuilder<E> {
    pub fn new(extractor: E, scheme: VocabularyScheme) -> DatasetBuilder<E> {
        DatasetBuilder { extractor, scheme, missing_label: MissingLabelPolicy::Sentinel }
    }

    pub fn with_missing_label_policy(mut self, policy: MissingLabelPolicy) -> DatasetBuilder<E> {
        self.missing_label = policy;
        self
    }

    /// Process every corpus in order and return the surviving examples.
    pub fn build(&self, corpora: &[CorpusDir]) -> Result<Vec<TrainExample>> {
        let mut examples = Vec::new();
        for corpus in corpora {
            let metadata_path = corpus.path.join("metadata.txt");
            let content = std::fs::read_to_string(&metadata_path)
                .with_context(|| format!("Cannot read metadata: {}", metadata_path.display()))?;
            let entries = parse_metadata(&content)
                .with_context(|| format!("Malformed metadata: {}", metadata_path.display()))?;
            let emotion_id = label_to_id(&corpus.label, self.missing_label)
                .with_context(|| format!("corpus label for {}", corpus.path.display()))?;

            let mut kept = 0usize;
            for entry in &entries {
                let annotation: Vec<&str> =
                    entry.annotation.iter().map(String::as_str).collect();
                let symbols = segment_annotated(&entry.text, &annotation, self.scheme)
                    .with_context(|| format!("utterance {}", entry.index))?;
                let wav_path = corpus.path.join("wav").join(format!("{}.wav", entry.index));
                let outcome = self
                    .extractor
                    .extract(&wav_path, &entry.index)
                    .with_context(|| format!("extract features for {}", entry.index))?;
                match outcome {
                    FeatureOutcome::Skip(reason) => {
                        log::warn!("skipping {}: {reason}", entry.index);
                    }
                    FeatureOutcome::Features(summary) => {
                        kept += 1;
                        examples.push(TrainExample {
                            audio_filename: summary.audio_filename,
                            mel_filename: summary.mel_filename,
                            linear_filename: summary.linear_filename,
                            time_steps: summary.time_steps,
                            mel_frames: summary.mel_frames,
                            emotion_id,
                            text: symbols.join(" "),
                        });
                    }
                }
            }
            log::info!(
                "{}: kept {kept} of {} utterances",
                corpus.path.display(),
                entries.len()
            );
        }
        Ok(examples)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{audio_filename, mel_filename, SkipReason, UtteranceSummary};
    use std::fs;

    struct StubExtractor;

    impl FeatureExtractor for StubExtractor {
        fn extract(&self, wav_path: &Path, index: &str) -> Result<FeatureOutcome> {
            if !wav_path.exists() {
                return Ok(FeatureOutcome::Skip(SkipReason::MissingAudio));
            }
            if index.ends_with('9') {
                return Ok(FeatureOutcome::Skip(SkipReason::TooManyFrames {
                    frames: 1200,
                    limit: 900,
                }));
            }
            Ok(FeatureOutcome::Features(UtteranceSummary {
                audio_filename: audio_filename(index),
                mel_filename: mel_filename(index),
                linear_filename: String::new(),
                time_steps: 2750,
                mel_frames: 10,
            }))
        }
    }

    fn corpus_fixture(name: &str, metadata: &str, wavs: &[&str]) -> PathBuf {
        let root = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("wav")).unwrap();
        fs::write(root.join("metadata.txt"), metadata).unwrap();
        for id in wavs {
            fs::write(root.join("wav").join(format!("{id}.wav")), b"").unwrap();
        }
        root
    }

    #[test]
    fn test_build_keeps_processed_and_skips_missing() {
        let root = corpus_fixture(
            "mandarin_text_dataset_build",
            "000001 你好#2。\nni3 hao3\n000002 你4\nni3\n",
            &["000001"],
        );
        let builder = DatasetBuilder::new(StubExtractor, VocabularyScheme::ToneInFinal);
        let examples = builder.build(&[CorpusDir::new(&root, "H")]).unwrap();

        assert_eq!(examples.len(), 1);
        let example = &examples[0];
        assert_eq!(example.audio_filename, "audio-000001.npy");
        assert_eq!(example.mel_filename, "mel-000001.npy");
        assert_eq!(example.linear_filename, "");
        assert_eq!(example.emotion_id, 4);
        assert_eq!(example.text, "n i3 . h ao3 2");
    }

    #[test]
    fn test_build_skips_overlong_spectrograms() {
        let root = corpus_fixture(
            "mandarin_text_dataset_overlong",
            "000009 你4\nni3\n",
            &["000009"],
        );
        let builder = DatasetBuilder::new(StubExtractor, VocabularyScheme::ToneInFinal);
        let examples = builder.build(&[CorpusDir::new(&root, "N")]).unwrap();
        assert!(examples.is_empty());
    }

    #[test]
    fn test_unlabeled_corpus_gets_sentinel_id() {
        let root = corpus_fixture(
            "mandarin_text_dataset_unlabeled",
            "000001 你4\nni3\n",
            &["000001"],
        );
        let builder = DatasetBuilder::new(StubExtractor, VocabularyScheme::ToneInFinal);
        let examples = builder.build(&[CorpusDir::new(&root, "NONE")]).unwrap();
        assert_eq!(examples[0].emotion_id, -1);
    }

    #[test]
    fn test_malformed_annotation_aborts_build() {
        let root = corpus_fixture(
            "mandarin_text_dataset_malformed",
            "000001 你好4\nni3\n",
            &["000001"],
        );
        let builder = DatasetBuilder::new(StubExtractor, VocabularyScheme::ToneInFinal);
        let err = builder.build(&[CorpusDir::new(&root, "N")]).unwrap_err();
        assert!(err.to_string().contains("000001"));
    }

    #[test]
    fn test_parse_metadata_line_pairs() {
        let entries = parse_metadata("000001 你好2\nni3 hao3\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, "000001");
        assert_eq!(entries[0].text, "你好2");
        assert_eq!(entries[0].annotation, ["ni3", "hao3"]);
    }

    #[test]
    fn test_parse_metadata_rejects_odd_line_count() {
        assert!(matches!(
            parse_metadata("000001 你好2\nni3 hao3\n000002 你4\n"),
            Err(TextError::MalformedTranscript(_))
        ));
    }

    #[test]
    fn test_parse_metadata_rejects_bad_header() {
        assert!(parse_metadata("000001\nni3\n").is_err());
        assert!(parse_metadata("000001 你 好\nni3 hao3\n").is_err());
    }

    #[test]
    fn test_train_example_line_round_trip() {
        let example = TrainExample {
            audio_filename: "audio-000001.npy".to_string(),
            mel_filename: "mel-000001.npy".to_string(),
            linear_filename: String::new(),
            time_steps: 2750,
            mel_frames: 10,
            emotion_id: -1,
            text: "n i3 . h ao3 2".to_string(),
        };
        let line = example.to_line();
        assert_eq!(line, "audio-000001.npy|mel-000001.npy||2750|10|-1|n i3 . h ao3 2");
        assert_eq!(TrainExample::parse(&line).unwrap(), example);
    }

    #[test]
    fn test_train_example_parse_rejects_wrong_arity() {
        assert!(TrainExample::parse("a|b|c").is_err());
        assert!(TrainExample::parse("a|b|c|x|10|0|t").is_err());
    }

    #[test]
    fn test_write_train_file() {
        let path = std::env::temp_dir().join("mandarin_text_train_txt");
        let example = TrainExample {
            audio_filename: "audio-1.npy".to_string(),
            mel_filename: "mel-1.npy".to_string(),
            linear_filename: String::new(),
            time_steps: 550,
            mel_frames: 2,
            emotion_id: 0,
            text: "n i3 ~".to_string(),
        };
        write_train_file(&[example.clone()], &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", example.to_line()));
    }
}
