//! Emotion labels attached to dataset utterances.
//!
//! Corpora tag each recording with a single-letter emotion code. Training
//! metadata carries the label as a small integer so the embedding lookup
//! can index it directly; unlabeled corpora may map to a sentinel instead.

use serde::{Deserialize, Serialize};

use crate::error::TextError;

/// Integer written for utterances whose corpus carries no emotion labels.
pub const UNLABELED_ID: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Neutral,
    Angry,
    Disgusted,
    Fearful,
    Happy,
    Sad,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Angry,
        Emotion::Disgusted,
        Emotion::Fearful,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprised,
    ];

    /// Single-letter code used in corpus metadata.
    pub fn code(self) -> &'static str {
        match self {
            Emotion::Neutral => "N",
            Emotion::Angry => "A",
            Emotion::Disgusted => "D",
            Emotion::Fearful => "F",
            Emotion::Happy => "H",
            Emotion::Sad => "S",
            Emotion::Surprised => "U",
        }
    }

    pub fn from_code(code: &str) -> Option<Emotion> {
        Emotion::ALL.iter().copied().find(|e| e.code() == code)
    }

    /// Embedding index, contiguous from zero in `ALL` order.
    pub fn id(self) -> i32 {
        match self {
            Emotion::Neutral => 0,
            Emotion::Angry => 1,
            Emotion::Disgusted => 2,
            Emotion::Fearful => 3,
            Emotion::Happy => 4,
            Emotion::Sad => 5,
            Emotion::Surprised => 6,
        }
    }
}

/// What to do with an utterance whose label column is `NONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLabelPolicy {
    /// Write [`UNLABELED_ID`] and keep the utterance.
    Sentinel,
    /// Treat the missing label as a malformed record.
    Reject,
}

/// Map a metadata label column to its embedding index.
pub fn label_to_id(label: &str, policy: MissingLabelPolicy) -> Result<i32, TextError> {
    if label == "NONE" {
        return match policy {
            MissingLabelPolicy::Sentinel => Ok(UNLABELED_ID),
            MissingLabelPolicy::Reject => Err(TextError::MalformedTranscript(
                "utterance has no emotion label".to_string(),
            )),
        };
    }
    Emotion::from_code(label)
        .map(Emotion::id)
        .ok_or_else(|| TextError::MalformedTranscript(format!("unknown emotion label {label:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_contiguous_in_declaration_order() {
        for (i, emotion) in Emotion::ALL.iter().enumerate() {
            assert_eq!(emotion.id(), i as i32);
        }
        assert_eq!(Emotion::Neutral.id(), 0);
        assert_eq!(Emotion::Surprised.id(), 6);
    }

    #[test]
    fn test_codes_round_trip() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::from_code(emotion.code()), Some(emotion));
        }
        assert_eq!(Emotion::from_code("X"), None);
    }

    #[test]
    fn test_label_to_id() {
        assert_eq!(label_to_id("H", MissingLabelPolicy::Sentinel), Ok(4));
        assert_eq!(
            label_to_id("NONE", MissingLabelPolicy::Sentinel),
            Ok(UNLABELED_ID)
        );
        assert!(matches!(
            label_to_id("NONE", MissingLabelPolicy::Reject),
            Err(TextError::MalformedTranscript(_))
        ));
        assert!(matches!(
            label_to_id("Q", MissingLabelPolicy::Sentinel),
            Err(TextError::MalformedTranscript(_))
        ));
    }
}
