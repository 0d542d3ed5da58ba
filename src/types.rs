//! Common Types and Constants
//!
//! Shared data structures used across the assessment pipeline.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Minimum separation between detected syllable peaks (seconds)
pub const MIN_PEAK_DISTANCE_SECS: f64 = 0.1;

/// Rhythm regularity reported when fewer than two peaks exist
pub const NEUTRAL_REGULARITY: f64 = 0.5;

/// Rhythm regularity reported when envelope analysis degrades
pub const DEGRADED_REGULARITY: f64 = 1.0;

/// Lower bound of the natural speaking pace band (peaks per second)
pub const SLOW_SPEECH_RATE: f64 = 2.0;

/// Upper bound of the natural speaking pace band (peaks per second)
pub const FAST_SPEECH_RATE: f64 = 4.0;

// ==================== Identifiers ====================

pub type UserId = i64;
pub type WordId = i64;
pub type CategoryId = i64;

// ==================== Alignment ====================

/// How a single reference phoneme was realized in the hypothesis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhonemeOutcome {
    /// Exact match
    Match,
    /// Pronounced as a different phoneme
    Substitution {
        /// What the recognizer heard instead
        predicted_as: char,
        /// Confusable sounds that would have been acceptable
        similar_to: Vec<char>,
    },
    /// Missing from the hypothesis entirely
    Omission,
}

/// Assessment detail for one reference character position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhonemeDetail {
    /// The reference phoneme
    pub phoneme: char,
    /// Whether it was pronounced exactly
    pub correct: bool,
    /// Perceptual similarity of the realization, in [0, 1]
    pub similarity: f64,
    pub outcome: PhonemeOutcome,
}

/// Extra sound present in the hypothesis but absent from the reference.
///
/// Kept separate from [`PhonemeDetail`] because an insertion is not tied to
/// any reference position and must not disturb reference ordering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtraSound {
    pub extra: char,
}

/// Result of aligning a hypothesis against a reference word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Reference length in characters
    pub total_phonemes: usize,
    /// Reference positions not hit by a substitution or omission
    pub correct_phonemes: usize,
    /// correct / total x 100
    pub accuracy: f64,
    /// One entry per reference position, in reference order
    pub phoneme_details: Vec<PhonemeDetail>,
    /// Extra sounds, in hypothesis order
    pub insertions: Vec<ExtraSound>,
}

// ==================== Rhythm ====================

/// Speech-rate and regularity metrics from the amplitude envelope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RhythmMetrics {
    /// Detected syllable peaks per second of audio
    pub speech_rate: f64,
    /// Coefficient of variation of inter-peak intervals (lower is better)
    pub rhythm_regularity: f64,
}

// ==================== Scoring ====================

/// Optional signals from a richer ASR collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtraSignals {
    /// Recognizer confidence in [0, 1]
    pub confidence: f64,
    /// Timing score in [-1, 1]
    pub timing_score: f64,
}

/// Fused pronunciation score with human-readable feedback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Overall score in [0, 100]
    pub pronunciation_score: f64,
    /// Feedback lines, stable format per issue category
    pub detailed_feedback: Vec<String>,
}
