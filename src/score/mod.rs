//! Score Fusion and Feedback
//!
//! Fuses alignment accuracy and rhythm regularity into a single 0-100
//! pronunciation score and renders per-issue feedback lines.
//!
//! Two weighting schemes exist: the two-factor default, and a four-factor
//! scheme used when a richer ASR collaborator supplies confidence/timing
//! signals. They are alternate configurations of the same aggregator,
//! selected by signal availability.
//!
//! Feedback text is data, not control flow: each line is a stable format
//! string consumed verbatim by UIs. Do not reformulate the wording here
//! without versioning the consumers.

use crate::types::{
    AlignmentResult, ExtraSignals, PhonemeOutcome, RhythmMetrics, ScoreResult, FAST_SPEECH_RATE,
    SLOW_SPEECH_RATE,
};

// Weights for the default two-factor fusion
const WEIGHT_ACCURACY: f64 = 0.5;
const WEIGHT_RHYTHM: f64 = 0.5;

// Weights for the four-factor fusion with ASR signals
const WEIGHT_ACCURACY_EXT: f64 = 0.4;
const WEIGHT_CONFIDENCE_EXT: f64 = 0.3;
const WEIGHT_TIMING_EXT: f64 = 0.15;
const WEIGHT_RHYTHM_EXT: f64 = 0.15;

/// Fuse alignment and rhythm (plus optional ASR signals) into a score.
pub fn score(
    alignment: &AlignmentResult,
    rhythm: &RhythmMetrics,
    extra_signals: Option<&ExtraSignals>,
) -> ScoreResult {
    // Lower regularity is better, so invert before weighting.
    let rhythm_score = ((1.0 - rhythm.rhythm_regularity) * 100.0).clamp(0.0, 100.0);

    let overall = match extra_signals {
        None => WEIGHT_ACCURACY * alignment.accuracy + WEIGHT_RHYTHM * rhythm_score,
        Some(signals) => {
            let timing = (signals.timing_score + 1.0) / 2.0 * 100.0;
            WEIGHT_ACCURACY_EXT * alignment.accuracy
                + WEIGHT_CONFIDENCE_EXT * (signals.confidence * 100.0)
                + WEIGHT_TIMING_EXT * timing
                + WEIGHT_RHYTHM_EXT * rhythm_score
        }
    };
    let pronunciation_score = overall.clamp(0.0, 100.0);

    ScoreResult {
        pronunciation_score,
        detailed_feedback: generate_feedback(pronunciation_score, alignment, rhythm),
    }
}

/// Deterministic feedback for a given score and detail list.
fn generate_feedback(
    score: f64,
    alignment: &AlignmentResult,
    rhythm: &RhythmMetrics,
) -> Vec<String> {
    let mut feedback = Vec::new();

    if score >= 90.0 {
        feedback.push("Excellent pronunciation! Native-like quality.".to_string());
    } else if score >= 80.0 {
        feedback.push("Very good pronunciation. Minor improvements possible.".to_string());
    } else if score >= 70.0 {
        feedback.push("Good pronunciation. Some areas need work.".to_string());
    } else {
        feedback
            .push("Pronunciation needs improvement. Focus on the following aspects:".to_string());
    }

    let has_issues =
        alignment.phoneme_details.iter().any(|d| !d.correct) || !alignment.insertions.is_empty();
    if has_issues {
        feedback.push("\nPhoneme Issues:".to_string());
        for detail in &alignment.phoneme_details {
            match &detail.outcome {
                PhonemeOutcome::Match => {}
                PhonemeOutcome::Substitution {
                    predicted_as,
                    similar_to,
                } => {
                    feedback.push(format!(
                        "- '{}' was pronounced as '{}'",
                        detail.phoneme, predicted_as
                    ));
                    if !similar_to.is_empty() {
                        let sounds: Vec<String> =
                            similar_to.iter().map(|c| c.to_string()).collect();
                        feedback.push(format!(
                            "  (Similar acceptable sounds: {})",
                            sounds.join(", ")
                        ));
                    }
                }
                PhonemeOutcome::Omission => {
                    feedback.push(format!("- '{}' was omitted", detail.phoneme));
                }
            }
        }
        for insertion in &alignment.insertions {
            feedback.push(format!("- Extra sound '{}' was added", insertion.extra));
        }
    }

    if rhythm.speech_rate > FAST_SPEECH_RATE {
        feedback.push("\nPace:".to_string());
        feedback.push("- Try speaking more slowly and deliberately".to_string());
    } else if rhythm.speech_rate < SLOW_SPEECH_RATE {
        feedback.push("- Try to maintain a more natural speaking pace".to_string());
    }

    feedback
}
