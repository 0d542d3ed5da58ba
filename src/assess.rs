//! Assessment Orchestration
//!
//! Combines alignment, rhythm analysis, and score fusion into the single
//! entry point collaborators call per recorded attempt, and the
//! assess-then-schedule flow that also advances the learner's SM-2 state.
//!
//! The pipeline is stateless: the caller supplies already-decoded audio and
//! the hypothesis text produced by its transcription collaborator, so no
//! model handle is ever held here.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AssessError};
use crate::scheduler::ScheduleState;
use crate::selector::CardStore;
use crate::types::{AlignmentResult, ExtraSignals, RhythmMetrics, UserId, WordId};
use crate::{align, rhythm, score};

/// Complete result of assessing one recorded attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub reference_text: String,
    pub predicted_text: String,
    /// Fused 0-100 score
    pub pronunciation_score: f64,
    pub phoneme_analysis: AlignmentResult,
    pub rhythm_metrics: RhythmMetrics,
    pub detailed_feedback: Vec<String>,
}

/// Assess a recorded attempt at `reference_word`.
///
/// Fails completely on contract violations (empty reference, empty audio);
/// a degraded rhythm estimate does not fail the call.
pub fn assess(
    reference_word: &str,
    audio_samples: &[f32],
    sample_rate: u32,
    hypothesis_text: &str,
) -> Result<AssessmentReport, AnalysisError> {
    assess_with_signals(
        reference_word,
        audio_samples,
        sample_rate,
        hypothesis_text,
        None,
    )
}

/// [`assess`] with optional confidence/timing signals from a richer ASR
/// collaborator, which switch the aggregator to its four-factor weighting.
pub fn assess_with_signals(
    reference_word: &str,
    audio_samples: &[f32],
    sample_rate: u32,
    hypothesis_text: &str,
    extra_signals: Option<&ExtraSignals>,
) -> Result<AssessmentReport, AnalysisError> {
    let phoneme_analysis = align::align(reference_word, hypothesis_text)?;
    let rhythm_metrics = rhythm::analyze(audio_samples, sample_rate)?;
    let scored = score::score(&phoneme_analysis, &rhythm_metrics, extra_signals);

    tracing::debug!(
        reference = reference_word,
        score = scored.pronunciation_score,
        accuracy = phoneme_analysis.accuracy,
        "assessment complete"
    );

    Ok(AssessmentReport {
        reference_text: reference_word.to_string(),
        predicted_text: hypothesis_text.to_string(),
        pronunciation_score: scored.pronunciation_score,
        phoneme_analysis,
        rhythm_metrics,
        detailed_feedback: scored.detailed_feedback,
    })
}

/// Assess one attempt and review the learner's schedule state with it.
///
/// The score fed to the scheduler is the phoneme accuracy, not the fused
/// pronunciation score; rhythm problems affect feedback but not review
/// spacing. The state is created on first exposure.
pub fn assess_and_schedule<S: CardStore>(
    store: &S,
    user: UserId,
    word: WordId,
    reference_word: &str,
    audio_samples: &[f32],
    sample_rate: u32,
    hypothesis_text: &str,
) -> Result<(AssessmentReport, ScheduleState), AssessError> {
    let report = assess(reference_word, audio_samples, sample_rate, hypothesis_text)?;
    let state = store.apply_review(user, word, report.phoneme_analysis.accuracy, Utc::now())?;
    Ok((report, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::InMemoryCardStore;

    #[test]
    fn test_assess_requires_audio() {
        assert!(matches!(
            assess("ана", &[], 16_000, "ана"),
            Err(AnalysisError::InsufficientAudio)
        ));
    }

    #[test]
    fn test_assess_requires_reference() {
        assert!(matches!(
            assess("", &[0.0; 100], 16_000, "ана"),
            Err(AnalysisError::EmptyReference)
        ));
    }

    #[test]
    fn test_report_echoes_inputs() {
        let report = assess("Ана", &[0.0; 1600], 16_000, "апа").unwrap();
        assert_eq!(report.reference_text, "Ана");
        assert_eq!(report.predicted_text, "апа");
        assert_eq!(report.phoneme_analysis.total_phonemes, 3);
    }

    #[test]
    fn test_schedule_reviews_with_accuracy() {
        let store = InMemoryCardStore::new();
        store.add_word(3, &[]);

        // Perfect hypothesis on silent audio: accuracy 100; silence has no
        // peaks, so regularity stays at the neutral 0.5.
        let (report, state) =
            assess_and_schedule(&store, 1, 3, "ана", &[0.0; 1600], 16_000, "ана").unwrap();
        assert_eq!(report.phoneme_analysis.accuracy, 100.0);
        assert_eq!(state.last_score, Some(100.0));
        assert_eq!(state.repetitions, 1);
    }
}
