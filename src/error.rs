//! Error types for the assessment pipeline and scheduler.

use thiserror::Error;

/// Contract violations in the assessment pipeline.
///
/// Rhythm analysis never surfaces numerical failures here; it degrades to a
/// neutral result instead (see [`crate::rhythm::analyze`]).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("reference word is empty")]
    EmptyReference,
    #[error("audio sample buffer is empty")]
    InsufficientAudio,
}

/// Contract violations in the review scheduler.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("score {0} is outside the 0-100 range")]
    ScoreOutOfRange(f64),
}

/// Combined error for the assess-then-schedule flow.
#[derive(Debug, Error)]
pub enum AssessError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}
