//! # soyle-algo - pronunciation learning core
//!
//! Pure Rust implementation of the algorithms behind a pronunciation-scored
//! flashcard trainer:
//!
//! - **Phoneme alignment** - edit-operation alignment of a recognized
//!   transcription against the reference word, with confusable-sound awareness
//! - **Rhythm analysis** - speech rate and rhythm regularity from the
//!   Hilbert envelope of the recorded audio
//! - **Score fusion** - weighted 0-100 pronunciation score plus structured
//!   feedback lines
//! - **SM-2 scheduling** - per-(user, word) spaced-repetition state and
//!   due-card selection
//!
//! ## Design
//!
//! The crate is a pure core: it never loads an ASR model, touches the network,
//! or persists anything. Callers hand in already-decoded audio samples and the
//! hypothesis text produced by their transcription collaborator, and receive
//! typed results back. Persistence sits behind the [`selector::CardStore`]
//! trait; an in-memory implementation is provided for embedding and tests.
//!
//! ## Modules
//!
//! - [`align`] - phoneme-level alignment (`align`)
//! - [`rhythm`] - envelope peaks, speech rate, regularity (`analyze`)
//! - [`score`] - score fusion and feedback generation (`score`)
//! - [`scheduler`] - SM-2 review state machine ([`ScheduleState`])
//! - [`selector`] - next-due-card policy and the store seam
//! - [`assess`] - orchestration entry points ([`assess`], [`assess_and_schedule`])
//! - [`phonemes`] - confusable phoneme table (configuration data)
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use soyle_algo::assess;
//!
//! let samples = vec![0.0f32; 16_000];
//! let report = assess("ана", &samples, 16_000, "апа").unwrap();
//! assert_eq!(report.phoneme_analysis.total_phonemes, 3);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod align;
pub mod assess;
pub mod error;
pub mod phonemes;
pub mod rhythm;
pub mod scheduler;
pub mod score;
pub mod selector;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use error::{AnalysisError, AssessError, ScheduleError};

pub use align::align;

pub use rhythm::analyze;

pub use score::score;

pub use scheduler::{normalize_score, ScheduleState};

pub use selector::{next_for_user, next_for_user_at, CardStore, InMemoryCardStore};

pub use assess::{assess, assess_and_schedule, assess_with_signals, AssessmentReport};
