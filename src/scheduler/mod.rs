//! SM-2 Review Scheduling
//!
//! Per-(user, word) spaced-repetition state machine. A raw 0-100
//! pronunciation score is bucketed onto SM-2's 0-5 quality scale and drives
//! the easiness/interval/repetition update; the state runs indefinitely
//! across a learner's lifetime with the word.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Easiness factor assigned on first exposure
pub const INITIAL_EASINESS: f64 = 2.5;

/// Easiness never drops below this, regardless of review quality
pub const MIN_EASINESS: f64 = 1.3;

/// Map a raw score (0-100) onto the SM-2 quality scale (0-5).
///
/// The threshold table never yields quality 1: everything below the "hard"
/// band counts as a blackout. Changing these thresholds changes scheduling
/// behavior, so the table is kept as-is.
pub fn normalize_score(score: f64) -> u8 {
    if score < 30.0 {
        0 // blackout
    } else if score < 50.0 {
        2 // hard
    } else if score < 70.0 {
        3 // ok
    } else if score < 85.0 {
        4 // good
    } else {
        5 // perfect
    }
}

/// Spaced-repetition state for one (user, word) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    /// SM-2 easiness factor, floor [`MIN_EASINESS`]
    pub easiness: f64,
    /// Current review interval in days
    pub interval: i64,
    /// Consecutive successful repetitions
    pub repetitions: u32,
    /// The card is due once this timestamp has passed
    pub next_review: DateTime<Utc>,
    /// Last raw score fed into [`ScheduleState::review`]
    pub last_score: Option<f64>,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl ScheduleState {
    /// Initial state: immediately due.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            easiness: INITIAL_EASINESS,
            interval: 1,
            repetitions: 0,
            next_review: created_at,
            last_score: None,
        }
    }

    /// Whether the card is due right now.
    pub fn is_due(&self) -> bool {
        self.is_due_at(Utc::now())
    }

    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_review
    }

    /// Apply a review with a raw 0-100 score.
    pub fn review(&mut self, score: f64) -> Result<(), ScheduleError> {
        self.review_at(score, Utc::now())
    }

    /// Apply a review at an explicit point in time.
    ///
    /// Out-of-range or non-finite scores fail fast; the state is untouched
    /// in that case.
    pub fn review_at(&mut self, score: f64, now: DateTime<Utc>) -> Result<(), ScheduleError> {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(ScheduleError::ScoreOutOfRange(score));
        }

        self.last_score = Some(score);
        let quality = normalize_score(score);

        if quality < 3 {
            // Failed recall: restart the streak regardless of history.
            self.repetitions = 0;
            self.interval = 1;
        } else {
            self.repetitions += 1;
            self.interval = match self.repetitions {
                1 => 1,
                2 => 6,
                _ => (self.interval as f64 * self.easiness).floor() as i64,
            };
        }

        let shortfall = 5.0 - f64::from(quality);
        self.easiness += 0.1 - shortfall * (0.08 + shortfall * 0.02);
        if self.easiness < MIN_EASINESS {
            self.easiness = MIN_EASINESS;
        }

        self.next_review = now + Duration::days(self.interval);
        Ok(())
    }
}
