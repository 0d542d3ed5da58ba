//! Due-Card Selection
//!
//! Picks the next word to present to a learner: the earliest-overdue
//! scheduled card first, then the lowest-id word the learner has never seen
//! (creating its initial schedule state), then nothing.
//!
//! Iteration over schedules and words lives behind [`CardStore`] so the
//! selection policy stays in the core while persistence remains a
//! collaborator concern. [`InMemoryCardStore`] is provided for embedding and
//! tests; it serializes every schedule mutation per map, which makes review
//! application an atomic read-modify-write per (user, word) key.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::ScheduleError;
use crate::scheduler::ScheduleState;
use crate::types::{CategoryId, UserId, WordId};

/// Persistence seam for schedule states and the word catalog.
pub trait CardStore {
    /// Schedule states owned by `user`, restricted to `category` when given.
    fn schedules(&self, user: UserId, category: Option<CategoryId>)
        -> Vec<(WordId, ScheduleState)>;

    /// Word ids in scope, whether or not the user has seen them.
    fn words_in_scope(&self, category: Option<CategoryId>) -> Vec<WordId>;

    /// Idempotent first-exposure creation: returns the existing state when a
    /// concurrent caller created it first.
    fn get_or_create(&self, user: UserId, word: WordId, now: DateTime<Utc>) -> ScheduleState;

    /// Atomic read-modify-write review of one (user, word) key, creating the
    /// initial state on first exposure.
    fn apply_review(
        &self,
        user: UserId,
        word: WordId,
        score: f64,
        now: DateTime<Utc>,
    ) -> Result<ScheduleState, ScheduleError>;
}

/// Next card for `user`, using the current time.
pub fn next_for_user<S: CardStore>(
    store: &S,
    user: UserId,
    category: Option<CategoryId>,
) -> Option<(ScheduleState, WordId)> {
    next_for_user_at(store, user, category, Utc::now())
}

/// Next card for `user` as of `now`.
///
/// Returns `None` when no word in scope is due or unseen; that is a normal
/// terminal outcome, not a failure.
pub fn next_for_user_at<S: CardStore>(
    store: &S,
    user: UserId,
    category: Option<CategoryId>,
    now: DateTime<Utc>,
) -> Option<(ScheduleState, WordId)> {
    let mut due: Vec<(WordId, ScheduleState)> = store
        .schedules(user, category)
        .into_iter()
        .filter(|(_, state)| state.is_due_at(now))
        .collect();
    // Earliest overdue first; ties broken by word id for determinism.
    due.sort_by(|a, b| a.1.next_review.cmp(&b.1.next_review).then(a.0.cmp(&b.0)));
    if let Some((word, state)) = due.into_iter().next() {
        tracing::debug!(user, word, "selected due card");
        return Some((state, word));
    }

    // Exposure is tracked across all categories, so the seen set is not
    // restricted to the requested scope.
    let seen: HashSet<WordId> = store
        .schedules(user, None)
        .into_iter()
        .map(|(word, _)| word)
        .collect();
    let word = store
        .words_in_scope(category)
        .into_iter()
        .filter(|word| !seen.contains(word))
        .min()?;
    let state = store.get_or_create(user, word, now);
    tracing::debug!(user, word, "introduced new card");
    Some((state, word))
}

/// In-memory [`CardStore`] backed by `parking_lot` locks.
#[derive(Default)]
pub struct InMemoryCardStore {
    words: RwLock<HashMap<WordId, Vec<CategoryId>>>,
    schedules: RwLock<HashMap<(UserId, WordId), ScheduleState>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a word and its category memberships.
    pub fn add_word(&self, word: WordId, categories: &[CategoryId]) {
        self.words.write().insert(word, categories.to_vec());
    }

    fn word_in_category(&self, word: WordId, category: CategoryId) -> bool {
        self.words
            .read()
            .get(&word)
            .is_some_and(|memberships| memberships.contains(&category))
    }
}

impl CardStore for InMemoryCardStore {
    fn schedules(
        &self,
        user: UserId,
        category: Option<CategoryId>,
    ) -> Vec<(WordId, ScheduleState)> {
        self.schedules
            .read()
            .iter()
            .filter(|((owner, word), _)| {
                *owner == user
                    && category.map_or(true, |category| self.word_in_category(*word, category))
            })
            .map(|((_, word), state)| (*word, state.clone()))
            .collect()
    }

    fn words_in_scope(&self, category: Option<CategoryId>) -> Vec<WordId> {
        self.words
            .read()
            .iter()
            .filter(|(_, memberships)| {
                category.map_or(true, |category| memberships.contains(&category))
            })
            .map(|(word, _)| *word)
            .collect()
    }

    fn get_or_create(&self, user: UserId, word: WordId, now: DateTime<Utc>) -> ScheduleState {
        self.schedules
            .write()
            .entry((user, word))
            .or_insert_with(|| ScheduleState::new(now))
            .clone()
    }

    fn apply_review(
        &self,
        user: UserId,
        word: WordId,
        score: f64,
        now: DateTime<Utc>,
    ) -> Result<ScheduleState, ScheduleError> {
        // One write lock spans the whole read-modify-write so concurrent
        // reviews of the same key cannot interleave.
        let mut schedules = self.schedules.write();
        let mut state = schedules
            .get(&(user, word))
            .cloned()
            .unwrap_or_else(|| ScheduleState::new(now));
        state.review_at(score, now)?;
        schedules.insert((user, word), state.clone());
        Ok(state)
    }
}
