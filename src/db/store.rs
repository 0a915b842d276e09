//! The Progress Store contract (spec §2, §3). Implementations own the
//! transactional boundary (spec §5): row locks are acquired in
//! ascending `word_id` order and held for the lifetime of one
//! submission, with all transitions in that submission observing the
//! same `now`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::models::Word;
use crate::domain::pool::Pool;
use crate::domain::progress::WordProgress;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

/// The outcome of applying one answer to one progress row within a
/// submission. `applied = false` means the row raced past eligibility
/// between session assembly and submission (spec §4.3 rule 2,
/// §7 Conflict) — it is reported, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub word_id: String,
    pub previous_pool: Pool,
    pub new_pool: Pool,
    pub next_available_time: Option<DateTime<Utc>>,
    pub applied: bool,
}

/// A plain function, not a capturing closure: the pure decision lives
/// in `domain::scheduler`, the store only threads it through a locked
/// transaction. Using function pointers here (rather than generics or
/// boxed closures) keeps the trait object-safe.
pub type TransitionFn = fn(&WordProgress, bool, DateTime<Utc>) -> WordProgress;
pub type EligibleFn = fn(&WordProgress, DateTime<Utc>) -> bool;
pub type DisplayAdvanceFn = fn(&WordProgress, DateTime<Utc>) -> WordProgress;

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get(&self, user_id: &str, word_id: &str) -> Result<Option<WordProgress>, StoreError>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<WordProgress>, StoreError>;

    /// Inserts rows for words that have no existing progress row.
    /// Idempotent per word; returns the count actually inserted
    /// (spec §4.2: "submitting a word that already has a progress row
    /// is a no-op").
    async fn insert_new(&self, rows: Vec<WordProgress>) -> Result<usize, StoreError>;

    /// Applies `answers` (word_id, correct) to the named rows inside a
    /// single transaction: rows are locked ascending by `word_id`,
    /// `eligible` re-checked at lock time, `transition` applied when
    /// still eligible, and the whole batch committed atomically
    /// (spec §4.3, §4.4, §5). Unknown word ids are silently dropped
    /// from the result (spec §7).
    async fn submit(
        &self,
        user_id: &str,
        answers: &[(String, bool)],
        now: DateTime<Utc>,
        eligible: EligibleFn,
        transition: TransitionFn,
    ) -> Result<Vec<RowOutcome>, StoreError>;

    /// Review-display completion (spec §4.4): advances R-pool rows
    /// still in the display stage to the practice stage. Already-
    /// advanced rows are a no-op and are not counted. Returns the
    /// count of rows actually advanced.
    async fn mark_display_complete(
        &self,
        user_id: &str,
        word_ids: &[String],
        now: DateTime<Utc>,
        advance: DisplayAdvanceFn,
    ) -> Result<usize, StoreError>;

    /// Deletes every progress row for the user (spec §6 `reset_progress`).
    async fn reset_all(&self, user_id: &str) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get(&self, word_id: &str) -> Result<Option<Word>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Word>, StoreError>;
}
