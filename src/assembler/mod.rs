//! Combines the read-only Catalog, the pure Scheduler, and the
//! Progress Store into Learn/Practice/Review sessions. Mutation only
//! ever happens through `ProgressStore::insert_new`/`submit`/
//! `mark_display_complete`; the transactional boundary stays inside
//! the store implementation, never here.

pub mod admin;
pub mod exercise;
pub mod home_stats;
pub mod learn;
pub mod practice;
pub mod review;

use thiserror::Error;

use crate::db::store::StoreError;

pub const LEARN_BATCH: usize = 5;
pub const DAILY_LEARN_LIMIT: i64 = 50;
pub const P1_BACKPRESSURE_LIMIT: usize = 10;
pub const PRACTICE_BATCH: usize = 5;
pub const PRACTICE_MIN_ELIGIBLE: usize = 3;
pub const REVIEW_BATCH: usize = 5;
pub const REVIEW_MIN_ELIGIBLE: usize = 3;

/// Word- and user-level lookups never fail with a distinct not-found
/// variant here: `user_id` is a trusted header value with no backing
/// record to miss, and submissions drop unknown `word_id`s into an
/// `applied: false` outcome rather than erroring (spec's "silently
/// drop unknown word_ids" rule) — so the only failure mode left is the
/// store itself.
#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("storage failure: {0}")]
    Store(String),
}

impl From<StoreError> for AssemblerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Storage(msg) => AssemblerError::Store(msg),
        }
    }
}
