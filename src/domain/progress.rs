use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pool::{Pool, ReviewStage};

/// One (user, word) progress row. Absence of a row is equivalent to
/// `Pool::P(0)` per spec — callers synthesize a default row for words
/// that have never been learned rather than modeling `Option` here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    pub user_id: String,
    pub word_id: String,
    pub pool: Pool,
    pub learned_at: Option<DateTime<Utc>>,
    pub next_available_time: Option<DateTime<Utc>>,
    pub review_stage: Option<ReviewStage>,
    pub last_outcome_at: Option<DateTime<Utc>>,
    pub correct_count: i64,
    pub incorrect_count: i64,
}

impl WordProgress {
    pub fn new_p0(user_id: impl Into<String>, word_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            word_id: word_id.into(),
            pool: Pool::P(0),
            learned_at: None,
            next_available_time: None,
            review_stage: None,
            last_outcome_at: None,
            correct_count: 0,
            incorrect_count: 0,
        }
    }
}
