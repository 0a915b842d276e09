//! In-memory `ProgressStore`/`Catalog` implementations. Grounded in the
//! teacher's swappable-test-harness pattern (`tests/common/mod.rs`
//! builds an app without a live database); here the same trait the
//! Postgres implementation satisfies is backed by a `Mutex<HashMap>`
//! so property and scenario tests run deterministically without a
//! database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::models::Word;
use super::store::{Catalog, DisplayAdvanceFn, EligibleFn, ProgressStore, RowOutcome, StoreError, TransitionFn};
use crate::domain::progress::WordProgress;

#[derive(Default)]
pub struct MemoryProgressStore {
    rows: Mutex<HashMap<(String, String), WordProgress>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn get(&self, user_id: &str, word_id: &str) -> Result<Option<WordProgress>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.get(&(user_id.to_string(), word_id.to_string())).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<WordProgress>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_new(&self, new_rows: Vec<WordProgress>) -> Result<usize, StoreError> {
        let mut rows = self.rows.lock().await;
        let mut inserted = 0;
        for row in new_rows {
            let key = (row.user_id.clone(), row.word_id.clone());
            if !rows.contains_key(&key) {
                rows.insert(key, row);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn submit(
        &self,
        user_id: &str,
        answers: &[(String, bool)],
        now: DateTime<Utc>,
        eligible: EligibleFn,
        transition: TransitionFn,
    ) -> Result<Vec<RowOutcome>, StoreError> {
        let mut rows = self.rows.lock().await;
        let mut results = Vec::with_capacity(answers.len());

        for (word_id, correct) in answers {
            let key = (user_id.to_string(), word_id.clone());
            let Some(current) = rows.get(&key).cloned() else {
                continue;
            };

            if eligible(&current, now) {
                let next = transition(&current, *correct, now);
                results.push(RowOutcome {
                    word_id: word_id.clone(),
                    previous_pool: current.pool,
                    new_pool: next.pool,
                    next_available_time: next.next_available_time,
                    applied: true,
                });
                rows.insert(key, next);
            } else {
                results.push(RowOutcome {
                    word_id: word_id.clone(),
                    previous_pool: current.pool,
                    new_pool: current.pool,
                    next_available_time: current.next_available_time,
                    applied: false,
                });
            }
        }

        Ok(results)
    }

    async fn mark_display_complete(
        &self,
        user_id: &str,
        word_ids: &[String],
        now: DateTime<Utc>,
        advance: DisplayAdvanceFn,
    ) -> Result<usize, StoreError> {
        use crate::domain::pool::{Pool, ReviewStage};

        let mut rows = self.rows.lock().await;
        let mut advanced = 0;

        for word_id in word_ids {
            let key = (user_id.to_string(), word_id.clone());
            let Some(current) = rows.get(&key).cloned() else {
                continue;
            };
            if matches!(current.pool, Pool::R(_)) && current.review_stage == Some(ReviewStage::Display) {
                rows.insert(key, advance(&current, now));
                advanced += 1;
            }
        }

        Ok(advanced)
    }

    async fn reset_all(&self, user_id: &str) -> Result<usize, StoreError> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|(uid, _), _| uid != user_id);
        Ok(before - rows.len())
    }
}

pub struct MemoryCatalog {
    words: Vec<Word>,
}

impl MemoryCatalog {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn get(&self, word_id: &str) -> Result<Option<Word>, StoreError> {
        Ok(self.words.iter().find(|w| w.id == word_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Word>, StoreError> {
        Ok(self.words.clone())
    }
}
