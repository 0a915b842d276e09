//! Postgres-backed `ProgressStore`/`Catalog`. Row locking and
//! transaction shape follow the teacher's pattern in
//! `routes/evaluation.rs::record_metric_pg` and
//! `workers/delayed_reward.rs`: `pool.begin()`, `SELECT ... FOR UPDATE`,
//! mutate, `COMMIT` — with the lock order pinned ascending by
//! `word_id` per spec §5.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use super::models::Word;
use super::store::{Catalog, DisplayAdvanceFn, EligibleFn, ProgressStore, RowOutcome, StoreError, TransitionFn};
use crate::domain::pool::{Pool, ReviewStage};
use crate::domain::progress::WordProgress;

pub struct PostgresProgressStore {
    pool: PgPool,
}

impl PostgresProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_progress_row(row: &sqlx::postgres::PgRow) -> Result<WordProgress, StoreError> {
    let pool_str: String = row.try_get("pool")?;
    let pool = Pool::from_db_str(&pool_str)
        .ok_or_else(|| StoreError::Storage(format!("unrecognized pool value {pool_str}")))?;
    let review_stage: Option<String> = row.try_get("review_stage")?;
    Ok(WordProgress {
        user_id: row.try_get("user_id")?,
        word_id: row.try_get("word_id")?,
        pool,
        learned_at: row.try_get("learned_at")?,
        next_available_time: row.try_get("next_available_time")?,
        review_stage: review_stage.and_then(|s| ReviewStage::from_db_str(&s)),
        last_outcome_at: row.try_get("last_outcome_at")?,
        correct_count: row.try_get("correct_count")?,
        incorrect_count: row.try_get("incorrect_count")?,
    })
}

async fn upsert_row<'e, E>(executor: E, row: &WordProgress) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO word_progress
            (user_id, word_id, pool, learned_at, next_available_time, review_stage,
             last_outcome_at, correct_count, incorrect_count)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (user_id, word_id) DO UPDATE SET
            pool = EXCLUDED.pool,
            learned_at = EXCLUDED.learned_at,
            next_available_time = EXCLUDED.next_available_time,
            review_stage = EXCLUDED.review_stage,
            last_outcome_at = EXCLUDED.last_outcome_at,
            correct_count = EXCLUDED.correct_count,
            incorrect_count = EXCLUDED.incorrect_count
        "#,
    )
    .bind(&row.user_id)
    .bind(&row.word_id)
    .bind(row.pool.as_db_str())
    .bind(row.learned_at)
    .bind(row.next_available_time)
    .bind(row.review_stage.map(|s| s.as_db_str()))
    .bind(row.last_outcome_at)
    .bind(row.correct_count)
    .bind(row.incorrect_count)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl ProgressStore for PostgresProgressStore {
    async fn get(&self, user_id: &str, word_id: &str) -> Result<Option<WordProgress>, StoreError> {
        let row = sqlx::query(
            r#"SELECT * FROM word_progress WHERE user_id = $1 AND word_id = $2"#,
        )
        .bind(user_id)
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_progress_row).transpose()
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<WordProgress>, StoreError> {
        let rows = sqlx::query(r#"SELECT * FROM word_progress WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_progress_row).collect()
    }

    async fn insert_new(&self, new_rows: Vec<WordProgress>) -> Result<usize, StoreError> {
        if new_rows.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for row in &new_rows {
            let result = sqlx::query(
                r#"
                INSERT INTO word_progress
                    (user_id, word_id, pool, learned_at, next_available_time, review_stage,
                     last_outcome_at, correct_count, incorrect_count)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (user_id, word_id) DO NOTHING
                "#,
            )
            .bind(&row.user_id)
            .bind(&row.word_id)
            .bind(row.pool.as_db_str())
            .bind(row.learned_at)
            .bind(row.next_available_time)
            .bind(row.review_stage.map(|s| s.as_db_str()))
            .bind(row.last_outcome_at)
            .bind(row.correct_count)
            .bind(row.incorrect_count)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected() as usize;
        }
        tx.commit().await?;
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
        let mut tx = self.pool.begin().await?;

        let mut word_ids: Vec<&String> = answers.iter().map(|(id, _)| id).collect();
        word_ids.sort();
        word_ids.dedup();

        let locked = sqlx::query(
            r#"
            SELECT * FROM word_progress
            WHERE user_id = $1 AND word_id = ANY($2)
            ORDER BY word_id ASC
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(&word_ids.iter().map(|s| s.as_str()).collect::<Vec<_>>()[..])
        .fetch_all(&mut *tx)
        .await?;

        let mut current: std::collections::HashMap<String, WordProgress> =
            std::collections::HashMap::with_capacity(locked.len());
        for row in &locked {
            let progress = map_progress_row(row)?;
            current.insert(progress.word_id.clone(), progress);
        }

        let mut outcomes = Vec::with_capacity(answers.len());
        for (word_id, correct) in answers {
            let Some(row) = current.get(word_id).cloned() else {
                continue;
            };

            if eligible(&row, now) {
                let next = transition(&row, *correct, now);
                upsert_row(&mut *tx, &next).await?;
                outcomes.push(RowOutcome {
                    word_id: word_id.clone(),
                    previous_pool: row.pool,
                    new_pool: next.pool,
                    next_available_time: next.next_available_time,
                    applied: true,
                });
                current.insert(word_id.clone(), next);
            } else {
                outcomes.push(RowOutcome {
                    word_id: word_id.clone(),
                    previous_pool: row.pool,
                    new_pool: row.pool,
                    next_available_time: row.next_available_time,
                    applied: false,
                });
            }
        }

        tx.commit().await?;
        Ok(outcomes)
    }

    async fn mark_display_complete(
        &self,
        user_id: &str,
        word_ids: &[String],
        now: DateTime<Utc>,
        advance: DisplayAdvanceFn,
    ) -> Result<usize, StoreError> {
        if word_ids.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;

        let mut sorted_ids: Vec<&String> = word_ids.iter().collect();
        sorted_ids.sort();

        let locked = sqlx::query(
            r#"
            SELECT * FROM word_progress
            WHERE user_id = $1 AND word_id = ANY($2)
            ORDER BY word_id ASC
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(&sorted_ids.iter().map(|s| s.as_str()).collect::<Vec<_>>()[..])
        .fetch_all(&mut *tx)
        .await?;

        let mut advanced = 0;
        for row in &locked {
            let progress = map_progress_row(row)?;
            if matches!(progress.pool, Pool::R(_)) && progress.review_stage == Some(ReviewStage::Display) {
                let next = advance(&progress, now);
                upsert_row(&mut *tx, &next).await?;
                advanced += 1;
            }
        }

        tx.commit().await?;
        Ok(advanced)
    }

    async fn reset_all(&self, user_id: &str) -> Result<usize, StoreError> {
        let result = sqlx::query(r#"DELETE FROM word_progress WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() as usize)
    }
}

pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_word_row(row: &sqlx::postgres::PgRow) -> Result<Word, StoreError> {
    Ok(Word {
        id: row.try_get("id")?,
        headword: row.try_get("headword")?,
        translation: row.try_get("translation")?,
        sentence_source: row.try_get("sentence_source")?,
        sentence_translation: row.try_get("sentence_translation")?,
        image_url: row.try_get("image_url")?,
        audio_url: row.try_get("audio_url")?,
        level: row.try_get("level")?,
        category: row.try_get("category")?,
        insertion_order: row.try_get("insertion_order")?,
    })
}

#[async_trait]
impl Catalog for PostgresCatalog {
    async fn get(&self, word_id: &str) -> Result<Option<Word>, StoreError> {
        let row = sqlx::query(r#"SELECT * FROM words WHERE id = $1"#)
            .bind(word_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_word_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Word>, StoreError> {
        let rows = sqlx::query(r#"SELECT * FROM words ORDER BY insertion_order ASC"#)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_word_row).collect()
    }
}

pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
