use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::exercise::{build_exercise, Exercise};
use super::{AssemblerError, DAILY_LEARN_LIMIT, LEARN_BATCH, P1_BACKPRESSURE_LIMIT};
use crate::db::models::Word;
use crate::db::store::{Catalog, ProgressStore};
use crate::domain::pool::{ExerciseType, Pool};
use crate::domain::progress::WordProgress;
use crate::domain::scheduler;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnWord {
    pub word_id: String,
    pub headword: String,
    pub translation: String,
    pub sentence_source: String,
    pub sentence_translation: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnSession {
    pub available: bool,
    pub reason: Option<String>,
    pub words: Vec<LearnWord>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnCompleteResult {
    pub words_moved: usize,
    pub today_learned: i64,
}

fn unavailable(reason: &str) -> LearnSession {
    LearnSession {
        available: false,
        reason: Some(reason.to_string()),
        words: Vec::new(),
        exercises: Vec::new(),
    }
}

fn today_learned_count(progress: &[WordProgress], now: DateTime<Utc>) -> i64 {
    let today = now.date_naive();
    progress
        .iter()
        .filter(|p| p.learned_at.map(|t| t.date_naive() == today).unwrap_or(false))
        .count() as i64
}

/// Preconditions are checked in the order spec'd: daily limit, P1
/// backpressure, P0 availability. First failure wins.
pub async fn get_learn_session(
    store: &dyn ProgressStore,
    catalog: &dyn Catalog,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<LearnSession, AssemblerError> {
    let progress = store.list_for_user(user_id).await?;

    if today_learned_count(&progress, now) >= DAILY_LEARN_LIMIT {
        return Ok(unavailable("daily_limit_reached"));
    }

    let upcoming_p1 = progress
        .iter()
        .filter(|p| matches!(p.pool, Pool::P(1)))
        .filter(|p| p.next_available_time.map(|t| t > now).unwrap_or(false))
        .count();
    if upcoming_p1 >= P1_BACKPRESSURE_LIMIT {
        return Ok(unavailable("p1_pool_full"));
    }

    let words = catalog.list_all().await?;
    let progressed: HashSet<&str> = progress.iter().map(|p| p.word_id.as_str()).collect();
    let mut candidates: Vec<&Word> = words
        .iter()
        .filter(|w| !progressed.contains(w.id.as_str()))
        .collect();

    if candidates.is_empty() {
        return Ok(unavailable("no_words_in_p0"));
    }

    candidates.sort_by(|a, b| {
        a.level
            .cmp(&b.level)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.insertion_order.cmp(&b.insertion_order))
    });
    candidates.truncate(LEARN_BATCH);

    let mut rng = rand::rng();
    let exercises = candidates
        .iter()
        .map(|w| build_exercise(w, ExerciseType::ReadingLv1, &words, &mut rng))
        .collect();
    let session_words = candidates
        .iter()
        .map(|w| LearnWord {
            word_id: w.id.clone(),
            headword: w.headword.clone(),
            translation: w.translation.clone(),
            sentence_source: w.sentence_source.clone(),
            sentence_translation: w.sentence_translation.clone(),
            image_url: w.image_url.clone(),
            audio_url: w.audio_url.clone(),
        })
        .collect();

    Ok(LearnSession {
        available: true,
        reason: None,
        words: session_words,
        exercises,
    })
}

/// Inserting an already-present row is a no-op (spec: idempotent per
/// word); `words_moved` only counts rows actually inserted.
pub async fn complete_learn(
    store: &dyn ProgressStore,
    user_id: &str,
    word_ids: &[String],
    now: DateTime<Utc>,
) -> Result<LearnCompleteResult, AssemblerError> {
    let rows: Vec<WordProgress> = word_ids
        .iter()
        .map(|id| scheduler::learn_complete(user_id, id.clone(), now))
        .collect();
    let words_moved = store.insert_new(rows).await?;

    let progress = store.list_for_user(user_id).await?;
    let today_learned = today_learned_count(&progress, now);

    Ok(LearnCompleteResult {
        words_moved,
        today_learned,
    })
}
