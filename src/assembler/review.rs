use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exercise::{build_exercise, Exercise};
use super::{AssemblerError, REVIEW_BATCH, REVIEW_MIN_ELIGIBLE};
use crate::db::store::{Catalog, ProgressStore};
use crate::domain::pool::{Pool, REVIEW_DISPLAY_TO_PRACTICE_WAIT};
use crate::domain::scheduler;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWord {
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
pub struct ReviewSession {
    pub available: bool,
    pub reason: Option<String>,
    pub words: Vec<ReviewWord>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCompleteResult {
    pub words_completed: usize,
    pub next_practice_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAnswer {
    pub word_id: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub word_id: String,
    pub previous_pool: Pool,
    pub new_pool: Pool,
    pub next_available_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub applied: usize,
    pub returned_to_p: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmitResult {
    pub results: Vec<ReviewResult>,
    pub summary: ReviewSummary,
}

/// `review/session` bundles full word content plus a preview of the
/// exercises the practice phase will present — the display phase
/// itself is not an exercise, just re-exposure.
pub async fn get_review_session(
    store: &dyn ProgressStore,
    catalog: &dyn Catalog,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<ReviewSession, AssemblerError> {
    let progress = store.list_for_user(user_id).await?;
    let mut eligible: Vec<_> = progress
        .into_iter()
        .filter(|p| scheduler::eligible_for_review_display(p, now))
        .collect();

    if eligible.len() < REVIEW_MIN_ELIGIBLE {
        return Ok(ReviewSession {
            available: false,
            reason: Some("not_enough_words".to_string()),
            words: Vec::new(),
            exercises: Vec::new(),
        });
    }

    eligible.sort_by_key(|p| p.next_available_time);
    eligible.truncate(REVIEW_BATCH);

    let words = catalog.list_all().await?;
    let mut rng = rand::rng();
    let mut out_words = Vec::with_capacity(eligible.len());
    let mut exercises = Vec::with_capacity(eligible.len());

    for row in &eligible {
        let Some(target) = words.iter().find(|w| w.id == row.word_id) else {
            continue;
        };
        out_words.push(ReviewWord {
            word_id: target.id.clone(),
            headword: target.headword.clone(),
            translation: target.translation.clone(),
            sentence_source: target.sentence_source.clone(),
            sentence_translation: target.sentence_translation.clone(),
            image_url: target.image_url.clone(),
            audio_url: target.audio_url.clone(),
        });
        if let Some(exercise_type) = row.pool.exercise_type() {
            exercises.push(build_exercise(target, exercise_type, &words, &mut rng));
        }
    }

    Ok(ReviewSession {
        available: true,
        reason: None,
        words: out_words,
        exercises,
    })
}

/// Idempotent per word: a row already in the practice stage is left
/// alone and not counted in `words_completed`.
pub async fn complete_review(
    store: &dyn ProgressStore,
    user_id: &str,
    word_ids: &[String],
    now: DateTime<Utc>,
) -> Result<ReviewCompleteResult, AssemblerError> {
    let words_completed = store
        .mark_display_complete(user_id, word_ids, now, scheduler::complete_review_display)
        .await?;

    Ok(ReviewCompleteResult {
        words_completed,
        next_practice_time: now + REVIEW_DISPLAY_TO_PRACTICE_WAIT,
    })
}

pub async fn submit_review(
    store: &dyn ProgressStore,
    user_id: &str,
    answers: &[ReviewAnswer],
    now: DateTime<Utc>,
) -> Result<ReviewSubmitResult, AssemblerError> {
    let pairs: Vec<(String, bool)> = answers.iter().map(|a| (a.word_id.clone(), a.correct)).collect();

    let outcomes = store
        .submit(
            user_id,
            &pairs,
            now,
            scheduler::eligible_for_review_test,
            scheduler::transition,
        )
        .await?;

    let mut summary = ReviewSummary::default();
    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        if outcome.applied {
            summary.applied += 1;
            if matches!(outcome.new_pool, Pool::P(_)) {
                summary.returned_to_p += 1;
            }
        }
        results.push(ReviewResult {
            word_id: outcome.word_id,
            previous_pool: outcome.previous_pool,
            new_pool: outcome.new_pool,
            next_available_time: outcome.next_available_time,
        });
    }

    Ok(ReviewSubmitResult { results, summary })
}
