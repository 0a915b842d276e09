use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exercise::{build_exercise, Exercise};
use super::{AssemblerError, PRACTICE_BATCH, PRACTICE_MIN_ELIGIBLE};
use crate::db::store::{Catalog, ProgressStore};
use crate::domain::pool::Pool;
use crate::domain::scheduler;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub available: bool,
    pub reason: Option<String>,
    pub exercises: Vec<Exercise>,
    pub exercise_order: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeAnswer {
    pub word_id: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    pub word_id: String,
    pub previous_pool: Pool,
    pub new_pool: Pool,
    pub next_available_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSummary {
    pub correct: usize,
    pub incorrect: usize,
    pub applied: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSubmitResult {
    pub results: Vec<PracticeResult>,
    pub summary: PracticeSummary,
}

/// Candidates are progress rows eligible right now, ordered by
/// ascending `next_available_time`; the exercise type is driven by
/// each candidate's current pool, not a fixed type for the session.
pub async fn get_practice_session(
    store: &dyn ProgressStore,
    catalog: &dyn Catalog,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<PracticeSession, AssemblerError> {
    let progress = store.list_for_user(user_id).await?;
    let mut eligible: Vec<_> = progress
        .into_iter()
        .filter(|p| scheduler::eligible_for_practice(p, now))
        .collect();

    if eligible.len() < PRACTICE_MIN_ELIGIBLE {
        return Ok(PracticeSession {
            available: false,
            reason: Some("not_enough_words".to_string()),
            exercises: Vec::new(),
            exercise_order: Vec::new(),
        });
    }

    eligible.sort_by_key(|p| p.next_available_time);
    eligible.truncate(PRACTICE_BATCH);

    let words = catalog.list_all().await?;
    let mut rng = rand::rng();
    let mut exercises = Vec::with_capacity(eligible.len());
    let mut exercise_order = Vec::with_capacity(eligible.len());

    for row in &eligible {
        let Some(target) = words.iter().find(|w| w.id == row.word_id) else {
            continue;
        };
        let Some(exercise_type) = row.pool.exercise_type() else {
            continue;
        };
        exercise_order.push(row.word_id.clone());
        exercises.push(build_exercise(target, exercise_type, &words, &mut rng));
    }

    Ok(PracticeSession {
        available: true,
        reason: None,
        exercises,
        exercise_order,
    })
}

/// Re-checks eligibility at lock time: a row that raced past it since
/// the session was handed out comes back with `applied = false` rather
/// than failing the whole batch.
pub async fn submit_practice(
    store: &dyn ProgressStore,
    user_id: &str,
    answers: &[PracticeAnswer],
    now: DateTime<Utc>,
) -> Result<PracticeSubmitResult, AssemblerError> {
    let pairs: Vec<(String, bool)> = answers.iter().map(|a| (a.word_id.clone(), a.correct)).collect();

    let outcomes = store
        .submit(
            user_id,
            &pairs,
            now,
            scheduler::eligible_for_practice,
            scheduler::transition,
        )
        .await?;

    let answer_map: HashMap<&str, bool> =
        answers.iter().map(|a| (a.word_id.as_str(), a.correct)).collect();

    let mut summary = PracticeSummary::default();
    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        if outcome.applied {
            summary.applied += 1;
            match answer_map.get(outcome.word_id.as_str()) {
                Some(true) => summary.correct += 1,
                Some(false) => summary.incorrect += 1,
                None => {}
            }
        }
        results.push(PracticeResult {
            word_id: outcome.word_id,
            previous_pool: outcome.previous_pool,
            new_pool: outcome.new_pool,
            next_available_time: outcome.next_available_time,
        });
    }

    Ok(PracticeSubmitResult { results, summary })
}
