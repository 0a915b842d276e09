use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;

use super::{AssemblerError, PRACTICE_MIN_ELIGIBLE, REVIEW_MIN_ELIGIBLE};
use crate::db::store::{Catalog, ProgressStore};
use crate::domain::scheduler;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeStats {
    pub today_learned: i64,
    pub available_practice: i64,
    pub available_review: i64,
    pub upcoming_24h: i64,
    pub can_learn: bool,
    pub can_practice: bool,
    pub can_review: bool,
    pub next_available_time: Option<DateTime<Utc>>,
}

/// One read-only pass over the user's rows; `can_learn` is the one
/// exception, reusing `get_learn_session` since its availability
/// gating already encodes all three Learn preconditions.
pub async fn get_home_stats(
    store: &dyn ProgressStore,
    catalog: &dyn Catalog,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<HomeStats, AssemblerError> {
    let progress = store.list_for_user(user_id).await?;
    let today = now.date_naive();

    let today_learned = progress
        .iter()
        .filter(|p| p.learned_at.map(|t| t.date_naive() == today).unwrap_or(false))
        .count() as i64;

    let available_practice = progress
        .iter()
        .filter(|p| scheduler::eligible_for_practice(p, now))
        .count() as i64;

    let available_review = progress
        .iter()
        .filter(|p| {
            scheduler::eligible_for_review_display(p, now) || scheduler::eligible_for_review_test(p, now)
        })
        .count() as i64;

    let window_end = now + ChronoDuration::hours(24);
    let upcoming_24h = progress
        .iter()
        .filter(|p| {
            p.next_available_time
                .map(|t| t > now && t <= window_end)
                .unwrap_or(false)
        })
        .count() as i64;

    let can_learn = super::learn::get_learn_session(store, catalog, user_id, now)
        .await?
        .available;
    let can_practice = available_practice >= PRACTICE_MIN_ELIGIBLE as i64;
    let can_review = available_review >= REVIEW_MIN_ELIGIBLE as i64;

    let next_available_time = if !can_learn && !can_practice && !can_review {
        progress.iter().filter_map(|p| p.next_available_time).min()
    } else {
        None
    };

    Ok(HomeStats {
        today_learned,
        available_practice,
        available_review,
        upcoming_24h,
        can_learn,
        can_practice,
        can_review,
        next_available_time,
    })
}
