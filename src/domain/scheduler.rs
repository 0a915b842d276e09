//! Pure, synchronous scheduling rules. No I/O, no global clock — every
//! decision is a function of `(pool, next_available_time, now)` and,
//! for transitions, the outcome bit. This is what makes the invariants
//! in spec §8 checkable with `proptest` instead of a live database.

use chrono::{DateTime, Utc};

use super::pool::{Pool, ReviewStage, RETRY_WAIT, REVIEW_DISPLAY_TO_PRACTICE_WAIT};
use super::progress::WordProgress;

pub fn eligible_for_practice(progress: &WordProgress, now: DateTime<Utc>) -> bool {
    matches!(progress.pool, Pool::P(k) if (1..=5).contains(&k))
        && progress
            .next_available_time
            .map(|t| now >= t)
            .unwrap_or(false)
}

pub fn eligible_for_review_display(progress: &WordProgress, now: DateTime<Utc>) -> bool {
    matches!(progress.pool, Pool::R(_))
        && progress.review_stage == Some(ReviewStage::Display)
        && progress
            .next_available_time
            .map(|t| now >= t)
            .unwrap_or(false)
}

pub fn eligible_for_review_test(progress: &WordProgress, now: DateTime<Utc>) -> bool {
    matches!(progress.pool, Pool::R(_))
        && progress.review_stage == Some(ReviewStage::Practice)
        && progress
            .next_available_time
            .map(|t| now >= t)
            .unwrap_or(false)
}

/// Builds the row created when a Learn session completes for a word
/// that had no prior progress (P0 -> P1).
pub fn learn_complete(
    user_id: impl Into<String>,
    word_id: impl Into<String>,
    now: DateTime<Utc>,
) -> WordProgress {
    WordProgress {
        user_id: user_id.into(),
        word_id: word_id.into(),
        pool: Pool::P(1),
        learned_at: Some(now),
        next_available_time: Some(now + RETRY_WAIT),
        review_stage: None,
        last_outcome_at: Some(now),
        correct_count: 0,
        incorrect_count: 0,
    }
}

/// Applies a Practice or Review-test outcome. Must only be called on a
/// row for which `eligible_for_practice` or `eligible_for_review_test`
/// held at `now`; callers re-check eligibility at transaction start
/// per spec §4.3 rule 2 before calling this.
pub fn transition(progress: &WordProgress, correct: bool, now: DateTime<Utc>) -> WordProgress {
    let mut next = progress.clone();
    next.last_outcome_at = Some(now);
    if correct {
        next.correct_count += 1;
    } else {
        next.incorrect_count += 1;
    }

    match progress.pool {
        Pool::P(k) if k >= 1 => {
            if correct {
                let new_pool = progress.pool.next_p();
                next.next_available_time = new_pool.wait().map(|w| now + w);
                next.pool = new_pool;
                next.review_stage = None;
            } else if k == 1 {
                next.pool = Pool::P(1);
                next.next_available_time = Some(now + RETRY_WAIT);
                next.review_stage = None;
            } else {
                next.pool = progress.pool.demoted();
                next.review_stage = Some(ReviewStage::Display);
                next.next_available_time = Some(now + RETRY_WAIT);
            }
        }
        Pool::R(k) => {
            debug_assert_eq!(progress.review_stage, Some(ReviewStage::Practice));
            if correct {
                let target = Pool::P(k);
                next.pool = target;
                next.next_available_time = target.wait().map(|w| now + w);
                next.review_stage = None;
            } else {
                next.pool = Pool::R(k);
                next.review_stage = Some(ReviewStage::Display);
                next.next_available_time = Some(now + RETRY_WAIT);
            }
        }
        Pool::P(_) => {
            debug_assert!(false, "transition called on P0, which has no practice exercise");
        }
    }

    next
}

/// Display-phase completion (`review/complete`): no correctness bit,
/// simply advances an R-pool row from re-exposure to re-test.
pub fn complete_review_display(progress: &WordProgress, now: DateTime<Utc>) -> WordProgress {
    let mut next = progress.clone();
    next.review_stage = Some(ReviewStage::Practice);
    next.next_available_time = Some(now + REVIEW_DISPLAY_TO_PRACTICE_WAIT);
    next
}
