//! Scenarios S1-S6 from the scheduler's acceptance criteria, run
//! against the in-memory store with `now` advanced explicitly between
//! steps rather than relying on wall-clock time.

use chrono::{TimeZone, Utc};

use lexwell_backend_rust::assembler::practice::PracticeAnswer;
use lexwell_backend_rust::assembler::review::ReviewAnswer;
use lexwell_backend_rust::assembler::{home_stats, learn, practice, review};
use lexwell_backend_rust::db::memory::{MemoryCatalog, MemoryProgressStore};
use lexwell_backend_rust::db::store::ProgressStore;
use lexwell_backend_rust::domain::pool::Pool;

mod common;
use common::catalog;

fn day_start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

fn t(secs: i64) -> chrono::DateTime<Utc> {
    day_start() + chrono::Duration::seconds(secs)
}

const MIN: i64 = 60;

#[tokio::test]
async fn s1_learn_happy_path() {
    let store = MemoryProgressStore::new();
    let cat = MemoryCatalog::new(catalog(10));

    let session = learn::get_learn_session(&store, &cat, "u1", t(0)).await.unwrap();
    assert!(session.available);
    assert_eq!(session.words.len(), 5);

    let word_ids: Vec<String> = session.words.iter().map(|w| w.word_id.clone()).collect();
    let complete = learn::complete_learn(&store, "u1", &word_ids, t(0)).await.unwrap();
    assert_eq!(complete.words_moved, 5);
    assert_eq!(complete.today_learned, 5);

    let stats = home_stats::get_home_stats(&store, &cat, "u1", t(0)).await.unwrap();
    assert_eq!(stats.today_learned, 5);
    assert_eq!(stats.available_practice, 0);
    assert_eq!(stats.upcoming_24h, 5);
    assert!(!stats.can_practice);
}

#[tokio::test]
async fn s2_p1_backpressure() {
    let store = MemoryProgressStore::new();
    let cat = MemoryCatalog::new(catalog(20));

    let first = learn::get_learn_session(&store, &cat, "u1", t(0)).await.unwrap();
    let first_ids: Vec<String> = first.words.iter().map(|w| w.word_id.clone()).collect();
    learn::complete_learn(&store, "u1", &first_ids, t(0)).await.unwrap();

    let second = learn::get_learn_session(&store, &cat, "u1", t(5 * MIN)).await.unwrap();
    assert!(second.available);
    let second_ids: Vec<String> = second.words.iter().map(|w| w.word_id.clone()).collect();
    learn::complete_learn(&store, "u1", &second_ids, t(5 * MIN)).await.unwrap();

    let third = learn::get_learn_session(&store, &cat, "u1", t(5 * MIN)).await.unwrap();
    assert!(!third.available);
    assert_eq!(third.reason.as_deref(), Some("p1_pool_full"));
}

#[tokio::test]
async fn s3_practice_promotion() {
    let store = MemoryProgressStore::new();
    let cat = MemoryCatalog::new(catalog(10));

    let learned = learn::get_learn_session(&store, &cat, "u1", t(0)).await.unwrap();
    let ids: Vec<String> = learned.words.iter().map(|w| w.word_id.clone()).collect();
    learn::complete_learn(&store, "u1", &ids, t(0)).await.unwrap();

    let now = t(10 * MIN);
    let session = practice::get_practice_session(&store, &cat, "u1", now).await.unwrap();
    assert!(session.available);
    assert_eq!(session.exercises.len(), 5);

    let answers: Vec<PracticeAnswer> = ids
        .iter()
        .map(|id| PracticeAnswer {
            word_id: id.clone(),
            correct: true,
        })
        .collect();
    let result = practice::submit_practice(&store, "u1", &answers, now).await.unwrap();
    assert_eq!(result.summary.applied, 5);
    for r in &result.results {
        assert_eq!(r.previous_pool, Pool::P(1));
        assert_eq!(r.new_pool, Pool::P(2));
        assert_eq!(r.next_available_time, Some(now + chrono::Duration::hours(20)));
    }
}

#[tokio::test]
async fn s4_p2_wrong_answer_demotion() {
    let store = MemoryProgressStore::new();
    let cat = MemoryCatalog::new(catalog(10));

    let learned = learn::get_learn_session(&store, &cat, "u1", t(0)).await.unwrap();
    let ids: Vec<String> = learned.words.iter().map(|w| w.word_id.clone()).collect();
    learn::complete_learn(&store, "u1", &ids, t(0)).await.unwrap();

    let promote_now = t(10 * MIN);
    let all_correct: Vec<PracticeAnswer> = ids
        .iter()
        .map(|id| PracticeAnswer {
            word_id: id.clone(),
            correct: true,
        })
        .collect();
    practice::submit_practice(&store, "u1", &all_correct, promote_now).await.unwrap();

    let test_now = promote_now + chrono::Duration::hours(20) + chrono::Duration::minutes(10);
    let session = practice::get_practice_session(&store, &cat, "u1", test_now).await.unwrap();
    assert!(session.available);

    let wrong_id = ids[0].clone();
    let right_id = ids[1].clone();
    let answers = vec![
        PracticeAnswer { word_id: wrong_id.clone(), correct: false },
        PracticeAnswer { word_id: right_id.clone(), correct: true },
    ];
    let result = practice::submit_practice(&store, "u1", &answers, test_now).await.unwrap();
    assert_eq!(result.summary.applied, 2);

    let wrong_result = result.results.iter().find(|r| r.word_id == wrong_id).unwrap();
    assert_eq!(wrong_result.previous_pool, Pool::P(2));
    assert_eq!(wrong_result.new_pool, Pool::R(2));
    assert_eq!(
        wrong_result.next_available_time,
        Some(test_now + chrono::Duration::minutes(10))
    );

    let right_result = result.results.iter().find(|r| r.word_id == right_id).unwrap();
    assert_eq!(right_result.previous_pool, Pool::P(2));
    assert_eq!(right_result.new_pool, Pool::P(3));
    assert_eq!(
        right_result.next_available_time,
        Some(test_now + chrono::Duration::hours(44))
    );
}

#[tokio::test]
async fn s5_review_two_phase() {
    let store = MemoryProgressStore::new();

    // Drive a row into R2/display directly through Learn -> Practice
    // -> a wrong Practice answer, mirroring S4's demotion path.
    learn::complete_learn(&store, "u1", &["w0".to_string()], t(0)).await.unwrap();
    let promote_now = t(10 * MIN);
    practice::submit_practice(
        &store,
        "u1",
        &[PracticeAnswer { word_id: "w0".to_string(), correct: true }],
        promote_now,
    )
    .await
    .unwrap();

    let demote_now = promote_now + chrono::Duration::hours(20);
    practice::submit_practice(
        &store,
        "u1",
        &[PracticeAnswer { word_id: "w0".to_string(), correct: false }],
        demote_now,
    )
    .await
    .unwrap();

    let row = store.get("u1", "w0").await.unwrap().unwrap();
    assert_eq!(row.pool, Pool::R(2));

    let t0 = demote_now + chrono::Duration::minutes(10);
    let complete = review::complete_review(&store, "u1", &["w0".to_string()], t0).await.unwrap();
    assert_eq!(complete.words_completed, 1);
    assert_eq!(complete.next_practice_time, t0 + chrono::Duration::hours(20));

    let retest_now = t0 + chrono::Duration::hours(20);
    let result = review::submit_review(
        &store,
        "u1",
        &[ReviewAnswer { word_id: "w0".to_string(), correct: true }],
        retest_now,
    )
    .await
    .unwrap();
    assert_eq!(result.summary.returned_to_p, 1);
    assert_eq!(result.results[0].previous_pool, Pool::R(2));
    assert_eq!(result.results[0].new_pool, Pool::P(2));
    assert_eq!(
        result.results[0].next_available_time,
        Some(retest_now + chrono::Duration::hours(20))
    );
}

#[tokio::test]
async fn s6_daily_limit() {
    let store = MemoryProgressStore::new();
    let cat = MemoryCatalog::new(catalog(60));

    let spacing = 15 * MIN;
    let mut now = t(0);
    for _ in 0..10 {
        let session = learn::get_learn_session(&store, &cat, "u1", now).await.unwrap();
        assert!(session.available, "expected a learn session to still be available");
        let ids: Vec<String> = session.words.iter().map(|w| w.word_id.clone()).collect();
        learn::complete_learn(&store, "u1", &ids, now).await.unwrap();
        now = now + chrono::Duration::seconds(spacing);
    }

    let eleventh = learn::get_learn_session(&store, &cat, "u1", now).await.unwrap();
    assert!(!eleventh.available);
    assert_eq!(eleventh.reason.as_deref(), Some("daily_limit_reached"));

    let next_day = now + chrono::Duration::hours(24);
    let after_midnight = learn::get_learn_session(&store, &cat, "u1", next_day).await.unwrap();
    assert!(after_midnight.available);
}

/// A duplicate `word_id` within one submission batch must apply both
/// transitions in order, the second starting from the first's result —
/// never both computed from the row as it was before the batch began.
#[tokio::test]
async fn submit_applies_duplicate_word_id_in_order() {
    use lexwell_backend_rust::domain::scheduler;

    let store = MemoryProgressStore::new();
    learn::complete_learn(&store, "u1", &["w0".to_string()], t(0)).await.unwrap();

    let now = t(10 * MIN);
    let answers = vec![
        ("w0".to_string(), true),
        ("w0".to_string(), true),
    ];
    let outcomes = store
        .submit(
            "u1",
            &answers,
            now,
            scheduler::eligible_for_practice,
            scheduler::transition,
        )
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].previous_pool, Pool::P(1));
    assert_eq!(outcomes[0].new_pool, Pool::P(2));
    assert!(outcomes[0].applied);
    // The second occurrence must see the row already advanced to P2 by
    // the first (and therefore no longer eligible, since P2's wait
    // hasn't elapsed at `now`), not the stale P1 snapshot from before
    // the batch — which would wrongly advance it a second time.
    assert_eq!(outcomes[1].previous_pool, Pool::P(2));
    assert_eq!(outcomes[1].new_pool, Pool::P(2));
    assert!(!outcomes[1].applied);

    let row = store.get("u1", "w0").await.unwrap().unwrap();
    assert_eq!(row.pool, Pool::P(2));
}
