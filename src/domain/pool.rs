//! The twelve-pool ladder: P0..P6 for first-pass learning, R1..R5 for
//! words demoted back for re-exposure after a wrong answer.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A word's current scheduling bucket for one user.
///
/// `P(0)` is the intake pool (no progress row yet); `P(6)` is mastered
/// and never surfaces again. `R(k)` mirrors the P-pool a word was
/// demoted from and carries its own [`ReviewStage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "level")]
pub enum Pool {
    P(u8),
    R(u8),
}

/// Sub-state of an R-pool visit: re-seen, then re-tested 20h later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    Display,
    Practice,
}

/// The exercise a pool's eligible activity generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    ReadingLv1,
    ListeningLv1,
    SpeakingLv1,
    ReadingLv2,
    SpeakingLv2,
}

pub const RETRY_WAIT: Duration = Duration::from_secs(10 * 60);
pub const REVIEW_DISPLAY_TO_PRACTICE_WAIT: Duration = Duration::from_secs(20 * 60 * 60);

impl Pool {
    /// The P-pool backing index: for `P(k)` it's `k`; for `R(k)` it's the
    /// pool the word was demoted from.
    pub fn level(self) -> u8 {
        match self {
            Pool::P(k) => k,
            Pool::R(k) => k,
        }
    }

    pub fn is_mastered(self) -> bool {
        matches!(self, Pool::P(6))
    }

    /// Wait after entry before the pool's activity is eligible, or
    /// `None` for pools with no wait gate (P0 intake, P6 mastered).
    pub fn wait(self) -> Option<Duration> {
        match self {
            Pool::P(0) => None,
            Pool::P(1) => Some(RETRY_WAIT),
            Pool::P(2) => Some(Duration::from_secs(20 * 60 * 60)),
            Pool::P(3) => Some(Duration::from_secs(44 * 60 * 60)),
            Pool::P(4) => Some(Duration::from_secs(68 * 60 * 60)),
            Pool::P(5) => Some(Duration::from_secs(164 * 60 * 60)),
            Pool::P(6) => None,
            Pool::P(_) => None,
            Pool::R(_) => Some(RETRY_WAIT),
        }
    }

    /// The exercise surfaced when this pool is eligible. `None` for P0
    /// (Learn intake, not a Practice exercise) and P6 (mastered).
    pub fn exercise_type(self) -> Option<ExerciseType> {
        let level = match self {
            Pool::P(k) => k,
            Pool::R(k) => k,
        };
        match level {
            1 => Some(ExerciseType::ReadingLv1),
            2 => Some(ExerciseType::ListeningLv1),
            3 => Some(ExerciseType::SpeakingLv1),
            4 => Some(ExerciseType::ReadingLv2),
            5 => Some(ExerciseType::SpeakingLv2),
            _ => None,
        }
    }

    pub fn next_p(self) -> Pool {
        match self {
            Pool::P(k) if k < 6 => Pool::P(k + 1),
            Pool::P(k) => Pool::P(k),
            Pool::R(k) => Pool::P(k),
        }
    }

    pub fn demoted(self) -> Pool {
        match self {
            Pool::P(k) => Pool::R(k),
            other => other,
        }
    }

    pub fn as_db_str(self) -> String {
        match self {
            Pool::P(k) => format!("P{k}"),
            Pool::R(k) => format!("R{k}"),
        }
    }

    pub fn from_db_str(s: &str) -> Option<Pool> {
        let (tag, rest) = s.split_at(1);
        let level: u8 = rest.parse().ok()?;
        match tag {
            "P" if level <= 6 => Some(Pool::P(level)),
            "R" if (1..=5).contains(&level) => Some(Pool::R(level)),
            _ => None,
        }
    }
}

impl ReviewStage {
    pub fn as_db_str(self) -> &'static str {
        match self {
            ReviewStage::Display => "display",
            ReviewStage::Practice => "practice",
        }
    }

    pub fn from_db_str(s: &str) -> Option<ReviewStage> {
        match s {
            "display" => Some(ReviewStage::Display),
            "practice" => Some(ReviewStage::Practice),
            _ => None,
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p1_wait_is_ten_minutes() {
        assert_eq!(Pool::P(1).wait(), Some(RETRY_WAIT));
    }

    #[test]
    fn p0_and_p6_have_no_wait() {
        assert_eq!(Pool::P(0).wait(), None);
        assert_eq!(Pool::P(6).wait(), None);
    }

    #[test]
    fn r_pools_share_the_retry_constant() {
        for k in 1..=5 {
            assert_eq!(Pool::R(k).wait(), Some(RETRY_WAIT));
        }
    }

    #[test]
    fn db_str_round_trips() {
        for pool in [Pool::P(0), Pool::P(6), Pool::R(3)] {
            assert_eq!(Pool::from_db_str(&pool.as_db_str()), Some(pool));
        }
    }

    #[test]
    fn exercise_type_matches_pool_table() {
        assert_eq!(Pool::P(1).exercise_type(), Some(ExerciseType::ReadingLv1));
        assert_eq!(Pool::R(2).exercise_type(), Some(ExerciseType::ListeningLv1));
        assert_eq!(Pool::P(0).exercise_type(), None);
        assert_eq!(Pool::P(6).exercise_type(), None);
    }
}
