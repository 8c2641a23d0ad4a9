//! Read-only aggregations behind the leaderboard, results and best-scores pages.

use crate::models::leaderboard::LeaderboardEntry;
use crate::models::score::{ScoreRecord, TestType};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub use crate::services::score_service::best_per_test_type;

/// Renders a score with its unit, e.g. `320 ms` or `Level 5`.
pub fn format_score(test_type: TestType, score: i64) -> String {
    match test_type {
        TestType::NumberMemory | TestType::MemoryTest => format!("Level {}", score),
        other => format!("{} {}", score, other.unit()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub score: String,
}

pub fn leaderboard_rows(entries: &[LeaderboardEntry]) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| LeaderboardRow {
            rank: i + 1,
            name: entry.display_name().to_string(),
            score: format_score(entry.test_type, entry.score),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRow {
    pub test_type: TestType,
    pub score: String,
    pub date: DateTime<Utc>,
}

/// A user's history as listed on the results page, in the order given.
pub fn result_rows(scores: &[ScoreRecord]) -> Vec<ResultRow> {
    scores
        .iter()
        .map(|record| ResultRow {
            test_type: record.test_type,
            score: format_score(record.test_type, record.score),
            date: record.timestamp,
        })
        .collect()
}

/// One card per game, `None` where the user has not played yet.
pub fn best_scores_panel(best: &BTreeMap<TestType, i64>) -> Vec<(TestType, Option<String>)> {
    TestType::ALL
        .into_iter()
        .map(|t| (t, best.get(&t).map(|&score| format_score(t, score))))
        .collect()
}
