use crate::models::score::{ScoreRecord, TestType};
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top score with its owner resolved, shaped like a populated score document.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user: Option<UserSummary>,
    #[serde(rename = "testType")]
    pub test_type: TestType,
    pub score: i64,
    pub date: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn from_record(record: ScoreRecord, user: Option<UserSummary>) -> Self {
        LeaderboardEntry {
            id: record.id,
            user,
            test_type: record.test_type,
            score: record.score,
            date: record.timestamp,
        }
    }

    pub fn display_name(&self) -> &str {
        match &self.user {
            Some(user) if !user.name.is_empty() => &user.name,
            _ => "Unknown",
        }
    }
}
