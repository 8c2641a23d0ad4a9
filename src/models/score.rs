use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoreError;

/// The six mini-games a score can belong to.
///
/// Wire names match the tags the web client has always sent, e.g. `"Reaction Time"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum TestType {
    #[serde(rename = "Reaction Time")]
    ReactionTime,
    #[serde(rename = "Aim Trainer")]
    AimTrainer,
    #[serde(rename = "Number Memory")]
    NumberMemory,
    #[serde(rename = "Memory Test")]
    MemoryTest,
    #[serde(rename = "Typing Test")]
    TypingTest,
    #[serde(rename = "Verbal Memory")]
    VerbalMemory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Mongo sort value for this direction.
    pub fn as_mongo(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

impl TestType {
    pub const ALL: [TestType; 6] = [
        TestType::ReactionTime,
        TestType::AimTrainer,
        TestType::NumberMemory,
        TestType::MemoryTest,
        TestType::TypingTest,
        TestType::VerbalMemory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestType::ReactionTime => "Reaction Time",
            TestType::AimTrainer => "Aim Trainer",
            TestType::NumberMemory => "Number Memory",
            TestType::MemoryTest => "Memory Test",
            TestType::TypingTest => "Typing Test",
            TestType::VerbalMemory => "Verbal Memory",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            TestType::ReactionTime => "ms",
            TestType::AimTrainer => "hits",
            TestType::NumberMemory | TestType::MemoryTest => "level",
            TestType::TypingTest => "WPM",
            TestType::VerbalMemory => "words",
        }
    }

    /// Reaction time is the only test where a lower score is better.
    pub fn sort_direction(self) -> SortDirection {
        match self {
            TestType::ReactionTime => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    /// True when `candidate` beats `current` for this test type.
    pub fn is_better(self, candidate: i64, current: i64) -> bool {
        match self.sort_direction() {
            SortDirection::Ascending => candidate < current,
            SortDirection::Descending => candidate > current,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestType {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ScoreError::UnknownTestType(s.to_string()))
    }
}

/// One persisted score. Append-only: records are never updated or deleted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScoreRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "testType")]
    pub test_type: TestType,
    pub score: i64,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

/// A validated score that has not been stored yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewScore {
    pub user_id: String,
    pub test_type: TestType,
    pub score: i64,
}
