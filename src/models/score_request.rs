use serde::{Deserialize, Serialize};

/// Body of `POST /scores/add`. Every field is optional on the wire so a missing
/// field turns into a validation error instead of a deserialization failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AddScoreRequest {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "testType", default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}
