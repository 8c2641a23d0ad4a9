use serde::{Deserialize, Serialize};

/// The slice of a user document exposed next to leaderboard scores.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Mongo user ids are 24 hex digits.
pub fn is_valid_user_id(id: &str) -> bool {
    id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit())
}
