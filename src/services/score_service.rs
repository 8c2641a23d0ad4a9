use crate::constants::{LEADERBOARD_MAX_LIMIT, LEADERBOARD_PAGE_SIZE};
use crate::error::ScoreError;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::score::{NewScore, ScoreRecord, TestType};
use crate::models::score_request::AddScoreRequest;
use crate::models::user::is_valid_user_id;
use crate::repositories::ScoreStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Record/read contract over persisted scores.
#[derive(Clone)]
pub struct ScoreService {
    store: Arc<dyn ScoreStore>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks a submission body. Any missing field fails before the tag or id is inspected.
pub fn validate_score_request(request: AddScoreRequest) -> Result<NewScore, ScoreError> {
    let (user_id, test_type, score) = match (
        present(request.user_id),
        present(request.test_type),
        request.score,
    ) {
        (Some(user_id), Some(test_type), Some(score)) => (user_id, test_type, score),
        _ => return Err(ScoreError::MissingFields),
    };

    let test_type: TestType = test_type.parse()?;
    if !is_valid_user_id(&user_id) {
        return Err(ScoreError::InvalidUserId(user_id));
    }

    Ok(NewScore {
        user_id,
        test_type,
        score,
    })
}

/// Clamps a requested leaderboard size, defaulting to one page.
pub fn leaderboard_limit(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(LEADERBOARD_PAGE_SIZE)
        .clamp(1, LEADERBOARD_MAX_LIMIT)
}

impl ScoreService {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        ScoreService { store }
    }

    pub async fn record_score(&self, request: AddScoreRequest) -> Result<ScoreRecord, ScoreError> {
        let score = validate_score_request(request)?;
        let record = self.store.insert_score(score).await?;

        info!(
            id = %record.id,
            user_id = %record.user_id,
            test_type = %record.test_type,
            score = record.score,
            "score recorded"
        );
        Ok(record)
    }

    /// All of a user's scores, newest first.
    pub async fn list_user_scores(&self, user_id: &str) -> Result<Vec<ScoreRecord>, ScoreError> {
        if !is_valid_user_id(user_id) {
            return Err(ScoreError::InvalidUserId(user_id.to_string()));
        }
        Ok(self.store.scores_for_user(user_id).await?)
    }

    pub async fn list_top_scores(
        &self,
        test_type: TestType,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, ScoreError> {
        let limit = limit.clamp(1, LEADERBOARD_MAX_LIMIT);
        let records = self.store.top_scores(test_type, limit).await?;

        let mut user_ids: Vec<String> = records.iter().map(|r| r.user_id.clone()).collect();
        user_ids.sort();
        user_ids.dedup();
        let users = self.store.user_summaries(&user_ids).await?;

        debug!(%test_type, limit, count = records.len(), "leaderboard fetched");

        Ok(records
            .into_iter()
            .map(|record| {
                let user = users.get(&record.user_id).cloned();
                LeaderboardEntry::from_record(record, user)
            })
            .collect())
    }

    /// The user's personal best for every test type they have played.
    pub async fn best_scores_for_user(
        &self,
        user_id: &str,
    ) -> Result<BTreeMap<TestType, i64>, ScoreError> {
        let scores = self.list_user_scores(user_id).await?;
        Ok(best_per_test_type(&scores))
    }
}

pub fn best_per_test_type(scores: &[ScoreRecord]) -> BTreeMap<TestType, i64> {
    let mut best: BTreeMap<TestType, i64> = BTreeMap::new();
    for record in scores {
        best.entry(record.test_type)
            .and_modify(|current| {
                if record.test_type.is_better(record.score, *current) {
                    *current = record.score;
                }
            })
            .or_insert(record.score);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_id: Option<&str>, test_type: Option<&str>, score: Option<i64>) -> AddScoreRequest {
        AddScoreRequest {
            user_id: user_id.map(str::to_string),
            test_type: test_type.map(str::to_string),
            score,
        }
    }

    const USER: &str = "64b7f0c2a1b2c3d4e5f60718";

    #[test]
    fn missing_fields_fail_validation() {
        for req in [
            request(None, Some("Reaction Time"), Some(200)),
            request(Some(USER), None, Some(200)),
            request(Some(USER), Some("Reaction Time"), None),
            request(Some(""), Some("Reaction Time"), Some(200)),
        ] {
            assert!(matches!(
                validate_score_request(req),
                Err(ScoreError::MissingFields)
            ));
        }
    }

    #[test]
    fn zero_score_is_present() {
        let score = validate_score_request(request(Some(USER), Some("Aim Trainer"), Some(0)))
            .expect("valid");
        assert_eq!(score.score, 0);
        assert_eq!(score.test_type, TestType::AimTrainer);
    }

    #[test]
    fn unknown_tag_and_bad_id_are_rejected() {
        assert!(matches!(
            validate_score_request(request(Some(USER), Some("Chess"), Some(1))),
            Err(ScoreError::UnknownTestType(_))
        ));
        assert!(matches!(
            validate_score_request(request(Some("abc"), Some("Typing Test"), Some(1))),
            Err(ScoreError::InvalidUserId(_))
        ));
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(leaderboard_limit(None), 10);
        assert_eq!(leaderboard_limit(Some(1)), 1);
        assert_eq!(leaderboard_limit(Some(0)), 1);
        assert_eq!(leaderboard_limit(Some(1000)), LEADERBOARD_MAX_LIMIT);
    }
}
