use crate::error::StoreError;
use crate::models::score::{NewScore, ScoreRecord, SortDirection, TestType};
use crate::models::user::UserSummary;
use crate::repositories::score_repository::ScoreStore;
use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
struct MemoryState {
    // (insertion sequence, record)
    scores: Vec<(u64, ScoreRecord)>,
    users: HashMap<String, UserSummary>,
    next_seq: u64,
}

/// Score store kept in process memory. Used with `SCORE_STORE=memory` and in tests.
#[derive(Default)]
pub struct InMemoryScoreStore {
    state: RwLock<MemoryState>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user so leaderboard entries can resolve it.
    pub fn add_user(&self, user: UserSummary) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.users.insert(user.id.clone(), user);
    }

    pub fn len(&self) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn rank(test_type: TestType, a: &(u64, ScoreRecord), b: &(u64, ScoreRecord)) -> Ordering {
    let by_score = match test_type.sort_direction() {
        SortDirection::Ascending => a.1.score.cmp(&b.1.score),
        SortDirection::Descending => b.1.score.cmp(&a.1.score),
    };
    by_score
        .then(a.1.timestamp.cmp(&b.1.timestamp))
        .then(a.0.cmp(&b.0))
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn insert_score(&self, score: NewScore) -> Result<ScoreRecord, StoreError> {
        let record = ScoreRecord {
            id: ObjectId::new().to_hex(),
            user_id: score.user_id,
            test_type: score.test_type,
            score: score.score,
            timestamp: Utc::now(),
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let seq = state.next_seq;
        state.next_seq += 1;
        state.scores.push((seq, record.clone()));
        Ok(record)
    }

    async fn scores_for_user(&self, user_id: &str) -> Result<Vec<ScoreRecord>, StoreError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let mut scores: Vec<&(u64, ScoreRecord)> = state
            .scores
            .iter()
            .filter(|(_, record)| record.user_id == user_id)
            .collect();
        scores.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp).then(b.0.cmp(&a.0)));

        Ok(scores.into_iter().map(|(_, record)| record.clone()).collect())
    }

    async fn top_scores(
        &self,
        test_type: TestType,
        limit: usize,
    ) -> Result<Vec<ScoreRecord>, StoreError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let mut scores: Vec<&(u64, ScoreRecord)> = state
            .scores
            .iter()
            .filter(|(_, record)| record.test_type == test_type)
            .collect();
        scores.sort_by(|a, b| rank(test_type, a, b));

        Ok(scores
            .into_iter()
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn user_summaries(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, UserSummary>, StoreError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(user_ids
            .iter()
            .filter_map(|id| state.users.get(id).map(|user| (id.clone(), user.clone())))
            .collect())
    }
}
