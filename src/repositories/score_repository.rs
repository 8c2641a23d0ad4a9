use crate::constants::{SCORES_COLL_NAME, USERS_COLL_NAME};
use crate::error::StoreError;
use crate::models::score::{NewScore, ScoreRecord, TestType};
use crate::models::user::UserSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Persistence behind the score service.
///
/// Implementations own ordering: `scores_for_user` is newest-first and
/// `top_scores` is best-first according to [`TestType::sort_direction`], ties
/// going to the earlier record.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn insert_score(&self, score: NewScore) -> Result<ScoreRecord, StoreError>;

    async fn scores_for_user(&self, user_id: &str) -> Result<Vec<ScoreRecord>, StoreError>;

    async fn top_scores(
        &self,
        test_type: TestType,
        limit: usize,
    ) -> Result<Vec<ScoreRecord>, StoreError>;

    /// Resolves user ids to name/email. Unknown ids are left out of the map.
    async fn user_summaries(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, UserSummary>, StoreError>;
}

#[derive(Debug, Deserialize, Serialize)]
struct ScoreDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(rename = "userId")]
    user_id: ObjectId,
    #[serde(rename = "testType")]
    test_type: TestType,
    score: i64,
    date: BsonDateTime,
}

#[derive(Debug, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: Option<String>,
    email: Option<String>,
}

fn to_chrono(date: BsonDateTime) -> Result<DateTime<Utc>, StoreError> {
    DateTime::<Utc>::from_timestamp_millis(date.timestamp_millis())
        .ok_or_else(|| StoreError::Malformed(format!("date out of range: {}", date)))
}

impl ScoreDocument {
    fn into_record(self) -> Result<ScoreRecord, StoreError> {
        let id = self
            .id
            .ok_or_else(|| StoreError::Malformed("score document without _id".to_string()))?;

        Ok(ScoreRecord {
            id: id.to_hex(),
            user_id: self.user_id.to_hex(),
            test_type: self.test_type,
            score: self.score,
            timestamp: to_chrono(self.date)?,
        })
    }
}

fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::Malformed(format!("bad object id '{}'", id)))
}

async fn collect_records(
    cursor: mongodb::Cursor<ScoreDocument>,
) -> Result<Vec<ScoreRecord>, StoreError> {
    let documents: Vec<ScoreDocument> = cursor.try_collect().await?;
    documents.into_iter().map(ScoreDocument::into_record).collect()
}

/// `scores` and `users` collections of the application database.
#[derive(Clone)]
pub struct MongoScoreStore {
    scores: Collection<ScoreDocument>,
    users: Collection<UserDocument>,
}

impl MongoScoreStore {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let database = client.database(db_name);
        MongoScoreStore {
            scores: database.collection(SCORES_COLL_NAME),
            users: database.collection(USERS_COLL_NAME),
        }
    }
}

#[async_trait]
impl ScoreStore for MongoScoreStore {
    async fn insert_score(&self, score: NewScore) -> Result<ScoreRecord, StoreError> {
        let date = BsonDateTime::now();
        let document = ScoreDocument {
            id: None,
            user_id: parse_object_id(&score.user_id)?,
            test_type: score.test_type,
            score: score.score,
            date,
        };

        let result = self.scores.insert_one(&document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Malformed("inserted id is not an ObjectId".to_string()))?;

        Ok(ScoreRecord {
            id: id.to_hex(),
            user_id: score.user_id,
            test_type: score.test_type,
            score: score.score,
            timestamp: to_chrono(date)?,
        })
    }

    async fn scores_for_user(&self, user_id: &str) -> Result<Vec<ScoreRecord>, StoreError> {
        let user_id = parse_object_id(user_id)?;
        let cursor = self
            .scores
            .find(doc! { "userId": user_id })
            .sort(doc! { "date": -1, "_id": -1 })
            .await?;

        collect_records(cursor).await
    }

    async fn top_scores(
        &self,
        test_type: TestType,
        limit: usize,
    ) -> Result<Vec<ScoreRecord>, StoreError> {
        let cursor = self
            .scores
            .find(doc! { "testType": test_type.as_str() })
            .sort(doc! { "score": test_type.sort_direction().as_mongo(), "date": 1 })
            .limit(limit as i64)
            .await?;

        collect_records(cursor).await
    }

    async fn user_summaries(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, UserSummary>, StoreError> {
        let ids: Vec<ObjectId> = user_ids
            .iter()
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cursor = self
            .users
            .find(doc! { "_id": { "$in": ids } })
            .projection(doc! { "name": 1, "email": 1 })
            .await?;
        let users: Vec<UserDocument> = cursor.try_collect().await?;

        Ok(users
            .into_iter()
            .map(|user| {
                let id = user.id.to_hex();
                let summary = UserSummary {
                    id: id.clone(),
                    name: user.name.unwrap_or_default(),
                    email: user.email.unwrap_or_default(),
                };
                (id, summary)
            })
            .collect())
    }
}
