use crate::error::ClientError;
use crate::games::ScoreSubmission;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::score::{ScoreRecord, TestType};
use crate::structs::api_response::{ApiResponse, CreatedResponse};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// HTTP client for the score service.
#[derive(Clone, Debug)]
pub struct ScoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ScoreClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uses `BRAINBENCH_API_URL`, falling back to the local dev server.
    pub fn from_env() -> Self {
        Self::new(std::env::var("BRAINBENCH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()))
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| ClientError::InvalidUrl(format!("{}: {}", self.base_url, err)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn submit(&self, submission: &ScoreSubmission) -> Result<ScoreRecord, ClientError> {
        let url = self.url(&["scores", "add"])?;
        debug!(%url, test_type = %submission.test_type, score = submission.score, "posting score");
        let response = self.http.post(url).json(submission).send().await?;
        let created: CreatedResponse<ScoreRecord> = read_json(response).await?;
        Ok(created.data)
    }

    pub async fn fetch_user_scores(&self, user_id: &str) -> Result<Vec<ScoreRecord>, ClientError> {
        let url = self.url(&["scores", "user", user_id])?;
        read_json(self.http.get(url).send().await?).await
    }

    pub async fn fetch_best_scores(
        &self,
        user_id: &str,
    ) -> Result<BTreeMap<TestType, i64>, ClientError> {
        let url = self.url(&["scores", "user", user_id, "best"])?;
        read_json(self.http.get(url).send().await?).await
    }

    pub async fn fetch_leaderboard(
        &self,
        test_type: TestType,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardEntry>, ClientError> {
        let mut url = self.url(&["scores", "leaderboard", test_type.as_str()])?;
        if let Some(limit) = limit {
            url.query_pairs_mut().append_pair("limit", &limit.to_string());
        }
        read_json(self.http.get(url).send().await?).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiResponse>(&body)
        .map(|r| r.message)
        .unwrap_or(body);
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_segments() {
        let client = ScoreClient::new("http://localhost:5000/api/");
        let url = client
            .url(&["scores", "leaderboard", TestType::ReactionTime.as_str()])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/scores/leaderboard/Reaction%20Time"
        );
    }
}
