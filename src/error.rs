use thiserror::Error;

/// Failures of the score store behind the service.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("malformed score document: {0}")]
    Malformed(String),
}

/// Errors returned by the score service.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("All fields (userId, testType, score) are required")]
    MissingFields,
    #[error("Unknown test type '{0}'")]
    UnknownTestType(String),
    #[error("Invalid user id '{0}'")]
    InvalidUserId(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ScoreError {
    /// Validation errors are the caller's fault and map to 400.
    pub fn is_validation(&self) -> bool {
        !matches!(self, ScoreError::Storage(_))
    }
}

/// Errors seen by the game client when talking to the score service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not logged in")]
    IdentityMissing,
    #[error("invalid user id '{0}'")]
    InvalidIdentity(String),
    #[error("invalid score service url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("score service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("failed to connect to MongoDB: {0}")]
    Connect(#[from] mongodb::error::Error),
}

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("local store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("local store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
