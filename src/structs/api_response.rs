use serde::{Deserialize, Serialize};

/// Envelope for error and status replies.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
}

/// Reply to a created score: `{ "message": ..., "data": record }`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreatedResponse<T> {
    pub message: String,
    pub data: T,
}

pub fn create_api_response(status: &str, message: &str) -> ApiResponse {
    ApiResponse {
        status: status.to_string(),
        message: message.to_string(),
    }
}

pub fn success_response(message: &str) -> ApiResponse {
    create_api_response("success", message)
}

pub fn error_response(message: &str) -> ApiResponse {
    create_api_response("error", message)
}

pub fn created_response<T>(message: &str, data: T) -> CreatedResponse<T> {
    CreatedResponse {
        message: message.to_string(),
        data,
    }
}
