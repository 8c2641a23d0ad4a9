use crate::error::ScoreError;
use crate::models::score::TestType;
use crate::models::score_request::{AddScoreRequest, LeaderboardQuery};
use crate::services::score_service::{leaderboard_limit, ScoreService};
use crate::structs::api_response::{created_response, error_response, success_response};

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{error, warn};

fn failure_response(err: &ScoreError, storage_message: &str) -> HttpResponse {
    if err.is_validation() {
        warn!(error = %err, "rejected score request");
        HttpResponse::BadRequest().json(error_response(&err.to_string()))
    } else {
        error!(error = %err, "score store failure");
        HttpResponse::InternalServerError().json(error_response(storage_message))
    }
}

pub async fn add_score(
    service: web::Data<ScoreService>,
    form: web::Json<AddScoreRequest>,
) -> HttpResponse {
    match service.record_score(form.into_inner()).await {
        Ok(record) => HttpResponse::Created().json(created_response("Score saved successfully", record)),
        Err(err) => failure_response(&err, "Failed to save score. Please try again later."),
    }
}

pub async fn get_user_scores(
    service: web::Data<ScoreService>,
    user_id: web::Path<String>,
) -> HttpResponse {
    match service.list_user_scores(&user_id.into_inner()).await {
        Ok(scores) => HttpResponse::Ok().json(scores),
        Err(err) => failure_response(&err, "Failed to fetch scores. Please try again later."),
    }
}

pub async fn get_user_best_scores(
    service: web::Data<ScoreService>,
    user_id: web::Path<String>,
) -> HttpResponse {
    match service.best_scores_for_user(&user_id.into_inner()).await {
        Ok(best) => HttpResponse::Ok().json(best),
        Err(err) => failure_response(&err, "Failed to fetch scores. Please try again later."),
    }
}

pub async fn get_leaderboard(
    service: web::Data<ScoreService>,
    test_type: web::Path<String>,
    query: web::Query<LeaderboardQuery>,
) -> HttpResponse {
    let test_type: TestType = match test_type.parse() {
        Ok(test_type) => test_type,
        Err(err) => return failure_response(&err, ""),
    };
    let limit = leaderboard_limit(query.limit);

    match service.list_top_scores(test_type, limit).await {
        Ok(leaderboard) => HttpResponse::Ok().json(leaderboard),
        Err(err) => failure_response(
            &err,
            "Failed to fetch leaderboard data. Please try again later.",
        ),
    }
}

/// Malformed or mistyped JSON bodies get the same error envelope as validation failures.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "unreadable score request body");
    let response = HttpResponse::BadRequest().json(error_response(&format!("Invalid request body: {}", err)));
    InternalError::from_response(err, response).into()
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(success_response("Brain benchmark backend running"))
}
