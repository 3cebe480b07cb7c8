// Route exports
pub mod dashboard;
pub mod health;
pub mod students;
pub mod tutors;

use actix_web::{error, http::StatusCode, web, HttpResponse};
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{CacheManager, PostgresClient, PostgresError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    /// Match result cache, `None` when caching is disabled
    pub cache: Option<Arc<CacheManager>>,
    pub matcher: Matcher,
}

impl AppState {
    /// Drop cached match results after any change to the tutor pool
    pub async fn invalidate_matches(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate_matches().await {
                tracing::warn!("Failed to invalidate match cache: {}", e);
            }
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure).service(
        web::scope("/api")
            .configure(tutors::configure)
            .configure(students::configure)
            .configure(dashboard::configure),
    );
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors, e.g. an id that is not a UUID
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path parameter: {}", err),
        status_code: 400,
    }
    .into()
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

/// Map a store failure to a response, logging unexpected ones
pub(crate) fn store_error_response(context: &str, err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(what) => {
            error_response(StatusCode::NOT_FOUND, "Not found", format!("{} not found", what))
        }
        PostgresError::Conflict(message) => error_response(StatusCode::CONFLICT, context, message),
        other => {
            tracing::error!("{}: {}", context, other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context, other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_store_error_status_codes() {
        let not_found = store_error_response("Failed", PostgresError::NotFound("Tutor x".to_string()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = store_error_response("Signup failed", PostgresError::Conflict("exists".to_string()));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let body = to_bytes(conflict.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status_code"], 409);
        assert_eq!(json["message"], "exists");
    }
}
