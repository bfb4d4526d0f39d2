//! HTTP error mapping for API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::scraper::errors::ScrapeError;

/// An error response: status code plus a JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        let status = match &err {
            ScrapeError::UnknownPage(_) | ScrapeError::InvalidYears(_) => StatusCode::BAD_REQUEST,
            ScrapeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ScrapeError::Fetch { .. } | ScrapeError::FetchStatus { .. } => StatusCode::BAD_GATEWAY,
            ScrapeError::ParserNotRegistered(_)
            | ScrapeError::NoTableFound
            | ScrapeError::Sanitization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
