//! HTTP error mapping
//!
//! Out-of-range link indices are 404. Everything the caller can fix by
//! changing the request (missing fields, unknown engine, illegal move, bad
//! upload, unreadable JSON body) is 400. Storage failures are 500. Every
//! error body is `{"error": "<message>"}`.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use linkhub_core::{ErrorKind, HubError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Hub(#[from] HubError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Activation of an unknown engine is a bad request, not a missing resource
            ApiError::Hub(HubError::EngineNotFound { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Hub(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation | ErrorKind::IllegalTransition => StatusCode::BAD_REQUEST,
                ErrorKind::Io | ErrorKind::Malformed => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections use the `{"error"}` body
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkhub_core::Direction;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(HubError::IndexOutOfRange { index: 4, len: 2 }),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(HubError::EngineNotFound {
                    name: "bing".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(HubError::MissingField { field: "logo" }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(HubError::IllegalMove {
                    index: 0,
                    direction: Direction::Up,
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(HubError::Malformed {
                    path: PathBuf::from("links.json"),
                    details: "eof".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::InvalidRequest("No file part".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::NotFound("admin.html is not installed".to_string()),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status(), status, "{}", err);
        }
    }

    #[test]
    fn test_hub_message_is_transparent() {
        let err = ApiError::from(HubError::IndexOutOfRange { index: 4, len: 2 });
        assert_eq!(err.to_string(), "Index out of range: 4 (have 2 links)");
    }
}
