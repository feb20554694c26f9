//! Mapping of engine and database failures onto HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use crate::games::tictactoe::EngineError;
use crate::{DbError, DbErrorKind};

/// Error returned by HTTP handlers.
#[derive(Debug, Clone, derive_more::Display)]
pub enum ApiError {
    /// Rule violation reported by the engine.
    #[display("{}", _0)]
    Engine(EngineError),
    /// Unknown game or player.
    #[display("{}", _0)]
    NotFound(String),
    /// Caller is not the game's owner.
    #[display("{}", _0)]
    Forbidden(String),
    /// Malformed request.
    #[display("{}", _0)]
    BadRequest(String),
    /// Concurrent modification.
    #[display("{}", _0)]
    Conflict(String),
    /// Persistence or runtime failure.
    #[display("{}", _0)]
    Internal(String),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status code sent for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    pub fn message(&self) -> String {
        match self {
            ApiError::Engine(EngineError::GameOver) => "Game is already over".to_string(),
            ApiError::Engine(EngineError::WrongTurn { .. }) => "Not your turn".to_string(),
            ApiError::Engine(EngineError::CellOccupied(_)) => "Invalid move!".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Engine(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err.kind {
            DbErrorKind::Invalid => ApiError::BadRequest(err.message),
            DbErrorKind::NotFound => ApiError::NotFound(err.message),
            DbErrorKind::Conflict => ApiError::Conflict(err.message),
            DbErrorKind::Query | DbErrorKind::Corrupt => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}
