use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::{ShortenerError, StoreError};
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

pub const INVALID_BODY: &str = "Invalid request body";
pub const INVALID_URL: &str = "Invalid URL. Must be absolute with http(s) scheme";
pub const INVALID_KEY: &str = "Invalid URL key format";
pub const URL_NOT_FOUND: &str = "URL not found";
pub const KEY_GENERATION_FAILED: &str = "Failed to generate key";
pub const KEYS_EXHAUSTED: &str = "Failed to generate unique key after multiple attempts";
pub const STORE_FAILED: &str = "Failed to store URL";
pub const RETRIEVE_FAILED: &str = "Failed to retrieve URL";
pub const DELETE_FAILED: &str = "Failed to delete URL";

/// An error rendered as `{"error": "<message>"}` with its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal(&'static str),
}

impl AppError {
    /// Maps a failed create. Every shortener failure here is a server error.
    pub fn from_create(err: ShortenerError) -> Self {
        error!(error = %err, "Failed to shorten URL");
        match err {
            ShortenerError::RandomnessUnavailable(_) => AppError::Internal(KEY_GENERATION_FAILED),
            ShortenerError::Exhausted { .. } => AppError::Internal(KEYS_EXHAUSTED),
            ShortenerError::Store(_) => AppError::Internal(STORE_FAILED),
        }
    }

    pub fn from_resolve(err: ShortenerError) -> Self {
        match err {
            ShortenerError::Store(StoreError::NotFound(_)) => AppError::NotFound(URL_NOT_FOUND),
            other => {
                error!(error = %other, "Failed to resolve short key");
                AppError::Internal(RETRIEVE_FAILED)
            }
        }
    }

    /// Maps a failed delete. `NotFound` is not an error for delete and is
    /// handled by the caller.
    pub fn from_delete(err: ShortenerError) -> Self {
        error!(error = %err, "Failed to delete short key");
        AppError::Internal(DELETE_FAILED)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::Internal(message) => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
