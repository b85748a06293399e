use crate::error::{AppError, Result, INVALID_BODY, INVALID_KEY, INVALID_URL};
use crate::model::{CreateUrlRequest, CreateUrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::{ShortKey, ShortenerError, StoreError};
use tracing::{debug, info};
use url::Url;

/// Accepts only absolute `http`/`https` URLs.
///
/// The URL parser strips surrounding whitespace and embedded tabs/newlines,
/// but the raw string is what gets stored and later sent as `Location`, so
/// such input is rejected before parsing.
fn validate_target(raw: &str) -> Result<()> {
    if raw.trim() != raw || raw.chars().any(|c| c.is_control()) {
        return Err(AppError::BadRequest(INVALID_URL));
    }
    match Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(AppError::BadRequest(INVALID_URL)),
    }
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected create request body");
        AppError::BadRequest(INVALID_BODY)
    })?;
    if request.url.is_empty() {
        return Err(AppError::BadRequest(INVALID_BODY));
    }
    validate_target(&request.url)?;

    let key = state
        .shortener()
        .shorten(&state.op_context(), &request.url)
        .await
        .map_err(AppError::from_create)?;
    info!(key = %key, "Created short URL");

    let response = CreateUrlResponse {
        short_url: state.short_url(&key),
        short_key: key.to_string(),
        url: request.url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let key = ShortKey::parse(&key).map_err(|_| AppError::NotFound(INVALID_KEY))?;

    let url = state
        .shortener()
        .resolve(&state.op_context(), &key)
        .await
        .map_err(AppError::from_resolve)?;
    debug!(key = %key, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    let key = ShortKey::parse(&key).map_err(|_| AppError::BadRequest(INVALID_KEY))?;

    match state.shortener().delete(&state.op_context(), &key).await {
        Ok(()) => {
            info!(key = %key, "Deleted short URL");
            Ok(StatusCode::OK)
        }
        Err(ShortenerError::Store(StoreError::NotFound(_))) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(AppError::from_delete(err)),
    }
}
