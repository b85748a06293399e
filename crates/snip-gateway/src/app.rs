use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{create_url_handler, delete_url_handler, health_handler, redirect_handler};
use crate::state::AppState;

pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

pub struct App {}

impl App {
    /// Routes without middleware.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/api/v1",
                Router::new()
                    .route("/urls", post(create_url_handler))
                    .route("/urls/{key}", delete(delete_url_handler)),
            )
            .route("/{key}", get(redirect_handler))
            .with_state(state)
    }

    /// The full service: routes, CORS for `allowed_origins` and request tracing.
    pub fn service(state: AppState, allowed_origins: &[HeaderValue]) -> Router {
        Self::router(state)
            .layer(Self::cors(allowed_origins))
            .layer(TraceLayer::new_for_http())
    }

    pub fn cors(allowed_origins: &[HeaderValue]) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed_origins.iter().cloned()))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
    }
}
