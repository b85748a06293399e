//! HTTP boundary for the snip URL shortener.
//!
//! Routes, request/response models and the mapping from shortener errors to
//! status codes live here. The `gateway` binary wires a store backend into
//! [`app::App::router`] and serves it.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
