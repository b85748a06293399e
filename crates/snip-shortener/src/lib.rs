//! URL shortener service implementation.
//!
//! This crate ties a [`snip_generator::Generator`] to a
//! [`snip_core::MappingStore`] and retries key collisions a bounded number
//! of times. Core types are re-exported from `snip_core`.

pub mod attempt;
pub mod service;

pub use attempt::{AttemptOutcome, CreateStep, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use service::{ShortenerService, ShortenerSettings};
pub use snip_core::{Shortener, ShortenerError};
