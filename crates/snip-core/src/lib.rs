//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the short key type, the error taxonomy and the
//! traits shared by the generator, storage, shortener and gateway crates.

pub mod context;
pub mod error;
pub mod shortener;
pub mod shortkey;
pub mod store;

pub use context::OpContext;
pub use error::{CoreError, ShortenerError, StoreError};
pub use shortener::Shortener;
pub use shortkey::{is_valid, ShortKey, ALPHABET, KEY_LENGTH};
pub use store::{MappingStore, DEFAULT_TTL};
