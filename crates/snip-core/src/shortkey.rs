use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// Characters a short key is drawn from, in digit order.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of every short key.
pub const KEY_LENGTH: usize = 8;

/// A validated short key identifying a stored URL mapping.
///
/// Short keys are exactly [`KEY_LENGTH`] characters long and contain only
/// characters from [`ALPHABET`]. They are immutable once created.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortKey(SmolStr);

impl ShortKey {
    /// Creates a new `ShortKey` after validating the input.
    pub fn parse(key: impl AsRef<str>) -> Result<Self, CoreError> {
        let key = key.as_ref();
        if key.len() != KEY_LENGTH {
            return Err(CoreError::InvalidShortKey(format!(
                "length must be {}, got {}",
                KEY_LENGTH,
                key.len()
            )));
        }

        if !is_valid(key) {
            return Err(CoreError::InvalidShortKey(format!(
                "must contain only base62 characters: '{}'",
                key
            )));
        }

        Ok(Self(SmolStr::new(key)))
    }

    /// Creates a `ShortKey` without validation.
    ///
    /// Use this only for keys produced by trusted internal sources
    /// (e.g. generators that are guaranteed to produce valid output).
    pub fn new_unchecked(key: impl AsRef<str>) -> Self {
        Self(SmolStr::new(key))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Checks whether `candidate` is a syntactically valid short key.
///
/// Pure and infallible: anything that is not exactly [`KEY_LENGTH`] alphabet
/// characters is rejected.
pub fn is_valid(candidate: &str) -> bool {
    candidate.len() == KEY_LENGTH && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

impl std::fmt::Debug for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortKey").field(&self.0).finish()
    }
}

impl Display for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::str::FromStr for ShortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ShortKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShortKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
