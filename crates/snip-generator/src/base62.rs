use crate::random::{OsRandom, RandomSource};
use crate::{Generator, GeneratorError};
use snip_core::shortkey::{ALPHABET, KEY_LENGTH};
use snip_core::ShortKey;

/// Number of random bytes drawn per key (48 bits).
///
/// 62^8 needs ~47.6 bits, so every key position gets a full digit.
const RANDOM_BYTES: usize = 6;

/// Generates random fixed-length base62 keys.
///
/// Each key is 48 bits from the random source written as 8 base62 digits,
/// least significant digit first.
#[derive(Debug, Clone, Default)]
pub struct Base62Generator<R = OsRandom> {
    random: R,
}

impl Base62Generator<OsRandom> {
    /// Creates a generator backed by the operating system CSPRNG.
    pub fn new() -> Self {
        Self::with_source(OsRandom)
    }
}

impl<R: RandomSource> Base62Generator<R> {
    pub fn with_source(random: R) -> Self {
        Self { random }
    }
}

fn encode(bytes: [u8; RANDOM_BYTES]) -> ShortKey {
    let mut widened = [0u8; 8];
    widened[8 - RANDOM_BYTES..].copy_from_slice(&bytes);
    let mut num = u64::from_be_bytes(widened);

    let mut key = String::with_capacity(KEY_LENGTH);
    for _ in 0..KEY_LENGTH {
        key.push(ALPHABET[(num % 62) as usize] as char);
        num /= 62;
    }
    ShortKey::new_unchecked(key)
}

impl<R: RandomSource + 'static> Generator for Base62Generator<R> {
    fn generate(&self) -> Result<ShortKey, GeneratorError> {
        let mut bytes = [0u8; RANDOM_BYTES];
        self.random
            .fill(&mut bytes)
            .map_err(|e| GeneratorError::RandomnessUnavailable(e.0))?;
        Ok(encode(bytes))
    }
}
