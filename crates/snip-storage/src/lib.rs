pub mod clock;
pub mod memory;
pub mod redis;

pub use clock::{Clock, SystemClock};
pub use memory::InMemoryStore;
pub use self::redis::{RedisStore, StoreSettings};
pub use snip_core::store::{MappingStore, Result};
pub use snip_core::StoreError;
