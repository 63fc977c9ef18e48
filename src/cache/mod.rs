// Process-local cache
// Typed values, the two-namespace store and the key builders used by the services

pub mod keys;
mod store;
mod value;

pub use store::{CommonCache, EntryState};
pub use value::{CachedValue, Cacheable};
