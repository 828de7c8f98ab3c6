// Adapters layer: in-process implementations of the domain ports.

pub mod memory_cache;
pub mod memory_store;

pub use memory_cache::MemoryCache;
pub use memory_store::{InMemoryPersonStore, InMemoryStrategyStore};
