//! Semantic cache backends

mod factory;
mod in_memory;
mod redis;

pub use factory::{CacheBackend, SemanticCacheFactory};
pub use in_memory::InMemorySemanticCache;
pub use redis::{RedisSemanticCache, RedisSemanticCacheConfig};
