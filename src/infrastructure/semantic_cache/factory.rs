use serde::Deserialize;
use std::sync::Arc;

use super::in_memory::InMemorySemanticCache;
use super::redis::{RedisSemanticCache, RedisSemanticCacheConfig};
use crate::domain::{DomainError, SemanticCache};

/// Supported semantic cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
}

/// Factory for creating semantic cache backends
#[derive(Debug)]
pub struct SemanticCacheFactory;

impl SemanticCacheFactory {
    /// Create a cache backend from configuration values
    ///
    /// The Redis backend connects and ensures its vector index before
    /// returning, so startup fails fast on a bad URL.
    pub async fn create(
        backend: CacheBackend,
        url: Option<&str>,
        namespace: &str,
        max_entries: usize,
        dimensions: usize,
    ) -> Result<Arc<dyn SemanticCache>, DomainError> {
        match backend {
            CacheBackend::Memory => Ok(Self::create_in_memory(max_entries, dimensions)),

            CacheBackend::Redis => {
                let url = url.ok_or_else(|| {
                    DomainError::configuration("cache.url is required for the redis backend")
                })?;

                let config = RedisSemanticCacheConfig::new(url)
                    .with_namespace(namespace)
                    .with_dimensions(dimensions);

                Ok(Arc::new(RedisSemanticCache::new(config).await?))
            }
        }
    }

    /// Create an in-memory cache directly
    pub fn create_in_memory(max_entries: usize, dimensions: usize) -> Arc<dyn SemanticCache> {
        Arc::new(InMemorySemanticCache::new(max_entries, dimensions))
    }
}
