//! In-memory semantic cache implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{
    cosine_similarity, CachedImage, DomainError, SemanticCache, SemanticCacheStats,
    SemanticSearchParams, SemanticSearchResult,
};

/// In-memory semantic cache using linear search
///
/// Suitable for development and single-instance deployments. For shared
/// or large caches, use RedisSemanticCache.
#[derive(Debug)]
pub struct InMemorySemanticCache {
    entries: RwLock<HashMap<String, CachedImage>>,
    max_entries: usize,
    dimensions: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl InMemorySemanticCache {
    /// Create a new in-memory semantic cache
    pub fn new(max_entries: usize, dimensions: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
            dimensions,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn check_dimensions(&self, len: usize) -> Result<(), DomainError> {
        if len != self.dimensions {
            return Err(DomainError::cache_unavailable(format!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.dimensions, len
            )));
        }
        Ok(())
    }

    /// Evict entries if the cache is full, expired ones first
    fn evict_if_needed(&self, entries: &mut HashMap<String, CachedImage>) {
        if entries.len() < self.max_entries {
            return;
        }

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(id, _)| id.clone())
            .collect();

        for id in expired {
            entries.remove(&id);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        while entries.len() >= self.max_entries {
            let Some(oldest_id) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at())
                .map(|(id, _)| id.clone())
            else {
                break;
            };

            entries.remove(&oldest_id);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl SemanticCache for InMemorySemanticCache {
    async fn search(
        &self,
        embedding: &[f32],
        params: &SemanticSearchParams,
    ) -> Result<Vec<SemanticSearchResult>, DomainError> {
        self.check_dimensions(embedding.len())?;

        let entries = self.entries.read().map_err(|e| {
            DomainError::cache_unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut results: Vec<SemanticSearchResult> = entries
            .values()
            .filter(|entry| !entry.is_expired())
            .map(|entry| {
                let similarity = cosine_similarity(embedding, entry.embedding());
                SemanticSearchResult::new(entry.clone(), similarity)
            })
            .filter(|result| result.similarity >= params.min_similarity)
            .collect();

        // Stable sort keeps iteration order for equal scores
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(params.limit);

        Ok(results)
    }

    async fn store(&self, entry: CachedImage) -> Result<(), DomainError> {
        self.check_dimensions(entry.embedding().len())?;

        let mut entries = self.entries.write().map_err(|e| {
            DomainError::cache_unavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        self.evict_if_needed(&mut entries);
        entries.insert(entry.id().to_string(), entry);

        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::cache_unavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);

        Ok(())
    }

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::cache_unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(SemanticCacheStats {
            total_entries: entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        })
    }

    async fn size(&self) -> Result<usize, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::cache_unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.len())
    }

    async fn record_hit(&self, id: &str) -> Result<(), DomainError> {
        self.hits.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write().map_err(|e| {
            DomainError::cache_unavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(entry) = entries.get_mut(id) {
            entry.increment_hits();
        }

        Ok(())
    }

    async fn record_miss(&self) -> Result<(), DomainError> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
