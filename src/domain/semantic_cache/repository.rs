//! Semantic cache trait and types

use std::fmt::Debug;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A prompt/image-URL association in the semantic cache
///
/// Created on a cache miss after successful generation; never mutated
/// afterwards apart from its hit counter. Expiry is enforced at lookup
/// time and by the backing store's own TTL mechanism where available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedImage {
    /// Unique identifier for this entry
    id: String,
    /// The embedding vector for similarity search
    embedding: Vec<f32>,
    /// The prompt this image was generated for
    prompt: String,
    /// The generated image URL
    url: String,
    /// When this entry was created (unix seconds)
    created_at: u64,
    /// When this entry expires (unix seconds)
    expires_at: u64,
    /// Number of cache hits
    hit_count: u32,
}

impl CachedImage {
    pub fn new(
        id: impl Into<String>,
        embedding: Vec<f32>,
        prompt: impl Into<String>,
        url: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            id: id.into(),
            embedding,
            prompt: prompt.into(),
            url: url.into(),
            created_at: now,
            expires_at: now + ttl.as_secs(),
            hit_count: 0,
        }
    }

    /// Rehydrate an entry from a backing store
    pub fn from_parts(
        id: impl Into<String>,
        embedding: Vec<f32>,
        prompt: impl Into<String>,
        url: impl Into<String>,
        created_at: u64,
        expires_at: u64,
        hit_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            embedding,
            prompt: prompt.into(),
            url: url.into(),
            created_at,
            expires_at,
            hit_count,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        now >= self.expires_at
    }

    pub fn increment_hits(&mut self) {
        self.hit_count += 1;
    }

    pub fn into_url(self) -> String {
        self.url
    }

    #[cfg(test)]
    pub(crate) fn force_expired(&mut self) {
        self.expires_at = 0;
    }
}

/// Result of a semantic cache search
#[derive(Debug, Clone)]
pub struct SemanticSearchResult {
    /// The matching cached entry
    pub entry: CachedImage,
    /// Similarity score (0.0 to 1.0)
    pub similarity: f32,
}

impl SemanticSearchResult {
    pub fn new(entry: CachedImage, similarity: f32) -> Self {
        Self { entry, similarity }
    }
}

/// Statistics for the semantic cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticCacheStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Total cache hits
    pub hits: u64,
    /// Total cache misses
    pub misses: u64,
    /// Total entries evicted
    pub evictions: u64,
}

impl SemanticCacheStats {
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits as f32 / total as f32
    }
}

/// Search parameters for semantic cache lookup
#[derive(Debug, Clone)]
pub struct SemanticSearchParams {
    /// Minimum similarity for an entry to count as a match
    pub min_similarity: f32,
    /// Maximum results to return
    pub limit: usize,
}

impl Default for SemanticSearchParams {
    fn default() -> Self {
        Self {
            min_similarity: 0.95,
            limit: 1,
        }
    }
}

impl SemanticSearchParams {
    pub fn new(min_similarity: f32) -> Self {
        Self {
            min_similarity,
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Trait for semantic (vector-based) caching of generated images
///
/// Implementations rank matches by similarity descending; equal scores
/// keep the backend's iteration order, so `find_similar` returns the
/// first result the store produced.
#[async_trait]
pub trait SemanticCache: Send + Sync + Debug {
    /// Search for similar entries based on embedding
    async fn search(
        &self,
        embedding: &[f32],
        params: &SemanticSearchParams,
    ) -> Result<Vec<SemanticSearchResult>, DomainError>;

    /// Find the most similar entry
    async fn find_similar(
        &self,
        embedding: &[f32],
        params: &SemanticSearchParams,
    ) -> Result<Option<SemanticSearchResult>, DomainError> {
        let results = self.search(embedding, params).await?;
        Ok(results.into_iter().next())
    }

    /// Store a new entry
    async fn store(&self, entry: CachedImage) -> Result<(), DomainError>;

    /// Clear all entries
    async fn clear(&self) -> Result<(), DomainError>;

    /// Get cache statistics
    async fn stats(&self) -> Result<SemanticCacheStats, DomainError>;

    /// Get the number of entries
    async fn size(&self) -> Result<usize, DomainError>;

    /// Record a cache hit against an entry
    async fn record_hit(&self, id: &str) -> Result<(), DomainError>;

    /// Record a cache miss
    async fn record_miss(&self) -> Result<(), DomainError>;
}
