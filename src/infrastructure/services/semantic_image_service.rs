//! Semantic image generation service
//!
//! Orchestrates the request path: embed the prompt, consult the
//! semantic cache, and only call the generation provider on a genuine
//! miss. Cache-side failures degrade to direct generation instead of
//! failing the request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::image::{GeneratedImage, ImageGenerationRequest, ImageGenerator, ImageSize};
use crate::domain::semantic_cache::{
    CachedImage, SemanticCache, SemanticCacheConfig, SemanticCacheStats, SemanticSearchParams,
    SemanticSearchResult,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_cache_lookup, record_cache_store, record_generation,
};

use super::single_flight::{prompt_fingerprint, SingleFlight};

/// How an image request was satisfied
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    /// Served from the cache without calling the generator
    CacheHit { url: String, similarity: f32 },
    /// Served by calling the generation provider
    Generated { url: String, stored: bool },
}

impl ImageOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::CacheHit { url, .. } => url,
            Self::Generated { url, .. } => url,
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self, Self::CacheHit { .. })
    }
}

/// Image generation service with semantic prompt caching
#[derive(Debug)]
pub struct SemanticImageService {
    generator: Arc<dyn ImageGenerator>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    cache: Arc<dyn SemanticCache>,
    config: SemanticCacheConfig,
    image_size: ImageSize,
    single_flight: SingleFlight,
}

impl SemanticImageService {
    /// Create a new service with the default cache configuration
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        cache: Arc<dyn SemanticCache>,
    ) -> Self {
        Self::with_config(
            generator,
            embedding_provider,
            cache,
            SemanticCacheConfig::default(),
        )
    }

    /// Create a new service with a custom cache configuration
    pub fn with_config(
        generator: Arc<dyn ImageGenerator>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        cache: Arc<dyn SemanticCache>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            generator,
            embedding_provider,
            cache,
            config,
            image_size: ImageSize::default(),
            single_flight: SingleFlight::new(),
        }
    }

    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.image_size = size;
        self
    }

    /// Check if semantic caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Get the configuration
    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Serve an image for the prompt, from cache when possible.
    ///
    /// Concurrent first-time requests for the same prompt are collapsed
    /// to a single generation call; the waiters are served the entry the
    /// winner stored.
    pub async fn get_or_generate(&self, prompt: &str) -> Result<ImageOutcome, DomainError> {
        if !self.config.enabled {
            record_cache_lookup("bypass");
            return self.generate_direct(prompt).await;
        }

        let embedding = match self.generate_embedding(prompt).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Failed to embed prompt for cache lookup: {}", e);
                record_cache_lookup("error");
                self.record_miss().await;
                return self.generate_direct(prompt).await;
            }
        };

        match self.lookup(&embedding).await {
            Ok(Some(result)) => return Ok(self.serve_hit(result).await),
            Ok(None) => {}
            Err(e) => {
                warn!("Semantic cache lookup failed: {}", e);
                record_cache_lookup("error");
                return self.generate_direct(prompt).await;
            }
        }

        let _permit = self.single_flight.acquire(&prompt_fingerprint(prompt)).await;

        // A winner that held the permit before us may have stored the
        // entry already; check again before generating.
        match self.lookup(&embedding).await {
            Ok(Some(result)) => return Ok(self.serve_hit(result).await),
            Ok(None) => {}
            Err(e) => {
                warn!("Semantic cache re-check failed: {}", e);
                record_cache_lookup("error");
                return self.generate_direct(prompt).await;
            }
        }

        let preview: String = prompt.chars().take(50).collect();
        debug!("Semantic cache miss for prompt: {}...", preview);
        record_cache_lookup("miss");
        self.record_miss().await;

        let image = self.generate(prompt).await?;
        let url = image.into_url();
        let stored = self.store(prompt, embedding, &url).await;

        Ok(ImageOutcome::Generated { url, stored })
    }

    /// Get cache statistics
    pub async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
        self.cache.stats().await
    }

    /// Remove every cached entry
    pub async fn clear_cache(&self) -> Result<(), DomainError> {
        self.cache.clear().await
    }

    /// Generate an embedding for the given text
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::new(&self.config.embedding_model, text);
        let response = self.embedding_provider.embed(request).await?;

        response
            .first()
            .map(|e| e.vector().to_vec())
            .ok_or_else(|| {
                DomainError::embedding(
                    self.embedding_provider.provider_name(),
                    "No embedding returned",
                )
            })
    }

    async fn lookup(
        &self,
        embedding: &[f32],
    ) -> Result<Option<SemanticSearchResult>, DomainError> {
        let params = SemanticSearchParams::new(self.config.similarity_threshold);
        self.cache.find_similar(embedding, &params).await
    }

    async fn serve_hit(&self, result: SemanticSearchResult) -> ImageOutcome {
        debug!(
            "Semantic cache hit with similarity {:.4} for entry {}",
            result.similarity,
            result.entry.id()
        );
        record_cache_lookup("hit");

        if let Err(e) = self.cache.record_hit(result.entry.id()).await {
            warn!("Failed to record cache hit: {}", e);
        }

        ImageOutcome::CacheHit {
            url: result.entry.into_url(),
            similarity: result.similarity,
        }
    }

    async fn record_miss(&self) {
        if let Err(e) = self.cache.record_miss().await {
            warn!("Failed to record cache miss: {}", e);
        }
    }

    /// Call the generation provider without touching the cache
    async fn generate_direct(&self, prompt: &str) -> Result<ImageOutcome, DomainError> {
        let image = self.generate(prompt).await?;

        Ok(ImageOutcome::Generated {
            url: image.into_url(),
            stored: false,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, DomainError> {
        let request = ImageGenerationRequest::new(prompt).with_size(self.image_size);
        let started = Instant::now();

        let result = self.generator.generate(request).await;
        record_generation(
            self.generator.provider_name(),
            result.is_ok(),
            started.elapsed(),
        );

        result
    }

    /// Store a freshly generated image, reporting whether the write stuck
    async fn store(&self, prompt: &str, embedding: Vec<f32>, url: &str) -> bool {
        let entry_id = format!("sem:{}", Uuid::new_v4());
        let entry = CachedImage::new(entry_id, embedding, prompt, url, self.config.ttl());

        match self.cache.store(entry).await {
            Ok(()) => {
                debug!("Cached generated image for prompt");
                record_cache_store(true);
                true
            }
            Err(e) => {
                warn!("Failed to store generated image in semantic cache: {}", e);
                record_cache_store(false);
                false
            }
        }
    }
}
