//! Application state for shared services

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::domain::semantic_cache::SemanticCacheStats;
use crate::domain::DomainError;
use crate::infrastructure::services::{ImageOutcome, SemanticImageService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub image_service: Arc<dyn SemanticImageServiceTrait>,
}

/// Trait for image service operations
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SemanticImageServiceTrait: Send + Sync {
    async fn get_or_generate(&self, prompt: &str) -> Result<ImageOutcome, DomainError>;
    async fn cache_stats(&self) -> Result<SemanticCacheStats, DomainError>;
    async fn clear_cache(&self) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl SemanticImageServiceTrait for SemanticImageService {
    async fn get_or_generate(&self, prompt: &str) -> Result<ImageOutcome, DomainError> {
        SemanticImageService::get_or_generate(self, prompt).await
    }

    async fn cache_stats(&self) -> Result<SemanticCacheStats, DomainError> {
        SemanticImageService::stats(self).await
    }

    async fn clear_cache(&self) -> Result<(), DomainError> {
        SemanticImageService::clear_cache(self).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(image_service: Arc<dyn SemanticImageServiceTrait>) -> Self {
        Self { image_service }
    }
}
