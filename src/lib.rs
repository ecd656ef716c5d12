//! Image Gateway
//!
//! A semantic prompt cache in front of AI image generation providers:
//! - Prompts are embedded and compared by cosine similarity
//! - Sufficiently similar prompts are served the previously generated image
//! - Only genuinely new prompts reach the generation provider
//! - OpenAI and Azure OpenAI providers, Redis or in-memory cache backends

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::semantic_cache::SemanticCacheConfig;
use infrastructure::embedding::EmbeddingProviderFactory;
use infrastructure::image::ImageProviderFactory;
use infrastructure::semantic_cache::SemanticCacheFactory;
use infrastructure::services::SemanticImageService;

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let generator = ImageProviderFactory::create(
        config.generation.provider,
        config.generation.api_key.clone(),
        config.generation.endpoint.as_deref(),
        &config.generation.deployment,
        &config.generation.api_version,
    )?;
    info!("Image provider: {}", generator.provider_name());

    let embedding_provider = EmbeddingProviderFactory::create(
        config.embedding.provider,
        config.embedding_api_key(),
        config.embedding.endpoint.as_deref(),
        config.embedding.resource.as_deref(),
        &config.embedding.deployment,
        &config.embedding.api_version,
    )?;
    info!(
        "Embedding provider: {} ({} dimensions)",
        embedding_provider.provider_name(),
        config.embedding.dimensions
    );

    let cache = SemanticCacheFactory::create(
        config.cache.backend,
        config.cache.url.as_deref(),
        &config.cache.namespace,
        config.cache.max_entries,
        config.embedding.dimensions,
    )
    .await?;

    let cache_config = SemanticCacheConfig::default()
        .with_enabled(config.cache.enabled)
        .with_similarity_threshold(config.cache.similarity_threshold)
        .with_max_entries(config.cache.max_entries)
        .with_ttl_secs(config.cache.ttl_secs)
        .with_namespace(config.cache.namespace.clone())
        .with_embedding_model(config.embedding.model.clone());

    if cache_config.enabled {
        info!(
            "Semantic cache enabled (threshold {:.2}, ttl {}s)",
            cache_config.similarity_threshold, cache_config.ttl_secs
        );
    } else {
        info!("Semantic cache disabled, every request generates");
    }

    let image_service =
        SemanticImageService::with_config(generator, embedding_provider, cache, cache_config)
            .with_image_size(config.image_size()?);

    Ok(AppState::new(Arc::new(image_service)))
}
