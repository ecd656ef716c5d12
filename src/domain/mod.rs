//! Domain layer - Provider traits, cache contracts and entities

pub mod embedding;
pub mod error;
pub mod image;
pub mod semantic_cache;

pub use embedding::{
    cosine_similarity, Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse,
    EmbeddingUsage,
};
pub use error::DomainError;
pub use image::{GeneratedImage, ImageGenerationRequest, ImageGenerator, ImageSize};
pub use semantic_cache::{
    CachedImage, SemanticCache, SemanticCacheConfig, SemanticCacheStats, SemanticSearchParams,
    SemanticSearchResult,
};
