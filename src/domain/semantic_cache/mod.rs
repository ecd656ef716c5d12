//! Semantic cache domain models and traits

mod config;
mod repository;

pub use config::SemanticCacheConfig;
pub use repository::{
    CachedImage, SemanticCache, SemanticCacheStats, SemanticSearchParams, SemanticSearchResult,
};
