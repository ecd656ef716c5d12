use thiserror::Error;

/// Core domain errors
///
/// Failures from the two external collaborators are classified so the
/// service layer can decide recovery: cache-side errors fall back to
/// direct generation, generation errors surface to the caller, and
/// configuration errors abort startup.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Cache unavailable: {message}")]
    CacheUnavailable { message: String },

    #[error("Embedding failed: {provider} - {message}")]
    EmbeddingFailed { provider: String, message: String },

    #[error("Image generation failed: {provider} - {message}")]
    GenerationFailed { provider: String, message: String },

    #[error("Configuration error: {message}")]
    InvalidConfiguration { message: String },
}

impl DomainError {
    pub fn cache_unavailable(message: impl Into<String>) -> Self {
        Self::CacheUnavailable {
            message: message.into(),
        }
    }

    pub fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingFailed {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn generation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Errors raised while talking to the cache or computing embeddings.
    /// The request can still be served by calling the generator directly.
    pub fn is_cache_side(&self) -> bool {
        matches!(
            self,
            Self::CacheUnavailable { .. } | Self::EmbeddingFailed { .. }
        )
    }
}
