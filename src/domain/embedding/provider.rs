//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI, Azure OpenAI, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate an embedding for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::{Embedding, EmbeddingUsage};
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    /// Deterministic stand-in: the same text always embeds to the same
    /// vector, and vectors for different texts are uncorrelated, so a
    /// repeated prompt scores 1.0 while unrelated prompts score near 0.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        error: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    fn pseudo_random_vector(text: &str, dimensions: usize) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish() | 1;

        (0..dimensions)
            .map(|_| {
                // xorshift64
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                ((state % 2000) as f32 / 1000.0) - 1.0
            })
            .collect()
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::embedding(self.name, error));
            }

            let vector = pseudo_random_vector(request.input(), self.dimensions);
            let tokens = (request.input().len() / 4) as u32;

            Ok(EmbeddingResponse::new(
                request.model().to_string(),
                vec![Embedding::new(0, vector)],
                EmbeddingUsage::new(tokens, tokens),
            ))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::embedding::cosine_similarity;

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new("test", 128);

            let first = provider
                .embed(EmbeddingRequest::new("mock", "Hello"))
                .await
                .unwrap();
            let second = provider
                .embed(EmbeddingRequest::new("mock", "Hello"))
                .await
                .unwrap();

            assert_eq!(
                first.first().unwrap().vector(),
                second.first().unwrap().vector()
            );
            assert_eq!(first.first().unwrap().dimensions(), 128);
        }

        #[tokio::test]
        async fn test_distinct_texts_are_dissimilar() {
            let provider = MockEmbeddingProvider::new("test", 512);

            let a = provider
                .embed(EmbeddingRequest::new("mock", "a red bicycle"))
                .await
                .unwrap();
            let b = provider
                .embed(EmbeddingRequest::new("mock", "a bowl of ramen"))
                .await
                .unwrap();

            let similarity =
                cosine_similarity(a.first().unwrap().vector(), b.first().unwrap().vector());
            assert!(
                similarity.abs() < 0.5,
                "expected uncorrelated vectors, got similarity {}",
                similarity
            );
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new("test", 128).with_error("API error");

            let result = provider.embed(EmbeddingRequest::new("mock", "Hello")).await;

            assert!(matches!(result, Err(DomainError::EmbeddingFailed { .. })));
        }

        #[tokio::test]
        async fn test_empty_text_embeds() {
            let provider = MockEmbeddingProvider::new("test", 64);

            let response = provider
                .embed(EmbeddingRequest::new("mock", ""))
                .await
                .unwrap();

            assert_eq!(response.first().unwrap().dimensions(), 64);
        }
    }
}
