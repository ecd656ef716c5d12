//! Embedding provider implementations

mod azure_openai;
mod factory;
mod openai;

pub use azure_openai::AzureOpenAiEmbeddingProvider;
pub use factory::{EmbeddingProviderFactory, EmbeddingProviderKind};
pub use openai::OpenAiEmbeddingProvider;
