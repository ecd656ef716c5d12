use serde::Deserialize;
use std::sync::Arc;

use super::azure_openai::AzureOpenAiEmbeddingProvider;
use super::openai::OpenAiEmbeddingProvider;
use crate::domain::{DomainError, EmbeddingProvider};
use crate::infrastructure::azure::AzureOpenAiConfig;
use crate::infrastructure::http_client::HttpClient;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "azure_openai")]
    AzureOpenAi,
}

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create an embedding provider from configuration values
    ///
    /// Azure accepts either a full endpoint or a bare resource name.
    pub fn create(
        kind: EmbeddingProviderKind,
        api_key: impl Into<String>,
        endpoint: Option<&str>,
        resource: Option<&str>,
        deployment: &str,
        api_version: &str,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        match kind {
            EmbeddingProviderKind::OpenAi => {
                let provider = match endpoint {
                    Some(base_url) => OpenAiEmbeddingProvider::with_base_url(
                        HttpClient::new(),
                        api_key,
                        base_url,
                    ),
                    None => OpenAiEmbeddingProvider::new(HttpClient::new(), api_key),
                };
                Ok(Arc::new(provider))
            }

            EmbeddingProviderKind::AzureOpenAi => {
                let config = match (endpoint, resource) {
                    (Some(endpoint), _) => AzureOpenAiConfig::new(endpoint, api_key),
                    (None, Some(resource)) => AzureOpenAiConfig::from_resource(resource, api_key),
                    (None, None) => {
                        return Err(DomainError::configuration(
                            "embedding.endpoint or embedding.resource is required for the azure_openai provider",
                        ));
                    }
                };

                let provider = AzureOpenAiEmbeddingProvider::new(
                    HttpClient::new(),
                    config.with_api_version(api_version),
                    deployment,
                );
                Ok(Arc::new(provider))
            }
        }
    }

    /// Create an OpenAI provider directly
    pub fn create_openai(api_key: impl Into<String>) -> Arc<dyn EmbeddingProvider> {
        Arc::new(OpenAiEmbeddingProvider::new(HttpClient::new(), api_key))
    }

    /// Create an OpenAI provider with custom base URL
    pub fn create_openai_with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Arc<dyn EmbeddingProvider> {
        Arc::new(OpenAiEmbeddingProvider::with_base_url(
            HttpClient::new(),
            api_key,
            base_url,
        ))
    }

    /// Create an Azure OpenAI provider directly
    pub fn create_azure_openai(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Arc<dyn EmbeddingProvider> {
        let config = AzureOpenAiConfig::new(endpoint, api_key);
        Arc::new(AzureOpenAiEmbeddingProvider::new(
            HttpClient::new(),
            config,
            deployment,
        ))
    }
}
