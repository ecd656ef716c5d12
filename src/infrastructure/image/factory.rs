use serde::Deserialize;
use std::sync::Arc;

use super::azure_openai::AzureOpenAiImageProvider;
use super::openai::OpenAiImageProvider;
use crate::domain::{DomainError, ImageGenerator};
use crate::infrastructure::azure::AzureOpenAiConfig;
use crate::infrastructure::http_client::HttpClient;

/// Supported image generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageProviderKind {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "azure_openai")]
    AzureOpenAi,
}

/// Factory for creating image generation providers
#[derive(Debug)]
pub struct ImageProviderFactory;

impl ImageProviderFactory {
    /// Create an image provider from configuration values
    pub fn create(
        kind: ImageProviderKind,
        api_key: impl Into<String>,
        endpoint: Option<&str>,
        deployment: &str,
        api_version: &str,
    ) -> Result<Arc<dyn ImageGenerator>, DomainError> {
        match kind {
            ImageProviderKind::OpenAi => {
                let provider = match endpoint {
                    Some(base_url) => {
                        OpenAiImageProvider::with_base_url(HttpClient::new(), api_key, base_url)
                    }
                    None => OpenAiImageProvider::new(HttpClient::new(), api_key),
                };
                Ok(Arc::new(provider.with_model(deployment)))
            }

            ImageProviderKind::AzureOpenAi => {
                let endpoint = endpoint.ok_or_else(|| {
                    DomainError::configuration(
                        "generation.endpoint is required for the azure_openai provider",
                    )
                })?;

                let config =
                    AzureOpenAiConfig::new(endpoint, api_key).with_api_version(api_version);

                let provider = AzureOpenAiImageProvider::new(HttpClient::new(), config, deployment);
                Ok(Arc::new(provider))
            }
        }
    }

    /// Create an OpenAI provider directly
    pub fn create_openai(api_key: impl Into<String>) -> Arc<dyn ImageGenerator> {
        Arc::new(OpenAiImageProvider::new(HttpClient::new(), api_key))
    }

    /// Create an OpenAI provider with custom base URL
    pub fn create_openai_with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Arc<dyn ImageGenerator> {
        Arc::new(OpenAiImageProvider::with_base_url(
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
    ) -> Arc<dyn ImageGenerator> {
        let config = AzureOpenAiConfig::new(endpoint, api_key);
        Arc::new(AzureOpenAiImageProvider::new(
            HttpClient::new(),
            config,
            deployment,
        ))
    }
}
