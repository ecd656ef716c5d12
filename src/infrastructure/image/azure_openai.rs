use async_trait::async_trait;

use super::openai::parse_images_response;
use crate::domain::{DomainError, GeneratedImage, ImageGenerationRequest, ImageGenerator};
use crate::infrastructure::azure::AzureOpenAiConfig;
use crate::infrastructure::http_client::HttpClientTrait;

/// Azure OpenAI image generation provider
///
/// Same wire shape as the OpenAI API, addressed per deployment with
/// `api-key` authentication.
#[derive(Debug)]
pub struct AzureOpenAiImageProvider<C: HttpClientTrait> {
    client: C,
    config: AzureOpenAiConfig,
    deployment: String,
}

impl<C: HttpClientTrait> AzureOpenAiImageProvider<C> {
    pub fn new(client: C, config: AzureOpenAiConfig, deployment: impl Into<String>) -> Self {
        Self {
            client,
            config,
            deployment: deployment.into(),
        }
    }

    fn build_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/images/generations?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.deployment,
            self.config.api_version
        )
    }

    fn build_request(&self, request: &ImageGenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "prompt": request.prompt(),
            "n": request.count(),
            "size": request.size().as_str(),
            "response_format": "url",
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("api-key", self.config.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> ImageGenerator for AzureOpenAiImageProvider<C> {
    async fn generate(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GeneratedImage, DomainError> {
        let url = self.build_url();
        let body = self.build_request(&request);

        let json = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| DomainError::generation(self.provider_name(), e.to_string()))?;

        parse_images_response(json, self.provider_name())
    }

    fn provider_name(&self) -> &'static str {
        "azure_openai"
    }
}
