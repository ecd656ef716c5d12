use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{DomainError, GeneratedImage, ImageGenerationRequest, ImageGenerator};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "dall-e-3";

/// OpenAI image generation provider
#[derive(Debug)]
pub struct OpenAiImageProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiImageProvider<C> {
    /// Create a new OpenAI image provider
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the image model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn images_url(&self) -> String {
        format!("{}/v1/images/generations", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &ImageGenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "prompt": request.prompt(),
            "n": request.count(),
            "size": request.size().as_str(),
            "response_format": "url",
        })
    }
}

#[async_trait]
impl<C: HttpClientTrait> ImageGenerator for OpenAiImageProvider<C> {
    async fn generate(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GeneratedImage, DomainError> {
        let url = self.images_url();
        let body = self.build_request(&request);

        let json = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| DomainError::generation(self.provider_name(), e.to_string()))?;

        parse_images_response(json, self.provider_name())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Parse the OpenAI-style images response shared by both deployments
pub(super) fn parse_images_response(
    json: serde_json::Value,
    provider: &'static str,
) -> Result<GeneratedImage, DomainError> {
    let response: ImagesResponse = serde_json::from_value(json).map_err(|e| {
        DomainError::generation(provider, format!("Failed to parse response: {}", e))
    })?;

    let data = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::generation(provider, "No images in response"))?;

    let url = data
        .url
        .ok_or_else(|| DomainError::generation(provider, "Response contained no image URL"))?;

    let mut image = GeneratedImage::new(url);
    if let Some(revised) = data.revised_prompt {
        image = image.with_revised_prompt(revised);
    }

    Ok(image)
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}
