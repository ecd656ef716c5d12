//! Azure OpenAI embedding provider implementation

use async_trait::async_trait;

use super::openai::parse_embedding_response;
use crate::domain::{DomainError, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::infrastructure::azure::AzureOpenAiConfig;
use crate::infrastructure::http_client::HttpClientTrait;

/// Azure OpenAI embedding provider
///
/// The deployment determines the model, so request bodies carry the
/// input text only.
#[derive(Debug)]
pub struct AzureOpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    config: AzureOpenAiConfig,
    deployment: String,
}

impl<C: HttpClientTrait> AzureOpenAiEmbeddingProvider<C> {
    pub fn new(client: C, config: AzureOpenAiConfig, deployment: impl Into<String>) -> Self {
        Self {
            client,
            config,
            deployment: deployment.into(),
        }
    }

    fn build_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.deployment,
            self.config.api_version
        )
    }

    fn build_request(&self, request: &EmbeddingRequest) -> serde_json::Value {
        serde_json::json!({
            "input": request.input(),
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
impl<C: HttpClientTrait> EmbeddingProvider for AzureOpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let url = self.build_url();
        let body = self.build_request(&request);

        let json = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| DomainError::embedding(self.provider_name(), e.to_string()))?;

        parse_embedding_response(json, self.provider_name())
    }

    fn provider_name(&self) -> &'static str {
        "azure_openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use crate::infrastructure::http_client::HttpClient;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_mock_response(dimensions: usize) -> serde_json::Value {
        let embedding: Vec<f32> = (0..dimensions).map(|j| j as f32 * 0.001).collect();

        serde_json::json!({
            "model": "text-embedding-ada-002",
            "data": [{"index": 0, "embedding": embedding}],
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        })
    }

    #[tokio::test]
    async fn test_embed_single_text() {
        let url = "https://myresource.openai.azure.com/openai/deployments/embed/embeddings?api-version=2024-02-01";
        let client = MockHttpClient::new().with_response(url, create_mock_response(1536));

        let config = AzureOpenAiConfig::new("https://myresource.openai.azure.com", "test-key");
        let provider = AzureOpenAiEmbeddingProvider::new(client, config, "embed");

        let response = provider
            .embed(EmbeddingRequest::new("text-embedding-ada-002", "hello"))
            .await
            .unwrap();

        assert_eq!(response.first().unwrap().dimensions(), 1536);
    }

    #[tokio::test]
    async fn test_url_building_from_resource() {
        let config = AzureOpenAiConfig::from_resource("myresource", "key");
        let provider = AzureOpenAiEmbeddingProvider::new(MockHttpClient::new(), config, "embed");

        assert_eq!(
            provider.build_url(),
            "https://myresource.openai.azure.com/openai/deployments/embed/embeddings?api-version=2024-02-01"
        );
    }

    #[tokio::test]
    async fn test_request_body_has_input_only() {
        let config = AzureOpenAiConfig::new("https://myresource.openai.azure.com", "key");
        let provider = AzureOpenAiEmbeddingProvider::new(MockHttpClient::new(), config, "embed");

        let body =
            provider.build_request(&EmbeddingRequest::new("text-embedding-ada-002", "hello"));

        assert!(body.get("model").is_none());
        assert_eq!(body, serde_json::json!({"input": "hello"}));
    }

    #[tokio::test]
    async fn test_embed_against_http_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/embed/embeddings"))
            .and(query_param("api-version", "2024-02-01"))
            .and(header("api-key", "test-key"))
            .and(body_json(serde_json::json!({"input": "a red bicycle"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_mock_response(8)))
            .expect(1)
            .mount(&server)
            .await;

        let config = AzureOpenAiConfig::new(server.uri(), "test-key");
        let provider = AzureOpenAiEmbeddingProvider::new(HttpClient::new(), config, "embed");

        let response = provider
            .embed(EmbeddingRequest::new("text-embedding-ada-002", "a red bicycle"))
            .await
            .unwrap();

        assert_eq!(response.first().unwrap().dimensions(), 8);
    }
}
