//! Shared Azure OpenAI connection settings

/// Azure OpenAI API configuration
///
/// The endpoint can be supplied directly or derived from a resource
/// name via [`AzureOpenAiConfig::from_resource`].
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
}

impl AzureOpenAiConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: "2024-02-01".to_string(),
        }
    }

    /// Build the configuration from an Azure resource name
    pub fn from_resource(resource: &str, api_key: impl Into<String>) -> Self {
        Self::new(format!("https://{}.openai.azure.com", resource), api_key)
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}
