use serde::Deserialize;

use crate::domain::image::ImageSize;
use crate::domain::DomainError;
use crate::infrastructure::embedding::EmbeddingProviderKind;
use crate::infrastructure::image::ImageProviderKind;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::semantic_cache::CacheBackend;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Image generation provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: ImageProviderKind,
    /// Base URL override; required for the azure_openai provider
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: String,
    /// Model name, or deployment name on Azure
    #[serde(default = "default_generation_deployment")]
    pub deployment: String,
    /// Azure api-version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Output resolution, e.g. `1024x1024`
    #[serde(default = "default_image_size")]
    pub size: String,
}

/// Embedding provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,
    /// Base URL override; Azure accepts this or `resource`
    pub endpoint: Option<String>,
    /// Azure resource name, expanded to `https://{resource}.openai.azure.com`
    pub resource: Option<String>,
    /// Falls back to `generation.api_key` when unset
    pub api_key: Option<String>,
    /// Deployment name on Azure
    #[serde(default = "default_embedding_deployment")]
    pub deployment: String,
    /// Model name for direct OpenAI requests
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Expected embedding vector length
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

/// Semantic cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub backend: CacheBackend,
    /// Connection string; required for the redis backend
    pub url: Option<String>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Entry cap for the memory backend
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_generation_deployment() -> String {
    "dall-e-3".to_string()
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_embedding_deployment() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_dimensions() -> usize {
    1536
}

fn default_true() -> bool {
    true
}

fn default_namespace() -> String {
    "semantic:image".to_string()
}

fn default_similarity_threshold() -> f32 {
    0.95
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entries() -> usize {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ImageProviderKind::default(),
            endpoint: None,
            api_key: String::new(),
            deployment: default_generation_deployment(),
            api_version: default_api_version(),
            size: default_image_size(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            endpoint: None,
            resource: None,
            api_key: None,
            deployment: default_embedding_deployment(),
            model: default_embedding_model(),
            api_version: default_api_version(),
            dimensions: default_dimensions(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::default(),
            url: None,
            namespace: default_namespace(),
            similarity_threshold: default_similarity_threshold(),
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and the environment.
    ///
    /// `config/default` and `config/local` are read when present, then
    /// `APP`-prefixed environment variables override them
    /// (e.g. `APP__GENERATION__API_KEY`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Check cross-field requirements that serde defaults cannot express
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.generation.api_key.trim().is_empty() {
            return Err(DomainError::configuration(
                "generation.api_key must not be empty",
            ));
        }

        if self.generation.provider == ImageProviderKind::AzureOpenAi
            && self.generation.endpoint.is_none()
        {
            return Err(DomainError::configuration(
                "generation.endpoint is required for the azure_openai provider",
            ));
        }

        self.generation.size.parse::<ImageSize>()?;

        if self.embedding.provider == EmbeddingProviderKind::AzureOpenAi
            && self.embedding.endpoint.is_none()
            && self.embedding.resource.is_none()
        {
            return Err(DomainError::configuration(
                "embedding.endpoint or embedding.resource is required for the azure_openai provider",
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(DomainError::configuration(
                "embedding.dimensions must be greater than zero",
            ));
        }

        if self.cache.enabled && self.cache.backend == CacheBackend::Redis && self.cache.url.is_none()
        {
            return Err(DomainError::configuration(
                "cache.url is required for the redis backend",
            ));
        }

        if self.cache.enabled
            && self.cache.backend == CacheBackend::Memory
            && self.cache.max_entries == 0
        {
            return Err(DomainError::configuration(
                "cache.max_entries must be greater than zero for the memory backend",
            ));
        }

        Ok(())
    }

    /// API key for embedding calls, falling back to the generation key
    pub fn embedding_api_key(&self) -> &str {
        self.embedding
            .api_key
            .as_deref()
            .unwrap_or(&self.generation.api_key)
    }

    pub fn image_size(&self) -> Result<ImageSize, DomainError> {
        self.generation.size.parse()
    }
}
