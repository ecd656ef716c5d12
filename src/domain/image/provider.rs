use async_trait::async_trait;
use std::fmt::Debug;

use super::{GeneratedImage, ImageGenerationRequest};
use crate::domain::DomainError;

/// Trait for image generation providers (OpenAI, Azure OpenAI, etc.)
#[async_trait]
pub trait ImageGenerator: Send + Sync + Debug {
    /// Generate an image for the given prompt
    async fn generate(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GeneratedImage, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
