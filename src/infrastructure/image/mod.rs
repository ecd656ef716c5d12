//! Image generation provider implementations

mod azure_openai;
mod factory;
mod openai;

pub use azure_openai::AzureOpenAiImageProvider;
pub use factory::{ImageProviderFactory, ImageProviderKind};
pub use openai::OpenAiImageProvider;
