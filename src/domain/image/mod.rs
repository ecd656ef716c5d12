//! Image generation domain models and traits

mod provider;
mod request;
mod response;

pub use provider::ImageGenerator;
pub use request::{ImageGenerationRequest, ImageSize};
pub use response::GeneratedImage;

#[cfg(test)]
pub use provider::mock::MockImageGenerator;
