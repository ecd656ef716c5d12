use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// Output resolutions supported by the generation providers.
///
/// The gateway always requests square, high resolution output unless
/// configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Square256,
    Square512,
    #[default]
    Square1024,
    Landscape1792x1024,
    Portrait1024x1792,
}

impl ImageSize {
    /// Wire representation understood by the OpenAI-style image APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square256 => "256x256",
            Self::Square512 => "512x512",
            Self::Square1024 => "1024x1024",
            Self::Landscape1792x1024 => "1792x1024",
            Self::Portrait1024x1792 => "1024x1792",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "256x256" => Ok(Self::Square256),
            "512x512" => Ok(Self::Square512),
            "1024x1024" => Ok(Self::Square1024),
            "1792x1024" => Ok(Self::Landscape1792x1024),
            "1024x1792" => Ok(Self::Portrait1024x1792),
            other => Err(DomainError::configuration(format!(
                "Unsupported image size '{}' (expected one of 256x256, 512x512, 1024x1024, 1792x1024, 1024x1792)",
                other
            ))),
        }
    }
}

/// Request for a single image generation call
#[derive(Debug, Clone)]
pub struct ImageGenerationRequest {
    prompt: String,
    size: ImageSize,
    count: u32,
}

impl ImageGenerationRequest {
    /// Creates a request for one image at the default size
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: ImageSize::default(),
            count: 1,
        }
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
