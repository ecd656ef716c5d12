/// A generated image as returned by a provider.
///
/// The essential attribute is a resolvable URL; providers that rewrite
/// the prompt before rendering also report the revised text.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    url: String,
    revised_prompt: Option<String>,
}

impl GeneratedImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            revised_prompt: None,
        }
    }

    pub fn with_revised_prompt(mut self, revised_prompt: impl Into<String>) -> Self {
        self.revised_prompt = Some(revised_prompt.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn revised_prompt(&self) -> Option<&str> {
        self.revised_prompt.as_deref()
    }

    pub fn into_url(self) -> String {
        self.url
    }
}
