//! Image generation endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};
use serde::Deserialize;
use tracing::error;

use crate::api::render::{render_error_page, render_image_page};
use crate::api::state::AppState;
use crate::domain::DomainError;

/// Query parameters for the image endpoint
#[derive(Debug, Deserialize)]
pub struct GenerateImageParams {
    /// Prompt describing the image; a missing parameter is treated as empty
    #[serde(default)]
    pub prompt: String,
}

/// Serve an HTML page with an image for the prompt, generating one on a
/// cache miss.
pub async fn generate_image(
    State(state): State<AppState>,
    Query(params): Query<GenerateImageParams>,
) -> (StatusCode, Html<String>) {
    match state.image_service.get_or_generate(&params.prompt).await {
        Ok(outcome) => (
            StatusCode::OK,
            Html(render_image_page(outcome.url(), &params.prompt)),
        ),
        Err(e) => {
            error!("Image request failed: {}", e);
            (error_status(&e), Html(render_error_page(&e.to_string())))
        }
    }
}

fn error_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
        e if e.is_cache_side() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api::state::MockSemanticImageServiceTrait;
    use crate::infrastructure::services::ImageOutcome;

    fn state_with(mock: MockSemanticImageServiceTrait) -> AppState {
        AppState::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_success_renders_image_page() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_get_or_generate()
            .withf(|prompt| prompt == "a red bicycle")
            .returning(|_| {
                Ok(ImageOutcome::Generated {
                    url: "https://example/img1.png".to_string(),
                    stored: true,
                })
            });

        let params = GenerateImageParams {
            prompt: "a red bicycle".to_string(),
        };
        let (status, Html(body)) = generate_image(State(state_with(mock)), Query(params)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("src=\"https://example/img1.png\""));
        assert!(body.contains("alt=\"AI Generated Picture a red bicycle\""));
    }

    #[tokio::test]
    async fn test_cache_hit_renders_the_cached_url() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_get_or_generate().returning(|_| {
            Ok(ImageOutcome::CacheHit {
                url: "https://example/cached.png".to_string(),
                similarity: 0.97,
            })
        });

        let params = GenerateImageParams {
            prompt: "a crimson bike".to_string(),
        };
        let (status, Html(body)) = generate_image(State(state_with(mock)), Query(params)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("src=\"https://example/cached.png\""));
    }

    #[tokio::test]
    async fn test_prompt_is_escaped_in_response() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_get_or_generate().returning(|_| {
            Ok(ImageOutcome::Generated {
                url: "https://example/img1.png".to_string(),
                stored: true,
            })
        });

        let params = GenerateImageParams {
            prompt: "<script>alert(1)</script>".to_string(),
        };
        let (status, Html(body)) = generate_image(State(state_with(mock)), Query(params)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_passed_through() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_get_or_generate()
            .withf(|prompt| prompt.is_empty())
            .returning(|_| {
                Ok(ImageOutcome::Generated {
                    url: "https://example/img1.png".to_string(),
                    stored: true,
                })
            });

        let params = GenerateImageParams {
            prompt: String::new(),
        };
        let (status, _) = generate_image(State(state_with(mock)), Query(params)).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generation_failure_returns_502() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_get_or_generate()
            .returning(|_| Err(DomainError::generation("openai", "quota exceeded")));

        let params = GenerateImageParams {
            prompt: "a red bicycle".to_string(),
        };
        let (status, Html(body)) = generate_image(State(state_with(mock)), Query(params)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("quota exceeded"));
        assert!(body.starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_cache_unavailable_returns_503() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_get_or_generate()
            .returning(|_| Err(DomainError::cache_unavailable("redis down")));

        let params = GenerateImageParams {
            prompt: "a red bicycle".to_string(),
        };
        let (status, _) = generate_image(State(state_with(mock)), Query(params)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_configuration_error_returns_500() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_get_or_generate()
            .returning(|_| Err(DomainError::configuration("bad size")));

        let params = GenerateImageParams {
            prompt: "a red bicycle".to_string(),
        };
        let (status, _) = generate_image(State(state_with(mock)), Query(params)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
