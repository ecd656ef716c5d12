//! Admin endpoints for cache inspection and maintenance

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// Cache statistics response
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStatsResponse {
    pub total_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f32,
}

/// Create the admin router with cache management endpoints
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/cache/stats", get(cache_stats))
        .route("/cache", delete(clear_cache))
}

async fn cache_stats(State(state): State<AppState>) -> Result<Json<CacheStatsResponse>, ApiError> {
    let stats = state.image_service.cache_stats().await?;

    Ok(Json(CacheStatsResponse {
        total_entries: stats.total_entries,
        hits: stats.hits,
        misses: stats.misses,
        evictions: stats.evictions,
        hit_rate: stats.hit_rate(),
    }))
}

async fn clear_cache(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.image_service.clear_cache().await?;
    info!("Semantic cache cleared by admin request");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api::state::MockSemanticImageServiceTrait;
    use crate::domain::semantic_cache::SemanticCacheStats;
    use crate::domain::DomainError;

    fn state_with(mock: MockSemanticImageServiceTrait) -> AppState {
        AppState::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_cache_stats_reports_hit_rate() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_cache_stats().returning(|| {
            Ok(SemanticCacheStats {
                total_entries: 3,
                hits: 8,
                misses: 2,
                evictions: 1,
            })
        });

        let Json(response) = cache_stats(State(state_with(mock))).await.unwrap();

        assert_eq!(response.total_entries, 3);
        assert_eq!(response.hits, 8);
        assert_eq!(response.misses, 2);
        assert_eq!(response.evictions, 1);
        assert!((response.hit_rate - 0.8).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_cache_stats_failure_maps_to_503() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_cache_stats()
            .returning(|| Err(DomainError::cache_unavailable("redis down")));

        let err = cache_stats(State(state_with(mock))).await.unwrap_err();

        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_clear_cache_returns_no_content() {
        let mut mock = MockSemanticImageServiceTrait::new();
        mock.expect_clear_cache().returning(|| Ok(()));

        let status = clear_cache(State(state_with(mock))).await.unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_stats_response_serialization() {
        let response = CacheStatsResponse {
            total_entries: 10,
            hits: 5,
            misses: 5,
            evictions: 0,
            hit_rate: 0.5,
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"total_entries\":10"));
        assert!(json.contains("\"hit_rate\":0.5"));
    }
}
