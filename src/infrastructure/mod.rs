//! Infrastructure layer - External service implementations

pub mod azure;
pub mod embedding;
pub mod http_client;
pub mod image;
pub mod logging;
pub mod observability;
pub mod semantic_cache;
pub mod services;
