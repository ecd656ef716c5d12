//! API layer - HTTP endpoints and middleware

pub mod admin;
pub mod health;
pub mod images;
pub mod middleware;
pub mod render;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_router, create_router_with_state};
pub use state::AppState;
