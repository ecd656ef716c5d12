//! Infrastructure services

mod semantic_image_service;
mod single_flight;

pub use semantic_image_service::{ImageOutcome, SemanticImageService};
pub use single_flight::{prompt_fingerprint, SingleFlight, SingleFlightPermit};
