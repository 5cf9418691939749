//! HTTP server module.
//!
//! Axum-based presentation layer over the repository. Request parsing,
//! required-field validation, DTO mapping, and error-envelope formatting all
//! live here; everything below goes through `Arc<dyn FullRepository>`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
