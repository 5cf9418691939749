//! Database module for users and posts storage.
//!
//! This module provides abstractions for database operations via the
//! Repository pattern, allowing storage backends to be swapped without
//! touching the HTTP layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP Layer (http/) - handlers and DTO mapping          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │                              │
//! ┌───▼──────────────┐   ┌───────────▼──────────┐
//! │ Local Repository │   │ Postgres Repository  │
//! │   (in-memory)    │   │   (Diesel + r2d2)    │
//! └──────────────────┘   └──────────────────────┘
//! ```
//!
//! The repository is always passed explicitly (`Arc<dyn FullRepository>`
//! injected into `http::AppState`); there is no process-global handle.
//! Tests construct a fresh `LocalRepository` per test for isolation.

// Feature flag check: at least one backend must be compiled in.
#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, FullRepository, PostRepository, RepositoryError, RepositoryResult,
    UserRepository,
};
