//! # Scribe Backend
//!
//! A small REST API for managing blog posts and users.
//!
//! The crate is a thin presentation layer over a relational store: request
//! binding, validation of required fields, translation between persisted rows
//! and wire-format DTOs, and conventional HTTP status mapping. Rows are never
//! physically removed; deletion sets a `deleted_at` timestamp and default
//! queries exclude marked rows.
//!
//! ## Architecture
//!
//! The crate is organized into three logical layers:
//!
//! - [`models`]: domain entities (`User`, `Post`) and their id newtypes
//! - [`db`]: repository trait, error types, and the storage backends
//!   (in-memory for tests and local runs, PostgreSQL via Diesel for
//!   production)
//! - [`http`]: axum-based HTTP server, request handlers, DTO mapping, and
//!   the generated OpenAPI document
//!
//! Handlers receive the repository through [`http::AppState`]; there is no
//! process-global database handle. Each handler returns
//! `Result<Json<T>, AppError>` and the error envelope `{"error": "..."}` is
//! produced at a single point by `AppError`'s `IntoResponse` implementation.

pub mod db;
pub mod http;
pub mod models;
