//! Travel tour catalogue service.
//!
//! A REST API for creating, listing, reading, updating and deleting tour
//! offerings, backed by MongoDB (or an in-process store for tests and local
//! runs). Each tour carries a caller-supplied numeric `tour_id` that must be
//! unique, plus a store-generated `_id` used in URLs.
//!
//! ```text
//! GET    /tour        list every tour
//! POST   /tour        create a tour (all fields required)
//! GET    /tour/{id}   fetch one tour
//! PUT    /tour/{id}   update the provided fields
//! DELETE /tour/{id}   delete a tour
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`tour`]: Tour records, validation, stores and service
//! - [`api`]: HTTP router, handlers and OpenAPI document
//! - [`clock`]: Time source for timestamps
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod metrics;
pub mod tour;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
