//! Unified error types for the tour service.

use thiserror::Error;

/// Top-level error for process startup and wiring.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Store connection or setup error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence errors raised by a [`TourStore`](crate::tour::TourStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Another record already holds this `tour_id`.
    #[error("duplicate tour_id {0}")]
    DuplicateTourId(i64),

    /// Backend cannot serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// MongoDB driver error.
    #[error("{0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Errors produced by tour operations.
#[derive(Error, Debug)]
pub enum TourError {
    /// One or more required fields were absent or empty.
    #[error("All fields are required")]
    MissingFields(Vec<&'static str>),

    /// A field was present but could not be accepted.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Offending field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// `tour_id` uniqueness conflict.
    #[error("Tour with tour_id {0} already exists")]
    DuplicateTourId(i64),

    /// No record with this identity.
    #[error("tour {0} not found")]
    NotFound(String),

    /// Underlying store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TourError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateTourId(tour_id) => TourError::DuplicateTourId(tour_id),
            other => TourError::Store(other),
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
