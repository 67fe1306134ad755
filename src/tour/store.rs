//! Persistence seam for tours.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::StoreError;

use super::types::{RecordId, Tour};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend for tour records.
///
/// Implementations must reject an insert whose `tour_id` is already taken with
/// [`StoreError::DuplicateTourId`], atomically with the write.
#[async_trait]
pub trait TourStore: Send + Sync + Debug {
    /// All tours, oldest first.
    async fn list(&self) -> StoreResult<Vec<Tour>>;

    /// Look up a tour by identity.
    async fn find(&self, id: &RecordId) -> StoreResult<Option<Tour>>;

    /// Persist a new tour.
    async fn insert(&self, tour: &Tour) -> StoreResult<()>;

    /// Overwrite an existing tour. Returns `false` if it no longer exists.
    async fn replace(&self, tour: &Tour) -> StoreResult<bool>;

    /// Remove a tour, returning what was removed.
    async fn delete(&self, id: &RecordId) -> StoreResult<Option<Tour>>;

    /// Verify the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name for logs and readiness output.
    fn backend(&self) -> &'static str;
}
