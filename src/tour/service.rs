//! The five tour operations over a [`TourStore`].

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::TourError;
use crate::metrics;

use super::request::UpdateTourRequest;
use super::store::TourStore;
use super::types::{NewTour, RecordId, Tour};

/// Result of a lookup by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourLookup {
    /// The stored tour.
    pub tour: Tour,
    /// Updated within the recent-update window at lookup time.
    pub recently_updated: bool,
}

/// Tour operations with injected store and clock.
#[derive(Debug, Clone)]
pub struct TourService {
    store: Arc<dyn TourStore>,
    clock: Arc<dyn Clock>,
}

impl TourService {
    /// Service over `store` using the wall clock.
    pub fn new(store: Arc<dyn TourStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Service with an explicit clock.
    pub fn with_clock(store: Arc<dyn TourStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Underlying store, for readiness checks.
    pub fn store(&self) -> &Arc<dyn TourStore> {
        &self.store
    }

    /// All tours.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Tour>, TourError> {
        metrics::inc_tour_operation("list");
        let _timer = metrics::timer_store("list");
        Ok(self.store.list().await?)
    }

    /// One tour by identity, with the recent-update flag.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<TourLookup, TourError> {
        metrics::inc_tour_operation("get");
        let id = parse_id(id)?;
        let tour = {
            let _timer = metrics::timer_store("find");
            self.store.find(&id).await?
        }
        .ok_or_else(|| TourError::NotFound(id.to_string()))?;

        let recently_updated = tour.recently_updated(self.clock.now());
        Ok(TourLookup {
            tour,
            recently_updated,
        })
    }

    /// Persist a new tour. Fails with [`TourError::DuplicateTourId`] on conflict.
    #[instrument(skip(self, new), fields(tour_id = new.tour_id))]
    pub async fn create(&self, new: NewTour) -> Result<Tour, TourError> {
        metrics::inc_tour_operation("create");
        let tour = Tour::create(new, self.clock.now());

        let inserted = {
            let _timer = metrics::timer_store("insert");
            self.store.insert(&tour).await
        };
        match inserted.map_err(TourError::from) {
            Ok(()) => {
                info!(id = %tour.id, title = %tour.title, "Tour created");
                Ok(tour)
            }
            Err(TourError::DuplicateTourId(tour_id)) => {
                metrics::inc_duplicate_tour_id();
                warn!(tour_id, "Rejected duplicate tour_id");
                Err(TourError::DuplicateTourId(tour_id))
            }
            Err(e) => Err(e),
        }
    }

    /// Overlay the truthy fields of `request` onto the stored tour and persist it.
    ///
    /// The record is looked up before the body is checked, so an absent tour is
    /// reported as not found even when the body is also invalid.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: &str, request: UpdateTourRequest) -> Result<Tour, TourError> {
        metrics::inc_tour_operation("update");
        let id = parse_id(id)?;
        let mut tour = {
            let _timer = metrics::timer_store("find");
            self.store.find(&id).await?
        }
        .ok_or_else(|| TourError::NotFound(id.to_string()))?;

        let patch = request.into_patch()?;
        if patch.is_empty() {
            debug!(id = %tour.id, "Update carries no changes, refreshing updatedAt only");
        }
        tour.apply(patch, self.clock.now());

        let replaced = {
            let _timer = metrics::timer_store("replace");
            self.store.replace(&tour).await?
        };
        if !replaced {
            // Deleted between the lookup and the write.
            return Err(TourError::NotFound(id.to_string()));
        }

        info!(id = %tour.id, title = %tour.title, "Tour updated");
        Ok(tour)
    }

    /// Remove a tour, returning it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Tour, TourError> {
        metrics::inc_tour_operation("delete");
        let id = parse_id(id)?;
        let removed = {
            let _timer = metrics::timer_store("delete");
            self.store.delete(&id).await?
        };
        let tour = removed.ok_or_else(|| TourError::NotFound(id.to_string()))?;

        info!(id = %tour.id, title = %tour.title, "Tour deleted");
        Ok(tour)
    }
}

/// Malformed identities cannot name a stored record.
fn parse_id(raw: &str) -> Result<RecordId, TourError> {
    raw.parse()
        .map_err(|_| TourError::NotFound(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::tour::fixtures::sample_new_tour;
    use crate::tour::MemoryTourStore;
    use pretty_assertions::assert_eq;
    use time::Duration;

    fn service() -> (TourService, MemoryTourStore, ManualClock) {
        let store = MemoryTourStore::new();
        let clock = ManualClock::default();
        let service = TourService::with_clock(Arc::new(store.clone()), Arc::new(clock.clone()));
        (service, store, clock)
    }

    #[tokio::test]
    async fn create_assigns_identity_and_timestamps() {
        let (service, store, clock) = service();
        let tour = service.create(sample_new_tour(1)).await.unwrap();

        assert_eq!(tour.created_at, clock.now());
        assert_eq!(tour.updated_at, clock.now());
        assert_eq!(store.len(), 1);
        assert_eq!(service.get(&tour.id.to_string()).await.unwrap().tour, tour);
    }

    #[tokio::test]
    async fn duplicate_tour_id_is_a_conflict() {
        let (service, store, _) = service();
        service.create(sample_new_tour(4)).await.unwrap();

        let err = service.create(sample_new_tour(4)).await.unwrap_err();
        assert!(matches!(err, TourError::DuplicateTourId(4)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn title_only_update_leaves_other_fields() {
        let (service, _, clock) = service();
        let original = service.create(sample_new_tour(1)).await.unwrap();
        clock.advance(Duration::minutes(10));

        let patch = UpdateTourRequest {
            title: Some("Sunset Walk".to_string()),
            ..UpdateTourRequest::default()
        };
        let updated = service
            .update(&original.id.to_string(), patch)
            .await
            .unwrap();

        let expected = Tour {
            title: "Sunset Walk".to_string(),
            updated_at: clock.now(),
            ..original
        };
        assert_eq!(updated, expected);
    }

    #[tokio::test]
    async fn recent_update_flag_expires_after_window() {
        let (service, _, clock) = service();
        let tour = service.create(sample_new_tour(1)).await.unwrap();
        let id = tour.id.to_string();

        clock.advance(Duration::minutes(5));
        assert!(!service.get(&id).await.unwrap().recently_updated);

        service.update(&id, UpdateTourRequest::default()).await.unwrap();
        clock.advance(Duration::seconds(30));
        let fresh = service.get(&id).await.unwrap();
        assert!(fresh.recently_updated);

        clock.advance(Duration::seconds(31));
        let stale = service.get(&id).await.unwrap();
        assert!(!stale.recently_updated);
        assert_eq!(stale.tour, fresh.tour);
    }

    #[tokio::test]
    async fn missing_and_malformed_ids_are_not_found() {
        let (service, _, _) = service();
        let absent = RecordId::generate().to_string();

        assert!(matches!(service.get(&absent).await, Err(TourError::NotFound(_))));
        assert!(matches!(
            service.update(&absent, UpdateTourRequest::default()).await,
            Err(TourError::NotFound(_))
        ));
        assert!(matches!(service.delete(&absent).await, Err(TourError::NotFound(_))));
        assert!(matches!(service.get("xyz").await, Err(TourError::NotFound(_))));
    }

    #[tokio::test]
    async fn absent_tour_wins_over_invalid_update_body() {
        let (service, _, _) = service();
        let absent = RecordId::generate().to_string();
        let bad_unit = UpdateTourRequest {
            duration_unit: Some("months".to_string()),
            ..UpdateTourRequest::default()
        };

        assert!(matches!(
            service.update(&absent, bad_unit.clone()).await,
            Err(TourError::NotFound(_))
        ));

        let tour = service.create(sample_new_tour(3)).await.unwrap();
        assert!(matches!(
            service.update(&tour.id.to_string(), bad_unit).await,
            Err(TourError::InvalidField { field: "duration_unit", .. })
        ));
        assert_eq!(service.get(&tour.id.to_string()).await.unwrap().tour, tour);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let (service, store, _) = service();
        let tour = service.create(sample_new_tour(2)).await.unwrap();
        let id = tour.id.to_string();

        let removed = service.delete(&id).await.unwrap();
        assert_eq!(removed, tour);
        assert!(store.is_empty());
        assert!(matches!(service.get(&id).await, Err(TourError::NotFound(_))));
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_store_error() {
        let (service, store, _) = service();
        store.set_offline(true);
        assert!(matches!(service.list().await, Err(TourError::Store(_))));
        assert!(matches!(
            service.create(sample_new_tour(1)).await,
            Err(TourError::Store(_))
        ));
    }
}
