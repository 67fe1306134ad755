//! Tour records and their persistence.
//!
//! This module handles:
//! - Tour types and request validation
//! - The tour service implementing list/get/create/update/delete
//! - The `TourStore` seam with MongoDB and in-memory backends

pub mod memory;
pub mod mongo;
pub mod request;
pub mod service;
pub mod store;
pub mod types;

pub use memory::MemoryTourStore;
pub use mongo::MongoTourStore;
pub use request::{CreateTourRequest, UpdateTourRequest};
pub use service::{TourLookup, TourService};
pub use store::{StoreResult, TourStore};
pub use types::{DurationUnit, NewTour, RecordId, Tour, TourPatch, RECENT_UPDATE_WINDOW};
