//! JSON envelopes returned by the HTTP API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::tour::Tour;

/// Wrapper for list-shaped payloads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TourOptions {
    /// Matching tours.
    pub tour_options: Vec<Tour>,
}

/// Envelope for `GET /tour` and `GET /tour/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TourListResponse {
    /// Always true.
    pub success: bool,
    /// Present when a looked-up tour was updated within the last minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Tour with ID 665f1c2e9b1d8c0a12345678 was successfully updated.")]
    pub message: Option<String>,
    /// Payload.
    pub data: TourOptions,
}

impl TourListResponse {
    /// Envelope around `tours`.
    pub fn new(tours: Vec<Tour>, message: Option<String>) -> Self {
        Self {
            success: true,
            message,
            data: TourOptions {
                tour_options: tours,
            },
        }
    }
}

/// Envelope for create, update and delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TourResponse {
    /// Always true.
    pub success: bool,
    /// Outcome description.
    #[schema(example = "Tour Created Successfully")]
    pub message: String,
    /// Affected tour.
    pub data: Tour,
}

impl TourResponse {
    /// Envelope around a single affected tour.
    pub fn new(message: impl Into<String>, tour: Tour) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: tour,
        }
    }
}

/// Envelope for every failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// What went wrong.
    #[schema(example = "Tour not found")]
    pub message: String,
    /// Underlying detail, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: String,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the store answered a ping.
    pub ready: bool,
    /// Store backend name.
    pub store: String,
}
