//! HTTP API handlers.

use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{instrument, warn};

use crate::tour::{CreateTourRequest, TourService, UpdateTourRequest};

use super::error::{ApiError, ApiResult, Operation};
use super::responses::{
    ErrorResponse, HealthResponse, ReadyResponse, TourListResponse, TourResponse,
};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Tour operations.
    pub tours: TourService,
    /// Prometheus renderer, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(tours: TourService) -> Self {
        Self {
            tours,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("tours", &self.tours)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// List every tour.
#[utoipa::path(
    get,
    path = "/tour",
    tag = "tours",
    responses(
        (status = 200, description = "Successfully retrieved tours", body = TourListResponse),
        (status = 500, description = "Error fetching tours", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_tours(State(state): State<AppState>) -> ApiResult<Json<TourListResponse>> {
    let tours = state
        .tours
        .list()
        .await
        .map_err(|e| ApiError::from_tour(e, Operation::List))?;
    Ok(Json(TourListResponse::new(tours, None)))
}

/// Fetch one tour by identity.
///
/// The message is set when the tour was updated during the last minute.
#[utoipa::path(
    get,
    path = "/tour/{id}",
    tag = "tours",
    params(("id" = String, Path, description = "Record identity (`_id`)")),
    responses(
        (status = 200, description = "Successfully retrieved the tour", body = TourListResponse),
        (status = 404, description = "Tour not found", body = ErrorResponse),
        (status = 500, description = "Error fetching tours", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_tour(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TourListResponse>> {
    let lookup = state
        .tours
        .get(&id)
        .await
        .map_err(|e| ApiError::from_tour(e, Operation::Get))?;

    let message = lookup
        .recently_updated
        .then(|| format!("Tour with ID {} was successfully updated.", id));
    Ok(Json(TourListResponse::new(vec![lookup.tour], message)))
}

/// Create a tour.
#[utoipa::path(
    post,
    path = "/tour",
    tag = "tours",
    request_body = CreateTourRequest,
    responses(
        (status = 201, description = "Tour created successfully", body = TourResponse),
        (status = 400, description = "Missing or invalid fields, or duplicate tour_id", body = ErrorResponse),
        (status = 500, description = "Error creating tour", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn create_tour(
    State(state): State<AppState>,
    payload: Result<Json<CreateTourRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TourResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected create body");
        ApiError::from_rejection(rejection)
    })?;

    let tour = request
        .validate()
        .map_err(|e| ApiError::from_tour(e, Operation::Create))?;
    let tour = state
        .tours
        .create(tour)
        .await
        .map_err(|e| ApiError::from_tour(e, Operation::Create))?;

    Ok((
        StatusCode::CREATED,
        Json(TourResponse::new("Tour Created Successfully", tour)),
    ))
}

/// Update the provided fields of a tour.
#[utoipa::path(
    put,
    path = "/tour/{id}",
    tag = "tours",
    params(("id" = String, Path, description = "Record identity (`_id`)")),
    request_body = UpdateTourRequest,
    responses(
        (status = 200, description = "Tour updated successfully", body = TourResponse),
        (status = 404, description = "Tour not found", body = ErrorResponse),
        (status = 400, description = "Invalid field value on an existing tour", body = ErrorResponse),
        (status = 500, description = "Error updating tour", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn update_tour(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTourRequest>, JsonRejection>,
) -> ApiResult<Json<TourResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected update body");
        ApiError::from_rejection(rejection)
    })?;

    let tour = state
        .tours
        .update(&id, request)
        .await
        .map_err(|e| ApiError::from_tour(e, Operation::Update))?;

    let message = format!("{} updated successfully", tour.title);
    Ok(Json(TourResponse::new(message, tour)))
}

/// Delete a tour.
#[utoipa::path(
    delete,
    path = "/tour/{id}",
    tag = "tours",
    params(("id" = String, Path, description = "Record identity (`_id`)")),
    responses(
        (status = 200, description = "Tour deleted successfully", body = TourResponse),
        (status = 404, description = "Tour not found", body = ErrorResponse),
        (status = 500, description = "Error deleting tour", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_tour(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TourResponse>> {
    let tour = state
        .tours
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_tour(e, Operation::Delete))?;

    let message = format!(
        "{} deleted successfully. Tour cannot be found anymore.",
        tour.title
    );
    Ok(Json(TourResponse::new(message, tour)))
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness check handler - returns 200 if the store answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = ReadyResponse),
        (status = 503, description = "Store unreachable", body = ReadyResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.tours.store();
    let is_ready = match store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Readiness ping failed");
            false
        }
    };

    let response = ReadyResponse {
        ready: is_ready,
        store: store.backend().to_string(),
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
