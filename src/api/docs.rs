//! OpenAPI documentation generated from the handler annotations.

use utoipa::OpenApi;

use crate::tour::{CreateTourRequest, DurationUnit, Tour, UpdateTourRequest};

use super::responses::{
    ErrorResponse, HealthResponse, ReadyResponse, TourListResponse, TourOptions, TourResponse,
};

/// Path of the Swagger UI.
pub const DOCS_PATH: &str = "/api-docs";

/// Path of the raw OpenAPI document.
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Travel Tour API",
        version = "1.0.0",
        description = "API documentation for Travel Tour app"
    ),
    paths(
        super::handlers::list_tours,
        super::handlers::get_tour,
        super::handlers::create_tour,
        super::handlers::update_tour,
        super::handlers::delete_tour,
        super::handlers::health,
        super::handlers::ready,
    ),
    components(schemas(
        Tour,
        DurationUnit,
        CreateTourRequest,
        UpdateTourRequest,
        TourOptions,
        TourListResponse,
        TourResponse,
        ErrorResponse,
        HealthResponse,
        ReadyResponse,
    )),
    tags(
        (name = "tours", description = "Create, read, update and delete tours"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
