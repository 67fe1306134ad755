//! HTTP API route definitions.

use std::path::Path;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::docs::{ApiDoc, DOCS_PATH, OPENAPI_JSON_PATH};
use super::handlers::{
    create_tour, delete_tour, get_tour, health, list_tours, metrics, ready, update_tour, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        // Tour resource
        .route("/tour", get(list_tours).post(create_tour))
        .route(
            "/tour/:id",
            get(get_tour).put(update_tour).delete(delete_tour),
        )
        .with_state(state)
        // Documentation
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the static browser client for any path the API does not claim.
pub fn with_frontend(router: Router, dir: &Path) -> Router {
    router.fallback_service(ServeDir::new(dir))
}
