//! HTTP API: tour endpoints, health probes, metrics and OpenAPI docs.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod responses;
pub mod routes;

pub use docs::ApiDoc;
pub use error::{ApiError, ApiResult};
pub use handlers::AppState;
pub use routes::{create_router, with_frontend};
