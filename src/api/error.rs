//! Mapping from tour errors to HTTP error envelopes.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use crate::error::TourError;
use crate::metrics;

use super::responses::ErrorResponse;

/// Tour endpoint an error came from; decides the wording of 404 and 500 bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Label used for metrics.
    pub fn name(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Operation::List | Operation::Get => "Error fetching tours",
            Operation::Create => "Error creating tour",
            Operation::Update => "Error updating tour",
            Operation::Delete => "Error deleting tour",
        }
    }

    fn not_found_message(self, id: &str) -> String {
        match self {
            Operation::Get => format!(
                "Tour with ID {} has been deleted and cannot be found anymore.",
                id
            ),
            _ => "Tour not found".to_string(),
        }
    }
}

/// Error response: a status plus the `{success: false, message, error?}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: Option<String>,
}

impl ApiError {
    /// Build an error response directly.
    pub fn new(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error,
        }
    }

    /// Translate a tour failure raised while serving `operation`.
    pub fn from_tour(err: TourError, operation: Operation) -> Self {
        match err {
            TourError::MissingFields(missing) => Self::new(
                StatusCode::BAD_REQUEST,
                "All fields are required",
                Some(format!("missing: {}", missing.join(", "))),
            ),
            TourError::InvalidField { field, reason } => Self::new(
                StatusCode::BAD_REQUEST,
                format!("Invalid value for {}", field),
                Some(reason),
            ),
            err @ TourError::DuplicateTourId(_) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), None)
            }
            TourError::NotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                operation.not_found_message(&id),
                None,
            ),
            TourError::Store(source) => {
                error!(operation = operation.name(), error = %source, "Tour operation failed");
                metrics::inc_tour_failure(operation.name());
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    operation.failure_message(),
                    Some(source.to_string()),
                )
            }
        }
    }

    /// Body that could not be read as JSON of the expected shape.
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Invalid request body",
            Some(rejection.body_text()),
        )
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            success: false,
            message: self.message,
            error: self.error,
        });
        (self.status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn missing_fields_are_bad_request() {
        let err = ApiError::from_tour(
            TourError::MissingFields(vec!["title", "duration"]),
            Operation::Create,
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "All fields are required");
        assert_eq!(err.error.as_deref(), Some("missing: title, duration"));
    }

    #[test]
    fn duplicate_is_bad_request_with_tour_id() {
        let err = ApiError::from_tour(TourError::DuplicateTourId(8), Operation::Create);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Tour with tour_id 8 already exists");
    }

    #[test]
    fn not_found_wording_depends_on_operation() {
        let get = ApiError::from_tour(TourError::NotFound("abc".into()), Operation::Get);
        assert_eq!(get.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            get.message(),
            "Tour with ID abc has been deleted and cannot be found anymore."
        );

        for op in [Operation::Update, Operation::Delete] {
            let err = ApiError::from_tour(TourError::NotFound("abc".into()), op);
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert_eq!(err.message(), "Tour not found");
        }
    }

    #[test]
    fn store_failures_carry_underlying_message() {
        let err = ApiError::from_tour(
            TourError::Store(StoreError::Unavailable("connection refused".into())),
            Operation::Update,
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Error updating tour");
        assert_eq!(
            err.error.as_deref(),
            Some("store unavailable: connection refused")
        );
    }
}
