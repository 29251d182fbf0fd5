//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use tripdesk_domain::error::{TripDeskError, ValidationError};
use tripdesk_domain::wizard::{FieldIssue, WizardStep};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<WizardStep>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<FieldIssue>,
}

impl ErrorBody {
    fn message(error: String) -> Self {
        Self {
            error,
            step: None,
            issues: Vec::new(),
        }
    }
}

/// Maps [`TripDeskError`] to an HTTP response with appropriate status code.
///
/// | error | status |
/// |---|---|
/// | validation | 422 |
/// | invalid transition, read-only record | 409 |
/// | not found | 404 |
/// | persistence | 500 |
#[derive(Debug)]
pub struct ApiError(TripDeskError);

impl From<TripDeskError> for ApiError {
    fn from(err: TripDeskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            TripDeskError::Validation(ValidationError::StepRejected(rejection)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: rejection.to_string(),
                    step: Some(rejection.step),
                    issues: rejection.issues,
                },
            ),
            TripDeskError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody::message(err.to_string()),
            ),
            err @ (TripDeskError::InvalidTransition(_) | TripDeskError::ReadOnlyState(_)) => {
                (StatusCode::CONFLICT, ErrorBody::message(err.to_string()))
            }
            TripDeskError::NotFound(err) => {
                (StatusCode::NOT_FOUND, ErrorBody::message(err.to_string()))
            }
            TripDeskError::Persistence(err) => {
                tracing::error!(error = %err, "persistence error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::message("internal server error".to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
