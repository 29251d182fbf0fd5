//! Common error types used across the workspace.
//!
//! Each failure class has its own typed error; [`TripDeskError`] gathers them
//! with `#[from]` conversions so every layer can propagate with `?`. Adapters
//! define their own errors and convert into [`TripDeskError::Persistence`].

use std::fmt;

use crate::lifecycle::ServiceStatus;
use crate::wizard::StepRejection;

/// Top-level error for every tripdesk operation.
#[derive(Debug, thiserror::Error)]
pub enum TripDeskError {
    /// A field or a wizard step failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested status change is not in the lifecycle table.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransitionError),

    /// A write was attempted against a terminal record.
    #[error(transparent)]
    ReadOnlyState(#[from] ReadOnlyStateError),

    /// A referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The persistence boundary failed; the source is kept for diagnostics.
    #[error("persistence failed: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Validation failures, surfaced inline and recoverable by the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A wizard step gate rejected the draft.
    #[error(transparent)]
    StepRejected(#[from] StepRejection),

    /// Text that does not name a lifecycle status.
    #[error("unknown service status `{0}`")]
    UnknownStatus(String),

    /// Text that does not name a service type.
    #[error("unknown service type `{0}`")]
    UnknownServiceType(String),

    /// Text that does not parse as a service request id.
    #[error("invalid service request id `{0}`")]
    InvalidId(String),

    /// The operation needs a persisted record but the draft has no id.
    #[error("service request has not been persisted yet")]
    NotPersisted,
}

/// A status change outside the lifecycle table.
///
/// `from` is `None` when the request is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransitionError {
    pub from: Option<ServiceStatus>,
    pub to: ServiceStatus,
}

impl fmt::Display for InvalidTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Some(from) => write!(f, "cannot move service request from `{from}` to `{}`", self.to),
            None => write!(f, "cannot create a service request in `{}`", self.to),
        }
    }
}

impl std::error::Error for InvalidTransitionError {}

/// Write attempted against a record in a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("service request is `{status}` and can no longer be modified")]
pub struct ReadOnlyStateError {
    pub status: ServiceStatus,
}

/// Lookup of a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_describe_transition_between_states() {
        let err = InvalidTransitionError {
            from: Some(ServiceStatus::Completed),
            to: ServiceStatus::Requested,
        };
        assert_eq!(
            err.to_string(),
            "cannot move service request from `realizado` to `solicitado`"
        );
    }

    #[test]
    fn should_describe_creation_in_forbidden_state() {
        let err = InvalidTransitionError {
            from: None,
            to: ServiceStatus::InProgress,
        };
        assert_eq!(
            err.to_string(),
            "cannot create a service request in `en curso`"
        );
    }

    #[test]
    fn should_convert_typed_errors_into_top_level_error() {
        let err: TripDeskError = ReadOnlyStateError {
            status: ServiceStatus::Cancelled,
        }
        .into();
        assert!(matches!(err, TripDeskError::ReadOnlyState(_)));

        let err: TripDeskError = ValidationError::NotPersisted.into();
        assert!(matches!(
            err,
            TripDeskError::Validation(ValidationError::NotPersisted)
        ));
    }

    #[test]
    fn should_preserve_persistence_message() {
        let source = std::io::Error::other("disk full");
        let err = TripDeskError::Persistence(Box::new(source));
        assert_eq!(err.to_string(), "persistence failed: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn should_name_entity_in_not_found_message() {
        let err = NotFoundError {
            entity: "ServiceRequest",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "ServiceRequest `abc` not found");
    }
}
