//! Service request lifecycle — the closed set of statuses and the moves
//! allowed between them.
//!
//! ```text
//! solicitado ──> planificado ──> en curso ──> realizado
//!     │              │              │
//!     │              │              └──────> cancelado
//!     │              └─────────────────────> cancelado
//!     ├──> en curso
//!     └──────────────────────────────────> cancelado
//! ```
//!
//! `realizado` and `cancelado` are terminal: nothing leaves them and a record
//! in either status is read-only. A request is created in `solicitado` or
//! `planificado`; `en curso` is only ever reached through a transition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidTransitionError, ReadOnlyStateError, ValidationError};

/// Lifecycle status (`estado`) of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[default]
    #[serde(rename = "solicitado")]
    Requested,
    #[serde(rename = "planificado")]
    Planned,
    #[serde(rename = "en curso")]
    InProgress,
    #[serde(rename = "realizado")]
    Completed,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl ServiceStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Requested,
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Statuses a request may be created in.
    pub const CREATION: [Self; 2] = [Self::Requested, Self::Planned];

    /// Wire spelling of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "solicitado",
            Self::Planned => "planificado",
            Self::InProgress => "en curso",
            Self::Completed => "realizado",
            Self::Cancelled => "cancelado",
        }
    }

    /// Statuses reachable in one move from `self`.
    #[must_use]
    pub fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Requested => &[Self::Planned, Self::InProgress, Self::Cancelled],
            Self::Planned => &[Self::InProgress, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    /// Whether nothing can follow this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// Whether a request in `current` may move to `target`.
///
/// Total over every pair; anything not listed in the table, including
/// `current == target`, is rejected.
#[must_use]
pub fn can_transition(current: ServiceStatus, target: ServiceStatus) -> bool {
    current.allowed_targets().contains(&target)
}

/// Whether fields of a request in `current` may still be written.
#[must_use]
pub fn is_editable(current: ServiceStatus) -> bool {
    !current.is_terminal()
}

/// Whether a new request may start its life in `status`.
#[must_use]
pub fn can_create_in(status: ServiceStatus) -> bool {
    ServiceStatus::CREATION.contains(&status)
}

/// Require that `current` may move to `target`.
///
/// # Errors
///
/// Returns [`InvalidTransitionError`] when [`can_transition`] is `false`.
pub fn assert_transition(
    current: ServiceStatus,
    target: ServiceStatus,
) -> Result<(), InvalidTransitionError> {
    if can_transition(current, target) {
        Ok(())
    } else {
        Err(InvalidTransitionError {
            from: Some(current),
            to: target,
        })
    }
}

/// Require that a new request may be created in `status`.
///
/// # Errors
///
/// Returns [`InvalidTransitionError`] with no `from` status when `status`
/// is not a creation status.
pub fn assert_creatable(status: ServiceStatus) -> Result<(), InvalidTransitionError> {
    if can_create_in(status) {
        Ok(())
    } else {
        Err(InvalidTransitionError {
            from: None,
            to: status,
        })
    }
}

/// Require that a request in `current` may be written.
///
/// # Errors
///
/// Returns [`ReadOnlyStateError`] for terminal statuses.
pub fn assert_editable(current: ServiceStatus) -> Result<(), ReadOnlyStateError> {
    if is_editable(current) {
        Ok(())
    } else {
        Err(ReadOnlyStateError { status: current })
    }
}
