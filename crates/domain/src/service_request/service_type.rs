//! Service type — what a trip carries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Purpose of a trip (`tipoServicio`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    /// Transport of people.
    #[serde(rename = "personal")]
    Personnel,
    /// Transport of tools and equipment.
    #[serde(rename = "herramienta")]
    Tooling,
    /// Transport of a vehicle.
    #[serde(rename = "vehiculo")]
    Vehicle,
}

impl ServiceType {
    /// Every service type.
    pub const ALL: [Self; 3] = [Self::Personnel, Self::Tooling, Self::Vehicle];

    /// Wire spelling of the service type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personnel => "personal",
            Self::Tooling => "herramienta",
            Self::Vehicle => "vehiculo",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownServiceType(s.to_string()))
    }
}
