//! Reference records — the read-only tables a service request points into.
//!
//! Companies, drivers, vehicles and municipalities are maintained elsewhere
//! and only looked up here. Fields the upstream data may leave out are
//! `Option`s so "missing" stays distinct from "empty".

use serde::{Deserialize, Serialize};

use crate::id::{CompanyId, DriverId, MunicipalityId, VehicleId};

/// A client company contracting trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nit: Option<String>,
}

impl Company {
    /// Display label, e.g. `Transportes Andinos S.A.S. (NIT 900123456)`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.nit {
            Some(nit) => format!("{} (NIT {nit})", self.name),
            None => self.name.clone(),
        }
    }
}

/// A driver who can be assigned to a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Driver {
    /// Display label: the driver's name.
    #[must_use]
    pub fn label(&self) -> String {
        self.name.clone()
    }
}

/// A vehicle that can be assigned to a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub plate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Vehicle {
    /// Display label, e.g. `ABC123 — Toyota Hilux`.
    #[must_use]
    pub fn label(&self) -> String {
        let description: Vec<&str> = [self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if description.is_empty() {
            self.plate.clone()
        } else {
            format!("{} — {}", self.plate, description.join(" "))
        }
    }
}

/// A municipality used as the coarse origin or destination of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: MunicipalityId,
    pub name: String,
    pub department: String,
}

impl Municipality {
    /// Display label, e.g. `Medellín, Antioquia`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.department)
    }
}
