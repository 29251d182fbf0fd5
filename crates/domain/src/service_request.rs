//! Service request — a trip being scheduled for a client company.
//!
//! The record starts blank when the wizard opens and is filled step by step.
//! Required fields are therefore `Option`s (or plain strings that may be
//! blank); the [`wizard`](crate::wizard) gates decide when the record is
//! complete enough to be persisted.
//!
//! Serialized field names follow the external contract (`clienteId`,
//! `origenEspecifico`, `estado`, …).

mod service_type;

pub use service_type::ServiceType;

use serde::{Deserialize, Serialize};

use crate::error::TripDeskError;
use crate::id::{CompanyId, DriverId, MunicipalityId, ServiceRequestId, VehicleId};
use crate::lifecycle::ServiceStatus;
use crate::place::{Coordinates, ResolvedAddress};
use crate::time::ZonedTimestamp;
use crate::wizard::{self, Field, FieldIssue};

/// A trip linking a client, an optional driver and vehicle, an
/// origin/destination pair and its schedule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceRequest {
    #[serde(default)]
    pub id: Option<ServiceRequestId>,
    #[serde(rename = "clienteId", default)]
    pub client_id: Option<CompanyId>,
    #[serde(rename = "conductorId", default)]
    pub driver_id: Option<DriverId>,
    #[serde(rename = "vehiculoId", default)]
    pub vehicle_id: Option<VehicleId>,
    #[serde(rename = "origenMunicipioId", default)]
    pub origin_municipality_id: Option<MunicipalityId>,
    #[serde(rename = "destinoMunicipioId", default)]
    pub destination_municipality_id: Option<MunicipalityId>,
    #[serde(rename = "origenEspecifico", default)]
    pub origin_address: String,
    #[serde(rename = "destinoEspecifico", default)]
    pub destination_address: String,
    #[serde(rename = "origenCoords", default)]
    pub origin_coords: Option<Coordinates>,
    #[serde(rename = "destinoCoords", default)]
    pub destination_coords: Option<Coordinates>,
    #[serde(rename = "fechaSolicitud", default)]
    pub requested_at: Option<ZonedTimestamp>,
    #[serde(rename = "fechaRealizacion", default)]
    pub scheduled_for: Option<ZonedTimestamp>,
    #[serde(rename = "tipoServicio", default)]
    pub service_type: Option<ServiceType>,
    #[serde(rename = "estado", default)]
    pub status: ServiceStatus,
    #[serde(rename = "observaciones", default)]
    pub notes: Option<String>,
    /// Closed-set fields whose last entered text was rejected.
    #[serde(skip)]
    pub input_issues: Vec<FieldIssue>,
}

impl ServiceRequest {
    /// The empty record a freshly opened wizard starts from.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Create a builder for constructing a complete [`ServiceRequest`].
    #[must_use]
    pub fn builder() -> ServiceRequestBuilder {
        ServiceRequestBuilder::default()
    }

    /// Whether the record has been stored at least once.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check that every wizard gate passes.
    ///
    /// # Errors
    ///
    /// Returns [`TripDeskError::Validation`] with the first rejecting step.
    pub fn validate(&self) -> Result<(), TripDeskError> {
        wizard::validate_all(self)?;
        Ok(())
    }

    /// Set `tipoServicio` from text entered by the user.
    ///
    /// Unknown text leaves the type unset and is reported as invalid by the
    /// journey gate. Blank text clears it.
    pub fn enter_service_type(&mut self, text: &str) {
        self.forget_input_issue(Field::ServiceType);
        self.service_type = None;
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match text.parse() {
            Ok(kind) => self.service_type = Some(kind),
            Err(_) => self
                .input_issues
                .push(FieldIssue::invalid(Field::ServiceType)),
        }
    }

    /// Set `estado` from text entered by the user.
    ///
    /// Blank or unknown text keeps the current status; the status gate
    /// reports it until the next entry.
    pub fn enter_status(&mut self, text: &str) {
        self.forget_input_issue(Field::Status);
        let text = text.trim();
        if text.is_empty() {
            self.input_issues.push(FieldIssue::missing(Field::Status));
            return;
        }
        match text.parse() {
            Ok(status) => self.status = status,
            Err(_) => self.input_issues.push(FieldIssue::invalid(Field::Status)),
        }
    }

    /// The rejection recorded by the last entry of `field`, if any.
    #[must_use]
    pub fn input_issue(&self, field: Field) -> Option<FieldIssue> {
        self.input_issues
            .iter()
            .copied()
            .find(|issue| issue.field == field)
    }

    fn forget_input_issue(&mut self, field: Field) {
        self.input_issues.retain(|issue| issue.field != field);
    }

    /// Apply an autocomplete selection as the origin.
    pub fn select_origin(&mut self, place: &ResolvedAddress) {
        self.origin_address.clone_from(&place.formatted_address);
        self.origin_coords = Some(place.coordinates());
    }

    /// Apply an autocomplete selection as the destination.
    pub fn select_destination(&mut self, place: &ResolvedAddress) {
        self.destination_address.clone_from(&place.formatted_address);
        self.destination_coords = Some(place.coordinates());
    }

    /// Replace the origin with free text.
    ///
    /// Coordinates from a previous selection no longer describe the text and
    /// are dropped.
    pub fn type_origin(&mut self, text: impl Into<String>) {
        self.origin_address = text.into();
        self.origin_coords = None;
    }

    /// Replace the destination with free text, dropping stale coordinates.
    pub fn type_destination(&mut self, text: impl Into<String>) {
        self.destination_address = text.into();
        self.destination_coords = None;
    }
}

/// Step-by-step builder for [`ServiceRequest`].
#[derive(Debug, Default)]
pub struct ServiceRequestBuilder {
    inner: ServiceRequest,
}

impl ServiceRequestBuilder {
    #[must_use]
    pub fn id(mut self, id: ServiceRequestId) -> Self {
        self.inner.id = Some(id);
        self
    }

    #[must_use]
    pub fn client_id(mut self, id: impl Into<CompanyId>) -> Self {
        self.inner.client_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn driver_id(mut self, id: impl Into<DriverId>) -> Self {
        self.inner.driver_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn vehicle_id(mut self, id: impl Into<VehicleId>) -> Self {
        self.inner.vehicle_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn origin(
        mut self,
        municipality: impl Into<MunicipalityId>,
        address: impl Into<String>,
    ) -> Self {
        self.inner.origin_municipality_id = Some(municipality.into());
        self.inner.origin_address = address.into();
        self
    }

    #[must_use]
    pub fn destination(
        mut self,
        municipality: impl Into<MunicipalityId>,
        address: impl Into<String>,
    ) -> Self {
        self.inner.destination_municipality_id = Some(municipality.into());
        self.inner.destination_address = address.into();
        self
    }

    #[must_use]
    pub fn origin_coords(mut self, coords: Coordinates) -> Self {
        self.inner.origin_coords = Some(coords);
        self
    }

    #[must_use]
    pub fn destination_coords(mut self, coords: Coordinates) -> Self {
        self.inner.destination_coords = Some(coords);
        self
    }

    #[must_use]
    pub fn requested_at(mut self, ts: ZonedTimestamp) -> Self {
        self.inner.requested_at = Some(ts);
        self
    }

    #[must_use]
    pub fn scheduled_for(mut self, ts: ZonedTimestamp) -> Self {
        self.inner.scheduled_for = Some(ts);
        self
    }

    #[must_use]
    pub fn service_type(mut self, kind: ServiceType) -> Self {
        self.inner.service_type = Some(kind);
        self
    }

    #[must_use]
    pub fn status(mut self, status: ServiceStatus) -> Self {
        self.inner.status = status;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.inner.notes = Some(notes.into());
        self
    }

    /// Consume the builder, validate, and return a [`ServiceRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`TripDeskError::Validation`] if any wizard gate rejects the
    /// record.
    pub fn build(self) -> Result<ServiceRequest, TripDeskError> {
        self.inner.validate()?;
        Ok(self.inner)
    }

    /// Return the record without running the wizard gates.
    ///
    /// Used for drafts that are still being filled in.
    #[must_use]
    pub fn draft(self) -> ServiceRequest {
        self.inner
    }
}
