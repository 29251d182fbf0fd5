//! Reference catalog lookups and the labelled summary of a request.
//!
//! Catalogs are read-only in-memory tables; lookups match keys exactly.

use tripdesk_domain::catalog::{Company, Driver, Municipality, Vehicle};
use tripdesk_domain::service_request::ServiceRequest;

use crate::ports::ReferenceCatalogs;

/// Human-readable rendering of a request, used by the read-only summary.
///
/// Every foreign key is replaced by its catalog label. A key that is missing
/// from its catalog is shown raw so the summary never hides stored data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequestSummary {
    pub client: Option<String>,
    pub driver: Option<String>,
    pub vehicle: Option<String>,
    pub origin: String,
    pub destination: String,
    pub requested_at: Option<String>,
    pub scheduled_for: Option<String>,
    pub service_type: Option<String>,
    pub status: String,
    pub notes: Option<String>,
}

/// Lookups over the reference catalogs.
pub struct CatalogService<C> {
    catalogs: C,
}

impl<C: ReferenceCatalogs> CatalogService<C> {
    /// Create a new service backed by the given catalogs.
    pub fn new(catalogs: C) -> Self {
        Self { catalogs }
    }

    /// Client companies, in catalog order.
    pub fn companies(&self) -> &[Company] {
        self.catalogs.companies()
    }

    /// Drivers, in catalog order.
    pub fn drivers(&self) -> &[Driver] {
        self.catalogs.drivers()
    }

    /// Vehicles, in catalog order.
    pub fn vehicles(&self) -> &[Vehicle] {
        self.catalogs.vehicles()
    }

    /// Municipalities, in catalog order.
    pub fn municipalities(&self) -> &[Municipality] {
        self.catalogs.municipalities()
    }

    /// Company with key `id`, if any.
    pub fn find_company(&self, id: &str) -> Option<&Company> {
        self.companies().iter().find(|c| c.id.as_str() == id)
    }

    /// Driver with key `id`, if any.
    pub fn find_driver(&self, id: &str) -> Option<&Driver> {
        self.drivers().iter().find(|d| d.id.as_str() == id)
    }

    /// Vehicle with key `id`, if any.
    pub fn find_vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles().iter().find(|v| v.id.as_str() == id)
    }

    /// Municipality with key `id`, if any.
    pub fn find_municipality(&self, id: &str) -> Option<&Municipality> {
        self.municipalities().iter().find(|m| m.id.as_str() == id)
    }

    /// Render `request` with catalog labels in place of keys.
    #[tracing::instrument(skip_all, fields(id = ?request.id))]
    pub fn summarize(&self, request: &ServiceRequest) -> ServiceRequestSummary {
        let client = request.client_id.as_ref().map(|id| {
            self.find_company(id.as_str())
                .map_or_else(|| id.to_string(), Company::label)
        });
        let driver = request.driver_id.as_ref().map(|id| {
            self.find_driver(id.as_str())
                .map_or_else(|| id.to_string(), Driver::label)
        });
        let vehicle = request.vehicle_id.as_ref().map(|id| {
            self.find_vehicle(id.as_str())
                .map_or_else(|| id.to_string(), Vehicle::label)
        });

        ServiceRequestSummary {
            client,
            driver,
            vehicle,
            origin: self.place_line(
                request.origin_municipality_id.as_ref().map(|id| id.as_str()),
                &request.origin_address,
            ),
            destination: self.place_line(
                request
                    .destination_municipality_id
                    .as_ref()
                    .map(|id| id.as_str()),
                &request.destination_address,
            ),
            requested_at: request.requested_at.map(|ts| ts.to_rfc3339()),
            scheduled_for: request.scheduled_for.map(|ts| ts.to_rfc3339()),
            service_type: request.service_type.map(|kind| kind.to_string()),
            status: request.status.to_string(),
            notes: request.notes.clone(),
        }
    }

    fn place_line(&self, municipality: Option<&str>, address: &str) -> String {
        let municipality = municipality.map(|id| {
            self.find_municipality(id)
                .map_or_else(|| id.to_string(), Municipality::label)
        });
        match (address.trim(), municipality) {
            ("", Some(m)) => m,
            ("", None) => String::new(),
            (address, Some(m)) => format!("{address}, {m}"),
            (address, None) => address.to_string(),
        }
    }
}
