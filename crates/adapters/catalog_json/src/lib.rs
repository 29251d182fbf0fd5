//! # tripdesk-adapter-catalog-json
//!
//! Reference catalogs read from a directory of JSON files.
//!
//! ## Layout
//! The directory holds one array per table: `companies.json`, `drivers.json`,
//! `vehicles.json` and `municipalities.json`. Every file must exist; an empty
//! table is written as `[]`.
//!
//! ## Dependency rule
//! Depends on `tripdesk-app` (for the [`ReferenceCatalogs`] port) and
//! `tripdesk-domain` (for the record types).

mod error;

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;

use tripdesk_app::ports::ReferenceCatalogs;
use tripdesk_domain::catalog::{Company, Driver, Municipality, Vehicle};

pub use error::CatalogError;

/// Records that are looked up by a string key.
trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Company {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for Driver {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for Vehicle {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for Municipality {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// In-memory reference catalogs parsed from JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalogs {
    companies: Vec<Company>,
    drivers: Vec<Driver>,
    vehicles: Vec<Vehicle>,
    municipalities: Vec<Municipality>,
}

impl JsonCatalogs {
    /// Load every table from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if a file is missing or unreadable, is not a
    /// JSON array of records, or repeats a key.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let catalogs = Self {
            companies: load_table(dir, "companies")?,
            drivers: load_table(dir, "drivers")?,
            vehicles: load_table(dir, "vehicles")?,
            municipalities: load_table(dir, "municipalities")?,
        };
        tracing::info!(
            dir = %dir.display(),
            companies = catalogs.companies.len(),
            drivers = catalogs.drivers.len(),
            vehicles = catalogs.vehicles.len(),
            municipalities = catalogs.municipalities.len(),
            "reference catalogs loaded"
        );
        Ok(catalogs)
    }

    /// Build catalogs from already parsed tables.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateKey`] if any table repeats a key.
    pub fn from_tables(
        companies: Vec<Company>,
        drivers: Vec<Driver>,
        vehicles: Vec<Vehicle>,
        municipalities: Vec<Municipality>,
    ) -> Result<Self, CatalogError> {
        ensure_unique("companies", &companies)?;
        ensure_unique("drivers", &drivers)?;
        ensure_unique("vehicles", &vehicles)?;
        ensure_unique("municipalities", &municipalities)?;
        Ok(Self {
            companies,
            drivers,
            vehicles,
            municipalities,
        })
    }
}

impl ReferenceCatalogs for JsonCatalogs {
    fn companies(&self) -> &[Company] {
        &self.companies
    }

    fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    fn municipalities(&self) -> &[Municipality] {
        &self.municipalities
    }
}

fn load_table<T>(dir: &Path, table: &'static str) -> Result<Vec<T>, CatalogError>
where
    T: DeserializeOwned + Keyed,
{
    let path = dir.join(format!("{table}.json"));
    let content = std::fs::read_to_string(&path).map_err(|source| CatalogError::Read {
        path: path.clone(),
        source,
    })?;
    let records = parse_table(table, &content)?;
    tracing::debug!(table, path = %path.display(), count = records.len(), "catalog table read");
    Ok(records)
}

fn parse_table<T>(table: &'static str, content: &str) -> Result<Vec<T>, CatalogError>
where
    T: DeserializeOwned + Keyed,
{
    let records: Vec<T> =
        serde_json::from_str(content).map_err(|source| CatalogError::Parse { table, source })?;
    ensure_unique(table, &records)?;
    Ok(records)
}

fn ensure_unique<T: Keyed>(table: &'static str, records: &[T]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.key()) {
            return Err(CatalogError::DuplicateKey {
                table,
                key: record.key().to_string(),
            });
        }
    }
    Ok(())
}
