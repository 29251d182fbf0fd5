//! # tripdesk-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ServiceRequestRepository` — create, update, status update, lookups
//!   - `ReferenceCatalogs` — companies, drivers, vehicles, municipalities
//!   - `AddressResolver` — address suggestions and geocoded selection
//! - Define **driving/inbound ports** as use-case structs:
//!   - `SubmissionCoordinator` — validate, check lifecycle, persist, reset
//!   - `CatalogService` — lookups and labelled summaries
//!   - `AddressAutocomplete` — debounced, cancellable suggestion fetches
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `tripdesk-domain` only (plus `tokio` for timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
