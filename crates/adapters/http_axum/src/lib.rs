//! # tripdesk-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a JSON API over service requests (`/api/service-requests`, …)
//!   and the reference catalogs (`/api/catalogs/…`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map domain errors into HTTP status codes and JSON error bodies
//!
//! ## Wizard over HTTP
//! The HTTP layer is stateless: each write opens a fresh wizard session,
//! applies the posted draft and submits it, so the same gates, lifecycle
//! checks and id ownership rules apply as for an interactive session.
//! `POST /api/service-requests/validate/{step}` runs the gates up to a step
//! so clients can check a draft before moving on.
//!
//! ## Dependency rule
//! Depends on `tripdesk-app` (for port traits and services) and `tripdesk-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
