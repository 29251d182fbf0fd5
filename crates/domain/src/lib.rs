//! # tripdesk-domain
//!
//! Pure domain model for the tripdesk dispatch front-end.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, zoned timestamps
//! - Define **reference records** (companies, drivers, vehicles, municipalities)
//! - Define the **service request** (a trip being scheduled) and its invariants
//! - Define the **lifecycle** (`solicitado` → `planificado` → `en curso` → `realizado`, plus
//!   `cancelado`) and the edit policy derived from it
//! - Define the **wizard** (four ordered step gates and the session that owns the draft)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod catalog;
pub mod lifecycle;
pub mod place;
pub mod service_request;
pub mod wizard;
