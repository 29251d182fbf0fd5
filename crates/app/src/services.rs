//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod address_autocomplete;
pub mod catalog_service;
pub mod submission_coordinator;
