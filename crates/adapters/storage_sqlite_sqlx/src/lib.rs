//! # tripdesk-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement [`ServiceRequestRepository`](tripdesk_app::ports::ServiceRequestRepository)
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `tripdesk-app` (for port traits) and `tripdesk-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod service_request_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use service_request_repo::SqliteServiceRequestRepository;
