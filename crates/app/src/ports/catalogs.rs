//! Reference catalog port — read-only tables loaded before the wizard opens.

use tripdesk_domain::catalog::{Company, Driver, Municipality, Vehicle};

/// Read-only access to the reference tables.
///
/// Tables are finite and already in memory, so access is synchronous.
pub trait ReferenceCatalogs {
    fn companies(&self) -> &[Company];

    fn drivers(&self) -> &[Driver];

    fn vehicles(&self) -> &[Vehicle];

    fn municipalities(&self) -> &[Municipality];
}
