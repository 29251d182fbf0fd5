//! Address resolver port — place suggestions and geocoding.
//!
//! Backed by an external places provider. The application never calls it
//! directly from input handlers; [`AddressAutocomplete`] debounces and
//! supersedes queries first.
//!
//! [`AddressAutocomplete`]: crate::services::address_autocomplete::AddressAutocomplete

use std::future::Future;

use tripdesk_domain::error::TripDeskError;
use tripdesk_domain::place::{PlaceSuggestion, ResolvedAddress};

/// Suggests and resolves free-text addresses.
pub trait AddressResolver {
    /// Suggestions for partially typed `text`, best match first.
    fn search(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<PlaceSuggestion>, TripDeskError>> + Send;

    /// Formatted address and position of a suggestion.
    fn resolve(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<ResolvedAddress, TripDeskError>> + Send;
}
