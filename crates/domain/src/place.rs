//! Places — geocoded addresses returned by the address resolver.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One autocomplete candidate for a partially typed address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSuggestion {
    pub place_id: String,
    pub main_text: String,
    pub secondary_text: String,
}

/// The address and position of a selected [`PlaceSuggestion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAddress {
    pub formatted_address: String,
    pub lat: f64,
    pub lng: f64,
}

impl ResolvedAddress {
    /// Position of the resolved address.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}
