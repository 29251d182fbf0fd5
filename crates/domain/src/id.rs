//! Typed identifiers.
//!
//! Records owned by tripdesk use UUID-backed ids. Reference catalogs are
//! external tables keyed by opaque strings, so their keys wrap the raw text
//! unchanged (an empty key is representable and left to the validators).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

macro_rules! define_key {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw catalog key.
            #[must_use]
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the raw key.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the key is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self::new(key)
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`ServiceRequest`](crate::service_request::ServiceRequest).
    ServiceRequestId
);

define_key!(
    /// Key of a [`Company`](crate::catalog::Company) (the client of a trip).
    CompanyId
);

define_key!(
    /// Key of a [`Driver`](crate::catalog::Driver).
    DriverId
);

define_key!(
    /// Key of a [`Vehicle`](crate::catalog::Vehicle).
    VehicleId
);

define_key!(
    /// Key of a [`Municipality`](crate::catalog::Municipality).
    MunicipalityId
);
