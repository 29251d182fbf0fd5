use std::path::PathBuf;

use tripdesk_domain::error::TripDeskError;

/// Errors raised while loading reference catalogs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog `{table}` is not a valid list of records: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog `{table}` contains key `{key}` more than once")]
    DuplicateKey { table: &'static str, key: String },
}

impl From<CatalogError> for TripDeskError {
    fn from(err: CatalogError) -> Self {
        Self::Persistence(Box::new(err))
    }
}
