//! Storage-specific error type wrapping sqlx errors.

use tripdesk_domain::error::TripDeskError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for TripDeskError {
    fn from(err: StorageError) -> Self {
        Self::Persistence(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_into_persistence_error() {
        let err: TripDeskError = StorageError::from(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, TripDeskError::Persistence(_)));
        assert!(err.to_string().starts_with("persistence failed: database error"));
    }
}
