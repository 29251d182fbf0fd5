//! Shared application state for axum handlers.

use std::sync::Arc;

use tripdesk_app::ports::{ReferenceCatalogs, ServiceRequestRepository};
use tripdesk_app::services::catalog_service::CatalogService;
use tripdesk_app::services::submission_coordinator::SubmissionCoordinator;

/// Application state shared across all axum handlers.
///
/// Generic over the repository and catalog types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<R, C> {
    /// Validates and persists wizard drafts.
    pub submissions: Arc<SubmissionCoordinator<R>>,
    /// Reference catalog lookups and summaries.
    pub catalogs: Arc<CatalogService<C>>,
}

impl<R, C> Clone for AppState<R, C> {
    fn clone(&self) -> Self {
        Self {
            submissions: Arc::clone(&self.submissions),
            catalogs: Arc::clone(&self.catalogs),
        }
    }
}

impl<R, C> AppState<R, C>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(submissions: SubmissionCoordinator<R>, catalogs: CatalogService<C>) -> Self {
        Self {
            submissions: Arc::new(submissions),
            catalogs: Arc::new(catalogs),
        }
    }
}
