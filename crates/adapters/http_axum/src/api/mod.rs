//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod catalogs;
#[allow(clippy::missing_errors_doc)]
pub mod service_requests;

use axum::Router;
use axum::routing::{get, post};

use tripdesk_app::ports::{ReferenceCatalogs, ServiceRequestRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, C>() -> Router<AppState<R, C>>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    Router::new()
        // Catalogs
        .route("/catalogs/companies", get(catalogs::companies::<R, C>))
        .route("/catalogs/drivers", get(catalogs::drivers::<R, C>))
        .route("/catalogs/vehicles", get(catalogs::vehicles::<R, C>))
        .route(
            "/catalogs/municipalities",
            get(catalogs::municipalities::<R, C>),
        )
        // Service requests
        .route(
            "/service-requests",
            get(service_requests::list::<R, C>).post(service_requests::create::<R, C>),
        )
        .route(
            "/service-requests/validate/{step}",
            post(service_requests::validate::<R, C>),
        )
        .route(
            "/service-requests/{id}",
            get(service_requests::get::<R, C>).put(service_requests::update::<R, C>),
        )
        .route(
            "/service-requests/{id}/summary",
            get(service_requests::summary::<R, C>),
        )
        .route(
            "/service-requests/{id}/cancel",
            post(service_requests::cancel::<R, C>),
        )
}
