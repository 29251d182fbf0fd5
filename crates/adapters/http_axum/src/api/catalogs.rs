//! JSON handlers for the reference catalogs.

use axum::Json;
use axum::extract::State;

use tripdesk_app::ports::{ReferenceCatalogs, ServiceRequestRepository};
use tripdesk_domain::catalog::{Company, Driver, Municipality, Vehicle};

use crate::state::AppState;

/// `GET /api/catalogs/companies`
pub async fn companies<R, C>(State(state): State<AppState<R, C>>) -> Json<Vec<Company>>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    Json(state.catalogs.companies().to_vec())
}

/// `GET /api/catalogs/drivers`
pub async fn drivers<R, C>(State(state): State<AppState<R, C>>) -> Json<Vec<Driver>>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    Json(state.catalogs.drivers().to_vec())
}

/// `GET /api/catalogs/vehicles`
pub async fn vehicles<R, C>(State(state): State<AppState<R, C>>) -> Json<Vec<Vehicle>>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    Json(state.catalogs.vehicles().to_vec())
}

/// `GET /api/catalogs/municipalities`
pub async fn municipalities<R, C>(State(state): State<AppState<R, C>>) -> Json<Vec<Municipality>>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    Json(state.catalogs.municipalities().to_vec())
}
