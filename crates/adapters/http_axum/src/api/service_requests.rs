//! JSON REST handlers for service requests.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use tripdesk_app::ports::{ReferenceCatalogs, ServiceRequestRepository};
use tripdesk_app::services::catalog_service::ServiceRequestSummary;
use tripdesk_domain::error::{NotFoundError, TripDeskError, ValidationError};
use tripdesk_domain::id::ServiceRequestId;
use tripdesk_domain::lifecycle::{self, ServiceStatus};
use tripdesk_domain::service_request::ServiceRequest;
use tripdesk_domain::wizard::{self, WizardSession, WizardStep};

use crate::error::ApiError;
use crate::state::AppState;

/// A stored request together with what the client may still do with it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestView {
    #[serde(flatten)]
    pub request: ServiceRequest,
    pub editable: bool,
    pub allowed_transitions: &'static [ServiceStatus],
}

impl From<ServiceRequest> for ServiceRequestView {
    fn from(request: ServiceRequest) -> Self {
        Self {
            editable: lifecycle::is_editable(request.status),
            allowed_transitions: request.status.allowed_targets(),
            request,
        }
    }
}

/// Wire form of [`ServiceRequestSummary`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBody {
    pub cliente: Option<String>,
    pub conductor: Option<String>,
    pub vehiculo: Option<String>,
    pub origen: String,
    pub destino: String,
    pub fecha_solicitud: Option<String>,
    pub fecha_realizacion: Option<String>,
    pub tipo_servicio: Option<String>,
    pub estado: String,
    pub observaciones: Option<String>,
}

impl From<ServiceRequestSummary> for SummaryBody {
    fn from(summary: ServiceRequestSummary) -> Self {
        Self {
            cliente: summary.client,
            conductor: summary.driver,
            vehiculo: summary.vehicle,
            origen: summary.origin,
            destino: summary.destination,
            fecha_solicitud: summary.requested_at,
            fecha_realizacion: summary.scheduled_for,
            tipo_servicio: summary.service_type,
            estado: summary.status,
            observaciones: summary.notes,
        }
    }
}

/// A draft as posted by the client.
///
/// `tipoServicio` and `estado` are read as text so an unknown value is
/// reported by the gate of its own step.
#[derive(Deserialize)]
pub struct DraftBody {
    #[serde(rename = "tipoServicio", default)]
    service_type: Option<String>,
    #[serde(rename = "estado", default)]
    status: Option<String>,
    #[serde(flatten)]
    request: ServiceRequest,
}

impl From<DraftBody> for ServiceRequest {
    fn from(body: DraftBody) -> Self {
        let mut draft = body.request;
        if let Some(text) = body.service_type {
            draft.enter_service_type(&text);
        }
        if let Some(text) = body.status {
            draft.enter_status(&text);
        }
        draft
    }
}

/// Outcome of a passing step check.
#[derive(Serialize)]
pub struct StepCheck {
    pub step: WizardStep,
    pub next: Option<WizardStep>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ServiceRequest>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get, update and cancel endpoints.
pub enum GetResponse {
    Ok(Json<ServiceRequestView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<ServiceRequestView>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

fn parse_id(id: &str) -> Result<ServiceRequestId, ApiError> {
    ServiceRequestId::from_str(id)
        .map_err(|_| TripDeskError::from(ValidationError::InvalidId(id.to_string())).into())
}

/// `GET /api/service-requests`
pub async fn list<R, C>(State(state): State<AppState<R, C>>) -> Result<ListResponse, ApiError>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    let requests = state.submissions.list().await?;
    Ok(ListResponse::Ok(Json(requests)))
}

/// `GET /api/service-requests/{id}`
pub async fn get<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    let request = state.submissions.get(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(request.into())))
}

/// `GET /api/service-requests/{id}/summary`
pub async fn summary<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
) -> Result<Json<SummaryBody>, ApiError>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    let request = state.submissions.get(parse_id(&id)?).await?;
    Ok(Json(state.catalogs.summarize(&request).into()))
}

/// `POST /api/service-requests/validate/{step}`
///
/// Runs every gate from the first step up to `step` on the posted draft.
pub async fn validate<R, C>(
    State(_state): State<AppState<R, C>>,
    Path(step): Path<u8>,
    Json(draft): Json<DraftBody>,
) -> Result<Json<StepCheck>, ApiError>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    let step = WizardStep::from_number(step).ok_or_else(|| {
        TripDeskError::from(NotFoundError {
            entity: "WizardStep",
            id: step.to_string(),
        })
    })?;
    wizard::validate_through(step, &draft.into())
        .map_err(|rejection| TripDeskError::from(ValidationError::from(rejection)))?;
    Ok(Json(StepCheck {
        step,
        next: step.next(),
    }))
}

/// `POST /api/service-requests`
///
/// Any `id` in the body is ignored; the stored id is returned.
pub async fn create<R, C>(
    State(state): State<AppState<R, C>>,
    Json(draft): Json<DraftBody>,
) -> Result<CreateResponse, ApiError>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    let mut session = WizardSession::open_new();
    session
        .edit(|current| *current = draft.into())
        .map_err(TripDeskError::from)?;

    let id = state.submissions.submit(&mut session).await?;
    let created = state.submissions.get(id).await?;
    Ok(CreateResponse::Created(Json(created.into())))
}

/// `PUT /api/service-requests/{id}`
///
/// The path id wins over any `id` in the body.
pub async fn update<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
    Json(draft): Json<DraftBody>,
) -> Result<GetResponse, ApiError>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    let mut session = state.submissions.open_for_edit(parse_id(&id)?).await?;
    session
        .edit(|current| *current = draft.into())
        .map_err(TripDeskError::from)?;

    let id = state.submissions.submit(&mut session).await?;
    let updated = state.submissions.get(id).await?;
    Ok(GetResponse::Ok(Json(updated.into())))
}

/// `POST /api/service-requests/{id}/cancel`
pub async fn cancel<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: ServiceRequestRepository + Send + Sync + 'static,
    C: ReferenceCatalogs + Send + Sync + 'static,
{
    let mut session = state.submissions.open_for_edit(parse_id(&id)?).await?;
    let id = state.submissions.force_cancel(&mut session).await?;
    let cancelled = state.submissions.get(id).await?;
    Ok(GetResponse::Ok(Json(cancelled.into())))
}
