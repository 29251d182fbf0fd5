//! `SQLite` implementation of [`ServiceRequestRepository`].

use std::future::Future;
use std::str::FromStr;

use chrono::DateTime;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Row, Sqlite, SqlitePool};

use tripdesk_app::ports::ServiceRequestRepository;
use tripdesk_domain::error::{NotFoundError, TripDeskError};
use tripdesk_domain::id::{CompanyId, DriverId, MunicipalityId, ServiceRequestId, VehicleId};
use tripdesk_domain::lifecycle::ServiceStatus;
use tripdesk_domain::place::Coordinates;
use tripdesk_domain::service_request::{ServiceRequest, ServiceType};
use tripdesk_domain::time::ZonedTimestamp;

use crate::error::StorageError;

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

fn parse_timestamp(value: Option<String>) -> Result<Option<ZonedTimestamp>, sqlx::Error> {
    value
        .map(|s| DateTime::parse_from_rfc3339(&s).map_err(decode_error))
        .transpose()
}

fn coordinates(lat: Option<f64>, lng: Option<f64>) -> Option<Coordinates> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    }
}

/// Wrapper for converting database rows into domain [`ServiceRequest`].
struct Wrapper(ServiceRequest);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ServiceRequest> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let client_id: Option<String> = row.try_get("client_id")?;
        let driver_id: Option<String> = row.try_get("driver_id")?;
        let vehicle_id: Option<String> = row.try_get("vehicle_id")?;
        let origin_municipality_id: Option<String> = row.try_get("origin_municipality_id")?;
        let destination_municipality_id: Option<String> =
            row.try_get("destination_municipality_id")?;
        let origin_lat: Option<f64> = row.try_get("origin_lat")?;
        let origin_lng: Option<f64> = row.try_get("origin_lng")?;
        let destination_lat: Option<f64> = row.try_get("destination_lat")?;
        let destination_lng: Option<f64> = row.try_get("destination_lng")?;
        let requested_at: Option<String> = row.try_get("requested_at")?;
        let scheduled_for: Option<String> = row.try_get("scheduled_for")?;
        let service_type: Option<String> = row.try_get("service_type")?;
        let status: String = row.try_get("status")?;

        let id = ServiceRequestId::from_str(&id).map_err(decode_error)?;
        let service_type = service_type
            .map(|s| ServiceType::from_str(&s))
            .transpose()
            .map_err(decode_error)?;
        let status = ServiceStatus::from_str(&status).map_err(decode_error)?;

        Ok(Self(ServiceRequest {
            id: Some(id),
            client_id: client_id.map(CompanyId::from),
            driver_id: driver_id.map(DriverId::from),
            vehicle_id: vehicle_id.map(VehicleId::from),
            origin_municipality_id: origin_municipality_id.map(MunicipalityId::from),
            destination_municipality_id: destination_municipality_id.map(MunicipalityId::from),
            origin_address: row.try_get("origin_address")?,
            destination_address: row.try_get("destination_address")?,
            origin_coords: coordinates(origin_lat, origin_lng),
            destination_coords: coordinates(destination_lat, destination_lng),
            requested_at: parse_timestamp(requested_at)?,
            scheduled_for: parse_timestamp(scheduled_for)?,
            service_type,
            status,
            notes: row.try_get("notes")?,
            input_issues: Vec::new(),
        }))
    }
}

const INSERT: &str = "INSERT INTO service_requests (\
    client_id, driver_id, vehicle_id, origin_municipality_id, destination_municipality_id, \
    origin_address, destination_address, origin_lat, origin_lng, destination_lat, destination_lng, \
    requested_at, scheduled_for, service_type, status, notes, id\
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const UPDATE: &str = "UPDATE service_requests SET \
    client_id = ?, driver_id = ?, vehicle_id = ?, origin_municipality_id = ?, \
    destination_municipality_id = ?, origin_address = ?, destination_address = ?, \
    origin_lat = ?, origin_lng = ?, destination_lat = ?, destination_lng = ?, \
    requested_at = ?, scheduled_for = ?, service_type = ?, status = ?, notes = ? \
    WHERE id = ?";
const UPDATE_STATUS: &str = "UPDATE service_requests SET status = ? WHERE id = ?";
const SELECT_BY_ID: &str = "SELECT * FROM service_requests WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM service_requests ORDER BY created_at, rowid";

/// Bind every column except `id`, in the order shared by [`INSERT`] and [`UPDATE`].
fn bind_fields<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    request: &'q ServiceRequest,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(request.client_id.as_ref().map(CompanyId::as_str))
        .bind(request.driver_id.as_ref().map(DriverId::as_str))
        .bind(request.vehicle_id.as_ref().map(VehicleId::as_str))
        .bind(
            request
                .origin_municipality_id
                .as_ref()
                .map(MunicipalityId::as_str),
        )
        .bind(
            request
                .destination_municipality_id
                .as_ref()
                .map(MunicipalityId::as_str),
        )
        .bind(request.origin_address.as_str())
        .bind(request.destination_address.as_str())
        .bind(request.origin_coords.map(|c| c.lat))
        .bind(request.origin_coords.map(|c| c.lng))
        .bind(request.destination_coords.map(|c| c.lat))
        .bind(request.destination_coords.map(|c| c.lng))
        .bind(request.requested_at.map(|ts| ts.to_rfc3339()))
        .bind(request.scheduled_for.map(|ts| ts.to_rfc3339()))
        .bind(request.service_type.map(ServiceType::as_str))
        .bind(request.status.as_str())
        .bind(request.notes.as_deref())
}

fn not_found(id: ServiceRequestId) -> TripDeskError {
    NotFoundError {
        entity: "ServiceRequest",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed service request repository.
pub struct SqliteServiceRequestRepository {
    pool: SqlitePool,
}

impl SqliteServiceRequestRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ServiceRequestRepository for SqliteServiceRequestRepository {
    fn create(
        &self,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<ServiceRequestId, TripDeskError>> + Send {
        let pool = self.pool.clone();
        async move {
            let id = ServiceRequestId::new();
            bind_fields(sqlx::query(INSERT), &request)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(id)
        }
    }

    fn update(
        &self,
        id: ServiceRequestId,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<(), TripDeskError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = bind_fields(sqlx::query(UPDATE), &request)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(not_found(id));
            }
            Ok(())
        }
    }

    fn update_state(
        &self,
        id: ServiceRequestId,
        status: ServiceStatus,
    ) -> impl Future<Output = Result<(), TripDeskError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE_STATUS)
                .bind(status.as_str())
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(not_found(id));
            }
            Ok(())
        }
    }

    fn get_by_id(
        &self,
        id: ServiceRequestId,
    ) -> impl Future<Output = Result<Option<ServiceRequest>, TripDeskError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ServiceRequest>, TripDeskError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use tripdesk_domain::time::parse_rfc3339;

    async fn setup() -> SqliteServiceRequestRepository {
        let db = Config::new("sqlite::memory:").build().await.unwrap();
        SqliteServiceRequestRepository::new(db.pool().clone())
    }

    fn test_request() -> ServiceRequest {
        ServiceRequest::builder()
            .client_id("900123456")
            .driver_id("d-7")
            .requested_at(parse_rfc3339("2024-05-10T08:00:00-05:00").unwrap())
            .scheduled_for(parse_rfc3339("2024-05-11T06:30:00-05:00").unwrap())
            .origin("05001", "Calle 10 # 43-20")
            .origin_coords(Coordinates {
                lat: 6.2088,
                lng: -75.5672,
            })
            .destination("05360", "Planta Itagüí, bodega 4")
            .service_type(ServiceType::Personnel)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_request_when_valid() {
        let repo = setup().await;
        let request = test_request();

        let id = repo.create(request.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, Some(id));
        assert_eq!(ServiceRequest { id: None, ..fetched }, request);
    }

    #[tokio::test]
    async fn should_preserve_utc_offset_through_roundtrip() {
        let repo = setup().await;
        let id = repo.create(test_request()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        let requested_at = fetched.requested_at.unwrap();
        assert_eq!(requested_at.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(requested_at.to_rfc3339(), "2024-05-10T08:00:00-05:00");
    }

    #[tokio::test]
    async fn should_distinguish_empty_key_from_absent_key() {
        let repo = setup().await;
        let mut request = test_request();
        request.vehicle_id = Some(VehicleId::new(""));
        request.driver_id = None;

        let id = repo.create(request).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.vehicle_id, Some(VehicleId::new("")));
        assert_eq!(fetched.driver_id, None);
        assert!(fetched.destination_coords.is_none());
    }

    #[tokio::test]
    async fn should_return_none_when_request_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(ServiceRequestId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_list_all_requests_in_creation_order() {
        let repo = setup().await;
        let first = repo.create(test_request()).await.unwrap();
        let second = repo.create(test_request()).await.unwrap();

        let all = repo.get_all().await.unwrap();
        let ids: Vec<_> = all.iter().filter_map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn should_update_request_when_exists() {
        let repo = setup().await;
        let id = repo.create(test_request()).await.unwrap();

        let mut changed = repo.get_by_id(id).await.unwrap().unwrap();
        changed.notes = Some("Portería norte".to_string());
        changed.status = ServiceStatus::Planned;
        changed.origin_coords = None;
        repo.update(id, changed.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched, changed);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_request() {
        let repo = setup().await;
        let result = repo.update(ServiceRequestId::new(), test_request()).await;
        assert!(matches!(result, Err(TripDeskError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_only_change_status_when_updating_state() {
        let repo = setup().await;
        let id = repo.create(test_request()).await.unwrap();
        let before = repo.get_by_id(id).await.unwrap().unwrap();

        repo.update_state(id, ServiceStatus::Cancelled).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ServiceStatus::Cancelled);
        assert_eq!(
            ServiceRequest {
                status: before.status,
                ..fetched
            },
            before
        );
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_state_of_missing_request() {
        let repo = setup().await;
        let result = repo
            .update_state(ServiceRequestId::new(), ServiceStatus::Cancelled)
            .await;
        assert!(matches!(result, Err(TripDeskError::NotFound(_))));
    }
}
