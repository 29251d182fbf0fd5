//! Storage port — persistence for service requests.

use std::future::Future;

use tripdesk_domain::error::TripDeskError;
use tripdesk_domain::id::ServiceRequestId;
use tripdesk_domain::lifecycle::ServiceStatus;
use tripdesk_domain::service_request::ServiceRequest;

/// Repository for persisting and querying [`ServiceRequest`]s.
///
/// Lifecycle rules are enforced before these methods are reached; the
/// repository stores what it is given.
pub trait ServiceRequestRepository {
    /// Store a new request and return the identifier assigned to it.
    ///
    /// Any `id` already on `request` is ignored.
    fn create(
        &self,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<ServiceRequestId, TripDeskError>> + Send;

    /// Replace the stored version of `id` with `request`.
    fn update(
        &self,
        id: ServiceRequestId,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<(), TripDeskError>> + Send;

    /// Change only the status of `id`.
    fn update_state(
        &self,
        id: ServiceRequestId,
        status: ServiceStatus,
    ) -> impl Future<Output = Result<(), TripDeskError>> + Send;

    /// Get a request by its unique identifier.
    fn get_by_id(
        &self,
        id: ServiceRequestId,
    ) -> impl Future<Output = Result<Option<ServiceRequest>, TripDeskError>> + Send;

    /// Get all requests.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ServiceRequest>, TripDeskError>> + Send;
}

impl<T: ServiceRequestRepository + Send + Sync> ServiceRequestRepository for std::sync::Arc<T> {
    fn create(
        &self,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<ServiceRequestId, TripDeskError>> + Send {
        (**self).create(request)
    }

    fn update(
        &self,
        id: ServiceRequestId,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<(), TripDeskError>> + Send {
        (**self).update(id, request)
    }

    fn update_state(
        &self,
        id: ServiceRequestId,
        status: ServiceStatus,
    ) -> impl Future<Output = Result<(), TripDeskError>> + Send {
        (**self).update_state(id, status)
    }

    fn get_by_id(
        &self,
        id: ServiceRequestId,
    ) -> impl Future<Output = Result<Option<ServiceRequest>, TripDeskError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ServiceRequest>, TripDeskError>> + Send {
        (**self).get_all()
    }
}
