//! Submission coordinator — the only path from a wizard draft to storage.
//!
//! Every write goes through the same sequence: gates, lifecycle check,
//! persistence, reset. A failure at any stage leaves the session exactly as
//! it was so the dispatcher can fix the draft and try again; nothing is
//! retried automatically.

use tripdesk_domain::error::{NotFoundError, TripDeskError, ValidationError};
use tripdesk_domain::id::ServiceRequestId;
use tripdesk_domain::lifecycle::{self, ServiceStatus};
use tripdesk_domain::service_request::ServiceRequest;
use tripdesk_domain::wizard::{self, WizardSession};

use crate::ports::ServiceRequestRepository;

/// Application service that validates, checks and persists wizard drafts.
pub struct SubmissionCoordinator<R> {
    repo: R,
}

impl<R: ServiceRequestRepository> SubmissionCoordinator<R> {
    /// Create a new coordinator backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persist the session's draft.
    ///
    /// 1. All four wizard gates run in order; the first rejection aborts.
    /// 2. Editing requires the stored status to be editable and, if the
    ///    status changed, the move to be in the lifecycle table. Creating
    ///    requires a creation status.
    /// 3. The draft is created when it has no id, updated otherwise.
    /// 4. The session is reset to a blank draft.
    ///
    /// # Errors
    ///
    /// Returns [`TripDeskError::Validation`] with the failing step,
    /// [`TripDeskError::ReadOnlyState`] or [`TripDeskError::InvalidTransition`]
    /// before anything is written, or the repository error untouched. The
    /// session is left unchanged on every error.
    #[tracing::instrument(
        skip(self, session),
        fields(editing = session.is_editing(), status = %session.draft().status)
    )]
    pub async fn submit(
        &self,
        session: &mut WizardSession,
    ) -> Result<ServiceRequestId, TripDeskError> {
        let draft = session.draft();
        wizard::validate_all(draft)?;

        match session.stored_status() {
            Some(current) => {
                lifecycle::assert_editable(current)?;
                if draft.status != current {
                    lifecycle::assert_transition(current, draft.status)?;
                }
            }
            None => lifecycle::assert_creatable(draft.status)?,
        }

        let id = match draft.id {
            Some(id) => {
                self.repo.update(id, draft.clone()).await?;
                id
            }
            None => self.repo.create(draft.clone()).await?,
        };

        tracing::info!(%id, "service request saved");
        session.reset();
        Ok(id)
    }

    /// Cancel the opened record, whatever step the wizard is on.
    ///
    /// Only the stored id and status matter: the draft's fields are not
    /// validated and are discarded along with the session.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotPersisted`] for a session that was not
    /// opened on a stored record, [`TripDeskError::ReadOnlyState`] when the
    /// record is already terminal, or the repository error untouched.
    #[tracing::instrument(skip(self, session), fields(id = ?session.draft().id))]
    pub async fn force_cancel(
        &self,
        session: &mut WizardSession,
    ) -> Result<ServiceRequestId, TripDeskError> {
        let (Some(id), Some(current)) = (session.draft().id, session.stored_status()) else {
            return Err(ValidationError::NotPersisted.into());
        };
        lifecycle::assert_editable(current)?;
        lifecycle::assert_transition(current, ServiceStatus::Cancelled)?;

        self.repo.update_state(id, ServiceStatus::Cancelled).await?;

        tracing::info!(%id, from = %current, "service request cancelled");
        session.reset();
        Ok(id)
    }

    /// Load a stored request into a new wizard session.
    ///
    /// # Errors
    ///
    /// Returns [`TripDeskError::NotFound`] when no request with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn open_for_edit(
        &self,
        id: ServiceRequestId,
    ) -> Result<WizardSession, TripDeskError> {
        let record = self.get(id).await?;
        Ok(WizardSession::open_existing(record)?)
    }

    /// Look up a request by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TripDeskError::NotFound`] when no request with `id` exists,
    /// or a storage error from the repository.
    pub async fn get(&self, id: ServiceRequestId) -> Result<ServiceRequest, TripDeskError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "ServiceRequest",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all requests.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<ServiceRequest>, TripDeskError> {
        self.repo.get_all().await
    }
}
