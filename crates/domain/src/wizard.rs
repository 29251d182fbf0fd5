//! Wizard — the four ordered steps a dispatcher walks through and the gates
//! that guard them.
//!
//! Each gate is a pure function of the draft. Moving forward from step *n*
//! evaluates gates `1..=n` in order and stops at the first rejection, so a
//! later gate never runs while an earlier one fails. Moving backward never
//! validates.
//!
//! | Step | Required |
//! |------|----------|
//! | 1 Basic info | `clienteId`, `fechaSolicitud`, `fechaRealizacion` (not before `fechaSolicitud`) |
//! | 2 Journey | `origenMunicipioId`, `destinoMunicipioId`, `origenEspecifico`, `destinoEspecifico`, `tipoServicio` (a known type) |
//! | 3 Planning | — |
//! | 4 Status | `estado` (a known status, and a creation status while the request is unsaved) |
//!
//! Blank and whitespace-only text counts as missing. Coordinates are never
//! required.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReadOnlyStateError, ValidationError};
use crate::lifecycle::{self, ServiceStatus};
use crate::service_request::ServiceRequest;

/// One step of the request wizard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum WizardStep {
    #[default]
    BasicInfo,
    Journey,
    Planning,
    Status,
}

impl WizardStep {
    /// Every step, in order.
    pub const ALL: [Self; 4] = [Self::BasicInfo, Self::Journey, Self::Planning, Self::Status];

    /// One-based position of the step.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::Journey => 2,
            Self::Planning => 3,
            Self::Status => 4,
        }
    }

    /// Step at one-based position `number`.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    /// Short human name of the step.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "basic info",
            Self::Journey => "journey",
            Self::Planning => "planning",
            Self::Status => "status",
        }
    }

    /// The following step, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or_else(|| format!("no wizard step {number}"))
    }
}

/// A field checked by a wizard gate, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "clienteId")]
    ClientId,
    #[serde(rename = "fechaSolicitud")]
    RequestedAt,
    #[serde(rename = "fechaRealizacion")]
    ScheduledFor,
    #[serde(rename = "origenMunicipioId")]
    OriginMunicipalityId,
    #[serde(rename = "destinoMunicipioId")]
    DestinationMunicipalityId,
    #[serde(rename = "origenEspecifico")]
    OriginAddress,
    #[serde(rename = "destinoEspecifico")]
    DestinationAddress,
    #[serde(rename = "tipoServicio")]
    ServiceType,
    #[serde(rename = "estado")]
    Status,
}

impl Field {
    /// Wire name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ClientId => "clienteId",
            Self::RequestedAt => "fechaSolicitud",
            Self::ScheduledFor => "fechaRealizacion",
            Self::OriginMunicipalityId => "origenMunicipioId",
            Self::DestinationMunicipalityId => "destinoMunicipioId",
            Self::OriginAddress => "origenEspecifico",
            Self::DestinationAddress => "destinoEspecifico",
            Self::ServiceType => "tipoServicio",
            Self::Status => "estado",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field failed its gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Absent, empty or whitespace only.
    Missing,
    /// Present but not acceptable.
    Invalid,
}

/// A single field that failed a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: Field,
    pub kind: IssueKind,
}

impl FieldIssue {
    #[must_use]
    pub fn missing(field: Field) -> Self {
        Self {
            field,
            kind: IssueKind::Missing,
        }
    }

    #[must_use]
    pub fn invalid(field: Field) -> Self {
        Self {
            field,
            kind: IssueKind::Invalid,
        }
    }
}

/// A gate rejection: the step that failed and every offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRejection {
    pub step: WizardStep,
    pub issues: Vec<FieldIssue>,
}

impl StepRejection {
    /// Whether `field` is among the issues.
    #[must_use]
    pub fn has_field(&self, field: Field) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// The offending fields, in gate order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.issues.iter().map(|issue| issue.field)
    }
}

impl fmt::Display for StepRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} rejected:", self.step)?;
        for (idx, issue) in self.issues.iter().enumerate() {
            let sep = if idx == 0 { " " } else { ", " };
            let kind = match issue.kind {
                IssueKind::Missing => "missing",
                IssueKind::Invalid => "invalid",
            };
            write!(f, "{sep}{} {kind}", issue.field)?;
        }
        Ok(())
    }
}

impl std::error::Error for StepRejection {}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn require_key<K>(
    issues: &mut Vec<FieldIssue>,
    field: Field,
    key: Option<&K>,
    blank: fn(&K) -> bool,
) {
    if key.is_none_or(blank) {
        issues.push(FieldIssue::missing(field));
    }
}

fn require_text(issues: &mut Vec<FieldIssue>, field: Field, text: &str) {
    if is_blank(text) {
        issues.push(FieldIssue::missing(field));
    }
}

/// Evaluate the gate of a single step.
///
/// Pure: the draft is only read, so repeated calls agree.
///
/// # Errors
///
/// Returns a [`StepRejection`] listing every offending field of `step`.
pub fn check_step(step: WizardStep, request: &ServiceRequest) -> Result<(), StepRejection> {
    let mut issues = Vec::new();

    match step {
        WizardStep::BasicInfo => {
            require_key(
                &mut issues,
                Field::ClientId,
                request.client_id.as_ref(),
                |id| id.is_blank(),
            );
            if request.requested_at.is_none() {
                issues.push(FieldIssue::missing(Field::RequestedAt));
            }
            match (request.requested_at, request.scheduled_for) {
                (_, None) => issues.push(FieldIssue::missing(Field::ScheduledFor)),
                (Some(requested), Some(scheduled)) if scheduled < requested => {
                    issues.push(FieldIssue::invalid(Field::ScheduledFor));
                }
                _ => {}
            }
        }
        WizardStep::Journey => {
            require_key(
                &mut issues,
                Field::OriginMunicipalityId,
                request.origin_municipality_id.as_ref(),
                |id| id.is_blank(),
            );
            require_key(
                &mut issues,
                Field::DestinationMunicipalityId,
                request.destination_municipality_id.as_ref(),
                |id| id.is_blank(),
            );
            require_text(&mut issues, Field::OriginAddress, &request.origin_address);
            require_text(
                &mut issues,
                Field::DestinationAddress,
                &request.destination_address,
            );
            if request.service_type.is_none() {
                issues.push(
                    request
                        .input_issue(Field::ServiceType)
                        .unwrap_or(FieldIssue::missing(Field::ServiceType)),
                );
            }
        }
        WizardStep::Planning => {}
        WizardStep::Status => {
            if let Some(issue) = request.input_issue(Field::Status) {
                issues.push(issue);
            } else if !request.is_persisted() && !lifecycle::can_create_in(request.status) {
                issues.push(FieldIssue::invalid(Field::Status));
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(StepRejection { step, issues })
    }
}

/// Evaluate the gates of every step up to and including `last`, in order.
///
/// # Errors
///
/// Returns the rejection of the first failing step.
pub fn validate_through(last: WizardStep, request: &ServiceRequest) -> Result<(), StepRejection> {
    WizardStep::ALL
        .into_iter()
        .take_while(|step| *step <= last)
        .try_for_each(|step| check_step(step, request))
}

/// Evaluate all four gates in order.
///
/// # Errors
///
/// Returns the rejection of the first failing step.
pub fn validate_all(request: &ServiceRequest) -> Result<(), ValidationError> {
    validate_through(WizardStep::Status, request).map_err(ValidationError::from)
}

/// What the wizard should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardView {
    /// The editable form of a step.
    Form(WizardStep),
    /// The read-only summary of a terminal record.
    Summary,
}

/// One open wizard: the draft being edited, the current step and, when an
/// existing record was opened, the status it was stored with.
///
/// The session owns its draft. Closing, resetting or submitting it replaces
/// everything with a fresh blank draft so nothing carries over to the next
/// request.
#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    step: WizardStep,
    draft: ServiceRequest,
    stored_status: Option<ServiceStatus>,
}

impl WizardSession {
    /// Open the wizard on a blank request.
    #[must_use]
    pub fn open_new() -> Self {
        Self::default()
    }

    /// Open the wizard on a stored request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotPersisted`] when `record` has no id.
    pub fn open_existing(record: ServiceRequest) -> Result<Self, ValidationError> {
        if !record.is_persisted() {
            return Err(ValidationError::NotPersisted);
        }
        Ok(Self {
            step: WizardStep::BasicInfo,
            stored_status: Some(record.status),
            draft: record,
        })
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn draft(&self) -> &ServiceRequest {
        &self.draft
    }

    /// Whether the session edits a stored record rather than creating one.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.stored_status.is_some()
    }

    /// Status the record had when it was opened, for existing records.
    #[must_use]
    pub fn stored_status(&self) -> Option<ServiceStatus> {
        self.stored_status
    }

    /// Whether the opened record is terminal and may not be written.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.stored_status
            .is_some_and(|status| !lifecycle::is_editable(status))
    }

    #[must_use]
    pub fn view(&self) -> WizardView {
        if self.is_read_only() {
            WizardView::Summary
        } else {
            WizardView::Form(self.step)
        }
    }

    /// Mutate the draft.
    ///
    /// The id stays owned by the session: whatever `apply` does to it is
    /// reverted.
    ///
    /// # Errors
    ///
    /// Returns [`ReadOnlyStateError`] without touching the draft when the
    /// opened record is terminal.
    pub fn edit(
        &mut self,
        apply: impl FnOnce(&mut ServiceRequest),
    ) -> Result<(), ReadOnlyStateError> {
        if let Some(status) = self.stored_status {
            lifecycle::assert_editable(status)?;
        }
        let id = self.draft.id;
        apply(&mut self.draft);
        self.draft.id = id;
        Ok(())
    }

    /// Advance one step after the gates up to the current step pass.
    ///
    /// On the last step the gates are evaluated and the step is kept.
    ///
    /// # Errors
    ///
    /// Returns the first [`StepRejection`]; the step does not change.
    pub fn next(&mut self) -> Result<WizardStep, StepRejection> {
        validate_through(self.step, &self.draft)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step. Never validates.
    pub fn previous(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Discard the draft and start over on a blank request.
    pub fn reset(&mut self) {
        *self = Self::open_new();
    }

    /// Close the wizard, discarding every uncommitted change.
    pub fn close(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{CompanyId, ServiceRequestId};
    use crate::place::Coordinates;
    use crate::service_request::ServiceType;
    use crate::time::parse_rfc3339;

    fn through_journey() -> ServiceRequest {
        ServiceRequest::builder()
            .client_id("900123456")
            .requested_at(parse_rfc3339("2024-05-10T08:00:00-05:00").unwrap())
            .scheduled_for(parse_rfc3339("2024-05-11T06:30:00-05:00").unwrap())
            .origin("05001", "Calle 10 # 43-20")
            .destination("05360", "Planta Itagüí")
            .service_type(ServiceType::Tooling)
            .draft()
    }

    #[test]
    fn should_report_blank_client_as_missing() {
        let mut request = through_journey();
        request.client_id = Some(CompanyId::new(""));

        let rejection = check_step(WizardStep::BasicInfo, &request).unwrap_err();
        assert_eq!(rejection.step, WizardStep::BasicInfo);
        assert_eq!(rejection.issues, vec![FieldIssue::missing(Field::ClientId)]);
    }

    #[test]
    fn should_report_every_missing_field_of_basic_info() {
        let rejection = check_step(WizardStep::BasicInfo, &ServiceRequest::blank()).unwrap_err();
        let fields: Vec<Field> = rejection.fields().collect();
        assert_eq!(
            fields,
            vec![Field::ClientId, Field::RequestedAt, Field::ScheduledFor]
        );
    }

    #[test]
    fn should_reject_schedule_before_request_date() {
        let mut request = through_journey();
        request.scheduled_for = Some(parse_rfc3339("2024-05-09T08:00:00-05:00").unwrap());

        let rejection = check_step(WizardStep::BasicInfo, &request).unwrap_err();
        assert_eq!(
            rejection.issues,
            vec![FieldIssue::invalid(Field::ScheduledFor)]
        );
    }

    #[test]
    fn should_compare_dates_across_offsets() {
        let mut request = through_journey();
        request.requested_at = Some(parse_rfc3339("2024-05-10T13:00:00+00:00").unwrap());
        request.scheduled_for = Some(parse_rfc3339("2024-05-10T08:00:00-05:00").unwrap());
        assert!(check_step(WizardStep::BasicInfo, &request).is_ok());
    }

    #[test]
    fn should_treat_whitespace_address_as_missing() {
        let mut request = through_journey();
        request.origin_address = "   ".to_string();

        let rejection = check_step(WizardStep::Journey, &request).unwrap_err();
        assert_eq!(
            rejection.issues,
            vec![FieldIssue::missing(Field::OriginAddress)]
        );
    }

    #[test]
    fn should_require_service_type_on_journey() {
        let mut request = through_journey();
        request.service_type = None;
        let rejection = check_step(WizardStep::Journey, &request).unwrap_err();
        assert!(rejection.has_field(Field::ServiceType));
    }

    #[test]
    fn should_report_unknown_service_type_at_journey_only() {
        let mut request = through_journey();
        request.enter_service_type("carga");

        assert!(validate_through(WizardStep::BasicInfo, &request).is_ok());
        let rejection = validate_through(WizardStep::Journey, &request).unwrap_err();
        assert_eq!(rejection.step, WizardStep::Journey);
        assert_eq!(
            rejection.issues,
            vec![FieldIssue::invalid(Field::ServiceType)]
        );
    }

    #[test]
    fn should_clear_service_type_issue_when_known_type_entered() {
        let mut request = through_journey();
        request.enter_service_type("carga");
        request.enter_service_type("vehiculo");

        assert_eq!(request.service_type, Some(ServiceType::Vehicle));
        assert!(check_step(WizardStep::Journey, &request).is_ok());
    }

    #[test]
    fn should_report_unknown_status_at_status_step() {
        let mut request = through_journey();
        request.enter_status("archivado");

        assert_eq!(request.status, ServiceStatus::Requested);
        assert!(validate_through(WizardStep::Planning, &request).is_ok());
        let rejection = validate_through(WizardStep::Status, &request).unwrap_err();
        assert_eq!(rejection.step, WizardStep::Status);
        assert_eq!(rejection.issues, vec![FieldIssue::invalid(Field::Status)]);
    }

    #[test]
    fn should_report_blank_status_as_missing() {
        let mut request = through_journey();
        request.enter_status("  ");

        let rejection = check_step(WizardStep::Status, &request).unwrap_err();
        assert_eq!(rejection.issues, vec![FieldIssue::missing(Field::Status)]);
    }

    #[test]
    fn should_accept_status_entered_with_wire_spelling() {
        let mut request = through_journey();
        request.enter_status("planificado");

        assert_eq!(request.status, ServiceStatus::Planned);
        assert!(check_step(WizardStep::Status, &request).is_ok());
    }

    #[test]
    fn should_not_require_coordinates() {
        let mut request = through_journey();
        request.origin_coords = None;
        request.destination_coords = None;
        assert!(validate_all(&request).is_ok());

        request.origin_coords = Some(Coordinates { lat: 6.2, lng: -75.5 });
        assert!(validate_all(&request).is_ok());
    }

    #[test]
    fn should_never_reject_planning() {
        assert!(check_step(WizardStep::Planning, &ServiceRequest::blank()).is_ok());
    }

    #[test]
    fn should_reject_unsaved_request_in_non_creation_status() {
        let mut request = through_journey();
        request.status = ServiceStatus::InProgress;

        let rejection = check_step(WizardStep::Status, &request).unwrap_err();
        assert_eq!(rejection.issues, vec![FieldIssue::invalid(Field::Status)]);

        request.id = Some(ServiceRequestId::new());
        assert!(check_step(WizardStep::Status, &request).is_ok());
    }

    #[test]
    fn should_return_same_result_when_gate_called_twice() {
        let mut request = through_journey();
        request.destination_address = "\t".to_string();
        let snapshot = request.clone();

        let first = check_step(WizardStep::Journey, &request);
        let second = check_step(WizardStep::Journey, &request);
        assert_eq!(first, second);
        assert_eq!(request, snapshot);
    }

    #[test]
    fn should_stop_at_first_failing_step() {
        let mut request = ServiceRequest::blank();
        request.status = ServiceStatus::Completed;

        let err = validate_all(&request).unwrap_err();
        let ValidationError::StepRejected(rejection) = err else {
            panic!("expected step rejection");
        };
        assert_eq!(rejection.step, WizardStep::BasicInfo);
    }

    #[test]
    fn should_describe_rejection_with_wire_names() {
        let rejection = StepRejection {
            step: WizardStep::Journey,
            issues: vec![
                FieldIssue::missing(Field::OriginAddress),
                FieldIssue::missing(Field::ServiceType),
            ],
        };
        assert_eq!(
            rejection.to_string(),
            "step 2 (journey) rejected: origenEspecifico missing, tipoServicio missing"
        );
    }

    #[test]
    fn should_serialize_step_as_number() {
        assert_eq!(serde_json::to_string(&WizardStep::Planning).unwrap(), "3");
        let step: WizardStep = serde_json::from_str("2").unwrap();
        assert_eq!(step, WizardStep::Journey);
        assert!(serde_json::from_str::<WizardStep>("5").is_err());
    }

    #[test]
    fn should_navigate_steps_in_order() {
        assert_eq!(WizardStep::BasicInfo.previous(), None);
        assert_eq!(WizardStep::BasicInfo.next(), Some(WizardStep::Journey));
        assert_eq!(WizardStep::Status.next(), None);
        assert_eq!(WizardStep::Status.previous(), Some(WizardStep::Planning));
    }

    #[test]
    fn should_block_advance_until_gate_passes() {
        let mut session = WizardSession::open_new();
        let rejection = session.next().unwrap_err();
        assert_eq!(rejection.step, WizardStep::BasicInfo);
        assert_eq!(session.step(), WizardStep::BasicInfo);

        session
            .edit(|draft| *draft = through_journey())
            .unwrap();
        assert_eq!(session.next().unwrap(), WizardStep::Journey);
        assert_eq!(session.next().unwrap(), WizardStep::Planning);
        assert_eq!(session.next().unwrap(), WizardStep::Status);
        assert_eq!(session.next().unwrap(), WizardStep::Status);
    }

    #[test]
    fn should_revalidate_earlier_steps_when_advancing() {
        let mut session = WizardSession::open_new();
        session.edit(|draft| *draft = through_journey()).unwrap();
        session.next().unwrap();
        session.next().unwrap();

        session.edit(|draft| draft.client_id = None).unwrap();
        let rejection = session.next().unwrap_err();
        assert_eq!(rejection.step, WizardStep::BasicInfo);
        assert_eq!(session.step(), WizardStep::Planning);
    }

    #[test]
    fn should_go_back_without_validation() {
        let mut session = WizardSession::open_new();
        session.edit(|draft| *draft = through_journey()).unwrap();
        session.next().unwrap();
        session.edit(|draft| draft.client_id = None).unwrap();

        assert_eq!(session.previous(), WizardStep::BasicInfo);
        assert_eq!(session.previous(), WizardStep::BasicInfo);
    }

    #[test]
    fn should_refuse_to_open_unsaved_record_for_edit() {
        let result = WizardSession::open_existing(through_journey());
        assert_eq!(result.unwrap_err(), ValidationError::NotPersisted);
    }

    #[test]
    fn should_render_summary_and_reject_edits_for_terminal_record() {
        let mut record = through_journey();
        record.id = Some(ServiceRequestId::new());
        record.status = ServiceStatus::Completed;
        let mut session = WizardSession::open_existing(record.clone()).unwrap();

        assert!(session.is_read_only());
        assert_eq!(session.view(), WizardView::Summary);
        let err = session
            .edit(|draft| draft.notes = Some("tarde".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ReadOnlyStateError {
                status: ServiceStatus::Completed
            }
        );
        assert_eq!(session.draft(), &record);
    }

    #[test]
    fn should_keep_session_id_when_edit_overwrites_draft() {
        let mut record = through_journey();
        let id = ServiceRequestId::new();
        record.id = Some(id);
        let mut session = WizardSession::open_existing(record).unwrap();

        session
            .edit(|draft| {
                *draft = through_journey();
                draft.id = Some(ServiceRequestId::new());
            })
            .unwrap();
        assert_eq!(session.draft().id, Some(id));

        let mut fresh = WizardSession::open_new();
        fresh
            .edit(|draft| draft.id = Some(ServiceRequestId::new()))
            .unwrap();
        assert!(fresh.draft().id.is_none());
    }

    #[test]
    fn should_discard_everything_when_closed() {
        let mut record = through_journey();
        record.id = Some(ServiceRequestId::new());
        record.driver_id = Some("d-1".into());
        record.origin_coords = Some(Coordinates { lat: 6.2, lng: -75.5 });
        let mut session = WizardSession::open_existing(record).unwrap();
        session.next().unwrap();

        session.close();

        assert_eq!(session.step(), WizardStep::BasicInfo);
        assert!(!session.is_editing());
        assert_eq!(session.draft(), &ServiceRequest::blank());
    }
}
