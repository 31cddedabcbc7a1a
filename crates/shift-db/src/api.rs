//! Result-object facade over [`ShiftService`].
//!
//! Each method runs one operation and folds its `Result` into the response
//! struct callers serialize: failures become `success: false` with a
//! message, a reason code, and a correction handle where one exists.

use shift_core::enums::OverridableField;
use shift_core::responses::{ActionResponse, ClockResponse, CorrectionResponse, UndoResponse};
use shift_core::validation::ValidationWarning;

use crate::clocking::ClockOutcome;
use crate::error::ShiftError;
use crate::service::ShiftService;
use crate::workflow::CorrectionInput;

/// Reason code for a clock event held back for confirmation.
pub const CONFIRMATION_REQUIRED: &str = "confirmation_required";

fn log_failure(operation: &'static str, err: &ShiftError) {
    tracing::debug!(operation, reason = err.reason(), error = %err, "operation failed");
}

fn warning_messages(warnings: &[ValidationWarning]) -> Vec<String> {
    warnings.iter().map(ToString::to_string).collect()
}

#[derive(Clone, Copy)]
enum ClockEnd {
    In,
    Out,
}

fn clock_response(
    operation: &'static str,
    end: ClockEnd,
    result: Result<ClockOutcome, ShiftError>,
) -> ClockResponse {
    match result {
        Ok(ClockOutcome::Recorded { entry, warnings }) => ClockResponse {
            success: true,
            timestamp: match end {
                ClockEnd::In => entry.clock_in,
                ClockEnd::Out => entry.clock_out,
            },
            entry_id: Some(entry.id),
            warnings: warning_messages(&warnings),
            ..ClockResponse::default()
        },
        Ok(ClockOutcome::ConfirmationRequired { report, entry_id }) => ClockResponse {
            entry_id,
            warnings: report.warning_messages(),
            requires_confirmation: true,
            reason: Some(CONFIRMATION_REQUIRED.to_string()),
            ..ClockResponse::default()
        },
        Err(err) => {
            log_failure(operation, &err);
            let errors = match err {
                ShiftError::Validation(ref errors) => {
                    errors.iter().map(ToString::to_string).collect()
                }
                ref other => vec![other.to_string()],
            };
            ClockResponse {
                errors,
                reason: Some(err.reason().to_string()),
                correction_handle: err.correction_handle().map(String::from),
                ..ClockResponse::default()
            }
        }
    }
}

fn action_response<T>(operation: &'static str, result: Result<T, ShiftError>) -> ActionResponse {
    match result {
        Ok(_) => ActionResponse::ok(),
        Err(err) => {
            log_failure(operation, &err);
            ActionResponse {
                success: false,
                error: Some(err.to_string()),
                reason: Some(err.reason().to_string()),
            }
        }
    }
}

/// Response-returning view of a service.
#[derive(Clone, Copy)]
pub struct ShiftApi<'a> {
    service: &'a ShiftService,
}

impl<'a> ShiftApi<'a> {
    #[must_use]
    pub const fn new(service: &'a ShiftService) -> Self {
        Self { service }
    }

    pub async fn clock_in(
        &self,
        employee_id: &str,
        location: Option<&str>,
        override_warnings: bool,
    ) -> ClockResponse {
        let result = self
            .service
            .clock_in(employee_id, location, override_warnings)
            .await;
        clock_response("clock_in", ClockEnd::In, result)
    }

    pub async fn clock_out(&self, employee_id: &str, override_warnings: bool) -> ClockResponse {
        let result = self.service.clock_out(employee_id, override_warnings).await;
        clock_response("clock_out", ClockEnd::Out, result)
    }

    pub async fn quick_undo(&self, employee_id: &str, entry_id: &str) -> UndoResponse {
        match self.service.quick_undo(employee_id, entry_id).await {
            Ok(outcome) => UndoResponse {
                success: true,
                action: Some(outcome.action),
                ..UndoResponse::default()
            },
            Err(err) => {
                log_failure("quick_undo", &err);
                UndoResponse {
                    error: Some(err.to_string()),
                    reason: Some(err.reason().to_string()),
                    ..UndoResponse::default()
                }
            }
        }
    }

    pub async fn request_correction(
        &self,
        employee_id: &str,
        time_entry_id: &str,
        input: CorrectionInput,
    ) -> CorrectionResponse {
        match self
            .service
            .request_correction(employee_id, time_entry_id, input)
            .await
        {
            Ok(outcome) => CorrectionResponse {
                success: true,
                correction_id: Some(outcome.request.id),
                status: Some(outcome.disposition),
                ..CorrectionResponse::default()
            },
            Err(err) => {
                log_failure("request_correction", &err);
                CorrectionResponse {
                    error: Some(err.to_string()),
                    reason: Some(err.reason().to_string()),
                    correction_handle: err.correction_handle().map(String::from),
                    ..CorrectionResponse::default()
                }
            }
        }
    }

    pub async fn approve_correction(&self, correction_id: &str, approver_id: &str) -> ActionResponse {
        let result = self
            .service
            .approve_correction(correction_id, approver_id)
            .await;
        action_response("approve_correction", result)
    }

    pub async fn reject_correction(
        &self,
        correction_id: &str,
        approver_id: &str,
        reason: Option<&str>,
    ) -> ActionResponse {
        let result = self
            .service
            .reject_correction(correction_id, approver_id, reason)
            .await;
        action_response("reject_correction", result)
    }

    pub async fn admin_override(
        &self,
        admin_id: &str,
        time_entry_id: &str,
        field: OverridableField,
        raw_value: &str,
        reason: &str,
    ) -> ActionResponse {
        let result = self
            .service
            .admin_override(admin_id, time_entry_id, field, raw_value, reason)
            .await;
        action_response("admin_override", result)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use shift_core::enums::{CorrectionDisposition, CorrectionType, UndoAction};

    use super::*;
    use crate::test_support::helpers::{day_start, hire, test_service};

    #[tokio::test]
    async fn clock_in_success_carries_entry_and_time() {
        let (svc, _clock) = test_service().await;
        let emp = hire(&svc, "Ada", "ops").await;
        let api = ShiftApi::new(&svc);

        let response = api.clock_in(&emp, None, false).await;
        assert!(response.success);
        assert!(response.entry_id.is_some());
        assert_eq!(response.timestamp, Some(day_start()));
        assert!(response.warnings.is_empty());
        assert_eq!(response.reason, None);
    }

    #[tokio::test]
    async fn duplicate_clock_in_needs_confirmation() {
        let (svc, clock) = test_service().await;
        let emp = hire(&svc, "Ada", "ops").await;
        let api = ShiftApi::new(&svc);
        let first = api.clock_in(&emp, None, false).await;

        clock.advance(Duration::minutes(1));
        let response = api.clock_in(&emp, None, false).await;
        assert!(!response.success);
        assert!(response.requires_confirmation);
        assert_eq!(response.reason.as_deref(), Some(CONFIRMATION_REQUIRED));
        assert_eq!(response.entry_id, first.entry_id);
        assert_eq!(
            response.warnings,
            vec!["Already clocked in 1 minutes ago".to_string()]
        );
    }

    #[tokio::test]
    async fn conflict_exposes_correction_handle() {
        let (svc, clock) = test_service().await;
        let emp = hire(&svc, "Ada", "ops").await;
        let api = ShiftApi::new(&svc);
        let first = api.clock_in(&emp, None, false).await;

        clock.advance(Duration::hours(1));
        let response = api.clock_in(&emp, None, false).await;
        assert!(!response.success);
        assert!(!response.requires_confirmation);
        assert_eq!(response.reason.as_deref(), Some("already_clocked_in"));
        assert_eq!(response.correction_handle, first.entry_id);
        assert_eq!(response.errors.len(), 1);
    }

    #[tokio::test]
    async fn clock_out_without_shift_fails() {
        let (svc, _clock) = test_service().await;
        let emp = hire(&svc, "Ada", "ops").await;

        let response = ShiftApi::new(&svc).clock_out(&emp, false).await;
        assert!(!response.success);
        assert_eq!(response.reason.as_deref(), Some("no_active_entry"));
        assert_eq!(response.correction_handle, None);
        assert_eq!(response.errors, vec!["No active clock-in found".to_string()]);
    }

    #[tokio::test]
    async fn undo_reports_action_and_expiry() {
        let (svc, clock) = test_service().await;
        let emp = hire(&svc, "Ada", "ops").await;
        let api = ShiftApi::new(&svc);
        let entry_id = api.clock_in(&emp, None, false).await.entry_id.unwrap();

        clock.advance(Duration::minutes(1));
        let response = api.quick_undo(&emp, &entry_id).await;
        assert!(response.success);
        assert_eq!(response.action, Some(UndoAction::ClockInCancel));

        let second = api.clock_in(&emp, None, false).await.entry_id.unwrap();
        clock.advance(Duration::seconds(301));
        let response = api.quick_undo(&emp, &second).await;
        assert!(!response.success);
        assert_eq!(response.reason.as_deref(), Some("grace_period_expired"));
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn correction_and_review_responses() {
        let (svc, clock) = test_service().await;
        let emp = hire(&svc, "Ada", "ops").await;
        let api = ShiftApi::new(&svc);
        let entry_id = api.clock_in(&emp, None, false).await.entry_id.unwrap();

        clock.advance(Duration::hours(2));
        let response = api
            .request_correction(
                &emp,
                &entry_id,
                CorrectionInput::new(CorrectionType::Cancel, "test shift"),
            )
            .await;
        assert!(response.success);
        assert_eq!(response.status, Some(CorrectionDisposition::PendingApproval));
        let correction_id = response.correction_id.unwrap();

        let again = api
            .request_correction(
                &emp,
                &entry_id,
                CorrectionInput::new(CorrectionType::Cancel, "again"),
            )
            .await;
        assert_eq!(again.reason.as_deref(), Some("pending_correction_exists"));
        assert_eq!(again.correction_handle.as_deref(), Some(correction_id.as_str()));

        assert_eq!(
            api.reject_correction(&correction_id, "emp-boss", Some("no")).await,
            ActionResponse::ok()
        );
        let twice = api.approve_correction(&correction_id, "emp-boss").await;
        assert!(!twice.success);
        assert_eq!(twice.reason.as_deref(), Some("correction_not_found"));
        assert!(twice.error.unwrap().contains("not found or already processed"));
    }

    #[tokio::test]
    async fn override_without_privilege_is_denied() {
        let (svc, _clock) = test_service().await;
        let emp = hire(&svc, "Ada", "ops").await;
        let api = ShiftApi::new(&svc);
        let entry_id = api.clock_in(&emp, None, false).await.entry_id.unwrap();

        let response = api
            .admin_override(&emp, &entry_id, OverridableField::Notes, "hi", "test")
            .await;
        assert_eq!(
            response,
            ActionResponse {
                success: false,
                error: Some("Permission denied: Admin permissions required".into()),
                reason: Some("permission_denied".into()),
            }
        );
    }
}
