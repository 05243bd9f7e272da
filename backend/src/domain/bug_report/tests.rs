//! Validation and patch semantics for bug reports.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn report() -> BugReport {
    BugReport {
        id: BugReportId::new(3).expect("id"),
        title: "Crash on save".to_owned(),
        description: "Stack trace attached".to_owned(),
        status: "Open".to_owned(),
        severity: "High".to_owned(),
        created_at: Utc
            .with_ymd_and_hms(2024, 3, 9, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
        user_id: UserId::new(1).expect("user id"),
        screenshot: Some(AttachmentName::sanitize("crash.png").expect("name")),
        screen_recording: None,
    }
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn missing_status_defaults_to_open(#[case] status: Option<&str>) {
    let details =
        BugDetails::try_from_parts("Title", "Body", "Low", status).expect("valid details");
    assert_eq!(details.status(), DEFAULT_STATUS);
}

#[rstest]
fn details_trim_labels_and_title() {
    let details = BugDetails::try_from_parts("  Title ", "  Body  ", " Low ", Some(" Closed "))
        .expect("valid details");
    assert_eq!(details.title(), "Title");
    assert_eq!(details.description(), "  Body  ");
    assert_eq!(details.severity(), "Low");
    assert_eq!(details.status(), "Closed");
}

#[rstest]
#[case("", "Body", "Low", BugReportValidationError::EmptyTitle)]
#[case("Title", " ", "Low", BugReportValidationError::EmptyDescription)]
#[case("Title", "Body", "", BugReportValidationError::EmptySeverity)]
fn details_reject_blank_required_fields(
    #[case] title: &str,
    #[case] description: &str,
    #[case] severity: &str,
    #[case] expected: BugReportValidationError,
) {
    let err = BugDetails::try_from_parts(title, description, severity, None)
        .expect_err("blank field must fail");
    assert_eq!(err, expected);
}

#[rstest]
fn details_enforce_column_widths() {
    let long_title = "t".repeat(TITLE_MAX + 1);
    assert_eq!(
        BugDetails::try_from_parts(&long_title, "Body", "Low", None),
        Err(BugReportValidationError::TitleTooLong { max: TITLE_MAX })
    );
    let long_label = "l".repeat(LABEL_MAX + 1);
    assert_eq!(
        BugDetails::try_from_parts("Title", "Body", &long_label, None),
        Err(BugReportValidationError::SeverityTooLong { max: LABEL_MAX })
    );
    assert_eq!(
        BugDetails::try_from_parts("Title", "Body", "Low", Some(&long_label)),
        Err(BugReportValidationError::StatusTooLong { max: LABEL_MAX })
    );
}

#[rstest]
fn patch_applies_only_supplied_fields(mut report: BugReport) {
    let patch = BugReportPatch::try_from_parts(None, None, None, Some("Closed"))
        .expect("valid patch");
    patch.apply_to(&mut report);
    assert_eq!(report.status, "Closed");
    assert_eq!(report.title, "Crash on save");
    assert_eq!(report.severity, "High");
    assert_eq!(report.description, "Stack trace attached");
}

#[rstest]
fn patch_replaces_attachments_and_keeps_identity(mut report: BugReport) {
    let id = report.id;
    let user_id = report.user_id;
    let created_at = report.created_at;
    let name = AttachmentName::sanitize("retake.png").expect("name");
    let patch = BugReportPatch::default().with_attachment(AttachmentKind::Screenshot, name.clone());
    assert!(!patch.is_empty());

    patch.apply_to(&mut report);
    assert_eq!(report.screenshot, Some(name));
    assert_eq!(report.screen_recording, None);
    assert_eq!(report.id, id);
    assert_eq!(report.user_id, user_id);
    assert_eq!(report.created_at, created_at);
}

#[rstest]
fn empty_patch_is_detected() {
    let patch = BugReportPatch::try_from_parts(None, None, None, None).expect("valid patch");
    assert!(patch.is_empty());
}

#[rstest]
fn patch_rejects_blank_status() {
    assert_eq!(
        BugReportPatch::try_from_parts(None, None, None, Some(" ")),
        Err(BugReportValidationError::EmptyStatus)
    );
}

#[rstest]
#[case(BugReportValidationError::EmptyTitle, "title", "empty_title")]
#[case(
    BugReportValidationError::StatusTooLong { max: LABEL_MAX },
    "status",
    "status_too_long"
)]
fn errors_name_their_field(
    #[case] error: BugReportValidationError,
    #[case] field: &str,
    #[case] reason: &str,
) {
    assert_eq!(error.field(), field);
    assert_eq!(error.reason(), reason);
}

#[rstest]
fn report_serialises_in_camel_case(report: BugReport) {
    let value = serde_json::to_value(&report).expect("serialise report");
    assert_eq!(
        value,
        json!({
            "id": 3,
            "title": "Crash on save",
            "description": "Stack trace attached",
            "status": "Open",
            "severity": "High",
            "createdAt": "2024-03-09T12:00:00Z",
            "userId": 1,
            "screenshot": "crash.png",
            "screenRecording": null
        })
    );
}
