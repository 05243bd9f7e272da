//! Tests for the bug report service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockAttachmentStore, MockBugReportRepository};
use crate::domain::{BugDetails, BugReportPatch, ErrorCode, UserId};

struct FixtureClock;

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_timestamp().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

fn make_service(
    reports: MockBugReportRepository,
    store: MockAttachmentStore,
) -> BugReportService<MockBugReportRepository, MockAttachmentStore> {
    BugReportService::new(Arc::new(reports), Arc::new(store), Arc::new(FixtureClock))
}

fn user_id() -> UserId {
    UserId::new(7).expect("user id")
}

fn bug_id() -> BugReportId {
    BugReportId::new(11).expect("bug id")
}

fn stored_report(new: &NewBugReport) -> BugReport {
    BugReport {
        id: bug_id(),
        title: new.details.title().to_owned(),
        description: new.details.description().to_owned(),
        status: new.details.status().to_owned(),
        severity: new.details.severity().to_owned(),
        created_at: new.created_at,
        user_id: new.user_id,
        screenshot: new.screenshot.clone(),
        screen_recording: new.screen_recording.clone(),
    }
}

fn upload(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_owned(),
        bytes: b"png".to_vec(),
    }
}

fn is_stored_as(name: &AttachmentName, client_name: &str) -> bool {
    name.as_ref()
        .split_once('_')
        .is_some_and(|(prefix, rest)| prefix.len() == 32 && rest == client_name)
}

fn request(screenshot: Option<&str>) -> SubmitBugRequest {
    SubmitBugRequest {
        user_id: user_id(),
        details: BugDetails::try_from_parts("Crash on save", "Steps...", "High", None)
            .expect("details"),
        screenshot: screenshot.map(upload),
        screen_recording: None,
    }
}

#[tokio::test]
async fn submit_awards_points_and_stamps_creation_time() {
    let mut reports = MockBugReportRepository::new();
    reports
        .expect_create_with_award()
        .withf(|report, points| {
            *points == SUBMISSION_POINTS
                && report.created_at == fixture_timestamp()
                && report.details.status() == "Open"
                && report.screenshot.is_none()
        })
        .times(1)
        .returning(|report, _| Ok(stored_report(report)));
    let store = MockAttachmentStore::new();

    let report = make_service(reports, store)
        .submit(request(None))
        .await
        .expect("submit succeeds");
    assert_eq!(report.id, bug_id());
    assert_eq!(report.user_id, user_id());
}

#[tokio::test]
async fn submit_stores_sanitised_upload_names() {
    let mut store = MockAttachmentStore::new();
    store
        .expect_save()
        .withf(|name, bytes| is_stored_as(name, "etc_passwd") && bytes.as_slice() == b"png")
        .times(1)
        .returning(|_, _| Ok(()));
    let mut reports = MockBugReportRepository::new();
    reports
        .expect_create_with_award()
        .withf(|report, _| {
            report
                .screenshot
                .as_ref()
                .is_some_and(|name| is_stored_as(name, "etc_passwd"))
        })
        .returning(|report, _| Ok(stored_report(report)));

    let report = make_service(reports, store)
        .submit(request(Some("../../etc/passwd")))
        .await
        .expect("submit succeeds");
    assert!(
        report
            .screenshot
            .is_some_and(|name| is_stored_as(&name, "etc_passwd"))
    );
}

#[tokio::test]
async fn submit_rejects_unusable_file_names_before_writing() {
    let mut store = MockAttachmentStore::new();
    store.expect_save().never();
    let mut reports = MockBugReportRepository::new();
    reports.expect_create_with_award().never();

    let err = make_service(reports, store)
        .submit(request(Some("../..")))
        .await
        .expect_err("invalid name");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&serde_json::json!({ "field": "screenshot", "code": "invalid_file_name" }))
    );
}

#[rstest]
#[case(BugReportPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case(BugReportPersistenceError::query("boom"), ErrorCode::InternalError)]
#[case(BugReportPersistenceError::unknown_user(7), ErrorCode::Unauthorized)]
#[tokio::test]
async fn submit_removes_uploads_when_insert_fails(
    #[case] failure: BugReportPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut store = MockAttachmentStore::new();
    let saved = Arc::new(std::sync::Mutex::new(None::<AttachmentName>));
    let saved_by_store = Arc::clone(&saved);
    store.expect_save().times(1).returning(move |name, _| {
        if let Ok(mut slot) = saved_by_store.lock() {
            *slot = Some(name.clone());
        }
        Ok(())
    });
    let saved_for_remove = Arc::clone(&saved);
    store
        .expect_remove()
        .withf(move |name| {
            saved_for_remove
                .lock()
                .is_ok_and(|slot| slot.as_ref() == Some(name))
        })
        .times(1)
        .returning(|_| Ok(()));
    let mut reports = MockBugReportRepository::new();
    reports
        .expect_create_with_award()
        .return_once(move |_, _| Err(failure));

    let err = make_service(reports, store)
        .submit(request(Some("shot.png")))
        .await
        .expect_err("insert fails");
    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn edit_reports_missing_bug() {
    let mut reports = MockBugReportRepository::new();
    reports
        .expect_update()
        .with(eq(bug_id()), mockall::predicate::always())
        .return_once(|_, _| Ok(None));

    let patch = BugReportPatch::try_from_parts(Some("New"), None, None, None).expect("patch");
    let err = make_service(reports, MockAttachmentStore::new())
        .edit(EditBugRequest::text_only(bug_id(), patch))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn edit_with_empty_patch_reads_current_report() {
    let mut reports = MockBugReportRepository::new();
    reports.expect_update().never();
    reports.expect_find_by_id().return_once(|_| {
        let new = NewBugReport {
            details: BugDetails::try_from_parts("T", "D", "Low", None).expect("details"),
            user_id: user_id(),
            created_at: fixture_timestamp(),
            screenshot: None,
            screen_recording: None,
        };
        Ok(Some(stored_report(&new)))
    });

    let report = make_service(reports, MockAttachmentStore::new())
        .edit(EditBugRequest::text_only(bug_id(), BugReportPatch::default()))
        .await
        .expect("current report");
    assert_eq!(report.title, "T");
}

#[tokio::test]
async fn edit_stores_replacement_upload_under_fresh_name() {
    let mut store = MockAttachmentStore::new();
    store
        .expect_save()
        .withf(|name, _| is_stored_as(name, "retake.png"))
        .times(1)
        .returning(|_, _| Ok(()));
    store.expect_remove().never();
    let mut reports = MockBugReportRepository::new();
    reports
        .expect_update()
        .withf(|id, patch| {
            *id == bug_id()
                && patch.title().is_none()
                && patch
                    .screenshot()
                    .is_some_and(|name| is_stored_as(name, "retake.png"))
        })
        .times(1)
        .returning(|_, patch| {
            let new = NewBugReport {
                details: BugDetails::try_from_parts("T", "D", "Low", None).expect("details"),
                user_id: user_id(),
                created_at: fixture_timestamp(),
                screenshot: patch.screenshot().cloned(),
                screen_recording: None,
            };
            Ok(Some(stored_report(&new)))
        });

    let report = make_service(reports, store)
        .edit(EditBugRequest {
            screenshot: Some(upload("retake.png")),
            ..EditBugRequest::text_only(bug_id(), BugReportPatch::default())
        })
        .await
        .expect("edit succeeds");
    assert_eq!(report.created_at, fixture_timestamp());
    assert_eq!(report.user_id, user_id());
}

#[tokio::test]
async fn edit_of_missing_report_removes_its_upload() {
    let mut store = MockAttachmentStore::new();
    store.expect_save().times(1).returning(|_, _| Ok(()));
    store
        .expect_remove()
        .withf(|name| is_stored_as(name, "clip.mov"))
        .times(1)
        .returning(|_| Ok(()));
    let mut reports = MockBugReportRepository::new();
    reports.expect_update().return_once(|_, _| Ok(None));

    let err = make_service(reports, store)
        .edit(EditBugRequest {
            screen_recording: Some(upload("clip.mov")),
            ..EditBugRequest::text_only(bug_id(), BugReportPatch::default())
        })
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn attachments_of_report_without_files_are_empty() {
    let mut reports = MockBugReportRepository::new();
    reports.expect_find_by_id().return_once(|_| {
        let new = NewBugReport {
            details: BugDetails::try_from_parts("T", "D", "Low", None).expect("details"),
            user_id: user_id(),
            created_at: fixture_timestamp(),
            screenshot: None,
            screen_recording: None,
        };
        Ok(Some(stored_report(&new)))
    });

    let attachments = make_service(reports, MockAttachmentStore::new())
        .attachments(bug_id())
        .await
        .expect("attachments");
    assert_eq!(attachments.bug.id, bug_id());
    assert!(attachments.screenshot.is_none());
    assert!(attachments.screen_recording.is_none());
}

#[tokio::test]
async fn attachments_of_missing_report_are_not_found() {
    let mut reports = MockBugReportRepository::new();
    reports.expect_find_by_id().return_once(|_| Ok(None));
    let err = make_service(reports, MockAttachmentStore::new())
        .attachments(bug_id())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn attachment_content_reports_missing_files() {
    let mut store = MockAttachmentStore::new();
    store.expect_load().return_once(|_| Ok(None));
    let name = AttachmentName::sanitize("gone.png").expect("name");
    let err = make_service(MockBugReportRepository::new(), store)
        .attachment_content(&name)
        .await
        .expect_err("missing file");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
