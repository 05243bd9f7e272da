//! Bug report domain service.
//!
//! Implements the report command and query ports over a report repository
//! and an attachment store. Every upload is stored under a fresh
//! uuid-prefixed name, so no two reports share a file. Uploads are written
//! before the report row; if the write fails the files of that request are
//! removed again so storage does not collect orphans.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AttachmentStore, AttachmentStoreError, BugReportCommand, BugReportPersistenceError,
    BugReportQuery, BugReportRepository, EditBugRequest, SubmitBugRequest,
};
use crate::domain::{
    AttachmentKind, AttachmentName, BugAttachments, BugFilter, BugReport, BugReportId, Error,
    NewBugReport, SUBMISSION_POINTS, UploadedFile,
};

/// Report service implementing the command and query ports.
#[derive(Clone)]
pub struct BugReportService<R, S> {
    reports: Arc<R>,
    attachments: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<R, S> BugReportService<R, S> {
    /// Create a new service.
    pub fn new(reports: Arc<R>, attachments: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reports,
            attachments,
            clock,
        }
    }
}

fn map_report_error(error: BugReportPersistenceError) -> Error {
    match error {
        BugReportPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("bug report repository unavailable: {message}"))
        }
        BugReportPersistenceError::Query { message } => {
            Error::internal(format!("bug report repository error: {message}"))
        }
        BugReportPersistenceError::UnknownUser { .. } => Error::unauthorized("login required")
            .with_details(json!({ "login": "/login" })),
    }
}

fn map_store_error(error: AttachmentStoreError) -> Error {
    match error {
        AttachmentStoreError::Io { message } => {
            Error::internal(format!("attachment storage error: {message}"))
        }
    }
}

fn not_found(id: BugReportId) -> Error {
    Error::not_found(format!("bug report {id} not found"))
}

impl<R, S> BugReportService<R, S>
where
    R: BugReportRepository,
    S: AttachmentStore,
{
    async fn store_upload(
        &self,
        kind: AttachmentKind,
        upload: Option<UploadedFile>,
        stored: &mut Vec<AttachmentName>,
    ) -> Result<Option<AttachmentName>, Error> {
        let Some(upload) = upload else {
            return Ok(None);
        };
        let name = AttachmentName::sanitize(&upload.file_name)
            .map_err(|err| {
                Error::invalid_request(format!("{}: {err}", kind.field_name())).with_details(
                    json!({
                        "field": kind.field_name(),
                        "code": "invalid_file_name",
                    }),
                )
            })?
            .with_unique_prefix(Uuid::new_v4());
        self.attachments
            .save(&name, upload.bytes)
            .await
            .map_err(map_store_error)?;
        stored.push(name.clone());
        Ok(Some(name))
    }

    async fn discard(&self, names: &[AttachmentName]) {
        for name in names {
            if let Err(err) = self.attachments.remove(name).await {
                warn!(file = %name, error = %err, "failed to remove orphaned attachment");
            }
        }
    }

    async fn submit_inner(
        &self,
        request: SubmitBugRequest,
        stored: &mut Vec<AttachmentName>,
    ) -> Result<BugReport, Error> {
        let screenshot = self
            .store_upload(AttachmentKind::Screenshot, request.screenshot, stored)
            .await?;
        let screen_recording = self
            .store_upload(
                AttachmentKind::ScreenRecording,
                request.screen_recording,
                stored,
            )
            .await?;
        let report = NewBugReport {
            details: request.details,
            user_id: request.user_id,
            created_at: self.clock.utc(),
            screenshot,
            screen_recording,
        };
        self.reports
            .create_with_award(&report, SUBMISSION_POINTS)
            .await
            .map_err(map_report_error)
    }

    async fn edit_inner(
        &self,
        request: EditBugRequest,
        stored: &mut Vec<AttachmentName>,
    ) -> Result<BugReport, Error> {
        let EditBugRequest {
            id,
            mut patch,
            screenshot,
            screen_recording,
        } = request;
        for (kind, upload) in [
            (AttachmentKind::Screenshot, screenshot),
            (AttachmentKind::ScreenRecording, screen_recording),
        ] {
            if let Some(name) = self.store_upload(kind, upload, stored).await? {
                patch = patch.with_attachment(kind, name);
            }
        }
        if patch.is_empty() {
            return self.get(id).await;
        }
        self.reports
            .update(id, &patch)
            .await
            .map_err(map_report_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl<R, S> BugReportCommand for BugReportService<R, S>
where
    R: BugReportRepository,
    S: AttachmentStore,
{
    async fn submit(&self, request: SubmitBugRequest) -> Result<BugReport, Error> {
        let mut stored = Vec::new();
        match self.submit_inner(request, &mut stored).await {
            Ok(report) => {
                info!(bug_id = %report.id, user_id = %report.user_id, "bug report submitted");
                Ok(report)
            }
            Err(err) => {
                self.discard(&stored).await;
                Err(err)
            }
        }
    }

    async fn edit(&self, request: EditBugRequest) -> Result<BugReport, Error> {
        let mut stored = Vec::new();
        match self.edit_inner(request, &mut stored).await {
            Ok(report) => {
                info!(bug_id = %report.id, replaced_files = stored.len(), "bug report updated");
                Ok(report)
            }
            Err(err) => {
                self.discard(&stored).await;
                Err(err)
            }
        }
    }
}

#[async_trait]
impl<R, S> BugReportQuery for BugReportService<R, S>
where
    R: BugReportRepository,
    S: AttachmentStore,
{
    async fn search(
        &self,
        filter: &BugFilter,
        request: PageRequest,
    ) -> Result<Page<BugReport>, Error> {
        self.reports
            .search(filter, request)
            .await
            .map_err(map_report_error)
    }

    async fn get(&self, id: BugReportId) -> Result<BugReport, Error> {
        self.reports
            .find_by_id(id)
            .await
            .map_err(map_report_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn attachments(&self, id: BugReportId) -> Result<BugAttachments, Error> {
        let report = self.get(id).await?;
        Ok(BugAttachments::from(&report))
    }

    async fn attachment_content(&self, name: &AttachmentName) -> Result<Vec<u8>, Error> {
        self.attachments
            .load(name)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("attachment {name} not found")))
    }
}

#[cfg(test)]
#[path = "bug_report_service_tests.rs"]
mod tests;
