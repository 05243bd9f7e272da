//! Driving port for mutating bug reports.

use async_trait::async_trait;

use crate::domain::{
    BugDetails, BugReport, BugReportId, BugReportPatch, Error, UploadedFile, UserId,
};

/// A report submission as received from a signed-in user.
#[derive(Debug, Clone)]
pub struct SubmitBugRequest {
    /// Submitting user.
    pub user_id: UserId,
    /// Validated text fields.
    pub details: BugDetails,
    /// Optional screenshot upload.
    pub screenshot: Option<UploadedFile>,
    /// Optional screen recording upload.
    pub screen_recording: Option<UploadedFile>,
}

/// An edit of an existing report.
#[derive(Debug, Clone)]
pub struct EditBugRequest {
    /// Report to change.
    pub id: BugReportId,
    /// Validated text changes.
    pub patch: BugReportPatch,
    /// Replacement screenshot upload.
    pub screenshot: Option<UploadedFile>,
    /// Replacement screen recording upload.
    pub screen_recording: Option<UploadedFile>,
}

impl EditBugRequest {
    /// Edit text fields only.
    pub fn text_only(id: BugReportId, patch: BugReportPatch) -> Self {
        Self {
            id,
            patch,
            screenshot: None,
            screen_recording: None,
        }
    }
}

/// Domain use-case port for creating and editing reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BugReportCommand: Send + Sync {
    /// Store uploads, insert the report and credit the submitter.
    async fn submit(&self, request: SubmitBugRequest) -> Result<BugReport, Error>;

    /// Store replacement uploads and overwrite the supplied fields of an
    /// existing report.
    async fn edit(&self, request: EditBugRequest) -> Result<BugReport, Error>;
}
