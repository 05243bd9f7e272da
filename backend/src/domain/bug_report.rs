//! Bug report data model.
//!
//! A report is filed by one user, carries free-form status and severity
//! labels, and optionally names up to two stored attachments. Creation time
//! is fixed when the report is accepted and never changes afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AttachmentKind, AttachmentName, UserId};

/// Maximum title length.
pub const TITLE_MAX: usize = 255;
/// Maximum status or severity label length.
pub const LABEL_MAX: usize = 50;
/// Status given to reports submitted without one.
pub const DEFAULT_STATUS: &str = "Open";
/// Points credited to a user for each accepted submission.
pub const SUBMISSION_POINTS: i32 = 10;

/// Validation errors raised for report fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BugReportValidationError {
    /// Identifiers are positive integers.
    #[error("bug report id must be positive")]
    InvalidId,
    /// Title was blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded the column width.
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    /// Description was blank.
    #[error("description must not be empty")]
    EmptyDescription,
    /// Severity was blank once trimmed.
    #[error("severity must not be empty")]
    EmptySeverity,
    /// Severity exceeded the column width.
    #[error("severity must be at most {max} characters")]
    SeverityTooLong { max: usize },
    /// Status was supplied but blank.
    #[error("status must not be empty")]
    EmptyStatus,
    /// Status exceeded the column width.
    #[error("status must be at most {max} characters")]
    StatusTooLong { max: usize },
}

impl BugReportValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyDescription => "description",
            Self::EmptySeverity | Self::SeverityTooLong { .. } => "severity",
            Self::EmptyStatus | Self::StatusTooLong { .. } => "status",
        }
    }

    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong { .. } => "title_too_long",
            Self::EmptyDescription => "empty_description",
            Self::EmptySeverity => "empty_severity",
            Self::SeverityTooLong { .. } => "severity_too_long",
            Self::EmptyStatus => "empty_status",
            Self::StatusTooLong { .. } => "status_too_long",
        }
    }
}

/// Database-assigned report identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct BugReportId(i32);

impl BugReportId {
    /// Validate and wrap a raw identifier.
    pub fn new(id: i32) -> Result<Self, BugReportValidationError> {
        if id <= 0 {
            return Err(BugReportValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for BugReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BugReportId> for i32 {
    fn from(value: BugReportId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for BugReportId {
    type Error = BugReportValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn title(raw: &str) -> Result<String, BugReportValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BugReportValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > TITLE_MAX {
        return Err(BugReportValidationError::TitleTooLong { max: TITLE_MAX });
    }
    Ok(trimmed.to_owned())
}

fn description(raw: &str) -> Result<String, BugReportValidationError> {
    if raw.trim().is_empty() {
        return Err(BugReportValidationError::EmptyDescription);
    }
    Ok(raw.to_owned())
}

fn severity(raw: &str) -> Result<String, BugReportValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BugReportValidationError::EmptySeverity);
    }
    if trimmed.chars().count() > LABEL_MAX {
        return Err(BugReportValidationError::SeverityTooLong { max: LABEL_MAX });
    }
    Ok(trimmed.to_owned())
}

fn status(raw: &str) -> Result<String, BugReportValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BugReportValidationError::EmptyStatus);
    }
    if trimmed.chars().count() > LABEL_MAX {
        return Err(BugReportValidationError::StatusTooLong { max: LABEL_MAX });
    }
    Ok(trimmed.to_owned())
}

/// A stored bug report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReport {
    /// Storage identifier.
    pub id: BugReportId,
    /// One-line summary.
    pub title: String,
    /// Free-form detail.
    pub description: String,
    /// Workflow label such as `Open` or `Closed`.
    pub status: String,
    /// Impact label such as `Low` or `Critical`.
    pub severity: String,
    /// When the report was accepted.
    pub created_at: DateTime<Utc>,
    /// Submitting user.
    pub user_id: UserId,
    /// Stored screenshot, when one was uploaded.
    pub screenshot: Option<AttachmentName>,
    /// Stored screen recording, when one was uploaded.
    pub screen_recording: Option<AttachmentName>,
}

/// Validated text fields of a new report.
///
/// # Examples
/// ```
/// use bugtracker::domain::{BugDetails, DEFAULT_STATUS};
///
/// let details = BugDetails::try_from_parts("Crash on save", "Stack trace...", "High", None)
///     .expect("valid details");
/// assert_eq!(details.status(), DEFAULT_STATUS);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugDetails {
    title: String,
    description: String,
    severity: String,
    status: String,
}

impl BugDetails {
    /// Validate raw submission fields. A missing or blank status falls back
    /// to [`DEFAULT_STATUS`].
    pub fn try_from_parts(
        raw_title: &str,
        raw_description: &str,
        raw_severity: &str,
        raw_status: Option<&str>,
    ) -> Result<Self, BugReportValidationError> {
        let status = match raw_status.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => status(value)?,
            None => DEFAULT_STATUS.to_owned(),
        };
        Ok(Self {
            title: title(raw_title)?,
            description: description(raw_description)?,
            severity: severity(raw_severity)?,
            status,
        })
    }

    /// One-line summary.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-form detail.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Impact label.
    pub fn severity(&self) -> &str {
        &self.severity
    }

    /// Workflow label.
    pub fn status(&self) -> &str {
        &self.status
    }
}

/// Everything needed to insert a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBugReport {
    /// Validated text fields.
    pub details: BugDetails,
    /// Submitting user.
    pub user_id: UserId,
    /// Acceptance timestamp.
    pub created_at: DateTime<Utc>,
    /// Stored screenshot name.
    pub screenshot: Option<AttachmentName>,
    /// Stored screen recording name.
    pub screen_recording: Option<AttachmentName>,
}

/// Partial update of a report. `None` leaves a field as is.
///
/// Text fields are validated on construction. Attachment names are set by
/// the service once a replacement upload has been stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugReportPatch {
    title: Option<String>,
    description: Option<String>,
    severity: Option<String>,
    status: Option<String>,
    screenshot: Option<AttachmentName>,
    screen_recording: Option<AttachmentName>,
}

impl BugReportPatch {
    /// Validate each supplied field with the same rules as a submission.
    pub fn try_from_parts(
        raw_title: Option<&str>,
        raw_description: Option<&str>,
        raw_severity: Option<&str>,
        raw_status: Option<&str>,
    ) -> Result<Self, BugReportValidationError> {
        Ok(Self {
            title: raw_title.map(title).transpose()?,
            description: raw_description.map(description).transpose()?,
            severity: raw_severity.map(severity).transpose()?,
            status: raw_status.map(status).transpose()?,
            screenshot: None,
            screen_recording: None,
        })
    }

    /// Replace the stored file for `kind`.
    #[must_use]
    pub fn with_attachment(mut self, kind: AttachmentKind, name: AttachmentName) -> Self {
        match kind {
            AttachmentKind::Screenshot => self.screenshot = Some(name),
            AttachmentKind::ScreenRecording => self.screen_recording = Some(name),
        }
        self
    }

    /// Replacement title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replacement description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Replacement severity.
    pub fn severity(&self) -> Option<&str> {
        self.severity.as_deref()
    }

    /// Replacement status.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Replacement screenshot.
    pub fn screenshot(&self) -> Option<&AttachmentName> {
        self.screenshot.as_ref()
    }

    /// Replacement screen recording.
    pub fn screen_recording(&self) -> Option<&AttachmentName> {
        self.screen_recording.as_ref()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.status.is_none()
            && self.screenshot.is_none()
            && self.screen_recording.is_none()
    }

    /// Overwrite the supplied fields of `report`.
    pub fn apply_to(&self, report: &mut BugReport) {
        if let Some(value) = &self.title {
            report.title.clone_from(value);
        }
        if let Some(value) = &self.description {
            report.description.clone_from(value);
        }
        if let Some(value) = &self.severity {
            report.severity.clone_from(value);
        }
        if let Some(value) = &self.status {
            report.status.clone_from(value);
        }
        if let Some(name) = &self.screenshot {
            report.screenshot = Some(name.clone());
        }
        if let Some(name) = &self.screen_recording {
            report.screen_recording = Some(name.clone());
        }
    }
}

#[cfg(test)]
mod tests;
