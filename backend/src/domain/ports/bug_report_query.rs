//! Driving port for reading bug reports and their attachments.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{AttachmentName, BugAttachments, BugFilter, BugReport, BugReportId, Error};

/// Domain use-case port for report reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BugReportQuery: Send + Sync {
    /// One page of reports matching `filter`.
    async fn search(&self, filter: &BugFilter, request: PageRequest)
    -> Result<Page<BugReport>, Error>;

    /// Fetch one report, failing with `NotFound` when absent.
    async fn get(&self, id: BugReportId) -> Result<BugReport, Error>;

    /// References to a report's stored files.
    async fn attachments(&self, id: BugReportId) -> Result<BugAttachments, Error>;

    /// Contents of a stored attachment.
    async fn attachment_content(&self, name: &AttachmentName) -> Result<Vec<u8>, Error>;
}
