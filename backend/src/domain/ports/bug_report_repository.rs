//! Port abstraction for bug report persistence.
//!
//! Adapters own the transaction that pairs a new report with the submitter's
//! points award; either both land or neither does.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    BugFilter, BugReport, BugReportId, BugReportPatch, MonthlyCount, NewBugReport,
    TrendDimension,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by bug report repository adapters.
    pub enum BugReportPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "bug report repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "bug report repository query failed: {message}",
        /// The submitting user does not exist.
        UnknownUser { user_id: i32 } => "user {user_id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BugReportRepository: Send + Sync {
    /// Insert `report` and add `points` to its submitter atomically.
    async fn create_with_award(
        &self,
        report: &NewBugReport,
        points: i32,
    ) -> Result<BugReport, BugReportPersistenceError>;

    /// Fetch one report.
    async fn find_by_id(
        &self,
        id: BugReportId,
    ) -> Result<Option<BugReport>, BugReportPersistenceError>;

    /// Apply `patch`; `None` when the report does not exist.
    async fn update(
        &self,
        id: BugReportId,
        patch: &BugReportPatch,
    ) -> Result<Option<BugReport>, BugReportPersistenceError>;

    /// Matching reports, newest first with ties broken by ascending id.
    async fn search(
        &self,
        filter: &BugFilter,
        request: PageRequest,
    ) -> Result<Page<BugReport>, BugReportPersistenceError>;

    /// Report counts grouped by calendar month and `dimension` label,
    /// ordered by month.
    async fn monthly_counts(
        &self,
        dimension: TrendDimension,
    ) -> Result<Vec<MonthlyCount>, BugReportPersistenceError>;
}
