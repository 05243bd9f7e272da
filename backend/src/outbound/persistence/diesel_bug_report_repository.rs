//! PostgreSQL-backed `BugReportRepository` implementation.
//!
//! Submission runs in one transaction: the report insert and the points
//! award commit together. Search builds a boxed query so optional criteria
//! can be appended, then runs a count and a page fetch over the same filter.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{BugReportPersistenceError, BugReportRepository};
use crate::domain::{
    BugFilter, BugReport, BugReportId, BugReportPatch, MonthlyCount, NewBugReport,
    TrendDimension,
};

use super::diesel_error_mapping::{is_foreign_key_violation, map_diesel_error, map_pool_error};
use super::models::{BugReportChangeset, BugReportRow, MonthlyCountRow, NewBugReportRow};
use super::pool::DbPool;
use super::schema::{bug_report, user};

diesel::define_sql_function! {
    /// SQL `lower()` for case-insensitive label comparison.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

const SEVERITY_BY_MONTH: &str = "\
    SELECT CAST(EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC') AS INTEGER) AS month, \
           severity AS label, COUNT(*) AS total \
    FROM bug_report GROUP BY 1, 2 ORDER BY 1, 2";

const STATUS_BY_MONTH: &str = "\
    SELECT CAST(EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC') AS INTEGER) AS month, \
           status AS label, COUNT(*) AS total \
    FROM bug_report GROUP BY 1, 2 ORDER BY 1, 2";

/// Diesel-backed implementation of the [`BugReportRepository`] port.
#[derive(Clone)]
pub struct DieselBugReportRepository {
    pool: DbPool,
}

impl DieselBugReportRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the submission transaction.
enum SubmitError {
    Diesel(DieselError),
    UnknownUser,
}

impl From<DieselError> for SubmitError {
    fn from(error: DieselError) -> Self {
        if is_foreign_key_violation(&error) {
            Self::UnknownUser
        } else {
            Self::Diesel(error)
        }
    }
}

fn map_error(error: DieselError) -> BugReportPersistenceError {
    map_diesel_error(
        error,
        BugReportPersistenceError::query,
        BugReportPersistenceError::connection,
    )
}

fn into_report(row: BugReportRow) -> Result<BugReport, BugReportPersistenceError> {
    BugReport::try_from(row).map_err(BugReportPersistenceError::query)
}

fn filtered(filter: &BugFilter) -> bug_report::BoxedQuery<'static, Pg> {
    let mut query = bug_report::table.into_boxed();
    if let Some(pattern) = filter.keyword_pattern() {
        query = query.filter(bug_report::title.ilike(pattern));
    }
    if let Some(status) = filter.status() {
        query = query.filter(lower(bug_report::status).eq(status.to_lowercase()));
    }
    if let Some(severity) = filter.severity() {
        query = query.filter(lower(bug_report::severity).eq(severity.to_lowercase()));
    }
    query
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl BugReportRepository for DieselBugReportRepository {
    async fn create_with_award(
        &self,
        report: &NewBugReport,
        points: i32,
    ) -> Result<BugReport, BugReportPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BugReportPersistenceError::connection))?;

        let user_id = report.user_id.get();
        let row = NewBugReportRow {
            title: report.details.title(),
            description: report.details.description(),
            status: report.details.status(),
            severity: report.details.severity(),
            created_at: report.created_at,
            user_id,
            screenshot: report.screenshot.as_ref().map(AsRef::as_ref),
            screen_recording: report.screen_recording.as_ref().map(AsRef::as_ref),
        };

        let inserted = conn
            .transaction::<_, SubmitError, _>(|conn| {
                async move {
                    let inserted: BugReportRow = diesel::insert_into(bug_report::table)
                        .values(&row)
                        .returning(BugReportRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let awarded = diesel::update(user::table.find(user_id))
                        .set(user::points.eq(user::points + points))
                        .execute(conn)
                        .await?;
                    if awarded == 0 {
                        return Err(SubmitError::UnknownUser);
                    }
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match err {
                SubmitError::Diesel(error) => map_error(error),
                SubmitError::UnknownUser => BugReportPersistenceError::unknown_user(user_id),
            })?;

        into_report(inserted)
    }

    async fn find_by_id(
        &self,
        id: BugReportId,
    ) -> Result<Option<BugReport>, BugReportPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BugReportPersistenceError::connection))?;

        let row: Option<BugReportRow> = bug_report::table
            .find(id.get())
            .select(BugReportRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(into_report).transpose()
    }

    async fn update(
        &self,
        id: BugReportId,
        patch: &BugReportPatch,
    ) -> Result<Option<BugReport>, BugReportPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BugReportPersistenceError::connection))?;

        let changes = BugReportChangeset {
            title: patch.title(),
            description: patch.description(),
            status: patch.status(),
            severity: patch.severity(),
            screenshot: patch.screenshot().map(AsRef::as_ref),
            screen_recording: patch.screen_recording().map(AsRef::as_ref),
        };
        let row: Option<BugReportRow> = diesel::update(bug_report::table.find(id.get()))
            .set(&changes)
            .returning(BugReportRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(into_report).transpose()
    }

    async fn search(
        &self,
        filter: &BugFilter,
        request: PageRequest,
    ) -> Result<Page<BugReport>, BugReportPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BugReportPersistenceError::connection))?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;
        let total = u64::try_from(total).unwrap_or_default();

        let Some(offset) = request.offset().filter(|_| request.is_within(total)) else {
            return Ok(Page::empty(request, total));
        };

        let rows: Vec<BugReportRow> = filtered(filter)
            .select(BugReportRow::as_select())
            .order_by((bug_report::created_at.desc(), bug_report::id.asc()))
            .limit(to_i64(request.limit()))
            .offset(to_i64(offset))
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        let items = rows
            .into_iter()
            .map(into_report)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, request, total))
    }

    async fn monthly_counts(
        &self,
        dimension: TrendDimension,
    ) -> Result<Vec<MonthlyCount>, BugReportPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BugReportPersistenceError::connection))?;

        let sql = match dimension {
            TrendDimension::Severity => SEVERITY_BY_MONTH,
            TrendDimension::Status => STATUS_BY_MONTH,
        };
        let rows: Vec<MonthlyCountRow> = diesel::sql_query(sql)
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(rows.into_iter().map(MonthlyCount::from).collect())
    }
}
