//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types re-validate stored values, so a row that violates a domain
//! invariant surfaces as a query error rather than a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};

use super::schema::{badge, bug_report, user};
use crate::domain::{
    AttachmentName, Badge, BugReport, BugReportId, EmailAddress, MonthlyCount,
    StoredCredentials, User, UserId, Username,
};

/// Row read from the `user` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub points: i32,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        self.into_credentials().map(StoredCredentials::into_user)
    }

    pub(crate) fn into_credentials(self) -> Result<StoredCredentials, String> {
        let id = UserId::new(self.id).map_err(|err| format!("stored user id: {err}"))?;
        let username =
            Username::new(&self.username).map_err(|err| format!("stored user {id}: {err}"))?;
        let email =
            EmailAddress::new(&self.email).map_err(|err| format!("stored user {id}: {err}"))?;
        Ok(StoredCredentials::new(
            User::new(id, username, email, self.points),
            self.password,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Row read from the `badge` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = badge)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BadgeRow {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
}

impl TryFrom<BadgeRow> for Badge {
    type Error = String;

    fn try_from(row: BadgeRow) -> Result<Self, Self::Error> {
        let owner = UserId::new(row.user_id).map_err(|err| format!("badge {}: {err}", row.id))?;
        Ok(Badge::new(row.id, row.name, owner))
    }
}

/// Row read from the `bug_report` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bug_report)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BugReportRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
    pub severity: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i32,
    pub screenshot: Option<String>,
    pub screen_recording: Option<String>,
}

fn stored_attachment(id: i32, raw: Option<String>) -> Result<Option<AttachmentName>, String> {
    raw.map(|name| {
        AttachmentName::parse_exact(&name)
            .ok_or_else(|| format!("bug report {id}: stored attachment {name:?} is not sanitised"))
    })
    .transpose()
}

impl TryFrom<BugReportRow> for BugReport {
    type Error = String;

    fn try_from(row: BugReportRow) -> Result<Self, Self::Error> {
        let id = BugReportId::new(row.id).map_err(|err| format!("stored bug report: {err}"))?;
        let user_id =
            UserId::new(row.user_id).map_err(|err| format!("bug report {id}: {err}"))?;
        Ok(BugReport {
            id,
            title: row.title,
            description: row.description,
            status: row.status,
            severity: row.severity,
            created_at: row.created_at,
            user_id,
            screenshot: stored_attachment(row.id, row.screenshot)?,
            screen_recording: stored_attachment(row.id, row.screen_recording)?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bug_report)]
pub(crate) struct NewBugReportRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub severity: &'a str,
    pub created_at: DateTime<Utc>,
    pub user_id: i32,
    pub screenshot: Option<&'a str>,
    pub screen_recording: Option<&'a str>,
}

/// Partial update; `None` fields are left out of the `SET` clause.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bug_report)]
pub(crate) struct BugReportChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: Option<&'a str>,
    pub severity: Option<&'a str>,
    pub screenshot: Option<&'a str>,
    pub screen_recording: Option<&'a str>,
}

/// One row of the monthly trend aggregation.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct MonthlyCountRow {
    #[diesel(sql_type = Integer)]
    pub month: i32,
    #[diesel(sql_type = Text)]
    pub label: String,
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

impl From<MonthlyCountRow> for MonthlyCount {
    fn from(row: MonthlyCountRow) -> Self {
        Self {
            month: u32::try_from(row.month).unwrap_or_default(),
            label: row.label,
            count: u64::try_from(row.total).unwrap_or_default(),
        }
    }
}
