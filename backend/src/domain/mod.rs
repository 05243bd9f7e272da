//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! layers, and the services that implement the driving ports in [`ports`].
//! Value types validate on construction so adapters never hold an empty
//! username or an unsanitised file name.
//!
//! Public surface:
//! - [`User`], [`Badge`], [`BugReport`] are the stored records.
//! - [`Registration`], [`LoginCredentials`], [`BugDetails`],
//!   [`BugReportPatch`] are validated inputs.
//! - [`Error`] / [`ErrorCode`] form the API error payload.
//! - [`AccountService`], [`BugReportService`], [`TrendService`] and
//!   [`BadgeService`] implement the driving ports.

pub mod accounts_service;
pub mod attachment;
pub mod auth;
pub mod badge;
pub mod badge_service;
pub mod bug_filter;
pub mod bug_report;
pub mod bug_report_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod trend;
pub mod trend_service;
pub mod user;

pub use self::accounts_service::{AccountService, INVALID_CREDENTIALS_MESSAGE};
pub use self::attachment::{
    ATTACHMENT_NAME_MAX, AttachmentKind, AttachmentName, AttachmentNameError, AttachmentRef,
    BugAttachments, UPLOADS_PATH, UploadedFile,
};
pub use self::auth::{LoginCredentials, LoginValidationError, Registration, StoredCredentials};
pub use self::badge::Badge;
pub use self::badge_service::BadgeService;
pub use self::bug_filter::{ALL_SENTINEL, BUGS_PER_PAGE, BugFilter};
pub use self::bug_report::{
    BugDetails, BugReport, BugReportId, BugReportPatch, BugReportValidationError,
    DEFAULT_STATUS, LABEL_MAX, NewBugReport, SUBMISSION_POINTS, TITLE_MAX,
};
pub use self::bug_report_service::BugReportService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trend::{
    MONTH_NAMES, MonthlyCount, TrendChart, TrendDimension, TrendSeries, aggregate_monthly,
};
pub use self::trend_service::TrendService;
pub use self::user::{
    ACCOUNT_FIELD_MAX, EmailAddress, User, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bugtracker::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such bug"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
