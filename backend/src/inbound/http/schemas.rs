//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape and are registered with
//! utoipa under the domain type's path.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be empty")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, usually `{"field", "code"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = 7)]
    id: i32,
    #[schema(example = "alice")]
    username: String,
    #[schema(example = "alice@example.com")]
    email: String,
    /// Accumulated submission points.
    #[schema(example = 30)]
    points: i32,
}

/// OpenAPI schema for [`crate::domain::BugReport`].
#[derive(ToSchema)]
#[schema(as = crate::domain::BugReport, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BugReportSchema {
    #[schema(example = 12)]
    id: i32,
    #[schema(example = "Crash when saving a draft")]
    title: String,
    description: String,
    #[schema(example = "Open")]
    status: String,
    #[schema(example = "High")]
    severity: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(example = 7)]
    user_id: i32,
    #[schema(example = "crash.png")]
    screenshot: Option<String>,
    screen_recording: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Badge`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Badge, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BadgeSchema {
    id: i32,
    #[schema(example = "First Bug")]
    name: String,
    user_id: i32,
}

/// OpenAPI schema for [`crate::domain::AttachmentRef`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AttachmentRef, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AttachmentRefSchema {
    #[schema(example = "crash.png")]
    file_name: String,
    #[schema(example = "/uploads/crash.png")]
    url: String,
}

/// OpenAPI schema for [`crate::domain::BugAttachments`].
#[derive(ToSchema)]
#[schema(as = crate::domain::BugAttachments, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BugAttachmentsSchema {
    bug: BugReportSchema,
    screenshot: Option<AttachmentRefSchema>,
    screen_recording: Option<AttachmentRefSchema>,
}

/// OpenAPI schema for a plotly bar chart.
#[derive(ToSchema)]
#[schema(as = crate::domain::TrendChart)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TrendChartSchema {
    /// One bar trace per label: `{"x", "y", "type": "bar", "name"}`.
    data: Vec<serde_json::Value>,
    /// `{"title", "barmode": "group", "yaxis": {"tickformat": ",d"}}`.
    layout: serde_json::Value,
}

/// OpenAPI schema for [`crate::domain::ports::TrendReport`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::TrendReport)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TrendReportSchema {
    severity: TrendChartSchema,
    status: TrendChartSchema,
}

/// OpenAPI schema for a page of bug reports.
#[derive(ToSchema)]
#[schema(as = BugReportPage, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BugReportPageSchema {
    items: Vec<BugReportSchema>,
    #[schema(example = 1)]
    page: i64,
    #[schema(example = 10)]
    per_page: u32,
    total: u64,
    pages: u64,
    has_prev: bool,
    has_next: bool,
    prev_page: Option<i64>,
    next_page: Option<i64>,
    /// `{"self", "prev"?, "next"?}` links preserving the active filter.
    links: serde_json::Value,
}
