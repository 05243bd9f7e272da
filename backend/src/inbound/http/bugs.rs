//! Bug report handlers: dashboard, submission, editing and attachments.
//!
//! ```text
//! GET  /?keyword=crash&status=Open&severity=All&page=2
//! POST /submit_bug             multipart: title, description, severity, status,
//!                              screenshot, screen_recording
//! GET  /edit_bug/12
//! POST /edit_bug/12            multipart: any of the submission fields
//! GET  /bug/12/attachments
//! GET  /uploads/crash.png
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, http::header, post, web};
use pagination::{PageEnvelope, PageRequest};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{EditBugRequest, SubmitBugRequest};
use crate::domain::{
    ALL_SENTINEL, AttachmentKind, AttachmentName, BUGS_PER_PAGE, BugAttachments, BugDetails,
    BugFilter, BugReport, BugReportPatch, DEFAULT_STATUS, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::{TEXT_FIELD_MAX, read_bug_form};
use crate::inbound::http::schemas::{
    BugAttachmentsSchema, BugReportPageSchema, BugReportSchema, ErrorSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{bug_validation_error, parse_bug_id};

/// Flash text returned after a submission.
pub const SUBMITTED_MESSAGE: &str = "Your bug report has been submitted.";
/// Flash text returned after an edit.
pub const UPDATED_MESSAGE: &str = "Your bug report has been updated.";

const LINK_BASE: &str = "http://localhost/";

/// Dashboard search fields. Carried in the query string for `GET /` and in
/// the form body for `POST /`.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Case-insensitive title substring.
    pub keyword: Option<String>,
    /// Status label, or `All`.
    pub status: Option<String>,
    /// Severity label, or `All`.
    pub severity: Option<String>,
    /// 1-indexed page; non-numeric values fall back to 1.
    pub page: Option<String>,
}

/// Page selector for `POST /`, whose filter arrives in the body.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-indexed page; non-numeric values fall back to 1.
    pub page: Option<String>,
}

/// Filter as applied, echoed back for form pre-filling.
#[derive(Debug, Serialize, ToSchema)]
pub struct FilterEcho {
    pub keyword: String,
    #[schema(example = "All")]
    pub status: String,
    #[schema(example = "All")]
    pub severity: String,
}

impl From<&BugFilter> for FilterEcho {
    fn from(filter: &BugFilter) -> Self {
        Self {
            keyword: filter.keyword().unwrap_or_default().to_owned(),
            status: filter.status().unwrap_or(ALL_SENTINEL).to_owned(),
            severity: filter.severity().unwrap_or(ALL_SENTINEL).to_owned(),
        }
    }
}

/// Dashboard payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub filter: FilterEcho,
    #[schema(value_type = BugReportPageSchema)]
    pub bugs: PageEnvelope<BugReport>,
}

/// Metadata for building the submission form.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormResponse {
    #[schema(example = "Open")]
    pub default_status: String,
    /// Text inputs, in display order.
    pub fields: Vec<String>,
    /// File inputs.
    pub attachments: Vec<String>,
    /// Per-file upload limit in bytes.
    pub max_upload_bytes: usize,
    /// Per-field text limit in bytes.
    pub max_text_bytes: usize,
}

/// Multipart layout of `POST /submit_bug`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubmitBugForm {
    title: String,
    description: String,
    #[schema(example = "High")]
    severity: String,
    /// Blank or absent means `Open`.
    status: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    screenshot: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    screen_recording: Option<Vec<u8>>,
}

/// A report plus the flash message describing what happened to it.
#[derive(Debug, Serialize, ToSchema)]
pub struct BugReportResponse {
    #[schema(example = "Your bug report has been submitted.")]
    pub message: String,
    #[schema(value_type = BugReportSchema)]
    pub report: BugReport,
}

/// Multipart layout of `POST /edit_bug/{id}`. Omitted fields keep their
/// current value; a file replaces the stored attachment.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EditBugForm {
    title: Option<String>,
    description: Option<String>,
    severity: Option<String>,
    #[schema(example = "Closed")]
    status: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    screenshot: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    screen_recording: Option<Vec<u8>>,
}

fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(1)
}

fn link_base(filter: &BugFilter) -> Result<Url, Error> {
    let mut base = Url::parse(LINK_BASE)
        .map_err(|err| Error::internal(format!("invalid link base: {err}")))?;
    {
        let mut pairs = base.query_pairs_mut();
        if let Some(keyword) = filter.keyword() {
            pairs.append_pair("keyword", keyword);
        }
        if let Some(status) = filter.status() {
            pairs.append_pair("status", status);
        }
        if let Some(severity) = filter.severity() {
            pairs.append_pair("severity", severity);
        }
    }
    Ok(base)
}

async fn render_dashboard(
    state: &HttpState,
    session: &SessionContext,
    fields: &DashboardQuery,
    page: Option<&str>,
) -> ApiResult<HttpResponse> {
    session.require_user(state.users.as_ref()).await?;
    let filter = BugFilter::new(
        fields.keyword.as_deref(),
        fields.status.as_deref(),
        fields.severity.as_deref(),
    );
    let request = PageRequest::new(parse_page(page), BUGS_PER_PAGE)
        .map_err(|err| Error::internal(format!("invalid page size: {err}")))?;
    let page = state.bug_reports_query.search(&filter, request).await?;
    let bugs = page.into_envelope(&link_base(&filter)?);
    Ok(HttpResponse::Ok().json(DashboardResponse {
        filter: FilterEcho::from(&filter),
        bugs,
    }))
}

/// List reports matching the query-string filter.
#[utoipa::path(
    get,
    path = "/",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Page of reports, newest first", body = DashboardResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "dashboard"
)]
#[get("/")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DashboardQuery>,
) -> ApiResult<HttpResponse> {
    render_dashboard(&state, &session, &query, query.page.as_deref()).await
}

/// List reports matching a submitted search form.
#[utoipa::path(
    post,
    path = "/",
    params(PageQuery),
    request_body(content = DashboardQuery, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Page of reports, newest first", body = DashboardResponse),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "dashboardSearch"
)]
#[post("/")]
pub async fn dashboard_search(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
    form: web::Form<DashboardQuery>,
) -> ApiResult<HttpResponse> {
    render_dashboard(&state, &session, &form, query.page.as_deref()).await
}

/// Describe the submission form.
#[utoipa::path(
    get,
    path = "/submit_bug",
    responses(
        (status = 200, description = "Form metadata", body = SubmitFormResponse),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "submitBugForm"
)]
#[get("/submit_bug")]
pub async fn submit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_user(state.users.as_ref()).await?;
    Ok(HttpResponse::Ok().json(SubmitFormResponse {
        default_status: DEFAULT_STATUS.to_owned(),
        fields: ["title", "description", "severity", "status"]
            .map(str::to_owned)
            .to_vec(),
        attachments: [AttachmentKind::Screenshot, AttachmentKind::ScreenRecording]
            .map(|kind| kind.field_name().to_owned())
            .to_vec(),
        max_upload_bytes: state.max_upload_bytes,
        max_text_bytes: TEXT_FIELD_MAX,
    }))
}

/// File a new report and credit the reporter.
#[utoipa::path(
    post,
    path = "/submit_bug",
    request_body(content = SubmitBugForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report stored", body = BugReportResponse),
        (status = 400, description = "Invalid form", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "submitBug"
)]
#[post("/submit_bug")]
pub async fn submit_bug(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let user = session.require_user(state.users.as_ref()).await?;
    let form = read_bug_form(payload, state.max_upload_bytes).await?;
    let details = BugDetails::try_from_parts(
        form.title.as_deref().unwrap_or_default(),
        form.description.as_deref().unwrap_or_default(),
        form.severity.as_deref().unwrap_or_default(),
        form.status.as_deref(),
    )
    .map_err(bug_validation_error)?;
    let report = state
        .bug_reports
        .submit(SubmitBugRequest {
            user_id: user.id(),
            details,
            screenshot: form.screenshot,
            screen_recording: form.screen_recording,
        })
        .await?;
    Ok(HttpResponse::Created().json(BugReportResponse {
        message: SUBMITTED_MESSAGE.to_owned(),
        report,
    }))
}

/// Fetch a report for pre-filling the edit form.
#[utoipa::path(
    get,
    path = "/edit_bug/{id}",
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Current report", body = BugReportSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such report", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "editBugForm"
)]
#[get("/edit_bug/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<BugReport>> {
    session.require_user(state.users.as_ref()).await?;
    let id = parse_bug_id(path.into_inner())?;
    Ok(web::Json(state.bug_reports_query.get(id).await?))
}

/// Apply a partial update, optionally replacing attachments.
#[utoipa::path(
    post,
    path = "/edit_bug/{id}",
    params(("id" = i32, Path, description = "Report id")),
    request_body(content = EditBugForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated report", body = BugReportResponse),
        (status = 400, description = "Invalid field or file", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such report", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "editBug"
)]
#[post("/edit_bug/{id}")]
pub async fn edit_bug(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    session.require_user(state.users.as_ref()).await?;
    let id = parse_bug_id(path.into_inner())?;
    let form = read_bug_form(payload, state.max_upload_bytes).await?;
    let patch = BugReportPatch::try_from_parts(
        form.title.as_deref(),
        form.description.as_deref(),
        form.severity.as_deref(),
        form.status.as_deref(),
    )
    .map_err(bug_validation_error)?;
    let report = state
        .bug_reports
        .edit(EditBugRequest {
            id,
            patch,
            screenshot: form.screenshot,
            screen_recording: form.screen_recording,
        })
        .await?;
    Ok(HttpResponse::Ok().json(BugReportResponse {
        message: UPDATED_MESSAGE.to_owned(),
        report,
    }))
}

/// Show a report's screenshot and recording references.
#[utoipa::path(
    get,
    path = "/bug/{id}/attachments",
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Attachment references", body = BugAttachmentsSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such report", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "viewAttachments"
)]
#[get("/bug/{id}/attachments")]
pub async fn view_attachments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<BugAttachments>> {
    session.require_user(state.users.as_ref()).await?;
    let id = parse_bug_id(path.into_inner())?;
    Ok(web::Json(state.bug_reports_query.attachments(id).await?))
}

fn content_type_for(name: &AttachmentName) -> &'static str {
    let extension = name
        .as_ref()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Download a stored attachment.
#[utoipa::path(
    get,
    path = "/uploads/{file_name}",
    params(("file_name" = String, Path, description = "Stored file name")),
    responses(
        (
            status = 200,
            description = "File contents",
            body = Vec<u8>,
            content_type = "application/octet-stream"
        ),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such file", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "downloadAttachment"
)]
#[get("/uploads/{file_name}")]
pub async fn download_attachment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user(state.users.as_ref()).await?;
    let raw = path.into_inner();
    let name = AttachmentName::parse_exact(&raw)
        .ok_or_else(|| Error::not_found(format!("attachment {raw} not found")))?;
    let bytes = state.bug_reports_query.attachment_content(&name).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&name)))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{name}\""),
        ))
        .body(bytes))
}
