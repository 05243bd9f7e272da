//! Test helpers for inbound HTTP components.

use std::path::Path;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, get, web};
use mockable::DefaultClock;

use crate::domain::{
    AccountService, BadgeService, BugReportService, Error, Registration, TrendService, User,
    UserId,
};
use crate::domain::ports::UserRepository;
use crate::outbound::memory::MemoryStore;
use crate::outbound::storage::LocalAttachmentStore;

use super::ApiResult;
use super::session::SessionContext;
use super::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state wired to real services over `store` and an upload
/// directory under `upload_root`.
pub fn memory_state(store: &MemoryStore, upload_root: &Path) -> HttpState {
    let store = Arc::new(store.clone());
    let attachments =
        Arc::new(LocalAttachmentStore::open(upload_root).expect("open upload directory"));
    let accounts = Arc::new(AccountService::new(Arc::clone(&store)));
    let reports = Arc::new(BugReportService::new(
        Arc::clone(&store),
        attachments,
        Arc::new(DefaultClock),
    ));
    HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        registration: accounts.clone(),
        users: accounts,
        bug_reports: reports.clone(),
        bug_reports_query: reports,
        trends: Arc::new(TrendService::new(Arc::clone(&store))),
        badges: Arc::new(BadgeService::new(store)),
    })
}

/// Encode `parts` as a `multipart/form-data` body using `boundary`.
///
/// Each part is `(field, file_name, bytes)`; a `Some` file name marks a file
/// input.
pub fn multipart_body(boundary: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        let disposition = match file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            ),
            None => format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Register `username` directly in `store`.
pub async fn seed_user(store: &MemoryStore, username: &str) -> User {
    let registration =
        Registration::try_from_parts(username, &format!("{username}@example.com"), "hunter2")
            .expect("registration");
    store.create(&registration).await.expect("seed user")
}

/// Log the caller in as user `id` without going through credentials.
#[get("/__test/login/{id}")]
pub async fn test_login(session: SessionContext, path: web::Path<i32>) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// The session cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
