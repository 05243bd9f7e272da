//! Shared harness for HTTP integration tests over the in-memory store.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;
use tempfile::TempDir;

use bugtracker::Trace;
use bugtracker::domain::{AccountService, BadgeService, BugReportService, TrendService};
use bugtracker::inbound::http::accounts::{login, login_form, logout, register, register_form};
use bugtracker::inbound::http::bugs::{
    dashboard, dashboard_search, download_attachment, edit_bug, edit_form, submit_bug,
    submit_form, view_attachments,
};
use bugtracker::inbound::http::health::{HealthState, live, ready};
use bugtracker::inbound::http::state::{HttpState, HttpStatePorts};
use bugtracker::inbound::http::trends::trend_analysis;
use bugtracker::inbound::http::users::{leaderboard, my_badges};
use bugtracker::outbound::memory::MemoryStore;
use bugtracker::outbound::storage::LocalAttachmentStore;

pub const BOUNDARY: &str = "integration-boundary";

/// Store, upload directory and handler state for one test.
pub struct Harness {
    pub store: MemoryStore,
    pub uploads: TempDir,
    pub state: HttpState,
}

impl Harness {
    pub fn new() -> Self {
        let uploads = tempfile::tempdir().expect("upload dir");
        let store = MemoryStore::new();
        let shared = Arc::new(store.clone());
        let attachments =
            Arc::new(LocalAttachmentStore::open(uploads.path()).expect("open uploads"));
        let accounts = Arc::new(AccountService::new(Arc::clone(&shared)));
        let reports = Arc::new(BugReportService::new(
            Arc::clone(&shared),
            attachments,
            Arc::new(DefaultClock),
        ));
        let state = HttpState::new(HttpStatePorts {
            login: accounts.clone(),
            registration: accounts.clone(),
            users: accounts,
            bug_reports: reports.clone(),
            bug_reports_query: reports,
            trends: Arc::new(TrendService::new(Arc::clone(&shared))),
            badges: Arc::new(BadgeService::new(shared)),
        });
        Self {
            store,
            uploads,
            state,
        }
    }

    /// Every route wired the way the server wires them.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(health)
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .service(ready)
            .service(live)
            .service(
                web::scope("")
                    .wrap(session)
                    .service(dashboard)
                    .service(dashboard_search)
                    .service(login_form)
                    .service(login)
                    .service(register_form)
                    .service(register)
                    .service(logout)
                    .service(submit_form)
                    .service(submit_bug)
                    .service(edit_form)
                    .service(edit_bug)
                    .service(view_attachments)
                    .service(download_attachment)
                    .service(leaderboard)
                    .service(my_badges)
                    .service(trend_analysis),
            )
    }
}

/// Encode `parts` as `multipart/form-data` using [`BOUNDARY`].
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
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
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// The session cookie set on `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}
