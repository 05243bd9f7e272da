//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BadgesQuery, BugReportCommand, BugReportQuery, LoginService, RegistrationService,
    TrendQuery, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub bug_reports: Arc<dyn BugReportCommand>,
    pub bug_reports_query: Arc<dyn BugReportQuery>,
    pub trends: Arc<dyn TrendQuery>,
    pub badges: Arc<dyn BadgesQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub bug_reports: Arc<dyn BugReportCommand>,
    pub bug_reports_query: Arc<dyn BugReportQuery>,
    pub trends: Arc<dyn TrendQuery>,
    pub badges: Arc<dyn BadgesQuery>,
    /// Largest accepted upload, per file.
    pub max_upload_bytes: usize,
}

/// Upload cap used when none is configured.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle with the default upload cap.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            registration,
            users,
            bug_reports,
            bug_reports_query,
            trends,
            badges,
        } = ports;
        Self {
            login,
            registration,
            users,
            bug_reports,
            bug_reports_query,
            trends,
            badges,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Override the per-file upload cap.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
