//! Builders wiring repositories and services into [`HttpState`].

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use bugtracker::domain::ports::{BadgeRepository, BugReportRepository, UserRepository};
use bugtracker::domain::{AccountService, BadgeService, BugReportService, TrendService};
use bugtracker::inbound::http::state::{HttpState, HttpStatePorts};
use bugtracker::outbound::memory::MemoryStore;
use bugtracker::outbound::persistence::{
    DbPool, DieselBadgeRepository, DieselBugReportRepository, DieselUserRepository,
};
use bugtracker::outbound::storage::LocalAttachmentStore;

use super::ServerConfig;

/// Build handler state over `users`, `reports` and `badges`.
fn ports_from<U, R, B>(
    users: Arc<U>,
    reports: Arc<R>,
    badges: Arc<B>,
    attachments: Arc<LocalAttachmentStore>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    R: BugReportRepository + 'static,
    B: BadgeRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(users));
    let bug_reports = Arc::new(BugReportService::new(
        Arc::clone(&reports),
        attachments,
        Arc::new(DefaultClock),
    ));
    HttpStatePorts {
        login: accounts.clone(),
        registration: accounts.clone(),
        users: accounts,
        bug_reports: bug_reports.clone(),
        bug_reports_query: bug_reports,
        trends: Arc::new(TrendService::new(reports)),
        badges: Arc::new(BadgeService::new(badges)),
    }
}

/// Build the shared handler state.
///
/// Uses the Diesel repositories when a pool is configured, otherwise a
/// single [`MemoryStore`] backs every repository port.
///
/// # Errors
/// Returns the I/O error raised while opening the upload directory.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let attachments = Arc::new(LocalAttachmentStore::open(&config.upload_dir)?);
    info!(upload_dir = %config.upload_dir.display(), "attachment storage ready");

    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool, attachments),
        None => {
            info!("no database configured; using in-memory store");
            let store = Arc::new(MemoryStore::new());
            ports_from(Arc::clone(&store), Arc::clone(&store), store, attachments)
        }
    };
    Ok(web::Data::new(
        HttpState::new(ports).with_max_upload_bytes(config.max_upload_bytes),
    ))
}

fn diesel_ports(pool: &DbPool, attachments: Arc<LocalAttachmentStore>) -> HttpStatePorts {
    ports_from(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselBugReportRepository::new(pool.clone())),
        Arc::new(DieselBadgeRepository::new(pool.clone())),
        attachments,
    )
}
