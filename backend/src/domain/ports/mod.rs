//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`AttachmentStore`]) are implemented by
//! outbound adapters and report typed adapter errors. Driving ports
//! (`*Service`, `*Query`, `*Command`) are called by inbound adapters and
//! report the domain [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod attachment_store;
mod badge_repository;
mod badges_query;
mod bug_report_command;
mod bug_report_query;
mod bug_report_repository;
mod login_service;
mod registration_service;
mod trend_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use attachment_store::MockAttachmentStore;
pub use attachment_store::{AttachmentStore, AttachmentStoreError};
#[cfg(test)]
pub use badge_repository::MockBadgeRepository;
pub use badge_repository::{BadgeRepository, BadgeRepositoryError};
#[cfg(test)]
pub use badges_query::MockBadgesQuery;
pub use badges_query::BadgesQuery;
#[cfg(test)]
pub use bug_report_command::MockBugReportCommand;
pub use bug_report_command::{BugReportCommand, EditBugRequest, SubmitBugRequest};
#[cfg(test)]
pub use bug_report_query::MockBugReportQuery;
pub use bug_report_query::BugReportQuery;
#[cfg(test)]
pub use bug_report_repository::MockBugReportRepository;
pub use bug_report_repository::{BugReportPersistenceError, BugReportRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use trend_query::MockTrendQuery;
pub use trend_query::{TrendQuery, TrendReport};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{LEADERBOARD_SIZE, UsersQuery};
