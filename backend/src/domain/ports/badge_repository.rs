//! Read-only port over stored badges.
use async_trait::async_trait;

use crate::domain::{Badge, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by badge repository adapters.
    pub enum BadgeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "badge repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "badge repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepository: Send + Sync {
    /// Every badge, ordered by id.
    async fn list_all(&self) -> Result<Vec<Badge>, BadgeRepositoryError>;

    /// Badges held by `user_id`, ordered by id.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Badge>, BadgeRepositoryError>;
}
