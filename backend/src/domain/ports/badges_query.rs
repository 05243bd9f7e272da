//! Driving port for reading badges.

use async_trait::async_trait;

use crate::domain::{Badge, Error, UserId};

/// Domain use-case port for badge reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgesQuery: Send + Sync {
    /// Every badge.
    async fn all_badges(&self) -> Result<Vec<Badge>, Error>;

    /// Badges held by one user.
    async fn badges_for(&self, user_id: UserId) -> Result<Vec<Badge>, Error>;
}
