//! Driving port for user-facing account queries.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Number of users on the leaderboard.
pub const LEADERBOARD_SIZE: u32 = 10;

/// Domain use-case port for reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch one user, failing with `NotFound` when absent.
    async fn find_user(&self, id: UserId) -> Result<User, Error>;

    /// The [`LEADERBOARD_SIZE`] users with the most points.
    async fn leaderboard(&self) -> Result<Vec<User>, Error>;
}
