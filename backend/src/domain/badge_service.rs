//! Read-only badge service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{BadgeRepository, BadgeRepositoryError, BadgesQuery};
use crate::domain::{Badge, Error, UserId};

/// Badge service implementing [`BadgesQuery`].
#[derive(Clone)]
pub struct BadgeService<B> {
    badges: Arc<B>,
}

impl<B> BadgeService<B> {
    /// Create a new service over `badges`.
    pub fn new(badges: Arc<B>) -> Self {
        Self { badges }
    }
}

fn map_badge_error(error: BadgeRepositoryError) -> Error {
    match error {
        BadgeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("badge repository unavailable: {message}"))
        }
        BadgeRepositoryError::Query { message } => {
            Error::internal(format!("badge repository error: {message}"))
        }
    }
}

#[async_trait]
impl<B: BadgeRepository> BadgesQuery for BadgeService<B> {
    async fn all_badges(&self) -> Result<Vec<Badge>, Error> {
        self.badges.list_all().await.map_err(map_badge_error)
    }

    async fn badges_for(&self, user_id: UserId) -> Result<Vec<Badge>, Error> {
        self.badges
            .list_for_user(user_id)
            .await
            .map_err(map_badge_error)
    }
}
