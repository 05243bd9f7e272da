//! PostgreSQL-backed badge read adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BadgeRepository, BadgeRepositoryError};
use crate::domain::{Badge, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::BadgeRow;
use super::pool::DbPool;
use super::schema::badge;

/// Diesel-backed implementation of the [`BadgeRepository`] port.
#[derive(Clone)]
pub struct DieselBadgeRepository {
    pool: DbPool,
}

impl DieselBadgeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<Badge>, BadgeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BadgeRepositoryError::connection))?;

        let mut query = badge::table
            .select(BadgeRow::as_select())
            .order_by(badge::id)
            .into_boxed();
        if let Some(owner) = owner {
            query = query.filter(badge::user_id.eq(owner.get()));
        }
        let rows: Vec<BadgeRow> = query.load(&mut conn).await.map_err(|err| {
            map_diesel_error(
                err,
                BadgeRepositoryError::query,
                BadgeRepositoryError::connection,
            )
        })?;

        rows.into_iter()
            .map(Badge::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(BadgeRepositoryError::query)
    }
}

#[async_trait]
impl BadgeRepository for DieselBadgeRepository {
    async fn list_all(&self) -> Result<Vec<Badge>, BadgeRepositoryError> {
        self.load(None).await
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Badge>, BadgeRepositoryError> {
        self.load(Some(user_id)).await
    }
}
