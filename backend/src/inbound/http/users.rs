//! User-centred handlers: the public leaderboard and badge listing.
//!
//! ```text
//! GET /leaderboard
//! GET /badges
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Badge, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{BadgeSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One leaderboard row. E-mail addresses stay private.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based position.
    #[schema(example = 1)]
    pub rank: usize,
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = 40)]
    pub points: i32,
}

impl LeaderboardEntry {
    fn ranked(position: usize, user: User) -> Self {
        Self {
            rank: position + 1,
            id: user.id().get(),
            username: user.username().to_string(),
            points: user.points(),
        }
    }
}

/// Top ten users by points.
#[utoipa::path(
    get,
    path = "/leaderboard",
    responses(
        (status = 200, description = "Users ordered by points", body = [LeaderboardEntry]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "leaderboard"
)]
#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<LeaderboardEntry>>> {
    let users = state.users.leaderboard().await?;
    Ok(web::Json(
        users
            .into_iter()
            .enumerate()
            .map(|(position, user)| LeaderboardEntry::ranked(position, user))
            .collect(),
    ))
}

/// Badges held by the logged-in user.
#[utoipa::path(
    get,
    path = "/badges",
    responses(
        (status = 200, description = "Badges ordered by id", body = [BadgeSchema]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "myBadges"
)]
#[get("/badges")]
pub async fn my_badges(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Badge>>> {
    let user = session.require_user(state.users.as_ref()).await?;
    Ok(web::Json(state.badges.badges_for(user.id()).await?))
}

#[cfg(test)]
mod tests;
