//! Badges: named achievements attached to a user.
//!
//! Nothing in the service awards badges; they arrive through seeded data and
//! are only ever read.

use serde::Serialize;

use super::UserId;

/// Achievement held by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    id: i32,
    name: String,
    user_id: UserId,
}

impl Badge {
    /// Assemble a badge read from storage.
    pub fn new(id: i32, name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            id,
            name: name.into(),
            user_id,
        }
    }

    /// Storage identifier.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Display name of the achievement.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner of the badge.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
