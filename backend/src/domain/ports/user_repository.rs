//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Registration, StoredCredentials, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the requested value.
        Duplicate { field: String } => "a user with that {field} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account with zero points.
    async fn create(&self, registration: &Registration) -> Result<User, UserPersistenceError>;

    /// Fetch a user and their stored password by username.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Users ordered by points, highest first.
    async fn top_by_points(&self, limit: u32) -> Result<Vec<User>, UserPersistenceError>;
}
