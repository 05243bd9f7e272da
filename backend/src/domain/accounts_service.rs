//! Account services: registration, login and user lookups.
//!
//! One service backs three driving ports because they share a single
//! repository and the same error mapping.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    LEADERBOARD_SIZE, LoginService, RegistrationService, UserPersistenceError, UserRepository,
    UsersQuery,
};
use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

/// Message returned for any failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Account service implementing the login, registration and user query ports.
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
}

impl<R> AccountService<R> {
    /// Create a new service over `users`.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("a user with that {field} already exists"))
                .with_details(json!({ "field": field, "code": "duplicate_user" }))
        }
    }
}

#[async_trait]
impl<R> LoginService for AccountService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?;
        match stored {
            Some(stored) if stored.matches(credentials.password()) => Ok(stored.into_user()),
            _ => {
                debug!(username = credentials.username(), "login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE))
            }
        }
    }
}

#[async_trait]
impl<R> RegistrationService for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let user = self
            .users
            .create(registration)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<R> UsersQuery for AccountService<R>
where
    R: UserRepository,
{
    async fn find_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn leaderboard(&self) -> Result<Vec<User>, Error> {
        self.users
            .top_by_points(LEADERBOARD_SIZE)
            .await
            .map_err(map_user_error)
    }
}
