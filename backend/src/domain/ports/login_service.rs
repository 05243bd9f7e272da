//! Driving port for login.
//!
//! Inbound adapters call this to check credentials without knowing how
//! accounts are stored, which keeps handler tests free of persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the user whose stored password equals the supplied one.
    ///
    /// Unknown usernames and wrong passwords fail identically with
    /// `Unauthorized` so callers cannot learn which usernames exist.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
