//! Driving port for creating accounts.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

/// Domain use-case port for registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account with zero points.
    ///
    /// Fails with `Conflict` when the username or e-mail is taken; the error
    /// details name the clashing field.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}
