//! User data model.
//!
//! Users are the root entity: badges and bug reports point at a user id, the
//! user holds no collections of its own. Points only ever grow through bug
//! submission.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of usernames, e-mail addresses and passwords.
pub const ACCOUNT_FIELD_MAX: usize = 100;

/// Validation errors raised by account value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifiers are positive integers.
    #[error("user id must be positive")]
    InvalidId,
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded the column width.
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// E-mail address was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// E-mail address lacked a local part, `@`, or domain.
    #[error("email must look like name@domain")]
    InvalidEmail,
    /// E-mail address exceeded the column width.
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password exceeded the column width.
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

impl UserValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyUsername | Self::UsernameTooLong { .. } => "username",
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::EmptyPassword | Self::PasswordTooLong { .. } => "password",
        }
    }

    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyUsername => "empty_username",
            Self::UsernameTooLong { .. } => "username_too_long",
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmailTooLong { .. } => "email_too_long",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooLong { .. } => "password_too_long",
        }
    }
}

/// Database-assigned user identifier.
///
/// # Examples
/// ```
/// use bugtracker::domain::UserId;
///
/// let id = UserId::new(7).expect("positive id");
/// assert_eq!(id.get(), 7);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(id: i32) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique login name, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Trim and validate a username.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > ACCOUNT_FIELD_MAX {
            return Err(UserValidationError::UsernameTooLong {
                max: ACCOUNT_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique contact address. Only the `local@domain` shape is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an e-mail address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > ACCOUNT_FIELD_MAX {
            return Err(UserValidationError::EmailTooLong {
                max: ACCOUNT_FIELD_MAX,
            });
        }
        let well_formed = trimmed
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            });
        if !well_formed || trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered account as seen by the rest of the system.
///
/// The stored password never appears here; adapters hand it out separately
/// through [`StoredCredentials`](super::StoredCredentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    points: i32,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(id: UserId, username: Username, email: EmailAddress, points: i32) -> Self {
        Self {
            id,
            username,
            email,
            points,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Reputation points earned from submissions.
    pub fn points(&self) -> i32 {
        self.points
    }

    /// Add `points`, saturating at the column maximum.
    pub fn add_points(&mut self, points: i32) {
        self.points = self.points.saturating_add(points);
    }
}

#[cfg(test)]
mod tests;
