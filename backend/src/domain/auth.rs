//! Authentication primitives: login credentials, registrations and the
//! stored credential record used to check them.
//!
//! Passwords are stored and compared as plaintext. This is a known weak
//! point carried over from the deployed system; hashing would slot into
//! [`StoredCredentials::matches`] without touching callers. Password strings
//! are wrapped in [`Zeroizing`] so they are wiped when dropped and are never
//! serialised.

use std::fmt;

use zeroize::Zeroizing;

use super::{ACCOUNT_FIELD_MAX, EmailAddress, User, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use bugtracker::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "secret").expect("valid");
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A validated request to create an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration inputs.
    ///
    /// # Examples
    /// ```
    /// use bugtracker::domain::{Registration, UserValidationError};
    ///
    /// let err = Registration::try_from_parts("alice", "not-an-email", "pw")
    ///     .expect_err("email is malformed");
    /// assert_eq!(err, UserValidationError::InvalidEmail);
    /// ```
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        if password.chars().count() > ACCOUNT_FIELD_MAX {
            return Err(UserValidationError::PasswordTooLong {
                max: ACCOUNT_FIELD_MAX,
            });
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password to store.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A user together with the password stored for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    user: User,
    password: Zeroizing<String>,
}

impl StoredCredentials {
    /// Pair a user with their stored password.
    pub fn new(user: User, password: impl Into<String>) -> Self {
        Self {
            user,
            password: Zeroizing::new(password.into()),
        }
    }

    /// Whether `candidate` equals the stored password exactly.
    pub fn matches(&self, candidate: &str) -> bool {
        self.password.as_str() == candidate
    }

    /// The account the password belongs to.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Credit `points` to the account.
    pub fn award(&mut self, points: i32) {
        self.user.add_points(points);
    }

    /// Release the user, dropping the stored password.
    pub fn into_user(self) -> User {
        self.user
    }
}
