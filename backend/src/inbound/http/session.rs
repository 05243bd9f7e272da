//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie holds nothing but the authenticated user's numeric id.
//! Handlers resolve it to a [`User`] per request through
//! [`SessionContext::require_user`]; nothing else in the process knows who
//! is logged in.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::UsersQuery;
use crate::domain::{Error, ErrorCode, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Route clients are pointed at when a login is required.
pub const LOGIN_ROUTE: &str = "/login";

/// Error returned to anonymous callers of protected routes.
pub fn login_required() -> Error {
    Error::unauthorized("login required").with_details(json!({ "login": LOGIN_ROUTE }))
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<i32>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match UserId::new(raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                None
            }
        }))
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?.ok_or_else(login_required)
    }

    /// Resolve the session to a stored user.
    ///
    /// A cookie naming a user that no longer exists counts as anonymous.
    pub async fn current_user(&self, users: &dyn UsersQuery) -> Result<Option<User>, Error> {
        let Some(id) = self.user_id()? else {
            return Ok(None);
        };
        match users.find_user(id).await {
            Ok(user) => Ok(Some(user)),
            Err(error) if error.code() == ErrorCode::NotFound => {
                warn!(user_id = %id, "session names an unknown user");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Resolve the session to a stored user or return `401 Unauthorized`.
    pub async fn require_user(&self, users: &dyn UsersQuery) -> Result<User, Error> {
        self.current_user(users).await?.ok_or_else(login_required)
    }

    /// Drop everything held in the session.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
