//! Account handlers: login, registration and logout.
//!
//! ```text
//! GET  /login                  303 to / when logged in, else 204
//! POST /login?next=/edit_bug/3 {"username":"alice","password":"pw"}
//! GET  /register               303 to / when logged in, else 204
//! POST /register               {"username":"alice","email":"a@example.com","password":"pw"}
//! GET  /logout                 303 to /login
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::{LOGIN_ROUTE, SessionContext};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{login_validation_error, user_validation_error};

/// Flash text returned after a successful registration.
pub const REGISTERED_MESSAGE: &str = "Congratulations, you are now a registered user!";

const DASHBOARD_ROUTE: &str = "/";

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Optional post-login destination.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LoginQuery {
    /// Local path to continue to after logging in.
    pub next: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(value_type = UserSchema)]
    pub user: User,
    /// Where the client should go next.
    #[schema(example = "/")]
    pub redirect: String,
}

/// Registration request body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful registration payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "Congratulations, you are now a registered user!")]
    pub message: String,
    #[schema(value_type = UserSchema)]
    pub user: User,
    /// Where the client should log in.
    #[schema(example = "/login")]
    pub login: String,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Only same-origin absolute paths are honoured as redirect targets.
fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_owned()
        }
        _ => DASHBOARD_ROUTE.to_owned(),
    }
}

async fn redirect_if_logged_in(
    state: &HttpState,
    session: &SessionContext,
) -> ApiResult<Option<HttpResponse>> {
    let user = session.current_user(state.users.as_ref()).await?;
    Ok(user.map(|_| see_other(DASHBOARD_ROUTE)))
}

/// Check whether the login form should be shown.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 204, description = "Not logged in; show the form"),
        (status = 303, description = "Already logged in", headers(("Location" = String)))
    ),
    tags = ["accounts"],
    operation_id = "loginForm"
)]
#[get("/login")]
pub async fn login_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    Ok(redirect_if_logged_in(&state, &session)
        .await?
        .unwrap_or_else(|| HttpResponse::NoContent().finish()))
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/login",
    params(LoginQuery),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 303, description = "Already logged in", headers(("Location" = String))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LoginQuery>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    if let Some(redirect) = redirect_if_logged_in(&state, &session).await? {
        return Ok(redirect);
    }
    let LoginRequest { username, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&username, &password).map_err(login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        user,
        redirect: safe_next(query.next.as_deref()),
    }))
}

/// Check whether the registration form should be shown.
#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 204, description = "Not logged in; show the form"),
        (status = 303, description = "Already logged in", headers(("Location" = String)))
    ),
    tags = ["accounts"],
    operation_id = "registerForm"
)]
#[get("/register")]
pub async fn register_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    Ok(redirect_if_logged_in(&state, &session)
        .await?
        .unwrap_or_else(|| HttpResponse::NoContent().finish()))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 303, description = "Already logged in", headers(("Location" = String))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username or email already registered", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    if let Some(redirect) = redirect_if_logged_in(&state, &session).await? {
        return Ok(redirect);
    }
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&username, &email, &password).map_err(user_validation_error)?;
    let user = state.registration.register(&registration).await?;
    info!(user_id = %user.id(), "account registered");
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: REGISTERED_MESSAGE.to_owned(),
        user,
        login: LOGIN_ROUTE.to_owned(),
    }))
}

/// End the session.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session cleared", headers(("Location" = String)))
    ),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    see_other(LOGIN_ROUTE)
}
