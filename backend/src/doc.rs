//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the HTTP API. It registers:
//!
//! - **Paths**: every handler in [`crate::inbound::http`]
//! - **Schemas**: wrappers from [`crate::inbound::http::schemas`] that
//!   describe domain types without coupling them to utoipa, plus the
//!   request and response bodies owned by the handlers
//! - **Security**: the session cookie
//!
//! The generated specification is served by Swagger UI under `/docs` in
//! debug builds and exported via `cargo run --bin openapi-dump`.

use crate::inbound::http::accounts::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
use crate::inbound::http::bugs::{
    BugReportResponse, DashboardQuery, DashboardResponse, EditBugForm, FilterEcho, SubmitBugForm,
    SubmitFormResponse,
};
use crate::inbound::http::schemas::{
    AttachmentRefSchema, BadgeSchema, BugAttachmentsSchema, BugReportPageSchema,
    BugReportSchema, ErrorCodeSchema, ErrorSchema, TrendChartSchema, TrendReportSchema,
    UserSchema,
};
use crate::inbound::http::users::LeaderboardEntry;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bug tracker API",
        description = "Bug reports, attachments, leaderboard and trend charts for signed-in users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::login_form,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::register_form,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::bugs::dashboard,
        crate::inbound::http::bugs::dashboard_search,
        crate::inbound::http::bugs::submit_form,
        crate::inbound::http::bugs::submit_bug,
        crate::inbound::http::bugs::edit_form,
        crate::inbound::http::bugs::edit_bug,
        crate::inbound::http::bugs::view_attachments,
        crate::inbound::http::bugs::download_attachment,
        crate::inbound::http::trends::trend_analysis,
        crate::inbound::http::users::leaderboard,
        crate::inbound::http::users::my_badges,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        BugReportSchema,
        BugReportPageSchema,
        BadgeSchema,
        AttachmentRefSchema,
        BugAttachmentsSchema,
        TrendChartSchema,
        TrendReportSchema,
        LoginRequest,
        LoginResponse,
        RegisterRequest,
        RegisterResponse,
        DashboardQuery,
        DashboardResponse,
        FilterEcho,
        SubmitFormResponse,
        SubmitBugForm,
        BugReportResponse,
        EditBugForm,
        LeaderboardEntry,
    )),
    tags(
        (name = "accounts", description = "Registration, login and logout"),
        (name = "bugs", description = "Bug reports, attachments and trends"),
        (name = "users", description = "Leaderboard and badges"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure and path coverage.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const USER_SCHEMA_NAME: &str = "crate.domain.User";
    const BUG_REPORT_SCHEMA_NAME: &str = "crate.domain.BugReport";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, &["code", "message", "traceId", "details"])]
    #[case(USER_SCHEMA_NAME, &["id", "username", "email", "points"])]
    #[case(BUG_REPORT_SCHEMA_NAME, &["id", "title", "status", "severity", "createdAt", "userId"])]
    fn schemas_have_required_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .get(name)
            .unwrap_or_else(|| panic!("{name} schema"));
        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }

    #[rstest]
    #[case("/")]
    #[case("/login")]
    #[case("/register")]
    #[case("/logout")]
    #[case("/submit_bug")]
    #[case("/edit_bug/{id}")]
    #[case("/bug/{id}/attachments")]
    #[case("/uploads/{file_name}")]
    #[case("/leaderboard")]
    #[case("/badges")]
    #[case("/trend_analysis")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
