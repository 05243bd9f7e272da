//! Tests for leaderboard and badge handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::Value;
use tempfile::TempDir;

use super::*;
use crate::domain::ports::{BugReportRepository, MockUsersQuery};
use crate::domain::{BugDetails, Error, NewBugReport, SUBMISSION_POINTS};
use crate::inbound::http::test_utils::{
    memory_state, seed_user, session_cookie, test_login, test_session_middleware,
};
use crate::outbound::memory::MemoryStore;

struct Harness {
    store: MemoryStore,
    state: HttpState,
    _uploads: TempDir,
}

#[fixture]
fn harness() -> Harness {
    let uploads = tempfile::tempdir().expect("upload dir");
    let store = MemoryStore::new();
    let state = memory_state(&store, uploads.path());
    Harness {
        store,
        state,
        _uploads: uploads,
    }
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(test_login)
        .service(leaderboard)
        .service(my_badges)
}

async fn award(store: &MemoryStore, user: &User, times: usize) {
    for _ in 0..times {
        let report = NewBugReport {
            details: BugDetails::try_from_parts("Bug", "Details", "Low", None).expect("details"),
            user_id: user.id(),
            created_at: chrono::Utc::now(),
            screenshot: None,
            screen_recording: None,
        };
        store
            .create_with_award(&report, SUBMISSION_POINTS)
            .await
            .expect("submit");
    }
}

#[rstest]
#[actix_web::test]
async fn leaderboard_is_public_and_ordered(harness: Harness) {
    let alice = seed_user(&harness.store, "alice").await;
    let bob = seed_user(&harness.store, "bob").await;
    seed_user(&harness.store, "carol").await;
    award(&harness.store, &alice, 1).await;
    award(&harness.store, &bob, 3).await;

    let app = actix_test::init_service(test_app(harness.state.clone())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/leaderboard").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let rows = body.as_array().expect("array");
    let names: Vec<_> = rows.iter().map(|row| row["username"].clone()).collect();
    assert_eq!(names, ["bob", "alice", "carol"]);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["points"], 30);
    assert!(rows[0].get("email").is_none());
}

#[rstest]
#[actix_web::test]
async fn leaderboard_keeps_ten_users(harness: Harness) {
    for index in 0..12 {
        seed_user(&harness.store, &format!("user{index:02}")).await;
    }
    let app = actix_test::init_service(test_app(harness.state.clone())).await;
    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/leaderboard").to_request(),
    )
    .await;
    assert_eq!(body.as_array().map(Vec::len), Some(10));
    assert_eq!(body[0]["username"], "user00");
}

#[rstest]
#[actix_web::test]
async fn badges_belong_to_the_session_user(harness: Harness) {
    let alice = seed_user(&harness.store, "alice").await;
    let bob = seed_user(&harness.store, "bob").await;
    harness.store.grant_badge(alice.id(), "First Bug").expect("badge");
    harness.store.grant_badge(bob.id(), "Bug Hunter").expect("badge");
    harness.store.grant_badge(alice.id(), "Closer").expect("badge");

    let app = actix_test::init_service(test_app(harness.state.clone())).await;
    let login = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/__test/login/{}", alice.id()))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login);

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/badges")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let names: Vec<_> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|badge| badge["name"].clone())
        .collect();
    assert_eq!(names, ["First Bug", "Closer"]);
}

#[rstest]
#[actix_web::test]
async fn badges_require_login(harness: Harness) {
    let app = actix_test::init_service(test_app(harness.state.clone())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/badges").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn leaderboard_surfaces_storage_outage(harness: Harness) {
    let mut users = MockUsersQuery::new();
    users
        .expect_leaderboard()
        .returning(|| Err(Error::service_unavailable("user repository unavailable")));
    let mut state = harness.state.clone();
    state.users = Arc::new(users);

    let app = actix_test::init_service(test_app(state)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/leaderboard").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
