//! API Integration Tests
//!
//! Access-guard tests run against a lazy pool (no database round-trip
//! happens before rejection). The end-to-end scenarios need a migrated
//! Postgres and are ignored unless DATABASE_URL points at one.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use savium::api;

mod common;

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

// =========================================================================
// Access guard (no database needed)
// =========================================================================

#[tokio::test]
async fn test_missing_token_is_401_no_token_provided() {
    let app = api::create_router(common::test_state_without_db());

    let req = Request::builder()
        .method("GET")
        .uri("/goals")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No token provided");
}

#[tokio::test]
async fn test_garbage_token_is_401_invalid_token() {
    let app = api::create_router(common::test_state_without_db());

    let response = app
        .oneshot(get_with_token("/summary", "not.a.token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid token");
}

#[tokio::test]
async fn test_token_signed_with_wrong_key_rejected() {
    use savium::auth::TokenService;

    let app = api::create_router(common::test_state_without_db());
    let foreign_signer = TokenService::new(b"ffffffffffffffffffffffffffffffff");
    let forged = foreign_signer.issue(uuid::Uuid::new_v4()).unwrap();

    let response = app
        .oneshot(get_with_token("/goals", &forged))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid token");
}

#[tokio::test]
async fn test_non_bearer_scheme_rejected() {
    let app = api::create_router(common::test_state_without_db());

    let req = Request::builder()
        .method("GET")
        .uri("/goals")
        .header("Authorization", "Basic abc123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid token");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = api::create_router(common::test_state_without_db());

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =========================================================================
// End-to-end scenarios (database required)
// =========================================================================

/// Register and log in, returning the bearer token.
async fn register_and_login(app: &axum::Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({"name": "Test User", "email": email, "password": password}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "registration failed");

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({"email": email, "password": password}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed");

    let json = body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

fn saved(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_register_login_deposit_summary_e2e() {
    let pool = common::setup_test_db().await;
    let app = api::create_router(common::test_state(pool));

    let token = register_and_login(&app, "alice@x.com", "pw1").await;

    // Create goal
    let response = app
        .clone()
        .oneshot(post_json(
            "/goals",
            Some(&token),
            json!({
                "title": "Trip",
                "target_amount": 1000,
                "start_date": "2024-01-01",
                "end_date": "2024-12-31"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let goal = body_json(response).await;
    let goal_id = goal["id"].as_i64().unwrap();
    assert_eq!(saved(&goal["current_amount"]), dec!(0));

    // Two deposits
    for (amount, date) in [(200, "2024-02-01"), (150, "2024-03-01")] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/goals/{goal_id}/deposits"),
                Some(&token),
                json!({"amount": amount, "date": date}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "deposit failed");
    }

    // Summary reflects the live ledger sum
    let response = app
        .clone()
        .oneshot(get_with_token("/summary", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(saved(&summary["totalSaved"]), dec!(350));
    assert_eq!(summary["goals"].as_array().unwrap().len(), 1);
    assert_eq!(saved(&summary["goals"][0]["current_amount"]), dec!(350));

    // Deposits listed newest date first
    let response = app
        .clone()
        .oneshot(get_with_token(&format!("/goals/{goal_id}/deposits"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deposits = body_json(response).await;
    let deposits = deposits.as_array().unwrap();
    assert_eq!(deposits.len(), 2);
    assert_eq!(deposits[0]["date"], "2024-03-01");
    assert_eq!(deposits[1]["date"], "2024-02-01");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_duplicate_email_is_conflict() {
    let pool = common::setup_test_db().await;
    let app = api::create_router(common::test_state(pool));

    let body = json!({"name": "Bob", "email": "bob@x.com", "password": "pw"});

    let response = app
        .clone()
        .oneshot(post_json("/auth/register", None, body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/auth/register", None, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error_code"], "conflict");

    // First registration still works
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({"email": "bob@x.com", "password": "pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_wrong_password_is_401() {
    let pool = common::setup_test_db().await;
    let app = api::create_router(common::test_state(pool));

    register_and_login(&app, "carol@x.com", "right-pw").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({"email": "carol@x.com", "password": "wrong-pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_foreign_goal_is_indistinguishable_from_missing() {
    let pool = common::setup_test_db().await;
    let app = api::create_router(common::test_state(pool.clone()));

    let owner_token = register_and_login(&app, "owner@x.com", "pw").await;
    let intruder_token = register_and_login(&app, "intruder@x.com", "pw").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/goals",
            Some(&owner_token),
            json!({
                "title": "House",
                "target_amount": 50000,
                "start_date": "2024-01-01",
                "end_date": "2026-12-31"
            }),
        ))
        .await
        .unwrap();
    let goal = body_json(response).await;
    let goal_id = goal["id"].as_i64().unwrap();

    // Update by a non-owner: 404, and the goal is unchanged
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/goals/{goal_id}"))
                .header("content-type", "application/json")
                .header("Authorization", format!("Bearer {intruder_token}"))
                .body(Body::from(
                    json!({
                        "title": "Hijacked",
                        "target_amount": 1,
                        "start_date": "2024-01-01",
                        "end_date": "2024-12-31"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deposit by a non-owner: 404, and no ledger row appears
    let count_before: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deposits")
        .fetch_one(&pool)
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/goals/{goal_id}/deposits"),
            Some(&intruder_token),
            json!({"amount": 100, "date": "2024-02-01"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let count_after: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deposits")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count_before, count_after);

    // Reading the foreign ledger is also a 404
    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/goals/{goal_id}/deposits"),
            &intruder_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner still sees the original title
    let response = app
        .clone()
        .oneshot(get_with_token("/goals", &owner_token))
        .await
        .unwrap();
    let goals = body_json(response).await;
    assert_eq!(goals[0]["title"], "House");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_delete_is_idempotent() {
    let pool = common::setup_test_db().await;
    let app = api::create_router(common::test_state(pool));

    let token = register_and_login(&app, "dave@x.com", "pw").await;

    // Deleting a goal that never existed still succeeds
    let req = Request::builder()
        .method("DELETE")
        .uri("/goals/999999")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_goal_listing_is_stable_ordered() {
    let pool = common::setup_test_db().await;
    let app = api::create_router(common::test_state(pool));

    let token = register_and_login(&app, "erin@x.com", "pw").await;

    // Two goals share a start date; a third starts later
    for (title, start) in [
        ("First", "2024-06-01"),
        ("Second", "2024-06-01"),
        ("Later", "2024-09-01"),
    ] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/goals",
                Some(&token),
                json!({
                    "title": title,
                    "target_amount": 100,
                    "start_date": start,
                    "end_date": "2024-12-31"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let fetch = || async {
        let response = app
            .clone()
            .oneshot(get_with_token("/goals", &token))
            .await
            .unwrap();
        let goals = body_json(response).await;
        goals
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["title"].as_str().unwrap().to_string())
            .collect::<Vec<_>>()
    };

    let first = fetch().await;
    assert_eq!(first, vec!["Later", "First", "Second"]);

    // Re-invoking with no intervening writes returns identical ordering
    let second = fetch().await;
    assert_eq!(first, second);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
async fn test_validation_errors_are_400() {
    let pool = common::setup_test_db().await;
    let app = api::create_router(common::test_state(pool));

    let token = register_and_login(&app, "frank@x.com", "pw").await;

    // Empty title
    let response = app
        .clone()
        .oneshot(post_json(
            "/goals",
            Some(&token),
            json!({
                "title": "",
                "target_amount": 100,
                "start_date": "2024-01-01",
                "end_date": "2024-12-31"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Registration with an empty field
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({"name": "", "email": "x@x.com", "password": "pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
