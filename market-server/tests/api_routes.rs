//! HTTP-level tests for the assembled router: auth flow, role gating
//! and the public catalog route.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use market_server::api;
use market_server::auth::JwtService;
use market_server::core::{Config, ServerState};
use market_server::db;
use market_server::services::RecordingMailer;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app() -> (Router, Arc<RecordingMailer>) {
    let database = db::connect_memory().await.unwrap();
    let mut config = Config::with_overrides("/tmp/market-test", 0);
    config.jwt.secret = "test-secret-test-secret-test-secret!".to_string();

    let mailer = Arc::new(RecordingMailer::new());
    let state = ServerState::new(
        config.clone(),
        database,
        Arc::new(JwtService::with_config(config.jwt)),
        mailer.clone(),
    );
    (api::build_app(state), mailer)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn register_payload(email: &str) -> Value {
    json!({
        "email": email,
        "password": "hunter2hunter2",
        "role": "customer",
        "firstName": "Thandi",
        "lastName": "Nkosi",
        "phoneNumber": "+27 82 555 0100"
    })
}

#[tokio::test]
async fn test_register_issues_token_and_sends_mail() {
    let (app, mailer) = test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/auth/register",
            register_payload("thandi@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "thandi@example.com");
    // Password hash never leaves the server
    assert!(body["user"].get("password").is_none());

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "thandi@example.com");
}

#[tokio::test]
async fn test_mailed_link_verifies_email() {
    let (app, mailer) = test_app().await;

    let registered = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            register_payload("thandi@example.com"),
        ))
        .await
        .unwrap();
    let body = json_body(registered).await;
    assert_eq!(body["user"]["is_verified"], false);

    // The mail body ends with the verification link
    let mail_body = mailer.sent()[0].2.clone();
    let token = mail_body.rsplit('/').next().unwrap().to_string();
    assert!(!token.is_empty());

    // No Authorization header; the link itself is the credential
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/auth/verify-email/{}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let verified = json_body(response).await;
    assert_eq!(verified["is_verified"], true);
    assert_eq!(verified["email"], "thandi@example.com");
}

#[tokio::test]
async fn test_access_token_is_not_a_verification_link() {
    let (app, _mailer) = test_app().await;

    let registered = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            register_payload("thandi@example.com"),
        ))
        .await
        .unwrap();
    let access_token = json_body(registered).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/auth/verify-email/{}", access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verification_token_cannot_reach_protected_routes() {
    let (app, mailer) = test_app().await;

    app.clone()
        .oneshot(post_json(
            "/api/auth/register",
            register_payload("thandi@example.com"),
        ))
        .await
        .unwrap();
    let mail_body = mailer.sent()[0].2.clone();
    let verification = mail_body.rsplit('/').next().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", verification))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let (app, _mailer) = test_app().await;

    let first = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            register_payload("thandi@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(post_json(
            "/api/auth/register",
            register_payload("thandi@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = json_body(second).await;
    assert_eq!(body["code"], 1005);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _mailer) = test_app().await;
    app.clone()
        .oneshot(post_json(
            "/api/auth/register",
            register_payload("thandi@example.com"),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": "thandi@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn test_catalog_is_public_but_orders_are_not() {
    let (app, _mailer) = test_app().await;

    let catalog = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/customers/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(catalog.status(), StatusCode::OK);

    let orders = app
        .oneshot(
            Request::builder()
                .uri("/api/customers/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(orders.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_token_cannot_reach_admin_routes() {
    let (app, _mailer) = test_app().await;

    let registered = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            register_payload("thandi@example.com"),
        ))
        .await
        .unwrap();
    let token = json_body(registered).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/stores")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
