mod common;

use axum::http::StatusCode;
use bson::oid::ObjectId;
use serde_json::json;

use common::{Factory, TestApp};

fn unique_email() -> String {
    format!("test-{}@example.com", ObjectId::new().to_hex())
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new().await;
    let email = unique_email();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": "password123",
            "name": "Test User"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert!(body["token"].as_str().is_some());
    assert!(body["user"]["_id"].as_str().is_some());
    assert_eq!(body["user"]["email"].as_str().unwrap(), email);
    assert_eq!(body["user"]["projects"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);

    // Create a user first
    let auth = factory.create_user().await;

    // Try to register with the same email
    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": auth.email,
            "password": "password123",
            "name": "Another User"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_short_password() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": unique_email(),
            "password": "short",
            "name": "Test User"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    let email = unique_email();

    app.server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": "password123",
            "name": "Test User"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"].as_str().unwrap(), email);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    let email = unique_email();

    app.server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": "password123",
            "name": "Test User"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": "wrong-password"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;

    let response = app
        .server
        .get("/api/auth/me")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["email"].as_str().unwrap(), auth.email);
    assert_eq!(body["_id"].as_str().unwrap(), auth.user_id.to_hex());
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/auth/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/api/auth/me")
        .add_header("Authorization", "Bearer not-a-real-token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
