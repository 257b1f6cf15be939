use axum::http::StatusCode;

use crate::integration::common::{
    ADMIN_EMAIL, ADMIN_PASSWORD, CLERK_EMAIL, CLERK_PASSWORD, login, login_pair, request,
    setup_test_app,
};

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app().await;

    let (status, json) = request(&app.router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn login_returns_bearer_pair() {
    let app = setup_test_app().await;

    let (status, json) = request(
        &app.router,
        "POST",
        "/v1/token",
        None,
        Some(serde_json::json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["token_type"], "bearer");
    assert!(json["access_token"].as_str().unwrap().contains('.'));
    assert!(json["refresh_token"].as_str().unwrap().contains('.'));
}

#[tokio::test]
async fn login_with_wrong_password_returns_401() {
    let app = setup_test_app().await;

    let (status, json) = request(
        &app.router,
        "POST",
        "/v1/token",
        None,
        Some(serde_json::json!({"email": ADMIN_EMAIL, "password": "not-the-password"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_unknown_email_returns_401() {
    let app = setup_test_app().await;

    let (status, json) = request(
        &app.router,
        "POST",
        "/v1/token",
        None,
        Some(serde_json::json!({"email": "nobody@tally.test", "password": "whatever-123"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // Same message as a wrong password: no account enumeration.
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn inactive_user_cannot_login() {
    let app = setup_test_app().await;

    app.db
        .user_repo()
        .set_active(CLERK_EMAIL, false, Some(chrono::Utc::now()))
        .await
        .unwrap()
        .unwrap();

    let (status, json) = request(
        &app.router,
        "POST",
        "/v1/token",
        None,
        Some(serde_json::json!({"email": CLERK_EMAIL, "password": CLERK_PASSWORD})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn me_returns_current_user_without_password() {
    let app = setup_test_app().await;
    let token = login(&app.router, CLERK_EMAIL, CLERK_PASSWORD).await;

    let (status, json) = request(&app.router, "GET", "/v1/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], CLERK_EMAIL);
    assert_eq!(json["admin"], false);
    assert_eq!(json["active"], true);
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn me_without_token_returns_401() {
    let app = setup_test_app().await;

    let (status, _) = request(&app.router, "GET", "/v1/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_with_garbage_token_returns_401() {
    let app = setup_test_app().await;

    let (status, _) = request(&app.router, "GET", "/v1/me", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivation_kills_outstanding_tokens() {
    let app = setup_test_app().await;
    let token = login(&app.router, CLERK_EMAIL, CLERK_PASSWORD).await;

    // Token works...
    let (status, _) = request(&app.router, "GET", "/v1/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    app.db
        .user_repo()
        .set_active(CLERK_EMAIL, false, Some(chrono::Utc::now()))
        .await
        .unwrap()
        .unwrap();

    // ...until the account is deactivated, despite not being expired.
    let (status, _) = request(&app.router, "GET", "/v1/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_issues_new_pair() {
    let app = setup_test_app().await;
    let (_, refresh) = login_pair(&app.router, CLERK_EMAIL, CLERK_PASSWORD).await;

    let (status, json) = request(
        &app.router,
        "POST",
        "/v1/refresh",
        None,
        Some(serde_json::json!({"refresh_token": refresh})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let new_access = json["access_token"].as_str().unwrap();

    let (status, json) = request(&app.router, "GET", "/v1/me", Some(new_access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], CLERK_EMAIL);
}

#[tokio::test]
async fn access_token_is_rejected_for_refresh() {
    let app = setup_test_app().await;
    let (access, _) = login_pair(&app.router, CLERK_EMAIL, CLERK_PASSWORD).await;

    let (status, _) = request(
        &app.router,
        "POST",
        "/v1/refresh",
        None,
        Some(serde_json::json!({"refresh_token": access})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_is_rejected_as_bearer() {
    let app = setup_test_app().await;
    let (_, refresh) = login_pair(&app.router, CLERK_EMAIL, CLERK_PASSWORD).await;

    let (status, _) = request(&app.router, "GET", "/v1/me", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_for_deactivated_user_returns_401() {
    let app = setup_test_app().await;
    let (_, refresh) = login_pair(&app.router, CLERK_EMAIL, CLERK_PASSWORD).await;

    app.db
        .user_repo()
        .set_active(CLERK_EMAIL, false, Some(chrono::Utc::now()))
        .await
        .unwrap()
        .unwrap();

    let (status, _) = request(
        &app.router,
        "POST",
        "/v1/refresh",
        None,
        Some(serde_json::json!({"refresh_token": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
