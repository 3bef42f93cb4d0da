//! Session, health and fallback routes.

use crate::http_api::helpers::{TestApp, app, json_request};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use rstest::rstest;
use serde_json::json;
use servicedesk::identity::domain::Role;
use tower::ServiceExt;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_details_requires_a_token(app: TestApp) {
    let (status, body) = app
        .send(json_request(Method::GET, "/api/user-details", None, None))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Please sign in to continue"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_details_returns_the_profile(app: TestApp) {
    let token = app.token("reporter-1", Role::User);
    let (status, body) = app
        .send(json_request(Method::GET, "/api/user-details", Some(&token), None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["firstName"], json!("Nimal"));
    assert_eq!(body["data"]["phone"], json!("0771234567"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_user_is_not_found(app: TestApp) {
    let token = app.token("ghost", Role::User);
    let (status, body) = app
        .send(json_request(Method::GET, "/api/user-details", Some(&token), None))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("User not found"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cookie_credential_is_accepted(app: TestApp) {
    let token = app.token("reporter-1", Role::User);
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/user-details")
        .header(header::COOKIE, format!("theme=dark; token={token}"))
        .body(Body::empty())
        .expect("valid request");

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sign_out_expires_the_cookie(app: TestApp) {
    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::POST, "/api/signout", None, None))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("set-cookie header");
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_service_name(app: TestApp) {
    let (status, body) = app
        .send(json_request(Method::GET, "/health", None, None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("servicedesk"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_route_uses_the_failure_envelope(app: TestApp) {
    let (status, body) = app
        .send(json_request(Method::GET, "/api/nothing-here", None, None))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Route not found"}));
}
