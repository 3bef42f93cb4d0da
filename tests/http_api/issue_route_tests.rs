//! Issue routes exercised end to end through the router.

use crate::http_api::helpers::{Part, TestApp, app, json_request, multipart_request, text_at};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;
use servicedesk::http::MAX_FILES_PER_REQUEST;
use servicedesk::identity::domain::Role;

async fn report_issue(app: &TestApp, token: Option<&str>) -> String {
    let (status, body) = app
        .send(multipart_request(
            Method::POST,
            "/api/issues",
            token,
            &[
                Part::Text("title", "AC broken"),
                Part::Text("description", "Unit 4 blows warm air"),
                Part::File("images", "front.jpg", b"jpeg-bytes"),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    text_at(&body, "/data/id").to_owned()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_report_with_contact_is_accepted(app: TestApp) {
    let (status, body) = app
        .send(multipart_request(
            Method::POST,
            "/api/issues",
            None,
            &[
                Part::Text("title", "Fridge leaking"),
                Part::Text("description", "Water under the door"),
                Part::Text("name", "Saman"),
                Part::Text("phone", "0711234567"),
            ],
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("Open"));
    assert_eq!(body["data"]["reporter"], json!(null));
    assert_eq!(body["data"]["contact"]["name"], json!("Saman"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_title_is_a_validation_error(app: TestApp) {
    let (status, body) = app
        .send(multipart_request(
            Method::POST,
            "/api/issues",
            None,
            &[Part::Text("description", "no title")],
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(app.media.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oversized_and_foreign_file_parts_are_rejected(app: TestApp) {
    let big = vec![0_u8; 2048];
    let (oversized, _) = app
        .send(multipart_request(
            Method::POST,
            "/api/issues",
            None,
            &[
                Part::Text("title", "t"),
                Part::Text("description", "d"),
                Part::File("images", "huge.jpg", &big),
            ],
        ))
        .await;
    let (foreign, _) = app
        .send(multipart_request(
            Method::POST,
            "/api/issues",
            None,
            &[
                Part::Text("title", "t"),
                Part::Text("description", "d"),
                Part::File("photo", "a.jpg", b"x"),
            ],
        ))
        .await;

    assert_eq!(oversized, StatusCode::BAD_REQUEST);
    assert_eq!(foreign, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_file_names_are_uploaded_once(app: TestApp) {
    let (status, body) = app
        .send(multipart_request(
            Method::POST,
            "/api/issues",
            None,
            &[
                Part::Text("title", "t"),
                Part::Text("description", "d"),
                Part::File("images", "same.jpg", b"one"),
                Part::File("images", "same.jpg", b"two"),
            ],
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["images"].as_array().map(Vec::len), Some(1));
    assert_eq!(app.media.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn protected_routes_require_a_credential(app: TestApp) {
    let issue_id = report_issue(&app, None).await;

    let (status, body) = app
        .send(json_request(
            Method::GET,
            &format!("/api/issues/{issue_id}"),
            None,
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn forged_token_is_rejected_even_on_anonymous_routes(app: TestApp) {
    let (status, _) = app
        .send(multipart_request(
            Method::POST,
            "/api/issues",
            Some("not-a-jwt"),
            &[Part::Text("title", "t"), Part::Text("description", "d")],
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_all_issues_is_staff_only(app: TestApp) {
    let customer = app.token("reporter-1", Role::User);
    let staff = app.token("staff-1", Role::Staff);
    report_issue(&app, Some(&customer)).await;

    let (forbidden, _) = app
        .send(json_request(Method::GET, "/api/issues", Some(&customer), None))
        .await;
    let (status, body) = app
        .send(json_request(
            Method::GET,
            "/api/issues?status=Open&page=1&limit=5",
            Some(&staff),
            None,
        ))
        .await;

    assert_eq!(forbidden, StatusCode::FORBIDDEN);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], json!(1));
    assert_eq!(body["data"]["pagination"]["limit"], json!(5));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn my_issues_lists_only_own_reports(app: TestApp) {
    let mine = app.token("reporter-1", Role::User);
    let other = app.token("reporter-2", Role::User);
    report_issue(&app, Some(&mine)).await;
    report_issue(&app, Some(&other)).await;

    let (status, body) = app
        .send(json_request(Method::GET, "/api/issues/user", Some(&mine), None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skipping_a_state_is_a_conflict(app: TestApp) {
    let admin = app.token("admin-1", Role::Admin);
    let issue_id = report_issue(&app, None).await;

    let (status, body) = app
        .send(json_request(
            Method::PUT,
            &format!("/api/issues/{issue_id}/status"),
            Some(&admin),
            Some(json!({"status": "Resolved"})),
        ))
        .await;

    assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_issue_moves_to_in_progress_and_notifies(app: TestApp) {
    let reporter = app.token("reporter-1", Role::User);
    let admin = app.token("admin-1", Role::Admin);
    let issue_id = report_issue(&app, Some(&reporter)).await;

    let (assigned, _) = app
        .send(json_request(
            Method::POST,
            &format!("/api/issues/{issue_id}/technician"),
            Some(&admin),
            Some(json!({"technicianId": "tech-1"})),
        ))
        .await;
    let (status, body) = app
        .send(json_request(
            Method::PUT,
            &format!("/api/issues/{issue_id}/status"),
            Some(&admin),
            Some(json!({"status": "in progress"})),
        ))
        .await;

    assert_eq!(assigned, StatusCode::OK);
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], json!("InProgress"));
    let sent = app.notifier.sent();
    assert!(
        sent.iter()
            .any(|sms| sms.recipient.as_str() == "94771234567" && sms.body.contains("In Progress")),
        "expected a status SMS, got {sent:?}"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn messages_are_owner_or_staff_only(app: TestApp) {
    let reporter = app.token("reporter-1", Role::User);
    let stranger = app.token("stranger-1", Role::User);
    let issue_id = report_issue(&app, Some(&reporter)).await;
    let uri = format!("/api/issues/{issue_id}/messages");

    let (forbidden, _) = app
        .send(json_request(
            Method::POST,
            &uri,
            Some(&stranger),
            Some(json!({"body": "any news?"})),
        ))
        .await;
    let (created, body) = app
        .send(json_request(
            Method::POST,
            &uri,
            Some(&reporter),
            Some(json!({"body": "any news?"})),
        ))
        .await;
    let (read, _) = app
        .send(json_request(
            Method::PUT,
            &format!("{uri}/read"),
            Some(&reporter),
            None,
        ))
        .await;

    assert_eq!(forbidden, StatusCode::FORBIDDEN);
    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(body["data"]["messages"][0]["body"], json!("any news?"));
    assert_eq!(read, StatusCode::OK);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_delete_removes_images(app: TestApp) {
    let admin = app.token("admin-1", Role::Admin);
    let issue_id = report_issue(&app, None).await;
    assert_eq!(app.media.len(), 1);

    let (status, body) = app
        .send(json_request(
            Method::DELETE,
            &format!("/api/issues/{issue_id}"),
            Some(&admin),
            None,
        ))
        .await;
    let (missing, _) = app
        .send(json_request(
            Method::GET,
            &format!("/api/issues/{issue_id}"),
            Some(&admin),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["failedMedia"], json!([]));
    assert!(app.media.is_empty());
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_issue_id_is_a_validation_error(app: TestApp) {
    let admin = app.token("admin-1", Role::Admin);
    let (status, _) = app
        .send(json_request(
            Method::GET,
            "/api/issues/not-a-uuid",
            Some(&admin),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn images_can_be_added_without_signing_in(app: TestApp) {
    let issue_id = report_issue(&app, None).await;

    let (status, body) = app
        .send(multipart_request(
            Method::POST,
            &format!("/api/issues/{issue_id}/images"),
            None,
            &[Part::File("images", "side.jpg", b"more")],
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["images"].as_array().map(Vec::len), Some(2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn too_many_images_are_rejected(app: TestApp) {
    let names: Vec<String> = (0..=MAX_FILES_PER_REQUEST)
        .map(|index| format!("photo-{index}.jpg"))
        .collect();
    let mut parts = vec![Part::Text("title", "t"), Part::Text("description", "d")];
    parts.extend(
        names
            .iter()
            .map(|name| Part::File("images", name.as_str(), b"x".as_slice())),
    );

    let (status, body) = app
        .send(multipart_request(Method::POST, "/api/issues", None, &parts))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(app.media.is_empty());
}
