//! Catalog routes exercised through the router.

use crate::http_api::helpers::{Part, TestApp, app, json_request, multipart_request, text_at};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;
use servicedesk::catalog::domain::InventoryItem;
use servicedesk::identity::domain::Role;

async fn create_product(app: &TestApp, token: &str, name: &str, price: &str) -> String {
    let (status, body) = app
        .send(multipart_request(
            Method::POST,
            "/api/products",
            Some(token),
            &[
                Part::Text("name", name),
                Part::Text("price", price),
                Part::Text("category", "Cooling"),
                Part::File("images", "unit.jpg", b"png"),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    text_at(&body, "/data/id").to_owned()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customers_cannot_create_products(app: TestApp) {
    let customer = app.token("reporter-1", Role::User);

    let (status, body) = app
        .send(multipart_request(
            Method::POST,
            "/api/products",
            Some(&customer),
            &[
                Part::Text("name", "Split AC"),
                Part::Text("price", "1999.99"),
                Part::File("images", "ac.jpg", b"bytes"),
            ],
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
    assert!(app.media.is_empty(), "rejected uploads are discarded");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn staff_create_stores_price_in_minor_units(app: TestApp) {
    let staff = app.token("staff-1", Role::Staff);
    let product_id = create_product(&app, &staff, "Split AC", "1999.05").await;

    let (status, body) = app
        .send(json_request(
            Method::GET,
            &format!("/api/products/{product_id}"),
            None,
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], json!(199_905));
    assert_eq!(body["data"]["isActive"], json!(true));
    assert_eq!(body["data"]["images"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_price_is_a_validation_error(app: TestApp) {
    let staff = app.token("staff-1", Role::Staff);
    let (status, _) = app
        .send(multipart_request(
            Method::POST,
            "/api/products",
            Some(&staff),
            &[Part::Text("name", "Fan"), Part::Text("price", "-4")],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn minus_one_limit_returns_every_product(app: TestApp) {
    let staff = app.token("staff-1", Role::Staff);
    for index in 0..3 {
        create_product(&app, &staff, &format!("Model {index}"), "10").await;
    }

    let (status, body) = app
        .send(json_request(
            Method::GET,
            "/api/products?limit=-1&sortBy=name&sortOrder=asc",
            None,
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["data"]["items"][0]["name"], json!("Model 0"));
    assert_eq!(body["data"]["pagination"]["pages"], json!(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn other_negative_limits_are_rejected(app: TestApp) {
    let (status, _) = app
        .send(json_request(Method::GET, "/api/products?limit=-5", None, None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_name_case_insensitively(app: TestApp) {
    let staff = app.token("staff-1", Role::Staff);
    create_product(&app, &staff, "Inverter AC", "250").await;
    create_product(&app, &staff, "Water pump", "80").await;

    let (status, body) = app
        .send(json_request(
            Method::GET,
            "/api/products/search?q=inverter",
            None,
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], json!(1));
    assert_eq!(body["data"]["items"][0]["name"], json!("Inverter AC"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn toggle_hides_product_from_active_listing(app: TestApp) {
    let staff = app.token("staff-1", Role::Staff);
    let product_id = create_product(&app, &staff, "Dehumidifier", "120").await;

    let (status, body) = app
        .send(json_request(
            Method::PATCH,
            &format!("/api/products/{product_id}/toggle-active"),
            Some(&staff),
            None,
        ))
        .await;
    let (_, listing) = app
        .send(json_request(Method::GET, "/api/products?active=true", None, None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Product deactivated"));
    assert_eq!(listing["data"]["pagination"]["total"], json!(0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacing_images_purges_the_old_ones(app: TestApp) {
    let staff = app.token("staff-1", Role::Staff);
    let product_id = create_product(&app, &staff, "Heater", "45").await;

    let (status, body) = app
        .send(multipart_request(
            Method::PUT,
            &format!("/api/products/{product_id}"),
            Some(&staff),
            &[
                Part::Text("replaceImages", "true"),
                Part::File("images", "new.jpg", b"fresh"),
            ],
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["images"].as_array().map(Vec::len), Some(1));
    assert_eq!(app.media.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_of_unknown_product_is_not_found(app: TestApp) {
    let staff = app.token("staff-1", Role::Staff);
    let (status, _) = app
        .send(json_request(
            Method::DELETE,
            "/api/products/7f1c4b3e-2a6d-4f0e-9a43-1d2b3c4d5e6f",
            Some(&staff),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inventory_options_are_staff_only(app: TestApp) {
    app.inventory
        .insert(InventoryItem::new("inv-7", "Arctic 9", "LG", 5))
        .expect("inventory insert");
    let customer = app.token("reporter-1", Role::User);
    let staff = app.token("staff-1", Role::Staff);

    let (forbidden, _) = app
        .send(json_request(
            Method::GET,
            "/api/products/inventory",
            Some(&customer),
            None,
        ))
        .await;
    let (status, body) = app
        .send(json_request(
            Method::GET,
            "/api/products/inventory",
            Some(&staff),
            None,
        ))
        .await;

    assert_eq!(forbidden, StatusCode::FORBIDDEN);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([{"id": "inv-7", "modelName": "Arctic 9", "brandName": "LG", "quantity": 5}])
    );
}
