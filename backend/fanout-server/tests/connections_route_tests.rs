mod common;

use common::create_test_app;

use fanout_core::ConnectionId;
use fanout_db::ConnectionStore;

use axum::http::StatusCode;
use googletest::prelude::*;
use serde_json::Value;

async fn only_registered_id(app: &common::TestApp) -> ConnectionId {
    let page = app.store.scan_page(None, 10).await.unwrap();
    assert_that!(page.ids.len(), eq(1));
    page.ids[0].clone()
}

#[tokio::test]
async fn given_live_socket_when_posting_to_its_endpoint_then_200_and_body_delivered() {
    // Given
    let app = create_test_app().await;
    let mut ws = app.connect_socket().await;
    let id = only_registered_id(&app).await;

    // When
    let response = app
        .server
        .post(&format!("/v1/@connections/{}", id.as_str()))
        .text(r#"{"direct":true}"#)
        .await;

    // Then
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(ws.receive_text().await, r#"{"direct":true}"#);
}

#[tokio::test]
async fn given_unknown_connection_when_posting_then_410_gone() {
    // Given
    let app = create_test_app().await;
    let id = ConnectionId::generate();

    // When
    let response = app
        .server
        .post(&format!("/v1/@connections/{}", id.as_str()))
        .text("hello")
        .await;

    // Then
    assert_eq!(response.status_code(), StatusCode::GONE);
    assert_eq!(response.json::<Value>()["error"]["code"], "GONE");
}

#[tokio::test]
async fn given_closed_socket_when_posting_to_its_endpoint_then_410_gone() {
    // Given
    let app = create_test_app().await;
    let ws = app.connect_socket().await;
    let id = only_registered_id(&app).await;
    ws.close().await;
    app.wait_for_registry_count(0).await;

    // When
    let response = app
        .server
        .post(&format!("/v1/@connections/{}", id.as_str()))
        .text("late")
        .await;

    // Then
    assert_eq!(response.status_code(), StatusCode::GONE);
}

#[tokio::test]
async fn given_other_stage_when_posting_then_404() {
    // Given
    let app = create_test_app().await;
    let _ws = app.connect_socket().await;
    let id = only_registered_id(&app).await;

    // When
    let response = app
        .server
        .post(&format!("/prod/@connections/{}", id.as_str()))
        .text("hello")
        .await;

    // Then
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn given_oversized_connection_id_when_posting_then_400() {
    // Given
    let app = create_test_app().await;
    let too_long = "a".repeat(200);

    // When
    let response = app
        .server
        .post(&format!("/v1/@connections/{too_long}"))
        .text("hello")
        .await;

    // Then
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let message = response.json::<Value>()["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert_that!(message, contains_substring("exceeds 128 bytes"));
}
