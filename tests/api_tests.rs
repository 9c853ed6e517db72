//! API integration tests

use axum::Router;
use santa::AppState;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::RecordingNotifier;

fn setup_app(notifier: Arc<RecordingNotifier>) -> Router {
    santa::router(AppState::new(notifier))
}

fn sms_request(body: &str) -> hyper::Request<axum::body::Body> {
    hyper::Request::builder()
        .method("POST")
        .uri("/sms/api")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(Arc::new(RecordingNotifier::default()));

    let response = app
        .oneshot(
            hyper::Request::builder()
                .uri("/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), hyper::StatusCode::OK);
}

#[tokio::test]
async fn test_send_sms_success() {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = setup_app(notifier.clone());

    let response = app
        .oneshot(sms_request(
            r#"{"phone": "+15550001", "message": "Hi Alice, you are Secret Santa for Bob!"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), hyper::StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["result"]["sid"], "SM15550001");
    assert_eq!(json["result"]["to"], "+15550001");

    assert_eq!(
        notifier.calls(),
        vec![(
            "+15550001".to_string(),
            "Hi Alice, you are Secret Santa for Bob!".to_string()
        )]
    );
}

#[tokio::test]
async fn test_send_sms_missing_phone() {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = setup_app(notifier.clone());

    let response = app
        .oneshot(sms_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), hyper::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Phone and message are required.");
    assert!(notifier.calls().is_empty());
}

#[tokio::test]
async fn test_send_sms_empty_message() {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = setup_app(notifier.clone());

    let response = app
        .oneshot(sms_request(r#"{"phone": "+15550001", "message": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), hyper::StatusCode::BAD_REQUEST);
    assert!(notifier.calls().is_empty());
}

#[tokio::test]
async fn test_send_sms_invalid_json() {
    let app = setup_app(Arc::new(RecordingNotifier::default()));

    let response = app.oneshot(sms_request("not json")).await.unwrap();

    assert_eq!(response.status(), hyper::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_send_sms_provider_failure() {
    let notifier = Arc::new(RecordingNotifier::failing(&["+15550002"]));
    let app = setup_app(notifier.clone());

    let response = app
        .oneshot(sms_request(r#"{"phone": "+15550002", "message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Cannot deliver to +15550002");
    assert_eq!(notifier.calls().len(), 1);
}

#[tokio::test]
async fn test_send_sms_wrong_method() {
    let app = setup_app(Arc::new(RecordingNotifier::default()));

    let response = app
        .oneshot(
            hyper::Request::builder()
                .uri("/sms/api")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), hyper::StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_send_sms_non_string_phone() {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = setup_app(notifier.clone());

    let response = app
        .oneshot(sms_request(r#"{"phone": 15550001, "message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), hyper::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid request body"));
    assert!(json.get("success").is_none());
    assert!(notifier.calls().is_empty());
}
