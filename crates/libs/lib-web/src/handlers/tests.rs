use crate::server::{create_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use lib_core::model::store::models::QuestionRecord;
use lib_core::model::store::{memory_pool, QuestionRepository};
use lib_core::{Config, DbPool};
use serde_json::{json, Value};
use tower::ServiceExt;

/// In-memory database with the schema applied
async fn setup_test_db() -> DbPool {
    memory_pool().await.expect("Failed to create test database")
}

fn test_app(pool: DbPool) -> Router {
    create_router(AppState::new(pool, Config::default()), Vec::new())
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ========== Health / Routing ==========

#[tokio::test]
async fn test_health_and_fallback() {
    let app = test_app(setup_test_db().await);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Question History ==========

#[tokio::test]
async fn test_previous_questions_newest_first() {
    let pool = setup_test_db().await;
    for q in ["first", "second"] {
        let record = QuestionRecord::new(q.into(), format!("answer to {}", q), "Title".into());
        QuestionRepository::create(&pool, &record).await.unwrap();
    }

    let (status, body) = send(test_app(pool), "GET", "/previous-questions", None).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["question"], "second");
    assert_eq!(items[0]["category"], "AI Response");
    assert_eq!(items[0]["author"], "Anonymous User");
    assert!(items[0]["_id"].is_string());
}

#[tokio::test]
async fn test_previous_questions_empty() {
    let (status, body) = send(test_app(setup_test_db().await), "GET", "/previous-questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// ========== Alerts ==========

#[tokio::test]
async fn test_submit_report_then_list() {
    let app = test_app(setup_test_db().await);

    let (status, created) = send(
        app.clone(),
        "POST",
        "/submit-report",
        Some(json!({"location": "Kochi", "description": "red eyes"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Symptom Report - Kochi");
    assert_eq!(created["severity"], "medium");
    assert_eq!(created["coordinates"]["lat"], 10.8505);
    assert_eq!(created["preventiveMeasures"].as_array().unwrap().len(), 3);

    let (status, alerts) = send(app, "GET", "/alerts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alerts.as_array().unwrap().len(), 1);
    assert_eq!(alerts[0]["_id"], created["_id"]);
}

#[tokio::test]
async fn test_submit_report_missing_fields() {
    let app = test_app(setup_test_db().await);

    let (status, body) = send(app, "POST", "/submit-report", Some(json!({"location": "Kochi"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: location and description");
}

// ========== Detection ==========

#[tokio::test]
async fn test_detect_validation_errors() {
    let app = test_app(setup_test_db().await);

    let (status, body) = send(app.clone(), "POST", "/detect", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image provided");

    let (status, body) = send(app.clone(), "POST", "/detect", Some(json!({"image": "garbage"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid image data");

    let (status, body) = send(
        app,
        "POST",
        "/detect",
        Some(json!({"image": "data:image/png;base64,aGVsbG8gd29ybGQ="})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not decode image");
}

#[tokio::test]
async fn test_detect_truncated_png_is_bad_request() {
    let app = test_app(setup_test_db().await);
    // PNG signature with nothing after it
    let (status, body) = send(app, "POST", "/detect", Some(json!({"image": "data:image/png;base64,iVBORw0KGgo="}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not decode image");
}

#[tokio::test]
async fn test_detect_without_api_key_is_server_error() {
    let app = test_app(setup_test_db().await);
    // 1x1 PNG
    let image = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
    let (status, body) = send(app, "POST", "/detect", Some(json!({"image": image}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "Config");
}
