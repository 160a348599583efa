use std::time::Duration;

use axum::{body::Body, http::Request};
use subtrack_server::{api::app_router, build_state, config::Config};
use tempfile::tempdir;
use tower::ServiceExt;

fn test_config(dir: &std::path::Path) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        shutdown_grace: Duration::from_secs(1),
    }
}

#[tokio::test]
async fn healthz_works() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config);

    let response = app
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn openapi_document_lists_subscription_routes() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config);

    let response = app
        .oneshot(Request::builder().uri("/api/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/subscriptions"));
    assert!(paths.contains_key("/api/subscriptions/{id}"));
    assert!(paths.contains_key("/api/subscriptions/summary/{user_id}/{service_name}"));
}
