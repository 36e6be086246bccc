use alttext_core::ServiceConfig;
use alttext_server::http::handlers::ROOT_MESSAGE;
use pretty_assertions::assert_eq;
use serde_json::Value;

use super::spawn_app;

#[tokio::test]
async fn root_reports_running() {
    let addr = spawn_app(ServiceConfig::default()).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), ROOT_MESSAGE);
}

#[tokio::test]
async fn healthz_returns_status_and_version() {
    let addr = spawn_app(ServiceConfig::default()).await;

    let body: Value = reqwest::get(format!("http://{addr}/healthz"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let addr = spawn_app(ServiceConfig::default()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/healthz"))
        .header("x-request-id", "req-from-caller")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-from-caller")
    );
}
