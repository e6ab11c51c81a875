// tests/proxy_tests.rs

mod common;

use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
use common::{ScriptedSandbox, register_and_login, spawn_app, spawn_app_with, test_config};
use serde_json::{Value, json};

/// Fake execution API: echoes what it received on `/python/latest`,
/// answers plain text on `/cpp/latest` and fails on `/java/latest`.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route(
            "/python/latest",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({ "stdout": "2\n", "stderr": "", "error": "", "auth": auth, "received": body }))
            }),
        )
        .route("/cpp/latest", post(|| async { "compiled and ran" }))
        .route(
            "/java/latest",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    address
}

#[tokio::test]
async fn run_forwards_a_single_file_and_relays_the_body() {
    let upstream = spawn_upstream().await;
    let mut config = test_config();
    config.execution_api_url = upstream;
    config.execution_api_token = Some("glot-token".to_string());

    let app = spawn_app_with(config, ScriptedSandbox::new()).await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &app.address).await;

    let response = client
        .post(format!("{}/api/run/python", app.address))
        .bearer_auth(&token)
        .json(&json!({ "sourceText": "print(1 + 1)" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["stdout"], "2\n");
    assert_eq!(body["auth"], "Token glot-token");
    assert_eq!(
        body["received"],
        json!({ "files": [{ "name": "app.py", "content": "print(1 + 1)" }] })
    );
}

#[tokio::test]
async fn run_relays_the_upstream_content_type() {
    let upstream = spawn_upstream().await;
    let mut config = test_config();
    config.execution_api_url = upstream;
    config.execution_api_token = Some("glot-token".to_string());

    let app = spawn_app_with(config, ScriptedSandbox::new()).await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &app.address).await;

    let response = client
        .post(format!("{}/api/run/cpp", app.address))
        .bearer_auth(&token)
        .json(&json!({ "sourceText": "int main() {}" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["content-type"], "text/plain; charset=utf-8");
    assert_eq!(response.text().await.unwrap(), "compiled and ran");
}

#[tokio::test]
async fn upstream_failures_become_a_generic_error() {
    let upstream = spawn_upstream().await;
    let mut config = test_config();
    config.execution_api_url = upstream;
    config.execution_api_token = Some("glot-token".to_string());

    let app = spawn_app_with(config, ScriptedSandbox::new()).await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &app.address).await;

    let response = client
        .post(format!("{}/api/run/java", app.address))
        .bearer_auth(&token)
        .json(&json!({ "sourceText": "class Main {}" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn unreachable_upstream_is_a_generic_error() {
    let mut config = test_config();
    config.execution_api_token = Some("glot-token".to_string());

    let app = spawn_app_with(config, ScriptedSandbox::new()).await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &app.address).await;

    let response = client
        .post(format!("{}/api/run/python", app.address))
        .bearer_auth(&token)
        .json(&json!({ "sourceText": "print(1)" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn run_without_api_token_is_unavailable() {
    let app = spawn_app(ScriptedSandbox::new()).await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &app.address).await;

    let response = client
        .post(format!("{}/api/run/python", app.address))
        .bearer_auth(&token)
        .json(&json!({ "sourceText": "print(1)" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 503);
}

#[tokio::test]
async fn run_requires_login_and_a_known_language() {
    let app = spawn_app(ScriptedSandbox::new()).await;
    let client = reqwest::Client::new();

    let anonymous = client
        .post(format!("{}/api/run/python", app.address))
        .json(&json!({ "sourceText": "print(1)" }))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let token = register_and_login(&client, &app.address).await;
    let unknown = client
        .post(format!("{}/api/run/cobol", app.address))
        .bearer_auth(&token)
        .json(&json!({ "sourceText": "DISPLAY 'HI'." }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 404);
}
