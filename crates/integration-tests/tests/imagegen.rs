//! End-to-end tests for the image generation endpoints

mod harness;

use harness::config::ConfigBuilder;
use harness::mock_inference::MockInference;
use harness::server::TestServer;
use serde_json::json;

#[tokio::test]
async fn stable_diffusion_returns_data_uri() {
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a];
    let mock = MockInference::returning_binary(png.clone(), "image/png").await.unwrap();
    let config = ConfigBuilder::new().with_inference(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/images/stable-diffusion"))
        .json(&json!({"prompt": "a lighthouse at dusk"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let image = body["image"].as_str().unwrap();
    // The data-URI label is always jpeg, whatever the actual bytes
    assert!(image.starts_with("data:image/jpeg;base64,"));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn flux_accepts_inputs_field() {
    let mock = MockInference::returning_binary(vec![0xff, 0xd8, 0xff], "image/jpeg")
        .await
        .unwrap();
    let config = ConfigBuilder::new().with_inference(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/images/flux"))
        .json(&json!({"inputs": "a forest in autumn"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["image"].as_str().unwrap().starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn missing_prompt_is_400() {
    let mock = MockInference::returning(json!({})).await.unwrap();
    let config = ConfigBuilder::new().with_inference(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/images/stable-diffusion"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Prompt is required");
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn upstream_error_body_on_generation_is_not_encoded() {
    let mock = MockInference::failing_then(
        u32::MAX,
        axum::http::StatusCode::BAD_REQUEST,
        json!({"error": "Prompt rejected by safety filter"}),
        json!({}),
    )
    .await
    .unwrap();
    let config = ConfigBuilder::new().with_inference(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/images/flux"))
        .json(&json!({"prompt": "something"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Prompt rejected by safety filter");
}
