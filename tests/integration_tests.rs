//! Integration tests
//!
//! Drive the full router against a mocked upstream provider

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chat_relay::config::Settings;
use chat_relay::handlers::create_router;
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use tower::ServiceExt;

const TEST_KEY: &str = "sk-test-key-for-integration-testing-1234567890";

/// Create test settings pointing at `api_url`
fn create_test_settings(api_url: &str, extra: &[(&str, &str)]) -> Settings {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("OPENAI_API_KEY".to_string(), TEST_KEY.to_string());
    vars.insert("OPENAI_API_URL".to_string(), api_url.to_string());
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }

    Settings::from_lookup(|key| vars.get(key).cloned()).expect("Failed to create test settings")
}

async fn create_test_app(api_url: &str) -> Router {
    create_router(create_test_settings(api_url, &[]))
        .await
        .expect("Failed to create router")
}

fn chat_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn upstream_reply() -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "## Hello\n\n- one\n- two", "refusal": null},
            "logprobs": null,
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 1000,
            "completion_tokens": 500,
            "total_tokens": 1500,
            "completion_tokens_details": {"reasoning_tokens": 0}
        },
        "system_fingerprint": "fp_test"
    })
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app("http://127.0.0.1:9/v1/chat/completions").await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = read_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "chat-relay");
    assert_eq!(health["provider"], "openai");
    assert!(health["version"].is_string());
    assert!(health["timestamp"].is_string());
}

#[tokio::test]
async fn test_relay_forwards_choices_and_usage_verbatim() {
    let server = MockServer::start_async().await;
    let reply = upstream_reply();

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization".to_string(), format!("Bearer {}", TEST_KEY))
                .header("x-openai-data-usage", "off")
                .json_body(json!({
                    "model": "gpt-4o-mini",
                    "messages": [
                        {"role": "system", "content": "Be brief."},
                        {"role": "user", "content": "Hello"}
                    ]
                }));
            then.status(200).json_body(reply.clone());
        })
        .await;

    let app = create_test_app(&server.url("/v1/chat/completions")).await;
    let response = app
        .oneshot(chat_request(&json!({
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Hello"}
            ],
            "model": "gpt-4o-mini"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    assert_eq!(
        body,
        json!({
            "choices": reply["choices"].clone(),
            "usage": reply["usage"].clone()
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_null_usage_forwarded_as_null() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({
                "choices": [{"message": {"role": "assistant", "content": "hi"}}],
                "usage": null
            }));
        })
        .await;

    let app = create_test_app(&server.url("/v1/chat/completions")).await;
    let response = app
        .oneshot(chat_request(&json!({
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({
            "choices": [{"message": {"role": "assistant", "content": "hi"}}],
            "usage": null
        })
    );
}

#[tokio::test]
async fn test_missing_usage_stays_absent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({
                "choices": [{"message": {"role": "assistant", "content": "hi"}}]
            }));
        })
        .await;

    let app = create_test_app(&server.url("/v1/chat/completions")).await;
    let response = app
        .oneshot(chat_request(&json!({
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body.get("usage").is_none());
}

#[tokio::test]
async fn test_missing_model_uses_default() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).json_body(json!({
                "model": "gpt-4o-2024-08-06",
                "messages": [{"role": "user", "content": "Hello"}]
            }));
            then.status(200).json_body(upstream_reply());
        })
        .await;

    let app = create_test_app(&server.url("/v1/chat/completions")).await;
    let response = app
        .oneshot(chat_request(&json!({
            "messages": [{"role": "user", "content": "Hello"}],
            "model": ""
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_input_never_reaches_upstream() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(upstream_reply());
        })
        .await;

    let invalid_bodies = vec![
        json!({"messages": []}),
        json!({"messages": "hello"}),
        json!({"messages": [{"role": "user"}]}),
        json!({"messages": [{"content": "hi"}]}),
        json!({"messages": [{"role": "", "content": "hi"}]}),
        json!({"messages": [{"role": "user", "content": 42}]}),
        json!({"messages": [{"role": "user", "content": "hi"}], "model": 4}),
        json!({}),
        json!([{"role": "user", "content": "hi"}]),
    ];

    for body in invalid_bodies {
        let app = create_test_app(&server.url("/v1/chat/completions")).await;
        let response = app.oneshot(chat_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(read_json(response).await, json!({"error": "Invalid input"}));
    }

    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_unparseable_body_is_invalid_input() {
    let app = create_test_app("http://127.0.0.1:9/v1/chat/completions").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from("{\"messages\": ["))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upstream_error_is_generic() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(401).json_body(json!({
                "error": {
                    "message": "Incorrect API key provided: sk-test***",
                    "type": "invalid_request_error",
                    "code": "invalid_api_key"
                }
            }));
        })
        .await;

    let app = create_test_app(&server.url("/v1/chat/completions")).await;
    let response = app
        .oneshot(chat_request(&json!({
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json(response).await,
        json!({"error": "Failed to fetch response from OpenAI API"})
    );
}

#[tokio::test]
async fn test_malformed_upstream_body_is_upstream_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).body("not json at all");
        })
        .await;

    let app = create_test_app(&server.url("/v1/chat/completions")).await;
    let response = app
        .oneshot(chat_request(&json!({
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unreachable_upstream_is_upstream_error() {
    // Port 9 (discard) is not listening on test machines
    let app = create_test_app("http://127.0.0.1:9/v1/chat/completions").await;

    let response = app
        .oneshot(chat_request(&json!({
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json(response).await,
        json!({"error": "Failed to fetch response from OpenAI API"})
    );
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let settings = create_test_settings(
        "http://127.0.0.1:9/v1/chat/completions",
        &[("MAX_REQUEST_SIZE", "64")],
    );
    let app = create_router(settings).await.unwrap();

    let body = json!({
        "messages": [{"role": "user", "content": "x".repeat(500)}]
    })
    .to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        read_json(response).await,
        json!({"error": "Request body too large"})
    );
}

#[tokio::test]
async fn test_oversized_body_without_length_rejected() {
    let settings = create_test_settings(
        "http://127.0.0.1:9/v1/chat/completions",
        &[("MAX_REQUEST_SIZE", "64")],
    );
    let app = create_router(settings).await.unwrap();

    let body = json!({
        "messages": [{"role": "user", "content": "x".repeat(500)}]
    })
    .to_string();

    // No Content-Length: the limit trips while the handler buffers the body
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        read_json(response).await,
        json!({"error": "Request body too large"})
    );
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = create_test_app("http://127.0.0.1:9/v1/chat/completions").await;

    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let app = create_test_app("http://127.0.0.1:9/v1/chat/completions").await;

    let request = Request::builder()
        .uri("/v1/messages")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
