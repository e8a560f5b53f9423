//! Integration tests for the OpenAI-compatible analyzer against a local
//! mock endpoint.

use mapdoc::core::config::ApiConfig;
use mapdoc::core::{Analyzer, AnalyzerError, OpenAiAnalyzer};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing at the mock server, with an inline key so the tests
/// never touch process environment variables.
fn config_for(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        model: "gpt-4o".to_string(),
        api_key_env: "MAPDOC_UNUSED_KEY".to_string(),
        api_key: Some("sk-test".to_string()),
    }
}

#[tokio::test]
async fn test_complete_sends_openai_chat_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "Summarize this mapping"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "A tidy summary."},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = OpenAiAnalyzer::new(&config_for(&server)).unwrap();
    let reply = analyzer.complete("Summarize this mapping").await.unwrap();
    assert_eq!(reply, "A tidy summary.");
}

#[tokio::test]
async fn test_complete_http_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let analyzer = OpenAiAnalyzer::new(&config_for(&server)).unwrap();
    let err = analyzer.complete("anything").await.unwrap_err();

    match err {
        AnalyzerError::ApiRequest { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("backend exploded"));
        }
        other => panic!("expected ApiRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_complete_rejects_non_json_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let analyzer = OpenAiAnalyzer::new(&config_for(&server)).unwrap();
    let err = analyzer.complete("anything").await.unwrap_err();

    assert!(matches!(err, AnalyzerError::ResponseParse { .. }));
    assert!(err.to_string().contains("invalid JSON"));
}

#[tokio::test]
async fn test_complete_rejects_completion_without_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let analyzer = OpenAiAnalyzer::new(&config_for(&server)).unwrap();
    let err = analyzer.complete("anything").await.unwrap_err();

    assert!(err.to_string().contains("no message content"));
}
