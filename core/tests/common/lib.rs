#![allow(clippy::unwrap_used, clippy::expect_used)]

use alttext_core::config::ServiceConfig;
use serde_json::Value;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const TEST_API_KEY: &str = "sk-test-key";

/// Eight-byte PNG signature. Enough for the relay, which never decodes.
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
}

/// Configuration pointing the model client at `server`.
pub fn config_for(server: &MockServer) -> ServiceConfig {
    ServiceConfig {
        openai_api_key: Some(TEST_API_KEY.to_string()),
        api_base_url: server.uri(),
        ..Default::default()
    }
}

/// Chat Completions body with one assistant choice containing `text`.
pub fn chat_completion_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4.1-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
}

/// Mount a chat-completions responder that always replies with `text`.
pub async fn mount_chat_completion(server: &MockServer, text: &str) {
    mount_chat_response(
        server,
        ResponseTemplate::new(200).set_body_json(chat_completion_body(text)),
    )
    .await;
}

pub async fn mount_chat_response(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(CHAT_COMPLETIONS_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

/// JSON bodies of every chat-completions request the server received.
pub async fn chat_requests(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == CHAT_COMPLETIONS_PATH)
        .map(|request| request.body_json::<Value>().expect("request body is JSON"))
        .collect()
}
