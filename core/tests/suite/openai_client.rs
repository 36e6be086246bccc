use std::time::Duration;

use alttext_core::api_clients::ApiError;
use alttext_core::api_clients::ImageAttachment;
use alttext_core::api_clients::OpenAiConfig;
use alttext_core::api_clients::OpenAiVisionClient;
use alttext_core::api_clients::VisionModel;
use alttext_core::prompt::compose;
use alttext_core::rules;
use core_test_support::TEST_API_KEY;
use core_test_support::chat_completion_body;
use core_test_support::chat_requests;
use core_test_support::config_for;
use core_test_support::mount_chat_completion;
use core_test_support::mount_chat_response;
use core_test_support::png_bytes;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn client_for(server: &MockServer) -> OpenAiVisionClient {
    OpenAiVisionClient::new(
        OpenAiConfig::from(&config_for(server)),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn sends_bearer_auth_and_inline_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_completion_body("A lighthouse.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rule_set = rules::build("mention the sea", "", "");
    let payload = compose(&rule_set, "Coastal walks");
    let image = ImageAttachment::new("image/png", png_bytes());

    let completion = client_for(&server).complete(&payload, &image).await.unwrap();
    assert_eq!(completion.text, "A lighthouse.");

    let requests = chat_requests(&server).await;
    assert_eq!(requests.len(), 1);
    let body = &requests[0];
    assert_eq!(body["model"], json!("gpt-4.1-mini"));
    assert_eq!(body["max_tokens"], json!(300));
    assert_eq!(body["messages"][0]["role"], json!("system"));
    assert!(
        body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("DO\nmention the sea")
    );

    let user_content = body["messages"][1]["content"].as_array().unwrap();
    let last = user_content.last().unwrap();
    assert_eq!(last["type"], json!("image_url"));
    assert_eq!(
        last["image_url"]["url"],
        json!(image.data_uri())
    );
    assert!(
        user_content[0]["text"]
            .as_str()
            .unwrap()
            .contains("Coastal walks")
    );
}

#[tokio::test]
async fn provider_error_message_is_surfaced() {
    let server = MockServer::start().await;
    mount_chat_response(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error"
            }
        })),
    )
    .await;

    let payload = compose(&rules::build("", "", ""), "");
    let image = ImageAttachment::new("image/jpeg", png_bytes());
    let err = client_for(&server)
        .complete(&payload, &image)
        .await
        .unwrap_err();

    match err {
        ApiError::ApiResponse {
            status,
            message,
            error_type,
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
            assert_eq!(error_type.as_deref(), Some("invalid_request_error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_empty_completion() {
    let server = MockServer::start().await;
    mount_chat_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })),
    )
    .await;

    let payload = compose(&rules::build("", "", ""), "");
    let image = ImageAttachment::new("image/png", png_bytes());
    let err = client_for(&server)
        .complete(&payload, &image)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::EmptyCompletion));
}

#[tokio::test]
async fn whitespace_reply_is_empty_completion() {
    let server = MockServer::start().await;
    mount_chat_completion(&server, "  \n ").await;

    let payload = compose(&rules::build("", "", ""), "");
    let image = ImageAttachment::new("image/png", png_bytes());
    let err = client_for(&server)
        .complete(&payload, &image)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::EmptyCompletion));
}

#[tokio::test]
async fn unreachable_provider_is_network_error() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let client = OpenAiVisionClient::new(OpenAiConfig::from(&config), Duration::from_secs(2));
    let payload = compose(&rules::build("", "", ""), "");
    let image = ImageAttachment::new("image/png", png_bytes());
    let err = client.complete(&payload, &image).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}
