use alttext_core::AltTextService;
use alttext_core::ErrorKind;
use alttext_core::GenerationRequest;
use alttext_core::PipelineOptions;
use alttext_core::ServiceConfig;
use alttext_core::classify::ImageType;
use alttext_core::classify::Language;
use core_test_support::chat_requests;
use core_test_support::config_for;
use core_test_support::mount_chat_completion;
use core_test_support::mount_chat_response;
use core_test_support::png_bytes;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

fn request() -> GenerationRequest {
    GenerationRequest::new(png_bytes(), "image/png")
}

#[tokio::test]
async fn compliant_reply_yields_clean_bundle() {
    let server = MockServer::start().await;
    mount_chat_completion(&server, "The cat sits on a red mat.").await;

    let service = AltTextService::from_config(&config_for(&server));
    let bundle = service.generate(request()).await.unwrap();

    assert_eq!(bundle.alt_text, "The cat sits on a red mat.");
    assert_eq!(bundle.length, 26);
    assert_eq!(bundle.warning, "");
    assert_eq!(bundle.score, Some(100));
    assert_eq!(bundle.image_type, Some(ImageType::Photograph));
    assert_eq!(bundle.language, Some(Language::English));
}

#[tokio::test]
async fn non_compliant_reply_is_reported_not_rewritten() {
    let server = MockServer::start().await;
    mount_chat_completion(&server, "This image possibly shows a cat").await;

    let service = AltTextService::from_config(&config_for(&server));
    let bundle = service.generate(request()).await.unwrap();

    assert_eq!(bundle.alt_text, "This image possibly shows a cat");
    assert_eq!(bundle.score, Some(50));
    assert_eq!(
        bundle.warning,
        "Forbidden terms detected (image, possibly) and missing starting article"
    );
}

#[tokio::test]
async fn overlong_reply_is_truncated() {
    let server = MockServer::start().await;
    let long = format!("A {}", "tall tree ".repeat(65));
    assert_eq!(long.chars().count(), 652);
    mount_chat_completion(&server, &long).await;

    let service = AltTextService::from_config(&config_for(&server));
    let bundle = service.generate(request()).await.unwrap();

    assert_eq!(bundle.length, 600);
    assert!(bundle.alt_text.ends_with("..."));
    assert_eq!(bundle.score, Some(70));
    assert_eq!(bundle.warning, "Alt text exceeds 600 characters");
}

#[tokio::test]
async fn disabled_tiers_are_absent_from_json() {
    let server = MockServer::start().await;
    mount_chat_completion(&server, "A flowchart of the signup flow").await;

    let config = ServiceConfig {
        pipeline: PipelineOptions {
            enable_classification: false,
            enable_scoring: false,
            auto_truncate: true,
        },
        ..config_for(&server)
    };
    let bundle = AltTextService::from_config(&config)
        .generate(request())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&bundle).unwrap(),
        json!({
            "altText": "A flowchart of the signup flow",
            "length": 30,
            "warning": ""
        })
    );
}

#[tokio::test]
async fn empty_image_never_reaches_the_model() {
    let server = MockServer::start().await;
    mount_chat_completion(&server, "A dog.").await;

    let service = AltTextService::from_config(&config_for(&server));
    let err = service
        .generate(GenerationRequest::new(Vec::new(), "image/png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingInput);
    assert!(chat_requests(&server).await.is_empty());
}

#[tokio::test]
async fn missing_credential_is_misconfigured() {
    let server = MockServer::start().await;
    mount_chat_completion(&server, "A dog.").await;

    let config = ServiceConfig {
        openai_api_key: None,
        ..config_for(&server)
    };
    let err = AltTextService::from_config(&config)
        .generate(request())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Misconfigured);
    assert_eq!(err.public_message(), "Model provider credential not configured");
    assert!(chat_requests(&server).await.is_empty());
}

#[tokio::test]
async fn empty_choices_is_upstream_invalid_response() {
    let server = MockServer::start().await;
    mount_chat_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })),
    )
    .await;

    let err = AltTextService::from_config(&config_for(&server))
        .generate(request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamInvalidResponse);
}

#[tokio::test]
async fn provider_failure_is_upstream_invalid_response() {
    let server = MockServer::start().await;
    mount_chat_response(
        &server,
        ResponseTemplate::new(500).set_body_string("upstream exploded"),
    )
    .await;

    let err = AltTextService::from_config(&config_for(&server))
        .generate(request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamInvalidResponse);
    assert_eq!(err.public_message(), "Invalid response from model provider");
}

#[tokio::test]
async fn user_rules_and_context_are_forwarded() {
    let server = MockServer::start().await;
    mount_chat_completion(&server, "A red barn.").await;

    let request = GenerationRequest {
        context_text: Some("Spring open day at the farm".to_string()),
        rules: Some("Keep it short".to_string()),
        dos: Some("name colors".to_string()),
        donts: Some("mention weather".to_string()),
        ..request()
    };
    AltTextService::from_config(&config_for(&server))
        .generate(request)
        .await
        .unwrap();

    let requests = chat_requests(&server).await;
    let system = requests[0]["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("DO\nname colors\n\nDO NOT\nmention weather\n\nKeep it short"));
    let user_text = requests[0]["messages"][1]["content"][0]["text"]
        .as_str()
        .unwrap();
    assert!(user_text.contains("Spring open day at the farm"));
}

#[tokio::test]
async fn unreachable_provider_is_transport_failure() {
    let server = MockServer::start().await;
    let config = ServiceConfig {
        request_timeout: std::time::Duration::from_secs(2),
        ..config_for(&server)
    };
    drop(server);

    let err = AltTextService::from_config(&config)
        .generate(request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamTransportFailure);
    assert_eq!(err.public_message(), "Model provider unreachable");
}
