//! End-to-end session flow against a mocked completion service.

use charla_application::{ChatEngine, SubmitOutcome};
use charla_core::config::{DEFAULT_FALLBACK_REPLY, EngineConfig};
use charla_core::error::ChatError;
use charla_core::prompt;
use charla_core::session::{AttachmentRef, TurnRole};
use charla_interaction::HttpCompletionClient;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;

const CHAT_PATH: &str = "/bedrock-chat/chat";

fn engine_for(server: &MockServer) -> ChatEngine {
    let config = Arc::new(EngineConfig {
        endpoint: server.url(CHAT_PATH),
        request_timeout_secs: 5,
        ..EngineConfig::default()
    });
    let client = HttpCompletionClient::from_config(&config).unwrap();
    ChatEngine::new(config, Arc::new(client)).unwrap()
}

#[tokio::test]
async fn test_http_500_appends_single_fallback_turn() {
    let server = MockServer::start_async().await;
    let engine = engine_for(&server);
    let before = engine.snapshot().await;
    let expected_prompt = prompt::compose(&before, "hola", None);

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(CHAT_PATH).json_body(json!({
                "prompt": expected_prompt,
                "mode": "amigo",
            }));
            then.status(500).json_body(json!({ "error": "boom" }));
        })
        .await;

    let outcome = engine.submit("  hola ", None).await.unwrap();
    let SubmitOutcome::Fallback { error, .. } = outcome else {
        panic!("expected fallback, got {outcome:?}");
    };
    assert_eq!(error, ChatError::service(500, "boom"));
    mock.assert_hits_async(1).await;

    let session = engine.snapshot().await;
    assert!(!session.busy);
    assert_eq!(session.transcript.len(), before.transcript.len() + 2);
    let last = session.last_turn().unwrap();
    assert_eq!(last.role, TurnRole::Assistant);
    assert_eq!(last.text, DEFAULT_FALLBACK_REPLY);
    assert_eq!(engine.reveals_started(), 0);
}

#[tokio::test]
async fn test_http_success_posts_attachment_and_reveals_reply() {
    let server = MockServer::start_async().await;
    let engine = engine_for(&server);
    let attachment = AttachmentRef::new("placa.png", "data:image/png;base64,iVBORw0KGgo=");
    let expected_prompt = prompt::compose(&engine.snapshot().await, "¿qué ves?", Some(&attachment));
    assert!(expected_prompt.contains("Último tema propuesto:"));

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(CHAT_PATH).json_body(json!({
                "prompt": expected_prompt,
                "mode": "amigo",
                "imageName": "placa.png",
                "imageData": "data:image/png;base64,iVBORw0KGgo=",
            }));
            then.status(200)
                .json_body(json!({ "response": "¡Una placa! ¿Vemos sus pines?" }));
        })
        .await;

    engine.attach(attachment).await;
    let outcome = engine.submit("¿qué ves?", None).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Revealing { .. }), "got {outcome:?}");
    engine.wait_idle().await;
    mock.assert_async().await;

    let session = engine.snapshot().await;
    assert!(!session.busy);
    assert!(session.pending_attachment.is_none());
    assert_eq!(
        session.last_turn().unwrap().text,
        "¡Una placa! ¿Vemos sus pines?"
    );
}
