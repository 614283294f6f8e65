//! Assistant client tests against a real HTTP server, using wiremock.

mod common;

use assistant_chat::error::{ChatError, NetworkError};
use assistant_chat::traits::ReplyBuffer;
use assistant_chat::StreamOutcome;
use common::{sse_body, test_client, test_config, ASSISTANT};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

fn stream_path() -> String {
    format!("/assistants/{}/chat/stream", ASSISTANT)
}

#[tokio::test]
async fn test_conversation_id_captured_once_and_sent_back() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(stream_path()))
        .and(query_param("message", "first question"))
        .and(query_param_is_missing("conversation_id"))
        .and(header("Accept", "text/event-stream"))
        .and(header("Cache-Control", "no-cache"))
        .respond_with(
            sse_response(sse_body(&["Hel", "lo"])).insert_header("X-Conversation-Id", "abc123"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(stream_path()))
        .and(query_param("message", "second"))
        .and(query_param("conversation_id", "abc123"))
        .respond_with(
            sse_response(sse_body(&["again"])).insert_header("X-Conversation-Id", "zzz999"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut session = client.new_session(ASSISTANT);
    let cancel = CancellationToken::new();

    let mut first = ReplyBuffer::new();
    let outcome = client
        .send_message(&mut session, "first question", &mut first, &cancel)
        .await
        .unwrap();
    assert_eq!(outcome, StreamOutcome::Completed);
    assert_eq!(first.text(), "Hello");
    assert_eq!(session.conversation_id(), Some("abc123"));

    let mut second = ReplyBuffer::new();
    client
        .send_message(&mut session, "second", &mut second, &cancel)
        .await
        .unwrap();
    assert_eq!(second.text(), "again");
    assert_eq!(session.conversation_id(), Some("abc123"));
    assert_eq!(session.exchanges(), 2);
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(stream_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut session = client.new_session(ASSISTANT);
    let mut reply = ReplyBuffer::new();

    let err = client
        .send_message(&mut session, "hi", &mut reply, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.is_retryable());
    match err.inner() {
        ChatError::Network(NetworkError::HttpStatus { status, message }) => {
            assert_eq!(*status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert_eq!(reply.append_count(), 0);
    assert!(!reply.is_completed());
    assert_eq!(session.conversation_id(), None);
}

#[tokio::test]
async fn test_in_band_error_reaches_sink() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(stream_path()))
        .respond_with(sse_response("data: error: rate limited\n\n".to_string()))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut session = client.new_session(ASSISTANT);
    let mut reply = ReplyBuffer::new();

    let outcome = client
        .send_message(&mut session, "hi", &mut reply, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StreamOutcome::CompletedWithError("rate limited".to_string())
    );
    assert_eq!(reply.error(), Some("rate limited"));
    assert_eq!(reply.append_count(), 0);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(stream_path()))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(sse_response(sse_body(&["ok"])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server).with_token("test-token");
    let client = assistant_chat::AssistantClient::from_config(&config).unwrap();
    let mut session = client.new_session(ASSISTANT);
    let mut reply = ReplyBuffer::new();

    client
        .send_message(&mut session, "hi", &mut reply, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(reply.text(), "ok");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = assistant_chat::ClientConfig::default()
        .with_base_url("http://127.0.0.1:1")
        .with_connect_timeout_secs(2);
    let client = assistant_chat::AssistantClient::from_config(&config).unwrap();
    let mut session = client.new_session(ASSISTANT);
    let mut events = Vec::new();

    let err = client
        .send_message(&mut session, "hi", &mut events, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_list_assistants() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assistants/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "helper", "model_type": "OpenAIModel", "system_message": "Be nice.", "has_rag": true},
            {"name": "local", "model_type": "OllamaModel", "system_message": "", "has_rag": false}
        ])))
        .mount(&server)
        .await;

    let assistants = test_client(&server).list_assistants().await.unwrap();

    let names: Vec<&str> = assistants.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["helper", "local"]);
    assert!(assistants[0].has_rag);
}

#[tokio::test]
async fn test_non_streaming_chat() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/assistants/{}/chat", ASSISTANT)))
        .and(body_json(serde_json::json!({"message": "hi", "stream": false})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "hello"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let session = client.new_session(ASSISTANT);
    assert_eq!(client.chat(&session, "hi").await.unwrap(), "hello");
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Welcome to Chatbot Framework API",
            "docs_url": "/docs"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.health_check().await.unwrap());

    let banner = client.service_banner().await.unwrap();
    assert_eq!(banner.message, "Welcome to Chatbot Framework API");
    assert_eq!(banner.docs_url.as_deref(), Some("/docs"));
}
