//! Common test utilities for integration tests.
//!
//! Builders for SSE bodies, in-memory byte streams and clients pointed at a
//! wiremock server.

#![allow(dead_code)]

use assistant_chat::adapters::ReqwestHttpClient;
use assistant_chat::traits::{ByteStream, HttpError};
use assistant_chat::{AssistantClient, ClientConfig};
use bytes::Bytes;
use futures::stream;
use wiremock::MockServer;

/// Test assistant name.
pub const ASSISTANT: &str = "helper";

/// Render tokens as an SSE reply body ending in `[DONE]`.
pub fn sse_body(tokens: &[&str]) -> String {
    let mut body = String::new();
    for token in tokens {
        body.push_str("data: ");
        body.push_str(token);
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// A body stream that yields `chunks` and then ends.
pub fn byte_stream(chunks: Vec<Vec<u8>>) -> ByteStream {
    let items: Vec<Result<Bytes, HttpError>> =
        chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
    Box::pin(stream::iter(items))
}

/// Split `body` into two chunks at `at`.
pub fn split_at(body: &[u8], at: usize) -> Vec<Vec<u8>> {
    vec![body[..at].to_vec(), body[at..].to_vec()]
}

/// Split `body` into single-byte chunks.
pub fn bytewise(body: &[u8]) -> Vec<Vec<u8>> {
    body.iter().map(|b| vec![*b]).collect()
}

/// Configuration pointed at a mock server.
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(server.uri())
        .with_connect_timeout_secs(2)
}

/// A reqwest-backed client pointed at a mock server.
pub fn test_client(server: &MockServer) -> AssistantClient<ReqwestHttpClient> {
    AssistantClient::from_config(&test_config(server)).expect("client should build")
}
