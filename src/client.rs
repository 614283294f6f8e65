//! Assistant service API client.
//!
//! Sends messages to an assistant and streams the reply through
//! [`StreamDecoder`], correlating each exchange with the conversation held in
//! a [`ConversationSession`].

use tokio_util::sync::CancellationToken;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{ChatResult, ErrorContext, NetworkError, ResultExt, StreamError};
use crate::models::{AssistantInfo, ChatReply, ChatRequest, ServiceBanner};
use crate::session::{ConversationSession, CONVERSATION_ID_PARAM};
use crate::sse::{DecodeEvent, StreamDecoder, StreamOutcome};
use crate::traits::{Headers, HttpClient, ReplySink, Response};

/// Forwards events to the caller's sink while keeping a copy of the text.
struct Transcript<'a, S: ?Sized> {
    inner: &'a mut S,
    text: String,
}

impl<S: ReplySink + ?Sized> ReplySink for Transcript<'_, S> {
    fn on_event(&mut self, event: DecodeEvent) {
        if let DecodeEvent::Append(token) = &event {
            self.text.push_str(token);
        }
        self.inner.on_event(event);
    }
}

fn send_context(session: &ConversationSession) -> ErrorContext {
    let ctx = ErrorContext::new("send_message").with_assistant(session.assistant());
    match session.conversation_id() {
        Some(id) => ctx.with_conversation_id(id),
        None => ctx,
    }
}

/// Client for the assistant service.
///
/// # Example
///
/// ```ignore
/// use assistant_chat::client::AssistantClient;
/// use assistant_chat::config::ClientConfig;
/// use assistant_chat::traits::ReplyBuffer;
/// use tokio_util::sync::CancellationToken;
///
/// let client = AssistantClient::from_config(&ClientConfig::default())?;
/// let mut session = client.new_session("helper");
/// let mut reply = ReplyBuffer::new();
/// client
///     .send_message(&mut session, "hello", &mut reply, &CancellationToken::new())
///     .await?;
/// println!("{}", reply.text());
/// ```
#[derive(Debug, Clone)]
pub struct AssistantClient<C: HttpClient = ReqwestHttpClient> {
    base_url: String,
    token: Option<String>,
    http: C,
}

impl AssistantClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest.
    pub fn from_config(config: &ClientConfig) -> ChatResult<Self> {
        let http = ReqwestHttpClient::with_connect_timeout(config.connect_timeout())
            .map_err(|e| NetworkError::from_http(e, &config.base_url))?;
        Ok(Self::with_http(config, http))
    }
}

impl<C: HttpClient> AssistantClient<C> {
    /// Create a client over any transport.
    pub fn with_http(config: &ClientConfig, http: C) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// Start a conversation with `assistant`, carrying this client's token.
    pub fn new_session(&self, assistant: impl Into<String>) -> ConversationSession {
        let mut session = ConversationSession::new(assistant);
        session.set_token(self.token.clone());
        session
    }

    /// URL of the streaming chat endpoint for one message.
    pub fn stream_url(&self, session: &ConversationSession, message: &str) -> String {
        let mut url = format!(
            "{}/assistants/{}/chat/stream?message={}",
            self.base_url,
            urlencoding::encode(session.assistant()),
            urlencoding::encode(message)
        );
        if let Some(id) = session.conversation_id() {
            url.push_str(&format!(
                "&{}={}",
                CONVERSATION_ID_PARAM,
                urlencoding::encode(id)
            ));
        }
        url
    }

    fn auth_headers(&self, token: Option<&str>) -> Headers {
        let mut headers = Headers::new();
        if let Some(token) = token.or(self.token.as_deref()) {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    fn stream_headers(&self, session: &ConversationSession) -> Headers {
        let mut headers = self.auth_headers(session.token());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        headers
    }

    fn check_status(response: &Response) -> Result<(), NetworkError> {
        if response.is_success() {
            Ok(())
        } else {
            Err(NetworkError::HttpStatus {
                status: response.status,
                message: response
                    .text()
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            })
        }
    }

    /// Send `message` and stream the reply into `sink`.
    ///
    /// The conversation id is captured from the response headers as soon as
    /// they arrive, before any of the body is read, and only if the session
    /// has none yet. Later sends in the session pass it back.
    ///
    /// Returns the decoder outcome. An in-band assistant error is
    /// `Ok(StreamOutcome::CompletedWithError)`; transport failures, before or
    /// during the reply, are `Err`. Cancelling `cancel` stops the send at any
    /// point and yields `Ok(StreamOutcome::Cancelled)`.
    pub async fn send_message<S>(
        &self,
        session: &mut ConversationSession,
        message: &str,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> ChatResult<StreamOutcome>
    where
        S: ReplySink + ?Sized,
    {
        let message = message.trim();
        if session.assistant().is_empty() {
            return Err(StreamError::NoAssistant).with_context(|| send_context(session));
        }
        if message.is_empty() {
            return Err(StreamError::EmptyMessage).with_context(|| send_context(session));
        }

        let url = self.stream_url(session, message);
        let headers = self.stream_headers(session);
        tracing::debug!(
            assistant = %session.assistant(),
            conversation_id = ?session.conversation_id(),
            "Opening reply stream"
        );

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Send cancelled before the reply started");
                return Ok(StreamOutcome::Cancelled);
            }
            opened = self.http.get_stream(&url, &headers) => opened,
        };
        let response = opened
            .map_err(|e| NetworkError::from_http(e, &url))
            .with_context(|| send_context(session))?;

        session.capture_correlation(&response.headers);

        let mut transcript = Transcript {
            inner: sink,
            text: String::new(),
        };
        let outcome = StreamDecoder::new(response.body)
            .run(&mut transcript, cancel)
            .await
            .with_context(|| send_context(session))?;

        if !outcome.is_cancelled() {
            session.record_exchange(transcript.text);
        }

        Ok(outcome)
    }

    /// Send `message` without streaming and return the whole reply.
    pub async fn chat(&self, session: &ConversationSession, message: &str) -> ChatResult<String> {
        let context = || ErrorContext::new("chat").with_assistant(session.assistant());

        let message = message.trim();
        if session.assistant().is_empty() {
            return Err(StreamError::NoAssistant).with_context(context);
        }
        if message.is_empty() {
            return Err(StreamError::EmptyMessage).with_context(context);
        }

        let url = format!(
            "{}/assistants/{}/chat",
            self.base_url,
            urlencoding::encode(session.assistant())
        );
        let body = serde_json::to_string(&ChatRequest::new(message)).with_context(context)?;

        let mut headers = self.auth_headers(session.token());
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = self
            .http
            .post(&url, &body, &headers)
            .await
            .map_err(|e| NetworkError::from_http(e, &url))
            .with_context(context)?;
        Self::check_status(&response).with_context(context)?;

        let reply: ChatReply = response.json().with_context(context)?;
        Ok(reply.response)
    }

    /// Fetch the assistants the service offers.
    pub async fn list_assistants(&self) -> ChatResult<Vec<AssistantInfo>> {
        let url = format!("{}/assistants/list", self.base_url);
        let context = || ErrorContext::new("list_assistants");

        let response = self
            .http
            .get(&url, &self.auth_headers(None))
            .await
            .map_err(|e| NetworkError::from_http(e, &url))
            .with_context(context)?;
        Self::check_status(&response).with_context(context)?;

        let assistants: Vec<AssistantInfo> = response.json().with_context(context)?;
        tracing::debug!(count = assistants.len(), "Fetched assistant list");
        Ok(assistants)
    }

    /// Check whether the service root answers with a success status.
    ///
    /// The banner body is only logged; a root that answers 2xx with an
    /// unexpected body still counts as healthy.
    pub async fn health_check(&self) -> ChatResult<bool> {
        let response = self
            .get_root()
            .await
            .with_context(|| ErrorContext::new("health_check"))?;
        if !response.is_success() {
            tracing::debug!(status = response.status, "Service root answered with an error");
            return Ok(false);
        }

        match response.json::<ServiceBanner>() {
            Ok(banner) => tracing::debug!(message = %banner.message, "Service is up"),
            Err(e) => tracing::debug!(error = %e, "Service is up; banner not understood"),
        }
        Ok(true)
    }

    /// Fetch the banner served at the service root.
    pub async fn service_banner(&self) -> ChatResult<ServiceBanner> {
        let context = || ErrorContext::new("service_banner");
        let response = self.get_root().await.with_context(context)?;
        Self::check_status(&response).with_context(context)?;
        response.json().with_context(context)
    }

    async fn get_root(&self) -> Result<Response, NetworkError> {
        let url = format!("{}/", self.base_url);
        self.http
            .get(&url, &Headers::new())
            .await
            .map_err(|e| NetworkError::from_http(e, &url))
    }
}
