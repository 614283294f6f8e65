//! Mock HTTP client for testing.
//!
//! Serves scripted responses, records every request, and hands out streamed
//! bodies whose release can be observed through a [`ReleaseTracker`].

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

/// What a scripted stream does after its last chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEnd {
    /// Signal end-of-stream.
    Close,
    /// Never yield again; only cancellation gets the reader out.
    Hang,
    /// Fail with a transport error.
    Fail(HttpError),
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful response
    Success(Response),
    /// Return an error
    Error(HttpError),
    /// Return a streamed body
    Stream {
        headers: Headers,
        chunks: Vec<Bytes>,
        end: StreamEnd,
    },
}

impl MockResponse {
    /// A streamed body that closes after `chunks`.
    pub fn stream<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        MockResponse::Stream {
            headers: Headers::new(),
            chunks: chunks.into_iter().map(Into::into).collect(),
            end: StreamEnd::Close,
        }
    }

    /// Add a response header (streamed responses only).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let MockResponse::Stream { headers, .. } = &mut self {
            headers.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Change what happens after the last chunk (streamed responses only).
    pub fn ending_with(mut self, stream_end: StreamEnd) -> Self {
        if let MockResponse::Stream { end, .. } = &mut self {
            *end = stream_end;
        }
        self
    }
}

/// Observes whether a scripted body has been dropped and how far it was read.
#[derive(Debug, Clone, Default)]
pub struct ReleaseTracker {
    released: Arc<AtomicBool>,
    polled_chunks: Arc<AtomicUsize>,
}

impl ReleaseTracker {
    /// True once the body stream has been dropped.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Number of chunks handed to the reader.
    pub fn chunks_read(&self) -> usize {
        self.polled_chunks.load(Ordering::SeqCst)
    }
}

/// Body stream that reports its release to a [`ReleaseTracker`].
struct TrackedStream {
    inner: ByteStream,
    tracker: ReleaseTracker,
}

impl Stream for TrackedStream {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let poll = this.inner.as_mut().poll_next(cx);
        if let Poll::Ready(Some(Ok(_))) = &poll {
            this.tracker.polled_chunks.fetch_add(1, Ordering::SeqCst);
        }
        poll
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.tracker.released.store(true, Ordering::SeqCst);
    }
}

/// Build a scripted body stream and the tracker that watches it.
pub fn scripted_stream(chunks: Vec<Bytes>, end: StreamEnd) -> (ByteStream, ReleaseTracker) {
    use futures::stream::{self, StreamExt};

    let head = stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>));
    let inner: ByteStream = match end {
        StreamEnd::Close => Box::pin(head),
        StreamEnd::Hang => Box::pin(head.chain(stream::pending())),
        StreamEnd::Fail(err) => Box::pin(head.chain(stream::once(async move { Err(err) }))),
    };

    let tracker = ReleaseTracker::default();
    let stream = TrackedStream {
        inner,
        tracker: tracker.clone(),
    };
    (Box::pin(stream), tracker)
}

/// Mock HTTP client for testing.
///
/// Responses are looked up in this order: the FIFO queue filled by
/// [`enqueue_response`](Self::enqueue_response), an exact URL match, a URL
/// prefix match, and finally the default response.
///
/// # Example
///
/// ```ignore
/// use assistant_chat::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.enqueue_response(
///     MockResponse::stream(["data: Hi\n", "data: [DONE]\n"])
///         .with_header("X-Conversation-Id", "abc123"),
/// );
///
/// let response = client.get_stream("http://test/assistants/a/chat/stream", &Headers::new()).await?;
/// assert_eq!(response.header("x-conversation-id"), Some("abc123"));
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Responses served once each, in order, before any URL match
    queued: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Trackers of every streamed body handed out
    trackers: Arc<Mutex<Vec<ReleaseTracker>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            trackers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a URL (exact match first, then prefix match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), response);
    }

    /// Queue a response for the next request, whatever its URL.
    pub fn enqueue_response(&self, response: MockResponse) {
        lock(&self.queued).push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Trackers for every streamed body served so far, in order.
    pub fn stream_trackers(&self) -> Vec<ReleaseTracker> {
        lock(&self.trackers).clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        lock(&self.requests).push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(response) = lock(&self.queued).pop_front() {
            return Some(response);
        }

        let responses = lock(&self.responses);

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        lock(&self.default_response).clone()
    }

    fn full_response(&self, url: &str) -> Result<Response, HttpError> {
        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream { .. }) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);
        self.full_response(url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.full_response(url)
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError> {
        self.record_request("GET", url, headers, None);

        match self.get_response(url) {
            Some(MockResponse::Stream {
                headers,
                chunks,
                end,
            }) => {
                let (body, tracker) = scripted_stream(chunks, end);
                lock(&self.trackers).push(tracker);
                Ok(StreamResponse::new(200, headers, body))
            }
            Some(MockResponse::Success(response)) if !response.is_success() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text().unwrap_or_default(),
                })
            }
            Some(MockResponse::Success(_)) => Err(HttpError::Other(
                "Non-stream response on stream request".to_string(),
            )),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
