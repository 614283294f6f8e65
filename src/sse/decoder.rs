//! The reply stream consumer.
//!
//! [`StreamDecoder`] pulls chunks from a response body, reassembles lines,
//! classifies them and forwards appendable text to a [`ReplySink`] until the
//! stream terminates, fails, ends or is cancelled.

use bytes::Bytes;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use super::buffer::LineBuffer;
use super::events::{DecodeEvent, StreamOutcome};
use super::frame::Frame;
use crate::error::NetworkError;
use crate::traits::{ByteStream, HttpError, ReplySink};

/// Exclusive ownership of a response body.
///
/// Dropping the body closes the connection, so releasing is just dropping it
/// early. `Drop` covers every path that does not release explicitly.
struct SourceGuard {
    stream: Option<ByteStream>,
}

impl SourceGuard {
    fn new(stream: ByteStream) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    async fn next(&mut self) -> Option<Result<Bytes, HttpError>> {
        match self.stream.as_mut() {
            Some(stream) => stream.next().await,
            None => None,
        }
    }

    fn release(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Released reply stream");
        }
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Decodes one reply stream. Single use: [`run`](Self::run) consumes it.
pub struct StreamDecoder {
    source: SourceGuard,
    buffer: LineBuffer,
    appended: usize,
}

impl StreamDecoder {
    /// Bind a decoder to a response body.
    pub fn new(body: ByteStream) -> Self {
        Self {
            source: SourceGuard::new(body),
            buffer: LineBuffer::new(),
            appended: 0,
        }
    }

    /// Drive the stream to its end.
    ///
    /// Appends reach `sink` in arrival order while the stream runs. The body
    /// is released before the terminal event is handed to the sink and before
    /// this returns, on every path. A cancelled run emits no terminal event.
    ///
    /// A body that fails mid-read is a transport problem and comes back as
    /// `Err`; an error frame from the assistant is
    /// `Ok(StreamOutcome::CompletedWithError)`.
    pub async fn run<S>(
        mut self,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<StreamOutcome, NetworkError>
    where
        S: ReplySink + ?Sized,
    {
        let result = self.drive(sink, cancel).await;

        self.source.release();
        self.buffer.clear();

        match &result {
            Ok(StreamOutcome::Completed) => {
                tracing::info!(appends = self.appended, "Reply stream completed");
                sink.on_event(DecodeEvent::Completed);
            }
            Ok(StreamOutcome::CompletedWithError(message)) => {
                tracing::info!(appends = self.appended, error = %message, "Assistant reported an error");
                sink.on_event(DecodeEvent::Failed(message.clone()));
            }
            Ok(StreamOutcome::Cancelled) => {
                tracing::info!(appends = self.appended, "Reply stream cancelled");
            }
            Err(err) => {
                tracing::warn!(appends = self.appended, error = %err, "Reply stream failed");
            }
        }

        result
    }

    async fn drive<S>(
        &mut self,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<StreamOutcome, NetworkError>
    where
        S: ReplySink + ?Sized,
    {
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(StreamOutcome::Cancelled),
                next = self.source.next() => next,
            };

            let chunk = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(err)) => {
                    return Err(NetworkError::StreamInterrupted {
                        message: err.to_string(),
                    })
                }
                None => {
                    if self.buffer.has_partial() {
                        tracing::debug!(
                            remainder = self.buffer.remainder(),
                            "Discarding unterminated line at end of stream"
                        );
                    }
                    return Ok(StreamOutcome::Completed);
                }
            };

            for line in self.buffer.push(&chunk) {
                // The sink may cancel from inside on_event.
                if cancel.is_cancelled() {
                    return Ok(StreamOutcome::Cancelled);
                }

                match Frame::parse(&line) {
                    Frame::Token(text) => {
                        self.appended += 1;
                        sink.on_event(DecodeEvent::Append(text));
                    }
                    Frame::Terminator => return Ok(StreamOutcome::Completed),
                    Frame::Error(message) => return Ok(StreamOutcome::CompletedWithError(message)),
                    Frame::Ignored => tracing::trace!(line = %line, "Ignoring SSE line"),
                }
            }
        }
    }
}
