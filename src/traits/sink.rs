//! Destinations for decoded reply events.
//!
//! The decoder never knows how a reply is displayed. It hands every
//! [`DecodeEvent`] to a [`ReplySink`], in arrival order.

use tokio::sync::mpsc;

use crate::sse::DecodeEvent;

/// Receives the events of one reply.
pub trait ReplySink: Send {
    /// Handle the next event.
    fn on_event(&mut self, event: DecodeEvent);
}

/// Collects events for later inspection.
impl ReplySink for Vec<DecodeEvent> {
    fn on_event(&mut self, event: DecodeEvent) {
        self.push(event);
    }
}

/// Forwards events to another task. A closed receiver drops them silently.
impl ReplySink for mpsc::UnboundedSender<DecodeEvent> {
    fn on_event(&mut self, event: DecodeEvent) {
        let _ = self.send(event);
    }
}

impl<S: ReplySink + ?Sized> ReplySink for &mut S {
    fn on_event(&mut self, event: DecodeEvent) {
        (**self).on_event(event);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> ReplySink for FnSink<F>
where
    F: FnMut(DecodeEvent) + Send,
{
    fn on_event(&mut self, event: DecodeEvent) {
        (self.0)(event);
    }
}

/// Accumulates the text of a reply and remembers how it ended.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplyBuffer {
    text: String,
    appends: usize,
    completed: bool,
    error: Option<String>,
}

impl ReplyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply text received so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of append events received.
    pub fn append_count(&self) -> usize {
        self.appends
    }

    /// True once the stream signalled normal completion.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// In-band error message, if the assistant reported one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl ReplySink for ReplyBuffer {
    fn on_event(&mut self, event: DecodeEvent) {
        match event {
            DecodeEvent::Append(text) => {
                self.text.push_str(&text);
                self.appends += 1;
            }
            DecodeEvent::Completed => self.completed = true,
            DecodeEvent::Failed(message) => self.error = Some(message),
        }
    }
}
