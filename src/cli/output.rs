//! Terminal rendering of reply events.

use std::io::{self, Stderr, Stdout, Write};

use crate::sse::DecodeEvent;
use crate::traits::ReplySink;

/// Prints reply text as it arrives.
///
/// Tokens go to `out` and are flushed immediately so partial replies are
/// visible. In-band errors go to `err`.
pub struct PrintSink<O: Write, E: Write> {
    out: O,
    err: E,
    line_open: bool,
}

impl PrintSink<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> PrintSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            line_open: false,
        }
    }

    /// Terminate a reply that was cut short, so the next prompt starts on a
    /// fresh line.
    pub fn finish_line(&mut self) {
        if self.line_open {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.line_open = false;
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write + Send, E: Write + Send> ReplySink for PrintSink<O, E> {
    fn on_event(&mut self, event: DecodeEvent) {
        match event {
            DecodeEvent::Append(text) => {
                let _ = self.out.write_all(text.as_bytes());
                let _ = self.out.flush();
                self.line_open = true;
            }
            DecodeEvent::Completed => {
                let _ = writeln!(self.out);
                let _ = self.out.flush();
                self.line_open = false;
            }
            DecodeEvent::Failed(message) => {
                self.finish_line();
                let _ = writeln!(self.err, "Assistant error: {}", message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(events: Vec<DecodeEvent>) -> (String, String) {
        let mut sink = PrintSink::new(Vec::new(), Vec::new());
        for event in events {
            sink.on_event(event);
        }
        sink.finish_line();
        let (out, err) = sink.into_parts();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_tokens_then_newline() {
        let (out, err) = render(vec![
            DecodeEvent::Append("Hel".to_string()),
            DecodeEvent::Append("lo".to_string()),
            DecodeEvent::Completed,
        ]);
        assert_eq!(out, "Hello\n");
        assert_eq!(err, "");
    }

    #[test]
    fn test_error_goes_to_err() {
        let (out, err) = render(vec![
            DecodeEvent::Append("partial".to_string()),
            DecodeEvent::Failed("rate limited".to_string()),
        ]);
        assert_eq!(out, "partial\n");
        assert_eq!(err, "Assistant error: rate limited\n");
    }

    #[test]
    fn test_finish_line_after_cancel() {
        let (out, _) = render(vec![DecodeEvent::Append("cut".to_string())]);
        assert_eq!(out, "cut\n");
    }
}
