//! Classification of single SSE lines.
//!
//! The assistant service frames every token as its own `data: ` line:
//!
//! ```text
//! data: Hel
//! data: lo
//! data: [DONE]
//! ```
//!
//! Only `data: ` lines carry meaning. Comments, keep-alive blank lines and
//! any other SSE field are framing noise.

/// Prefix of every line that carries a payload.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that marks the normal end of a reply.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Payload prefix the assistant uses to report a failure in-band.
pub const ERROR_PREFIX: &str = "error:";

/// A classified line of the reply stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Appendable reply text, exactly as sent after the data prefix.
    Token(String),
    /// The stream finished normally.
    Terminator,
    /// The assistant reported a failure; carries its message.
    Error(String),
    /// Anything that is not a non-empty data line.
    Ignored,
}

impl Frame {
    /// Classify one complete line (without its trailing newline).
    ///
    /// The line is trimmed before matching, so `\r\n` line endings and
    /// indentation are tolerated. The token itself is not trimmed any further:
    /// spaces after the prefix belong to the reply text.
    pub fn parse(line: &str) -> Frame {
        let Some(payload) = line.trim().strip_prefix(DATA_PREFIX) else {
            return Frame::Ignored;
        };

        if payload == DONE_SENTINEL {
            return Frame::Terminator;
        }

        if let Some(message) = payload.strip_prefix(ERROR_PREFIX) {
            return Frame::Error(message.trim_start().to_string());
        }

        if payload.is_empty() {
            Frame::Ignored
        } else {
            Frame::Token(payload.to_string())
        }
    }

    /// True for frames that end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Frame::Terminator | Frame::Error(_))
    }
}
