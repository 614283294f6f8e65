//! Incremental decoding of streamed assistant replies.
//!
//! The reply arrives as server-sent events, one token per `data: ` line:
//! - `data: <text>` - appendable reply text
//! - `data: [DONE]` - normal end of the reply
//! - `data: error:<message>` - the assistant failed; ends the reply
//! - anything else - comments and keep-alives, ignored
//!
//! Network chunks do not line up with lines or even with UTF-8 characters,
//! so [`LineBuffer`] reassembles them before [`Frame::parse`] classifies each
//! line and [`StreamDecoder`] turns the result into [`DecodeEvent`]s.

mod buffer;
mod decoder;
mod events;
mod frame;

pub use buffer::LineBuffer;
pub use decoder::StreamDecoder;
pub use events::{DecodeEvent, StreamOutcome};
pub use frame::{Frame, DATA_PREFIX, DONE_SENTINEL, ERROR_PREFIX};
