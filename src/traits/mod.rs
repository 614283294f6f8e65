//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP transport (plain requests and streamed bodies)
//! - [`ReplySink`] - destination for decoded reply events

pub mod http;
pub mod sink;

pub use http::{header_value, ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};
pub use sink::{FnSink, ReplyBuffer, ReplySink};
