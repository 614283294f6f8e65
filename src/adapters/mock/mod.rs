//! Mock implementations for testing.
//!
//! Lets the client and decoder be exercised without a network.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable and streamed responses

pub mod http;

pub use http::{
    scripted_stream, MockHttpClient, MockResponse, RecordedRequest, ReleaseTracker, StreamEnd,
};
