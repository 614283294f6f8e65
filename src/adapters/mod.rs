//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted responses and streamed bodies

pub mod mock;
pub mod reqwest_http;

pub use mock::{MockHttpClient, MockResponse, ReleaseTracker, StreamEnd};
pub use reqwest_http::ReqwestHttpClient;
