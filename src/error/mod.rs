//! Error handling for the chat client.
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - **Domain errors**: [`NetworkError`] for transport faults, [`StreamError`]
//!   for replies that arrived but were not usable
//! - **Unified Error Type**: [`ChatError`] consolidates them
//! - **Error Context**: which operation and conversation failed
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout, interrupted body | Yes |
//! | Server | 5xx, in-band assistant errors | Yes |
//! | Client | Malformed responses | No |
//! | User | Unknown assistant, empty message, cancel | No |
//! | Configuration | Config file / environment | No |

mod category;
mod chat_error;
mod context;
mod network;
mod result;
mod stream;

pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use context::ErrorContext;
pub use network::NetworkError;
pub use result::{ChatResult, ResultExt};
pub use stream::StreamError;
