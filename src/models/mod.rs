//! Wire types for the assistant service's JSON endpoints.

mod assistant;
mod request;

pub use assistant::{AssistantInfo, ServiceBanner};
pub use request::{ChatReply, ChatRequest};
