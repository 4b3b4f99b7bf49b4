// Public modules
pub mod agent_reply;
pub mod agent_request;
pub mod message;
pub mod source;

// Re-exports
pub use agent_reply::{AgentReply, PingReply};
pub use agent_request::AgentRequest;
pub use message::{Message, MessageRole};
pub use source::Source;
