// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod exchange_logger;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use client::{AgentClient, AgentTransport};
pub use error::{Error, Result};
pub use exchange_logger::{ExchangeLogger, TracingLogger};
pub use observability::register_biometrics;
pub use types::*;
