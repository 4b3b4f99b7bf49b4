//! Logging trait for conversation exchanges.
//!
//! This module provides the [`ExchangeLogger`] trait that observes every turn
//! a [`ChatSession`](crate::chat::ChatSession) takes, including the turns
//! that fail.  Failures never reach the transcript, so this is where they are
//! reported.

use crate::error::Error;
use crate::types::{AgentReply, AgentRequest};

/// A trait for observing agent exchanges.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use agentchat::{AgentReply, AgentRequest, Error, ExchangeLogger};
///
/// #[derive(Default)]
/// struct CountingLogger {
///     failures: Mutex<usize>,
/// }
///
/// impl ExchangeLogger for CountingLogger {
///     fn log_request(&self, _: Option<&str>, _: &AgentRequest) {}
///
///     fn log_reply(&self, _: &AgentReply) {}
///
///     fn log_failure(&self, _: Option<&str>, _: &AgentRequest, _: &Error) {
///         *self.failures.lock().unwrap() += 1;
///     }
/// }
/// ```
pub trait ExchangeLogger: Send + Sync {
    /// Log a request about to be sent; `thread_id` is `None` for a new thread.
    fn log_request(&self, thread_id: Option<&str>, request: &AgentRequest);

    /// Log a successful reply.
    fn log_reply(&self, reply: &AgentReply);

    /// Log a failed request.
    fn log_failure(&self, thread_id: Option<&str>, request: &AgentRequest, error: &Error);
}

/// Logger that emits `tracing` events.
///
/// Requests and replies are logged at debug level, failures at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ExchangeLogger for TracingLogger {
    fn log_request(&self, thread_id: Option<&str>, request: &AgentRequest) {
        tracing::debug!(
            thread_id = thread_id.unwrap_or("<new>"),
            message_len = request.message.len(),
            "sending message to agent"
        );
    }

    fn log_reply(&self, reply: &AgentReply) {
        tracing::debug!(
            thread_id = %reply.thread_id,
            answer_len = reply.answer.len(),
            sources = reply.sources.as_ref().map_or(0, Vec::len),
            "agent replied"
        );
    }

    fn log_failure(&self, thread_id: Option<&str>, request: &AgentRequest, error: &Error) {
        tracing::warn!(
            thread_id = thread_id.unwrap_or("<new>"),
            message_len = request.message.len(),
            status = error.status_code(),
            error = %error,
            "agent request failed"
        );
    }
}
