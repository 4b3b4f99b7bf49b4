//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which holds the transcript,
//! the server-assigned thread id and the single-flight turn state.  A turn
//! moves `Idle -> AwaitingResponse -> Idle`: the user message is echoed on
//! the way out and the assistant message (if any) is appended on the way
//! back.

use std::sync::Arc;
use std::time::Instant;

use crate::client::AgentTransport;
use crate::error::{Error, Result};
use crate::exchange_logger::{ExchangeLogger, TracingLogger};
use crate::observability::{
    SESSION_IGNORED_SUBMITS, SESSION_TURN_DURATION, SESSION_TURN_FAILURES, SESSION_TURNS,
};
use crate::types::{AgentReply, AgentRequest, Message};

/// Where the session is in its current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// No request outstanding; input is accepted.
    Idle,
    /// A request is outstanding; further submissions are ignored.
    AwaitingResponse {
        /// Sequence number of the outstanding turn.
        turn: u64,
    },
}

/// An outstanding request produced by [`ChatSession::begin_turn`].
///
/// Hand it back to [`ChatSession::finish_turn`] together with the outcome of
/// the request.
#[derive(Debug)]
pub struct PendingTurn {
    turn: u64,
    thread_id: Option<String>,
    request: AgentRequest,
    started: Instant,
}

impl PendingTurn {
    /// The thread to continue, or `None` to start a new one.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// The request body to send.
    pub fn request(&self) -> &AgentRequest {
        &self.request
    }
}

/// The result of a submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The input was blank or a request was already outstanding.
    Ignored,
    /// The agent answered and the answer was appended to the transcript.
    Answered,
    /// The request failed; the user message stays unanswered.
    Failed(Error),
}

impl SubmitOutcome {
    /// Returns true if an assistant message was appended.
    pub fn is_answered(&self) -> bool {
        matches!(self, SubmitOutcome::Answered)
    }

    /// Returns true if the submission never left the session.
    pub fn is_ignored(&self) -> bool {
        matches!(self, SubmitOutcome::Ignored)
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// The current thread id, if the server assigned one.
    pub thread_id: Option<String>,
    /// Turns that produced an assistant message.
    pub completed_turns: u64,
    /// Turns whose request failed.
    pub failed_turns: u64,
    /// Whether a request is outstanding.
    pub pending: bool,
}

/// A conversation with the agent service.
pub struct ChatSession {
    messages: Vec<Message>,
    thread_id: Option<String>,
    input: String,
    state: TurnState,
    next_turn: u64,
    last_failure: Option<Error>,
    completed_turns: u64,
    failed_turns: u64,
    logger: Arc<dyn ExchangeLogger>,
}

impl ChatSession {
    /// Creates a new, empty chat session that logs through `tracing`.
    pub fn new() -> Self {
        Self::with_logger(Arc::new(TracingLogger))
    }

    /// Creates a new, empty chat session with a custom exchange logger.
    pub fn with_logger(logger: Arc<dyn ExchangeLogger>) -> Self {
        Self {
            messages: Vec::new(),
            thread_id: None,
            input: String::new(),
            state: TurnState::Idle,
            next_turn: 0,
            last_failure: None,
            completed_turns: 0,
            failed_turns: 0,
            logger,
        }
    }

    /// The transcript, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The server-assigned thread id, once the first exchange succeeded.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// The current turn state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Returns true while a request is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, TurnState::AwaitingResponse { .. })
    }

    /// The contents of the input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the contents of the input buffer.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// The error of the most recent failed turn, cleared by the next success.
    pub fn last_failure(&self) -> Option<&Error> {
        self.last_failure.as_ref()
    }

    /// Starts a turn: the `Idle -> AwaitingResponse` transition.
    ///
    /// Appends the user message, clears the input buffer and returns the
    /// request to send.  Returns `None` without touching any state when
    /// `text` is blank or a turn is already outstanding.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() || self.is_pending() {
            SESSION_IGNORED_SUBMITS.click();
            return None;
        }

        let turn = self.next_turn;
        self.next_turn += 1;
        self.messages.push(Message::user(text));
        self.input.clear();
        self.state = TurnState::AwaitingResponse { turn };

        Some(PendingTurn {
            turn,
            thread_id: self.thread_id.clone(),
            request: AgentRequest::new(text),
            started: Instant::now(),
        })
    }

    /// Completes a turn: the `AwaitingResponse -> Idle` transition.
    ///
    /// On success the thread id is replaced by the server's (an empty id
    /// leaves the session without a thread) and the answer is appended.  On failure nothing is appended and the error is logged and
    /// remembered.  A `pending` that is not this session's outstanding turn
    /// is ignored.
    pub fn finish_turn(&mut self, pending: PendingTurn, outcome: Result<AgentReply>) -> SubmitOutcome {
        if self.state != (TurnState::AwaitingResponse { turn: pending.turn }) {
            return SubmitOutcome::Ignored;
        }
        self.state = TurnState::Idle;
        SESSION_TURNS.click();
        SESSION_TURN_DURATION.add(pending.started.elapsed().as_secs_f64());

        match outcome {
            Ok(reply) => {
                self.logger.log_reply(&reply);
                let AgentReply {
                    thread_id,
                    answer,
                    sources,
                } = reply;
                self.thread_id = Some(thread_id).filter(|id| !id.is_empty());
                self.messages.push(Message::assistant(answer, sources));
                self.last_failure = None;
                self.completed_turns += 1;
                SubmitOutcome::Answered
            }
            Err(err) => {
                SESSION_TURN_FAILURES.click();
                self.logger
                    .log_failure(pending.thread_id(), pending.request(), &err);
                self.last_failure = Some(err.clone());
                self.failed_turns += 1;
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Sends a user message and waits for the answer.
    ///
    /// This method:
    /// 1. Echoes the user message into the transcript
    /// 2. Sends exactly one request through `transport`
    /// 3. Appends the assistant answer, or records the failure
    ///
    /// Blank input and input submitted while a request is outstanding are
    /// ignored.
    pub async fn submit(&mut self, text: &str, transport: &dyn AgentTransport) -> SubmitOutcome {
        let Some(pending) = self.begin_turn(text) else {
            return SubmitOutcome::Ignored;
        };
        self.logger
            .log_request(pending.thread_id(), pending.request());
        let outcome = transport
            .send(pending.thread_id(), pending.request())
            .await;
        self.finish_turn(pending, outcome)
    }

    /// Submits the contents of the input buffer.
    pub async fn submit_input(&mut self, transport: &dyn AgentTransport) -> SubmitOutcome {
        let text = self.input.clone();
        self.submit(&text, transport).await
    }

    /// Starts a new conversation, forgetting the transcript and thread id.
    ///
    /// Returns false and changes nothing while a request is outstanding.
    pub fn reset(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        self.messages.clear();
        self.thread_id = None;
        self.last_failure = None;
        true
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            message_count: self.message_count(),
            thread_id: self.thread_id.clone(),
            completed_turns: self.completed_turns,
            failed_turns: self.failed_turns,
            pending: self.is_pending(),
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
