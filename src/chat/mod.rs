//! Chat application module for conversations with a thread-based agent.
//!
//! This module provides the conversation client and a REPL-oriented view
//! layer on top of the agentchat client library. It supports:
//!
//! - Single-flight turns with optimistic echo of the user message
//! - Server-assigned thread continuation
//! - Markdown rendering of answers with collapsible source lists
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Conversation state and the turn state machine
//! - [`render`]: Transcript layout
//! - [`markdown`]: Markdown-to-terminal conversion
//! - [`disclosure`]: Per-message source visibility
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod disclosure;
mod markdown;
mod render;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use disclosure::{SourceDisclosures, latest_with_sources};
pub use markdown::render_markdown;
pub use render::{
    DEFAULT_WIDTH, NO_REPLY_MARKER, RenderMode, RenderOptions, THINKING_INDICATOR,
    render_message, render_pending, render_transcript,
};
pub use session::{ChatSession, PendingTurn, SessionStats, SubmitOutcome, TurnState};
