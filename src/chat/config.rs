//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::chat::render::{DEFAULT_WIDTH, RenderMode, RenderOptions};
use crate::client::resolve_base_url;

/// Command-line arguments for the agentchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the agent service.
    #[arrrg(optional, "Agent service base URL (default: $AGENTCHAT_API_URL or http://localhost:8000)", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds; 0 means none (default: none)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Layout width in columns.
    #[arrrg(optional, "Layout width in columns (default: 80)", "COLUMNS")]
    pub width: Option<usize>,

    /// Print answers verbatim instead of rendering markdown.
    #[arrrg(flag, "Print answers as plain text")]
    pub plain: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Check the service before the first prompt.
    #[arrrg(flag, "Ping the agent service on startup")]
    pub ping: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments and the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL of the agent service.
    pub base_url: String,

    /// Request timeout; `None` waits for as long as the transport allows.
    pub timeout: Option<Duration>,

    /// How assistant answers are rendered.
    pub render_mode: RenderMode,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Layout width in columns.
    pub width: usize,

    /// Whether to ping the service on startup.
    pub ping_on_start: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: $AGENTCHAT_API_URL, else http://localhost:8000
    /// - Timeout: none
    /// - Rendering: markdown, colored, 80 columns
    pub fn new() -> Self {
        Self {
            base_url: resolve_base_url(None),
            timeout: None,
            render_mode: RenderMode::Markdown,
            use_color: true,
            width: DEFAULT_WIDTH,
            ping_on_start: false,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the render mode.
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the layout width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// The transcript layout options implied by this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_mode(self.render_mode)
            .with_color(self.use_color)
            .with_width(self.width)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            base_url: resolve_base_url(args.base_url),
            timeout: args.timeout.filter(|t| *t > 0).map(Duration::from_secs),
            render_mode: if args.plain {
                RenderMode::Plain
            } else {
                RenderMode::Markdown
            },
            use_color: !args.no_color,
            width: args.width.filter(|w| *w > 0).unwrap_or(DEFAULT_WIDTH),
            ping_on_start: args.ping,
        }
    }
}
