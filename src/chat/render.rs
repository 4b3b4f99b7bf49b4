//! Transcript layout for the chat application.
//!
//! Rendering is a pure function of the transcript, the pending flag and the
//! per-message source disclosures.  User messages are right-aligned under a
//! `You` label; assistant messages are left-aligned under an `Agent` label
//! and may be rendered as markdown with a collapsible source list.

use unicode_width::UnicodeWidthStr;

use crate::chat::disclosure::SourceDisclosures;
use crate::chat::markdown::render_markdown;
use crate::render::{
    ANSI_BLUE, ANSI_BOLD, ANSI_CYAN, ANSI_DIM, ANSI_GREEN, ANSI_ITALIC, ANSI_UNDERLINE, paint,
};
use crate::types::{Message, MessageRole};

/// Default layout width in columns.
pub const DEFAULT_WIDTH: usize = 80;

/// Indicator shown while a request is outstanding.
pub const THINKING_INDICATOR: &str = "AI is thinking...";

/// Marker shown under a user message whose request failed.
pub const NO_REPLY_MARKER: &str = "(no reply)";

/// How assistant content is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Content printed verbatim.
    Plain,
    /// Content rendered as markdown with a source disclosure control.
    Markdown,
}

/// Options for laying out a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// How assistant content is rendered.
    pub mode: RenderMode,
    /// Whether to emit ANSI styling.
    pub use_color: bool,
    /// Width used for alignment.
    pub width: usize,
}

impl RenderOptions {
    /// Creates options with markdown, color and an 80 column width.
    pub fn new() -> Self {
        Self {
            mode: RenderMode::Markdown,
            use_color: true,
            width: DEFAULT_WIDTH,
        }
    }

    /// Sets the render mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables ANSI styling.
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Sets the layout width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Lays out a whole transcript.
///
/// Messages are separated by blank lines.  A user message that was never
/// answered gets a "no reply" marker, unless it is the last message and a
/// request is still `pending`, in which case a centered thinking indicator
/// follows it.
pub fn render_transcript(
    messages: &[Message],
    pending: bool,
    disclosures: &SourceDisclosures,
    options: &RenderOptions,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.extend(render_message(index, message, disclosures, options));
        let unanswered = message.is_user()
            && match messages.get(index + 1) {
                Some(next) => next.is_user(),
                None => !pending,
            };
        if unanswered {
            lines.push(align_right(NO_REPLY_MARKER, &[ANSI_DIM, ANSI_ITALIC], options));
        }
    }
    if pending {
        lines.extend(render_pending(!messages.is_empty(), options));
    }
    lines
}

/// Lays out the thinking indicator, preceded by a separator when it follows
/// other output.
pub fn render_pending(after_output: bool, options: &RenderOptions) -> Vec<String> {
    let mut lines = Vec::new();
    if after_output {
        lines.push(String::new());
    }
    let pad = options.width.saturating_sub(display_width(THINKING_INDICATOR)) / 2;
    lines.push(format!(
        "{}{}",
        " ".repeat(pad),
        paint(THINKING_INDICATOR, &[ANSI_DIM], options.use_color)
    ));
    lines
}

/// Lays out a single message; `index` is its position in the transcript.
pub fn render_message(
    index: usize,
    message: &Message,
    disclosures: &SourceDisclosures,
    options: &RenderOptions,
) -> Vec<String> {
    match message.role {
        MessageRole::User => {
            let mut lines = vec![align_right("You", &[ANSI_BOLD, ANSI_GREEN], options)];
            lines.extend(message.content.lines().map(|line| align_right(line, &[], options)));
            lines
        }
        MessageRole::Assistant => {
            let mut lines = vec![paint("Agent", &[ANSI_BOLD, ANSI_CYAN], options.use_color)];
            match options.mode {
                RenderMode::Plain => lines.extend(message.content.lines().map(String::from)),
                RenderMode::Markdown => {
                    lines.extend(render_markdown(&message.content, options.use_color));
                    if message.has_sources() {
                        lines.extend(render_sources(
                            message,
                            disclosures.is_expanded(index),
                            options,
                        ));
                    }
                }
            }
            lines
        }
    }
}

/// Lays out the disclosure control and, when expanded, one link per source.
fn render_sources(message: &Message, expanded: bool, options: &RenderOptions) -> Vec<String> {
    let sources = message.sources();
    let control = if expanded {
        format!("▾ Hide Sources ({})", sources.len())
    } else {
        format!("▸ Show Sources ({})", sources.len())
    };
    let mut lines = vec![paint(&control, &[ANSI_DIM], options.use_color)];
    if expanded {
        for source in sources {
            let title = paint(&source.title, &[ANSI_UNDERLINE, ANSI_BLUE], options.use_color);
            let url = paint(&format!("<{}>", source.url), &[ANSI_DIM], options.use_color);
            lines.push(format!("  ↗ {title} {url}"));
        }
    }
    lines
}

fn align_right(text: &str, codes: &[&str], options: &RenderOptions) -> String {
    let pad = options.width.saturating_sub(display_width(text));
    format!("{}{}", " ".repeat(pad), paint(text, codes, options.use_color))
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}
