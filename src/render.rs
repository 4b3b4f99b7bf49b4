//! Terminal output for the chat application.
//!
//! This module provides the ANSI styling helpers shared by the transcript
//! layout and markdown conversion, plus the [`Renderer`] trait the REPL
//! prints through.

use std::io::{self, Stdout, Write};

/// ANSI escape code for bold text.
pub(crate) const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for status lines).
pub(crate) const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text.
pub(crate) const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code for underlined text.
pub(crate) const ANSI_UNDERLINE: &str = "\x1b[4m";

/// ANSI escape code for crossed-out text.
pub(crate) const ANSI_STRIKE: &str = "\x1b[9m";

/// ANSI escape code to reset all styling.
pub(crate) const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
pub(crate) const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for inline code).
pub(crate) const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for the user label).
pub(crate) const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for blue text (used for links).
pub(crate) const ANSI_BLUE: &str = "\x1b[34m";

/// Wraps `text` in the given escape codes when color is enabled.
pub(crate) fn paint(text: &str, codes: &[&str], use_color: bool) -> String {
    if !use_color || codes.is_empty() || text.is_empty() {
        return text.to_string();
    }
    format!("{}{text}{ANSI_RESET}", codes.concat())
}

/// Trait for emitting chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Capturing output in tests
pub trait Renderer: Send {
    /// Print fully laid-out transcript lines.
    fn print_lines(&mut self, lines: &[String]);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
///
/// This renderer writes directly to stdout; errors go to stderr.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Whether ANSI styling is emitted.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_lines(&mut self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        let text = paint(&format!("Error: {error}"), &[ANSI_BOLD], self.use_color);
        eprintln!("{text}");
    }

    fn print_info(&mut self, info: &str) {
        println!("{}", paint(info, &[ANSI_DIM], self.use_color));
        self.flush();
    }
}
