//! Markdown rendering using pulldown-cmark.
//!
//! Provides [`render_markdown`] to convert an assistant answer into terminal
//! lines.  Headings, ordered and unordered lists, emphasis, inline code and
//! links are styled; everything else passes through as text.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

use crate::render::{
    ANSI_BLUE, ANSI_BOLD, ANSI_CYAN, ANSI_DIM, ANSI_ITALIC, ANSI_STRIKE, ANSI_UNDERLINE,
    ANSI_YELLOW, paint,
};

/// Render markdown text to terminal lines.
///
/// Without color, headings keep their `#` markers so the structure survives
/// in plain output.  Trailing blank lines are dropped.
pub fn render_markdown(input: &str, use_color: bool) -> Vec<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = MarkdownRenderer::new(use_color);
    renderer.run(Parser::new_ext(input, options));
    while renderer.lines.last().is_some_and(|line| line.is_empty()) {
        renderer.lines.pop();
    }
    renderer.lines
}

struct MarkdownRenderer {
    use_color: bool,
    lines: Vec<String>,
    current: String,
    style_stack: Vec<&'static [&'static str]>,
    /// One entry per open list; `Some(n)` is the next number of an ordered list.
    list_stack: Vec<Option<u64>>,
    pending_marker: Option<String>,
    /// Column width of each open item's marker, innermost last.
    item_indents: Vec<usize>,
    /// Indent for the next line of an item that already has its marker.
    continuation: Option<usize>,
    in_code_block: bool,
    links: Vec<(String, String)>,
}

impl MarkdownRenderer {
    fn new(use_color: bool) -> Self {
        Self {
            use_color,
            lines: Vec::new(),
            current: String::new(),
            style_stack: Vec::new(),
            list_stack: Vec::new(),
            pending_marker: None,
            item_indents: Vec::new(),
            continuation: None,
            in_code_block: false,
            links: Vec::new(),
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                self.style_stack.push(heading_style(level));
                if !self.use_color {
                    let hashes = "#".repeat(heading_depth(level));
                    self.add_text(&format!("{hashes} "));
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
                self.push_blank();
            }

            Event::Start(Tag::Emphasis) => self.style_stack.push(&[ANSI_ITALIC]),
            Event::Start(Tag::Strong) => self.style_stack.push(&[ANSI_BOLD]),
            Event::Start(Tag::Strikethrough) => self.style_stack.push(&[ANSI_STRIKE]),
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::Link { dest_url, .. }) => {
                self.style_stack.push(&[ANSI_UNDERLINE, ANSI_BLUE]);
                self.links.push((dest_url.to_string(), String::new()));
            }
            Event::End(TagEnd::Link) => {
                self.style_stack.pop();
                if let Some((dest, text)) = self.links.pop()
                    && !dest.is_empty()
                    && dest != text
                {
                    let suffix = paint(&format!(" <{dest}>"), &[ANSI_DIM], self.use_color);
                    self.current.push_str(&suffix);
                }
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.push_blank();
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let depth = self.list_stack.len().saturating_sub(1);
                let marker = match self.list_stack.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{next}. ");
                        *next += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let marker = format!("{}{marker}", "  ".repeat(depth));
                self.item_indents.push(UnicodeWidthStr::width(marker.as_str()));
                self.pending_marker = Some(marker);
            }
            Event::End(TagEnd::Item) => {
                self.flush_line();
                self.item_indents.pop();
            }
            Event::TaskListMarker(checked) => {
                self.add_text(if checked { "[x] " } else { "[ ] " });
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
                self.push_blank();
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.push_blank();
                } else {
                    self.continue_item();
                }
            }

            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.lines() {
                        let line = paint(&format!("    {line}"), &[ANSI_YELLOW], self.use_color);
                        self.lines.push(line);
                    }
                } else {
                    self.add_text(&text);
                }
            }
            Event::Code(code) => {
                self.take_marker();
                let code = if self.use_color {
                    paint(&code, &[ANSI_YELLOW], true)
                } else {
                    format!("`{code}`")
                };
                self.current.push_str(&code);
            }
            Event::Html(html) => {
                for line in html.lines() {
                    self.add_text(line);
                    self.flush_line();
                }
            }
            Event::End(TagEnd::HtmlBlock) => self.push_blank(),
            Event::InlineHtml(html) => self.add_text(&html),
            Event::SoftBreak => self.add_text(" "),
            Event::HardBreak => {
                self.flush_line();
                self.continue_item();
            }
            Event::Rule => {
                self.flush_line();
                self.lines.push(paint("────────", &[ANSI_DIM], self.use_color));
                self.push_blank();
            }

            _ => {}
        }
    }

    fn take_marker(&mut self) {
        if let Some(marker) = self.pending_marker.take() {
            self.current.push_str(&marker);
        } else if let Some(indent) = self.continuation.take()
            && self.current.is_empty()
        {
            self.current.push_str(&" ".repeat(indent));
        }
    }

    fn continue_item(&mut self) {
        self.continuation = self.item_indents.last().copied();
    }

    fn add_text(&mut self, text: &str) {
        self.take_marker();
        if let Some((_, link_text)) = self.links.last_mut() {
            link_text.push_str(text);
        }
        let codes: Vec<&str> = self.style_stack.iter().flat_map(|s| s.iter().copied()).collect();
        let styled = paint(text, &codes, self.use_color);
        self.current.push_str(&styled);
    }

    fn flush_line(&mut self) {
        if let Some(marker) = self.pending_marker.take() {
            self.current.push_str(&marker);
        }
        self.continuation = None;
        if !self.current.is_empty() {
            let line = std::mem::take(&mut self.current);
            self.lines.push(line.trim_end().to_string());
        }
    }

    fn push_blank(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn heading_style(level: HeadingLevel) -> &'static [&'static str] {
    match level {
        HeadingLevel::H1 => &[ANSI_BOLD, ANSI_UNDERLINE],
        HeadingLevel::H2 => &[ANSI_BOLD, ANSI_CYAN],
        HeadingLevel::H3 => &[ANSI_BOLD, ANSI_ITALIC],
        _ => &[ANSI_BOLD],
    }
}
