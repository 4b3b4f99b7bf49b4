//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the agent.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the agent.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a new conversation (forget transcript and thread id).
    New,

    /// Toggle the source list of a message.
    /// `None` targets the latest message with sources; `Some(n)` is 1-based.
    Sources(Option<usize>),

    /// Enable or disable markdown rendering.
    Markdown(bool),

    /// Show the current thread id.
    Thread,

    /// Re-render the whole transcript.
    History,

    /// Check that the agent service is reachable.
    Ping,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics.
    Stats,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use agentchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/sources 2").is_some());
/// assert!(parse_command("Hello, agent!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" | "clear" | "reset" => ChatCommand::New,
        "sources" | "src" => match argument {
            None => ChatCommand::Sources(None),
            Some(arg) => match arg.parse::<usize>() {
                Ok(n) if n > 0 => ChatCommand::Sources(Some(n)),
                _ => ChatCommand::Invalid(
                    "/sources expects a message number starting at 1".to_string(),
                ),
            },
        },
        "markdown" | "md" => match argument.and_then(parse_on_off) {
            Some(value) => ChatCommand::Markdown(value),
            None => ChatCommand::Invalid("/markdown expects 'on' or 'off'".to_string()),
        },
        "thread" => ChatCommand::Thread,
        "history" => ChatCommand::History,
        "ping" => ChatCommand::Ping,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new conversation
  /sources [n]           Show or hide the sources of message n (default: latest)
  /markdown on|off       Render answers as markdown or plain text
  /thread                Show the current thread id
  /history               Redraw the conversation
  /ping                  Check that the agent service is reachable
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}
