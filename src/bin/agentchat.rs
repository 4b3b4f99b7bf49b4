//! Interactive chat application for conversing with a thread-based agent.
//!
//! This binary provides a REPL that posts each message to the agent service,
//! continues the server-assigned thread, and renders the answers.
//!
//! # Usage
//!
//! ```bash
//! # Talk to the service named by AGENTCHAT_API_URL (or localhost:8000)
//! agentchat
//!
//! # Point at a specific deployment
//! agentchat --base-url https://agent.example.com
//!
//! # Plain text answers without colors (useful for piping output)
//! agentchat --plain --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new` - Start a new conversation
//! - `/sources [n]` - Show or hide cited sources
//! - `/markdown on|off` - Toggle markdown rendering
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application
//!
//! Set `AGENTCHAT_LOG` (e.g. `warn` or `debug`) to log exchanges to stderr.

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use agentchat::AgentClient;
use agentchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, RenderMode,
    RenderOptions, Renderer, SourceDisclosures, SubmitOutcome, help_text, latest_with_sources,
    parse_command, render_message, render_pending, render_transcript,
};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "AGENTCHAT_LOG";

/// Main entry point for the agentchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (args, _) = ChatArgs::from_command_line_relaxed("agentchat [OPTIONS]");
    let config = ChatConfig::from(args);
    let mut options = config.render_options();

    let client = AgentClient::with_options(Some(config.base_url.clone()), config.timeout)?;
    let mut session = ChatSession::new();
    let mut disclosures = SourceDisclosures::new();
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("AI Agent Demo ({})", client.base_url());
    println!("Type /help for commands, /quit to exit\n");

    if config.ping_on_start {
        ping(&client, &mut renderer).await;
    }

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());

                // Check for slash commands
                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::New => {
                            if session.reset() {
                                disclosures.collapse_all();
                                renderer.print_info("Started a new conversation.");
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Sources(number) => {
                            toggle_sources(&session, &mut disclosures, number, &options, &mut renderer);
                        }
                        ChatCommand::Markdown(enabled) => {
                            options.mode = if enabled {
                                RenderMode::Markdown
                            } else {
                                RenderMode::Plain
                            };
                            if enabled {
                                renderer.print_info("Markdown rendering enabled.");
                            } else {
                                renderer.print_info("Markdown rendering disabled.");
                            }
                        }
                        ChatCommand::Thread => match session.thread_id() {
                            Some(thread_id) => renderer.print_info(&format!("Thread: {thread_id}")),
                            None => renderer.print_info("Thread: (none yet)"),
                        },
                        ChatCommand::History => {
                            renderer.print_lines(&render_transcript(
                                session.messages(),
                                session.is_pending(),
                                &disclosures,
                                &options,
                            ));
                        }
                        ChatCommand::Ping => {
                            ping(&client, &mut renderer).await;
                        }
                        ChatCommand::Stats => {
                            print_stats(&session, &client, &options);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the agent
                session.set_input(line);
                renderer.print_lines(&render_pending(false, &options));
                match session.submit_input(&client).await {
                    SubmitOutcome::Answered => {
                        let index = session.message_count() - 1;
                        let mut lines = vec![String::new()];
                        lines.extend(render_message(
                            index,
                            &session.messages()[index],
                            &disclosures,
                            &options,
                        ));
                        lines.push(String::new());
                        renderer.print_lines(&lines);
                    }
                    SubmitOutcome::Failed(err) => {
                        renderer.print_error(&format!("Request failed: {err}"));
                    }
                    SubmitOutcome::Ignored => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn ping(client: &AgentClient, renderer: &mut PlainTextRenderer) {
    match client.ping().await {
        Ok(message) if message.is_empty() => renderer.print_info("Agent service is up."),
        Ok(message) => renderer.print_info(&format!("Agent service is up: {message}")),
        Err(err) => renderer.print_error(&format!("Agent service unreachable: {err}")),
    }
}

fn toggle_sources(
    session: &ChatSession,
    disclosures: &mut SourceDisclosures,
    number: Option<usize>,
    options: &RenderOptions,
    renderer: &mut PlainTextRenderer,
) {
    if options.mode == RenderMode::Plain {
        renderer.print_info("Sources are shown in markdown mode (/markdown on).");
        return;
    }
    let messages = session.messages();
    let index = match number {
        Some(number) => number.checked_sub(1),
        None => latest_with_sources(messages),
    };
    match index.filter(|index| disclosures.toggle(messages, *index).is_some()) {
        Some(index) => {
            renderer.print_lines(&render_message(index, &messages[index], disclosures, options));
        }
        None => renderer.print_info("No sources to show for that message."),
    }
}

fn print_stats(session: &ChatSession, client: &AgentClient, options: &RenderOptions) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Agent service: {}", client.base_url());
    match stats.thread_id.as_deref() {
        Some(thread_id) => println!("      Thread: {thread_id}"),
        None => println!("      Thread: (none yet)"),
    }
    println!("      Messages: {}", stats.message_count);
    println!("      Answered turns: {}", stats.completed_turns);
    println!("      Failed turns: {}", stats.failed_turns);
    match client.timeout() {
        Some(timeout) => println!("      Timeout: {}s", timeout.as_secs()),
        None => println!("      Timeout: (none)"),
    }
    println!(
        "      Rendering: {}",
        match options.mode {
            RenderMode::Markdown => "markdown",
            RenderMode::Plain => "plain",
        }
    );
}
