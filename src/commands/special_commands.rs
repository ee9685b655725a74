//! Special commands parser for the interactive console
//!
//! This module parses the `/`-prefixed commands that can be entered during
//! a console session. Special commands operate on the session list, the
//! active thread, the knowledge board, and the identity profile; any other
//! input is sent to the agent as a chat message.
//!
//! Commands are case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument {
        /// The command that was entered
        command: String,
        /// Usage string shown to the user
        usage: String,
    },
}

/// Special commands that can be executed during a console session
///
/// These commands modify session state or display information rather than
/// being sent to the agent. Session targets accept either a thread id or a
/// 1-based index into the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// List all sessions, pinned first
    ListSessions,

    /// Switch the active thread
    Switch(String),

    /// Create and switch to a fresh session
    NewSession,

    /// Toggle the pin state of a session
    Pin(String),

    /// Rename a session (opens an editable draft)
    Rename(String),

    /// Delete a session after explicit confirmation
    Delete(String),

    /// Show the active thread's knowledge board
    ShowBoard,

    /// Show the identity profile text
    ShowProfile,

    /// Send a recorded audio file as a voice message
    Voice(String),

    /// Display the current session and sync status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the console
    Exit,

    /// Not a special command: send the input to the agent
    None,
}

/// Parse a user input string into a console command
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(ConsoleCommand) for valid commands or `ConsoleCommand::None`
/// for regular chat input.
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is
/// not a valid command, and `CommandError::MissingArgument` when a command
/// that needs a target is entered without one.
///
/// # Examples
///
/// ```
/// use cofound::commands::special_commands::{parse_console_command, ConsoleCommand};
///
/// let cmd = parse_console_command("/sessions").unwrap();
/// assert_eq!(cmd, ConsoleCommand::ListSessions);
///
/// let cmd = parse_console_command("/switch founder-42").unwrap();
/// assert_eq!(cmd, ConsoleCommand::Switch("founder-42".to_string()));
///
/// let cmd = parse_console_command("hello agent").unwrap();
/// assert_eq!(cmd, ConsoleCommand::None);
///
/// assert!(parse_console_command("/bogus").is_err());
/// ```
pub fn parse_console_command(input: &str) -> Result<ConsoleCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        if lower == "exit" || lower == "quit" {
            return Ok(ConsoleCommand::Exit);
        }
        return Ok(ConsoleCommand::None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let argument = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match command.as_str() {
        "/sessions" | "/ls" => Ok(ConsoleCommand::ListSessions),
        "/switch" | "/open" => require_argument(argument, &command, "/switch <id|index>")
            .map(ConsoleCommand::Switch),
        "/new" => Ok(ConsoleCommand::NewSession),
        "/pin" => require_argument(argument, &command, "/pin <id|index>").map(ConsoleCommand::Pin),
        "/rename" => {
            require_argument(argument, &command, "/rename <id|index>").map(ConsoleCommand::Rename)
        }
        "/delete" | "/rm" => {
            require_argument(argument, &command, "/delete <id|index>").map(ConsoleCommand::Delete)
        }
        "/board" => Ok(ConsoleCommand::ShowBoard),
        "/profile" => Ok(ConsoleCommand::ShowProfile),
        "/voice" => {
            require_argument(argument, &command, "/voice <path>").map(ConsoleCommand::Voice)
        }
        "/status" => Ok(ConsoleCommand::ShowStatus),
        "/help" | "/?" => Ok(ConsoleCommand::Help),
        "/exit" | "/quit" => Ok(ConsoleCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn require_argument(
    argument: Option<&str>,
    command: &str,
    usage: &str,
) -> Result<String, CommandError> {
    argument
        .map(str::to_string)
        .ok_or_else(|| CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
}

/// Print help information for all console commands
pub fn print_help() {
    println!("Console commands:");
    println!("  /sessions            List all sessions, pinned first");
    println!("  /switch <id|index>   Switch the active thread");
    println!("  /new                 Start a fresh session");
    println!("  /pin <id|index>      Pin or unpin a session");
    println!("  /rename <id|index>   Rename a session");
    println!("  /delete <id|index>   Delete a session (asks for confirmation)");
    println!("  /board               Show the knowledge board for this thread");
    println!("  /profile             Show the identity profile");
    println!("  /voice <path>        Send an audio file as a voice message");
    println!("  /status              Show session and sync status");
    println!("  /help                Show this help");
    println!("  /quit                Exit the console");
    println!();
    println!("Anything else is sent to the co-founder as a message.");
}
