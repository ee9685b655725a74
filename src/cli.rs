//! Command-line interface definition for Cofound
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive console plus one-shot session, board,
//! and profile commands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cofound - console client for the co-founder agent
///
/// Chat with the remote agent, manage conversation sessions, and inspect
/// the per-thread knowledge board from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "cofound")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the agent server base URL
    #[arg(short, long)]
    pub server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Cofound
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive console
    Chat {
        /// Resume a specific thread instead of starting a new one
        #[arg(short, long)]
        thread: Option<String>,
    },

    /// Manage conversation sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Show the knowledge board for a thread
    Board {
        /// Thread id to inspect
        #[arg(short, long)]
        thread: String,
    },

    /// View or edit the identity profile
    Profile {
        /// Profile subcommand
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List all sessions, pinned first
    List {
        /// Emit the raw session list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle the pin state of a session
    Pin {
        /// Thread id to pin or unpin
        thread: String,
    },

    /// Rename a session
    Rename {
        /// Thread id to rename
        thread: String,

        /// New display name
        name: String,
    },

    /// Delete a session (destructive, asks for confirmation)
    Delete {
        /// Thread id to delete
        thread: String,

        /// Skip the interactive confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Print the current profile text
    Get,

    /// Replace the profile text
    Set {
        /// New profile content (mutually exclusive with --file)
        #[arg(conflicts_with = "file")]
        content: Option<String>,

        /// Read the new profile content from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            server: None,
            verbose: false,
            command: Commands::Chat { thread: None },
        }
    }
}
