//! One-shot knowledge board command
//!
//! Fetches and prints a thread's board once; the console's board panel
//! handles the polled, live-updating variant.

use crate::api::{AgentClient, RemoteStore, TaskStatus};
use crate::config::Config;
use crate::error::Result;

use colored::Colorize;

/// Print the knowledge board for a thread
///
/// # Errors
///
/// Returns error if the board fetch fails
pub async fn show(config: &Config, thread: &str) -> Result<()> {
    let client = AgentClient::new(&config.server)?;
    let board = client.fetch_board(thread).await?;

    if board.is_empty() {
        println!("The co-founder has not initialized this knowledge base yet.");
        return Ok(());
    }

    if let Some(vision) = &board.vision {
        println!("{}", "VISION & STRATEGY".bold());
        println!("{}", vision);
        println!();
    }

    println!("{} {}", "ROADMAP".bold(), board.progress_summary().dimmed());
    if board.tasks.is_empty() {
        println!("{}", "No active roadmap items yet.".dimmed());
        return Ok(());
    }
    for task in &board.tasks {
        let marker = match task.status {
            TaskStatus::Done => "[x]".green(),
            TaskStatus::InProgress => "[~]".yellow(),
            TaskStatus::Todo => "[ ]".normal(),
        };
        println!("  {} {}", marker, task.label());
    }
    Ok(())
}
