//! One-shot session management commands
//!
//! These handlers back `cofound sessions list|pin|rename|delete`. Unlike
//! the console, they do not run a synchronizer: each command performs a
//! direct fetch or mutation against the remote store and exits.

use crate::api::{AgentClient, RemoteStore};
use crate::config::Config;
use crate::error::{CofoundError, Result};
use crate::session::{Session, SessionSnapshot};

use colored::Colorize;
use prettytable::{row, Table};

/// Render sessions as a table, marking the active one
///
/// Rows keep the snapshot's pinned-first, most-recent-first order.
pub fn render_session_table(sessions: &[Session], active_id: Option<&str>) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Name", "Status", "Pinned", "Updated", "Thread Id"]);

    for (index, session) in sessions.iter().enumerate() {
        let marker = if active_id == Some(session.id.as_str()) {
            format!("{} *", index + 1)
        } else {
            format!("{}", index + 1)
        };
        let pinned = if session.is_pinned { "yes" } else { "" };
        let updated = session
            .last_updated
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "New".to_string());

        table.add_row(row![
            marker,
            session.display_title(),
            session.status_summary,
            pinned,
            updated,
            session.id
        ]);
    }

    table
}

/// List all sessions
///
/// # Arguments
///
/// * `config` - Configuration with server settings
/// * `json` - Emit the raw session list as JSON instead of a table
///
/// # Errors
///
/// Returns error if the list fetch fails
pub async fn list(config: &Config, json: bool) -> Result<()> {
    let client = AgentClient::new(&config.server)?;
    let sessions = client.list_sessions().await?;
    let snapshot = SessionSnapshot::new(sessions, 1);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.sessions)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }
    render_session_table(&snapshot.sessions, None).printstd();
    Ok(())
}

/// Toggle the pin state of a session
///
/// # Errors
///
/// Returns error if the pin request fails
pub async fn pin(config: &Config, thread: &str) -> Result<()> {
    let client = AgentClient::new(&config.server)?;
    client.toggle_pin(thread).await?;
    println!("Toggled pin for {}", thread);
    Ok(())
}

/// Rename a session
///
/// # Errors
///
/// Returns error if the rename request fails or the name is blank
pub async fn rename(config: &Config, thread: &str, name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CofoundError::Session("Name cannot be blank".to_string()).into());
    }
    let client = AgentClient::new(&config.server)?;
    client.rename(thread, trimmed).await?;
    println!("Renamed {} to '{}'", thread, trimmed);
    Ok(())
}

/// Delete a session
///
/// Deletion is destructive and irreversible, so the command refuses to run
/// without either `--yes` or an interactive confirmation.
///
/// # Errors
///
/// Returns error if the delete request fails
pub async fn delete(config: &Config, thread: &str, yes: bool) -> Result<()> {
    if !yes && !confirm_on_stdin(thread)? {
        println!("Delete cancelled.");
        return Ok(());
    }

    let client = AgentClient::new(&config.server)?;
    client.delete(thread).await?;
    println!("{}", format!("Deleted {}", thread).yellow());
    Ok(())
}

fn confirm_on_stdin(thread: &str) -> Result<bool> {
    use std::io::Write;

    print!("Delete session '{}'? This cannot be undone. [y/N]: ", thread);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn session(id: &str, name: Option<&str>, pinned: bool, updated_ms: Option<i64>) -> Session {
        Session {
            id: id.to_string(),
            display_name: name.map(str::to_string),
            status_summary: "Working".to_string(),
            is_pinned: pinned,
            last_updated: updated_ms.map(|ms| Utc.timestamp_millis_opt(ms).unwrap()),
        }
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let sessions = vec![
            session("founder-1", Some("Launch"), true, Some(1_700_000_000_000)),
            session("founder-2", None, false, None),
        ];
        let table = render_session_table(&sessions, None);
        // Header plus one row per session
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_table_marks_active_session() {
        let sessions = vec![session("founder-1", None, false, None)];
        let table = render_session_table(&sessions, Some("founder-1"));
        let rendered = table.to_string();
        assert!(rendered.contains("1 *"));
    }

    #[test]
    fn test_table_untitled_placeholder_and_new_marker() {
        let sessions = vec![session("founder-2", None, false, None)];
        let rendered = render_session_table(&sessions, None).to_string();
        assert!(rendered.contains("Untitled Session"));
        assert!(rendered.contains("New"));
    }

    #[test]
    fn test_table_shows_pin_state() {
        let sessions = vec![
            session("a", None, true, None),
            session("b", None, false, None),
        ];
        let rendered = render_session_table(&sessions, None).to_string();
        assert!(rendered.contains("yes"));
    }
}
