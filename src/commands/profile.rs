//! Identity profile commands
//!
//! The profile is a single text blob the agent uses to understand the
//! user. These handlers do a plain get/set against the remote store; there
//! is no caching or synchronization involved.

use crate::api::{AgentClient, RemoteStore};
use crate::config::Config;
use crate::error::{CofoundError, Result};
use std::path::Path;

/// Print the current profile text
///
/// # Errors
///
/// Returns error if the fetch fails
pub async fn get(config: &Config) -> Result<()> {
    let client = AgentClient::new(&config.server)?;
    let content = client.get_profile().await?;
    if content.is_empty() {
        println!("Profile is empty.");
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Replace the profile text
///
/// # Arguments
///
/// * `content` - Inline replacement text
/// * `file` - Read the replacement text from this file instead
///
/// # Errors
///
/// Returns error when neither source is given, the file cannot be read, or
/// the save fails
pub async fn set(config: &Config, content: Option<String>, file: Option<&Path>) -> Result<()> {
    let content = match (content, file) {
        (Some(content), None) => content,
        (None, Some(path)) => tokio::fs::read_to_string(path).await.map_err(|e| {
            CofoundError::Profile(format!("Cannot read {}: {}", path.display(), e))
        })?,
        _ => {
            return Err(CofoundError::Profile(
                "Provide the new content inline or with --file".to_string(),
            )
            .into())
        }
    };

    let client = AgentClient::new(&config.server)?;
    client.set_profile(&content).await?;
    println!("Profile saved ({} bytes).", content.len());
    Ok(())
}
