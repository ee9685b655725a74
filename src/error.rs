//! Error types for Cofound
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Cofound operations
///
/// This enum encompasses all possible errors that can occur while talking
/// to the remote session store, loading configuration, synchronizing the
/// session list, and driving the interactive console.
#[derive(Error, Debug)]
pub enum CofoundError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote store errors (list/board/history fetches, mutations)
    #[error("Remote store error: {0}")]
    Api(String),

    /// Message send (invoke) errors
    #[error("Invoke error: {0}")]
    Invoke(String),

    /// Session state errors (invalid transitions, unknown ids)
    #[error("Session error: {0}")]
    Session(String),

    /// Profile load/save errors
    #[error("Profile error: {0}")]
    Profile(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Cofound operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
