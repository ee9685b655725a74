//! Test utilities for Cofound
//!
//! This module provides common test helpers: session factories, temporary
//! config files, and assertion helpers.

use crate::config::Config;
use crate::error::CofoundError;
use crate::session::Session;
use chrono::TimeZone;
use chrono::Utc;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Arguments
///
/// * `dir` - Directory to create the file in
/// * `name` - Name of the file
/// * `content` - Content to write to the file
///
/// # Returns
///
/// Returns the path to the created file
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Build a session with explicit pin state and timestamp
///
/// # Arguments
///
/// * `id` - Thread id
/// * `pinned` - Pin state
/// * `updated_ms` - `last_updated` as a millisecond epoch, if any
pub fn make_session(id: &str, pinned: bool, updated_ms: Option<i64>) -> Session {
    Session {
        id: id.to_string(),
        display_name: None,
        status_summary: "Working".to_string(),
        is_pinned: pinned,
        last_updated: updated_ms.map(|ms| Utc.timestamp_millis_opt(ms).unwrap()),
    }
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected
/// message
pub fn assert_error_contains<T>(result: Result<T, CofoundError>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration with default values
pub fn test_config() -> Config {
    Config::default()
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
server:
  base_url: http://localhost:8000
  request_timeout_seconds: 5

session:
  id_prefix: test-client
  reconcile_poll_budget: 2
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_make_session() {
        let session = make_session("founder-1", true, Some(1_700_000_000_000));
        assert_eq!(session.id, "founder-1");
        assert!(session.is_pinned);
        assert!(session.last_updated.is_some());
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<(), CofoundError> =
            Err(CofoundError::Config("test error message".to_string()));
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: Result<(), CofoundError> = Ok(());
        assert_error_contains(result, "error");
    }

    #[test]
    fn test_test_config() {
        let config = test_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_test_config_yaml() {
        let yaml = test_config_yaml();
        assert!(yaml.contains("server:"));
        assert!(yaml.contains("session:"));
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.id_prefix, "test-client");
    }
}
