//! Error handling for the hoshikuzu CLI.
//!
//! `CliError` is the top-level error returned by commands. Domain errors
//! convert into it through `#[from]`, and `main` turns it into a miette report.
//! Config errors carry a hint telling the user what to change.

use hoshikuzu_plugin_devtools::DevtoolsError;
use miette::Report;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (unreadable file, invalid values, ...)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Devtools plugin could not be set up
    #[error(transparent)]
    Devtools(#[from] DevtoolsError),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicitly requested config file doesn't exist
    #[error("Config file not found: {}\n\nHint: Create a hoshikuzu.config.json file or drop the --config flag", .0.display())]
    NotFound(PathBuf),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CLI error into a miette report for display.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Devtools(e) => Report::new(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("hoshikuzu.config.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("hoshikuzu.config.json"));
    }

    #[test]
    fn test_invalid_value_carries_hint() {
        let err: CliError = ConfigError::InvalidValue {
            field: "port".into(),
            value: "abc".into(),
            hint: "Use a number between 0 and 65535".into(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("'port'"));
        assert!(msg.contains("Hint: Use a number"));
    }

    #[test]
    fn test_devtools_error_keeps_diagnostic() {
        let err: CliError = DevtoolsError::invalid_notify_url("ftp://x", "unsupported scheme").into();
        let report = cli_error_to_miette(err);
        assert!(report.to_string().contains("ftp://x"));
    }
}
