//! Error types and handling for the CLI
//!
//! Every variant maps to a stable process exit code.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from rulegen-core
    #[error("{0}")]
    Core(#[from] rulegen_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let mut message = error.to_string();

    // Core errors carry their io cause one level down
    if let Error::Core(core) = error {
        if let Some(cause) = std::error::Error::source(core) {
            let cause = cause.to_string();
            if !message.contains(&cause) {
                message = format!("{message}\n  caused by: {cause}");
            }
        }
    }

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulegen_core::SourceKind;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::Io(io::Error::new(io::ErrorKind::Other, "boom")),
            Error::FileNotFound {
                path: PathBuf::from("x"),
            },
            Error::config("bad"),
            Error::invalid_args("bad"),
            Error::other("bad"),
        ];
        let mut codes: Vec<_> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_help_only_for_invalid_args() {
        assert!(Error::invalid_args("x").should_show_help());
        assert!(!Error::config("x").should_show_help());
    }

    #[test]
    fn test_format_core_error() {
        let core = rulegen_core::Error::source_read(
            SourceKind::Definitions,
            PathBuf::from("Defs.java"),
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let error = Error::from(core);
        assert_eq!(error.exit_code(), 2);
        let text = format_error(&error, false);
        assert!(text.starts_with("Error: "));
        assert!(text.contains("Defs.java"));
        assert!(text.contains("no such file"));
    }
}
