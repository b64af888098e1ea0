//! Error types for diasys-cli
//!
//! Provides short, user-facing messages for the failures a terminal user can
//! act on. The binary prints exactly one line per error.

use diasys_link::DiasysLinkError;
use std::fmt;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CLIError>;

/// Errors that can occur in the CLI
#[derive(Debug)]
pub enum CLIError {
    /// Error from the diasys-link library
    LinkError(DiasysLinkError),

    /// Configuration file error
    ConfigurationError(String),

    /// File I/O error
    FileError(String),

    /// Output could not be rendered
    FormatError(String),

    /// User cancelled operation (empty prompt, Ctrl-D)
    Cancelled,
}

impl CLIError {
    fn format_link_error(err: &DiasysLinkError) -> String {
        match err {
            DiasysLinkError::NetworkError(msg) => {
                format!("Cannot reach the DiaSys server: {}", Self::clean_nested_message(msg))
            },
            DiasysLinkError::ServerError {
                status_code,
                message,
            } => format!("Server error ({}): {}", status_code, message),
            other => other.to_string(),
        }
    }

    fn clean_nested_message(message: &str) -> String {
        let mut cleaned = message.trim();
        let prefixes = [
            "Connection failed:",
            "connection failed:",
            "Network error:",
            "network error:",
        ];

        loop {
            let mut stripped = false;
            for prefix in &prefixes {
                if let Some(rest) = cleaned.strip_prefix(prefix) {
                    cleaned = rest.trim_start();
                    stripped = true;
                    break;
                }
            }

            if !stripped {
                break;
            }
        }

        cleaned.to_string()
    }
}

impl fmt::Display for CLIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CLIError::LinkError(e) => write!(f, "{}", Self::format_link_error(e)),
            CLIError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            CLIError::FileError(msg) => write!(f, "File error: {}", msg),
            CLIError::FormatError(msg) => write!(f, "Format error: {}", msg),
            CLIError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for CLIError {}

impl From<DiasysLinkError> for CLIError {
    fn from(err: DiasysLinkError) -> Self {
        CLIError::LinkError(err)
    }
}

impl From<std::io::Error> for CLIError {
    fn from(err: std::io::Error) -> Self {
        CLIError::FileError(err.to_string())
    }
}

impl From<toml::de::Error> for CLIError {
    fn from(err: toml::de::Error) -> Self {
        CLIError::ConfigurationError(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for CLIError {
    fn from(err: serde_json::Error) -> Self {
        CLIError::FormatError(err.to_string())
    }
}
