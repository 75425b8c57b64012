//! Error handling with context and recovery suggestions
//!
//! Every error carries:
//! - A numeric code for programmatic handling
//! - Optional context describing what was being attempted
//! - An optional recovery suggestion shown to the user
//! - A serializable report form for `--json` output

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // IO errors (2xxx)
    /// Other I/O failure
    IoError = 2000,
    /// File does not exist
    FileNotFound = 2001,
    /// File not readable or writable
    PermissionDenied = 2002,
    /// Release input missing before the build starts
    MissingPrerequisite = 2005,
    /// Artifact could not be renamed
    RenameFailed = 2006,

    // Configuration errors (3xxx)
    /// Configuration unreadable
    ConfigError = 3000,
    /// Explicit config file missing
    ConfigNotFound = 3001,
    /// Configuration or JSON malformed
    ConfigParseError = 3002,

    // Process errors (5xxx)
    /// External command could not run
    ProcessError = 5000,
    /// External command not installed
    CommandNotFound = 5001,

    // Validation errors (6xxx)
    /// Invalid argument
    ValidationError = 6000,
    /// Version line malformed
    InvalidVersion = 6004,

    // Platform-specific errors (8xxx)
    /// Gradle task failed
    GradleError = 8002,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            5 => "Process",
            6 => "Validation",
            8 => "Platform",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    /// Map this error to a CLI exit code
    pub fn exit_code(&self) -> i32 {
        match self.code {
            ErrorCode::MissingPrerequisite => exit_codes::MISSING_PREREQUISITE,
            ErrorCode::ConfigError
            | ErrorCode::ConfigNotFound
            | ErrorCode::ConfigParseError => exit_codes::CONFIG_ERROR,
            ErrorCode::ValidationError | ErrorCode::InvalidVersion => {
                exit_codes::VALIDATION_ERROR
            }
            ErrorCode::CommandNotFound => exit_codes::COMMAND_NOT_FOUND,
            _ => exit_codes::FAILURE,
        }
    }

    // Convenience constructors

    /// File that was expected to exist
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    /// A file that a release build cannot proceed without
    pub fn missing_prerequisite(
        what: &str,
        path: impl AsRef<Path>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::MissingPrerequisite,
            format!("{} not found at {}", what, path.as_ref().display()),
        )
        .with_suggestion(suggestion)
    }

    /// Artifact rename that did not happen
    pub fn rename_failed(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::RenameFailed,
            format!(
                "Failed to rename {} to {}",
                from.as_ref().display(),
                to.as_ref().display()
            ),
        )
    }

    /// Configuration that could not be read
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicit config path that does not exist
    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .vocario-build.toml file or use --config to specify a path")
    }

    /// External command that could not be started
    pub fn process(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProcessError, message)
    }

    /// External command missing from PATH
    pub fn command_not_found(cmd: &str) -> Self {
        Self::new(
            ErrorCode::CommandNotFound,
            format!("Command not found: {}", cmd),
        )
        .with_suggestion(format!("Install {} and ensure it's in your PATH", cmd))
    }

    /// Gradle task failure
    pub fn gradle(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GradleError, message)
    }

    /// Malformed pubspec version
    pub fn invalid_version(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidVersion, message)
            .with_suggestion(
                "Use the form `version: 1.2.3+42` in pubspec.yaml or pass --version-code",
            )
    }

    /// Rejected user input
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

/// Serializable error report for logging and `--json` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code
    pub code: ErrorCode,
    /// Code as `E0000`
    pub code_str: String,
    /// Code category
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error rendered as text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Any other failure
    pub const FAILURE: i32 = 1;
    /// Rejected input
    pub const VALIDATION_ERROR: i32 = 2;
    /// Configuration problem
    pub const CONFIG_ERROR: i32 = 3;
    /// Release keystore or credentials missing
    pub const MISSING_PREREQUISITE: i32 = 6;
    /// External command not installed
    pub const COMMAND_NOT_FOUND: i32 = 127;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("JSON parse error: {}", err))
            .with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}
