//! Error types for the insights library.
//!
//! This module provides the error hierarchy shared by the configuration
//! engine and the REST client, using `thiserror` for ergonomic error handling.
//!
//! Errors fall into three families:
//!
//! - Programming errors (unknown command, unknown option, duplicate option,
//!   type mismatch) point at a registration bug and are never recovered.
//! - User-input errors (failed terminal read, missing required option,
//!   invalid value) abort the current invocation.
//! - Remote and I/O errors surface failures from the service or filesystem.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::OptionKind;

/// Result type alias for operations that may fail with an insights error.
///
/// # Examples
///
/// ```
/// use insights::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("dag-42".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the insights library.
#[derive(Debug, Error)]
pub enum Error {
    /// A command identifier was looked up that was never registered.
    #[error("unknown command '{command}'")]
    UnknownCommand {
        /// The unregistered command identifier.
        command: String,
    },

    /// An option name was resolved that the command does not declare.
    #[error("command '{command}' has no option named '{option}'")]
    UnknownOption {
        /// The command that was queried.
        command: String,
        /// The undeclared option name.
        option: String,
    },

    /// Two options of the same command share a name.
    #[error("command '{command}' declares option '{option}' more than once")]
    DuplicateOption {
        /// The command being registered.
        command: String,
        /// The duplicated option name.
        option: String,
    },

    /// A value of the wrong type was stored or requested for an option.
    #[error("option '{option}' is {expected}, found {found}")]
    TypeMismatch {
        /// The option name.
        option: String,
        /// The declared type of the option.
        expected: OptionKind,
        /// The type of the offending value.
        found: OptionKind,
    },

    /// Reading a line from the terminal failed.
    #[error("failed to read input: {0}")]
    InputRead(#[source] std::io::Error),

    /// Required options were left empty outside interactive mode.
    #[error("required option(s) not set for '{command}': {}", options.join(", "))]
    MissingRequired {
        /// The command that cannot run.
        command: String,
        /// Names of the unsatisfied options.
        options: Vec<String>,
    },

    /// A yes/no confirmation received no valid answer.
    #[error("no valid yes/no answer after {attempts} attempt(s)")]
    InvalidConfirmation {
        /// How many answers were rejected.
        attempts: usize,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP transport failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an unexpected status code.
    #[error("[{operation}] request returned {status}. Body: {body}")]
    Api {
        /// The client operation that issued the request.
        operation: String,
        /// The HTTP status code received.
        status: u16,
        /// The response body, as text.
        body: String,
    },

    /// A create call hit a resource that already exists.
    #[error("[{operation}] resource already exists")]
    AlreadyExists {
        /// The client operation that issued the request.
        operation: String,
    },

    /// Credentials are incomplete.
    #[error("please configure the Predix Insights CLI\n\n$ pi configure -i")]
    NotConfigured,
}

impl Error {
    /// Check if error indicates a registration bug rather than bad input.
    ///
    /// # Examples
    ///
    /// ```
    /// use insights::Error;
    ///
    /// let err = Error::UnknownCommand { command: "dag explode".into() };
    /// assert!(err.is_programming_error());
    /// ```
    #[must_use]
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand { .. }
                | Self::UnknownOption { .. }
                | Self::DuplicateOption { .. }
                | Self::TypeMismatch { .. }
        )
    }

    /// Check if error was caused by what the user typed or left out.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InputRead(_)
                | Self::MissingRequired { .. }
                | Self::InvalidConfirmation { .. }
                | Self::Validation { .. }
        )
    }
}
