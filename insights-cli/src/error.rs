//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use std::fmt;

use insights::Error as LibError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error that prevents startup.
    Config(String),

    /// The command ran but did not achieve its goal.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Semantic or API failure
    /// - 2: Required option missing
    /// - 3: Credentials not configured
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::Library(lib_err) => match lib_err {
                LibError::Api { .. } | LibError::AlreadyExists { .. } | LibError::Http(_) => 1,
                LibError::MissingRequired { .. } => 2,
                LibError::NotConfigured => 3,
                LibError::Validation { .. } | LibError::InvalidConfirmation { .. } => 4,
                LibError::Io(_) | LibError::InvalidPath { .. } | LibError::InputRead(_) => 5,
                _ => 6,
            },
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Library(LibError::Json(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = LibError::MissingRequired {
            command: "dag deploy".into(),
            options: vec!["dagName".into()],
        };
        assert_eq!(CliError::from(missing).exit_code(), 2);
        assert_eq!(CliError::from(LibError::NotConfigured).exit_code(), 3);
        assert_eq!(
            CliError::from(LibError::Api {
                operation: "GetDAG".into(),
                status: 404,
                body: String::new(),
            })
            .exit_code(),
            1
        );
        assert_eq!(
            CliError::from(LibError::InvalidConfirmation { attempts: 3 }).exit_code(),
            4
        );
        assert_eq!(
            CliError::from(LibError::UnknownCommand {
                command: "dag explode".into()
            })
            .exit_code(),
            6
        );
        assert_eq!(CliError::Config("empty path".into()).exit_code(), 7);
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = [
            CliError::SemanticFailure("x".into()),
            CliError::InvalidArguments("x".into()),
            CliError::Io(std::io::Error::other("x")),
            CliError::Config("x".into()),
            CliError::Library(LibError::AlreadyExists {
                operation: "PostDAG".into(),
            }),
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0, "{err}");
        }
    }

    #[test]
    fn test_not_configured_message() {
        let err = CliError::from(LibError::NotConfigured);
        assert!(err.to_string().contains("pi configure -i"));
    }
}
