//! Error types and handling
//!
//! Two families of errors live here:
//!
//! - [`CommandError`]: the console taxonomy. Every variant is recovered by the
//!   command router and rendered as exactly one output line; none of them end
//!   the session.
//! - [`EngineError`]: failures of the surrounding engine (configuration,
//!   registry validation, keychain access, I/O). These surface at the CLI edge.
//!
//! Both implement [`ErrorExt`], which supplies a short user-facing hint and
//! whether the failure can be retried.
//!
//! # Security
//!
//! `CommandError::Gateway` never carries transport detail. Whatever went wrong
//! between the engine and the AI provider is logged by the engine and replaced
//! here with a fixed apology.

use thiserror::Error;

/// Fixed text shown for any AI gateway failure.
pub const GATEWAY_APOLOGY: &str =
    "Sorry, there was an error connecting to the AI. Please try again later.";

/// Trait for Folio error extensions
///
/// Provides additional context for errors: a hint that is safe to show to an
/// end user and whether the operation can simply be tried again.
pub trait ErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    fn is_recoverable(&self) -> bool;
}

/// What a [`CommandError::NotFound`] failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundTarget {
    /// `run <file>` named no registry entry
    File(String),
    /// `api get <resource>` named an unknown dataset
    Endpoint(String),
    /// `play <game>` named an unknown game
    Game(String),
}

/// Console command errors
///
/// The `Display` output of each variant is the exact line appended to the
/// console history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A required argument was missing; carries the usage synopsis
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// The named file, dataset or game does not exist
    #[error("{}", not_found_message(.0))]
    NotFound(NotFoundTarget),

    /// The verb is known but this variant of it is not implemented
    #[error("{0}")]
    Unsupported(&'static str),

    /// Sub-session input outside its fixed choice set
    #[error("Invalid choice. Please type {0}.")]
    InvalidChoice(&'static str),

    /// The AI gateway failed or returned nothing usable
    #[error("{}", GATEWAY_APOLOGY)]
    Gateway,
}

fn not_found_message(target: &NotFoundTarget) -> String {
    match target {
        NotFoundTarget::File(name) => format!("Error: file not found: {}", name),
        NotFoundTarget::Endpoint(resource) => format!("API endpoint not found: {}", resource),
        NotFoundTarget::Game(_) => "Game not found. Try 'play rps'.".to_string(),
    }
}

impl ErrorExt for CommandError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Usage(_) => "Type 'help' to see the arguments each command expects",
            Self::NotFound(NotFoundTarget::File(_)) => "Type 'ls' to list the available files",
            Self::NotFound(NotFoundTarget::Endpoint(_)) => "Available datasets: projects, skills",
            Self::NotFound(NotFoundTarget::Game(_)) => "The only game available is 'rps'",
            Self::Unsupported(_) => "Type 'help' to see what is supported",
            Self::InvalidChoice(_) => "Pick one of the listed choices to finish the round",
            Self::Gateway => "The assistant is unavailable right now. Try again later",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// Main engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // File registry errors
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Duplicate file id in registry: {0}")]
    DuplicateFileId(String),

    #[error("Unknown file id: {0}")]
    UnknownFile(String),

    // Keyring errors
    #[error("Keyring error: {0}")]
    KeyringError(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Registry(_) => "Check the file catalog referenced by [registry] path",
            Self::DuplicateFileId(_) => "Every file in the catalog needs a unique id",
            Self::UnknownFile(_) => "Type 'ls' to list the available files",
            Self::KeyringError(_) => "Failed to access secure storage. Check system keychain",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::DuplicateFileId(_) | Self::Registry(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_lines() {
        assert_eq!(CommandError::Usage("run [file]").to_string(), "Usage: run [file]");
        assert_eq!(
            CommandError::NotFound(NotFoundTarget::File("nosuch.md".into())).to_string(),
            "Error: file not found: nosuch.md"
        );
        assert_eq!(
            CommandError::NotFound(NotFoundTarget::Endpoint("users".into())).to_string(),
            "API endpoint not found: users"
        );
        assert_eq!(
            CommandError::NotFound(NotFoundTarget::Game("chess".into())).to_string(),
            "Game not found. Try 'play rps'."
        );
        assert_eq!(
            CommandError::InvalidChoice("'rock', 'paper', or 'scissors'").to_string(),
            "Invalid choice. Please type 'rock', 'paper', or 'scissors'."
        );
    }

    #[test]
    fn test_gateway_error_is_generic() {
        let line = CommandError::Gateway.to_string();
        assert_eq!(line, GATEWAY_APOLOGY);
        assert!(CommandError::Gateway.is_recoverable());
    }

    #[test]
    fn test_engine_error_recoverability() {
        assert!(EngineError::Config("bad".into()).is_recoverable());
        assert!(!EngineError::DuplicateFileId("readme".into()).is_recoverable());
    }
}
