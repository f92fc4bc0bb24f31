//! CLI interface for Folio
//!
//! Defines the commands and global flags using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio portfolio workspace console
///
/// Browse the portfolio files as tabs and talk to the command console,
/// including its AI fallback for free-text questions.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive console session
    Shell,

    /// Submit console lines in order and print the resulting session
    Exec {
        /// Console lines, e.g. "run about.md" "play rps" "rock"
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// List the files in the registry
    Files,

    /// Manage the stored Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Run system diagnostics
    Doctor,

    /// Ask the AI for a short analysis of one portfolio project
    Analyze {
        /// Project title, e.g. FoodLens
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
}

/// API key management actions
#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Store the key in the OS keychain
    Set {
        /// The API key
        value: String,
    },

    /// Remove the key from the OS keychain
    Delete,

    /// Show where the key would be loaded from
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["folio", "files"]);
        assert!(matches!(cli.command, Command::Files));
        assert!(!cli.json);
        assert!(cli.log.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["folio", "--json", "--log", "debug", "doctor"]);
        assert!(cli.json);
        assert_eq!(cli.log, Some("debug".to_string()));
        assert!(matches!(cli.command, Command::Doctor));
    }

    #[test]
    fn test_exec_command() {
        let cli = Cli::parse_from(["folio", "exec", "play rps", "rock"]);
        if let Command::Exec { lines } = cli.command {
            assert_eq!(lines, vec!["play rps".to_string(), "rock".to_string()]);
        } else {
            panic!("Expected Exec command");
        }
    }

    #[test]
    fn test_exec_requires_a_line() {
        assert!(Cli::try_parse_from(["folio", "exec"]).is_err());
    }

    #[test]
    fn test_analyze_joins_title_words() {
        let cli = Cli::parse_from(["folio", "analyze", "Expense", "Tracker"]);
        if let Command::Analyze { title } = cli.command {
            assert_eq!(title.join(" "), "Expense Tracker");
        } else {
            panic!("Expected Analyze command");
        }
        assert!(Cli::try_parse_from(["folio", "analyze"]).is_err());
    }

    #[test]
    fn test_key_set() {
        let cli = Cli::parse_from(["folio", "key", "set", "AIza-test"]);
        if let Command::Key { action } = cli.command {
            if let KeyAction::Set { value } = action {
                assert_eq!(value, "AIza-test");
            } else {
                panic!("Expected KeyAction::Set");
            }
        } else {
            panic!("Expected Key command");
        }
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::parse_from(["folio", "--config", "/tmp/folio.toml", "shell"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/folio.toml")));
        assert!(matches!(cli.command, Command::Shell));
    }
}
