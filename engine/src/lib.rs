//! Folio Engine Library
//!
//! The workspace and console command engine behind the `folio` binary. It is
//! used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Secret management module
pub mod secrets;

/// Message bus for console events
pub mod message_bus;

/// Audio and UI cue observer
pub mod effects;

/// Static portfolio datasets
pub mod portfolio;

/// Read-only catalog of openable files
pub mod registry;

/// Open tabs and the active-tab pointer
pub mod workspace;

/// Console history, busy flag and sub-session
pub mod console;

/// Command parsing and resolution
pub mod router;

/// AI gateway abstraction and providers
pub mod gateway;

/// Admission gate and effect ordering
pub mod orchestrator;

/// Console output markup
pub mod markup;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
