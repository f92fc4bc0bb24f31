//! Folio SDK
//!
//! Shared data model and error taxonomy for the Folio workspace console.
//! The engine crate builds the stateful components on top of these types;
//! front ends only need this crate to interpret console history and errors.

/// Error types and handling
pub mod errors;

/// Workspace and console data model
pub mod types;

// Re-export commonly used types
pub use errors::{CommandError, EngineError, ErrorExt, NotFoundTarget};
pub use types::{Category, ConsoleLine, FileEntry, FileId, LineKind, RendererRef, SubSessionKind};
