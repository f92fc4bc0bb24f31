//! Workspace State
//!
//! Owns the ordered sequence of open tabs and the active-tab pointer.
//!
//! # Invariants
//!
//! - The active pointer, when set, names a tab in the open sequence.
//! - Tabs are unique by id and kept in first-opened order; opening an open
//!   file only moves the pointer.
//! - Closing the active tab selects its predecessor, or the new first tab if
//!   it was first, or nothing if the sequence becomes empty.

use std::sync::Arc;

use sdk::errors::EngineError;
use sdk::types::{FileEntry, FileId};
use tracing::debug;

use crate::effects::{Cue, EffectsObserver};
use crate::registry::FileRegistry;

/// Open tabs plus the active pointer, backed by a read-only registry.
#[derive(Debug, Clone)]
pub struct WorkspaceState {
    registry: Arc<FileRegistry>,
    open: Vec<FileId>,
    active: Option<FileId>,
}

/// Copy of the workspace taken for rendering or event publication.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WorkspaceSnapshot {
    pub open: Vec<FileId>,
    pub active: Option<FileId>,
}

impl WorkspaceState {
    pub fn new(registry: Arc<FileRegistry>) -> Self {
        Self {
            registry,
            open: Vec::new(),
            active: None,
        }
    }

    /// Open `id` (appending a tab if needed) and make it active.
    ///
    /// Returns `UnknownFile` without touching state or emitting a cue when
    /// the id is not in the registry.
    pub fn open_file(
        &mut self,
        id: &FileId,
        effects: &dyn EffectsObserver,
    ) -> Result<(), EngineError> {
        if !self.registry.contains(id) {
            return Err(EngineError::UnknownFile(id.to_string()));
        }

        effects.on_cue(Cue::Open);
        if !self.open.contains(id) {
            self.open.push(id.clone());
        }
        self.active = Some(id.clone());
        debug!(file = %id, tabs = self.open.len(), "opened file");
        Ok(())
    }

    /// Make an already-open tab active. No-op for ids that are not open.
    pub fn select_tab(&mut self, id: &FileId, effects: &dyn EffectsObserver) -> bool {
        if !self.open.contains(id) {
            return false;
        }
        effects.on_cue(Cue::Open);
        self.active = Some(id.clone());
        true
    }

    /// Close a tab, reassigning the pointer if it was active.
    pub fn close_tab(&mut self, id: &FileId, effects: &dyn EffectsObserver) -> bool {
        let Some(index) = self.open.iter().position(|open| open == id) else {
            return false;
        };

        effects.on_cue(Cue::Close);
        self.open.remove(index);

        if self.active.as_ref() == Some(id) {
            self.active = if index > 0 {
                self.open.get(index - 1).cloned()
            } else {
                self.open.first().cloned()
            };
        }
        debug!(file = %id, active = ?self.active, "closed tab");
        true
    }

    /// Close every tab.
    pub fn clear_all(&mut self) {
        self.open.clear();
        self.active = None;
    }

    pub fn open_tabs(&self) -> &[FileId] {
        &self.open
    }

    pub fn active(&self) -> Option<&FileId> {
        self.active.as_ref()
    }

    /// Registry entry behind the active tab; `None` means show the placeholder.
    pub fn active_entry(&self) -> Option<&FileEntry> {
        self.active.as_ref().and_then(|id| self.registry.get(id))
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            open: self.open.clone(),
            active: self.active.clone(),
        }
    }
}
