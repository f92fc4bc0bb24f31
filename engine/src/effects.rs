//! Effects observer
//!
//! Audio and UI cues are a presentation concern. Workspace and console
//! operations receive an `&dyn EffectsObserver` explicitly and report what
//! happened; they never reach for a global sound or UI handle.

use std::sync::Mutex;
use tracing::debug;

/// Cue emitted by workspace and console operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A tab was opened or selected
    Open,
    /// A tab was closed
    Close,
    /// A console command finished and produced its reply
    Response,
}

/// Capability notified of user-visible effects.
pub trait EffectsObserver: Send + Sync {
    fn on_cue(&self, cue: Cue);
}

/// Observer that ignores every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEffects;

impl EffectsObserver for NoopEffects {
    fn on_cue(&self, _cue: Cue) {}
}

/// Observer that only traces cues; used by the CLI front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEffects;

impl EffectsObserver for TracingEffects {
    fn on_cue(&self, cue: Cue) {
        debug!(?cue, "effect cue");
    }
}

/// Observer that remembers every cue in order.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    cues: Mutex<Vec<Cue>>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues observed so far.
    pub fn cues(&self) -> Vec<Cue> {
        match self.cues.lock() {
            Ok(cues) => cues.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EffectsObserver for RecordingEffects {
    fn on_cue(&self, cue: Cue) {
        match self.cues.lock() {
            Ok(mut cues) => cues.push(cue),
            Err(poisoned) => poisoned.into_inner().push(cue),
        }
    }
}
