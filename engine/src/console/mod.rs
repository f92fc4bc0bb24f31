//! Console Session
//!
//! Append-only history of input and output lines, the busy flag guarding
//! in-flight evaluations, and the optional sub-session that intercepts input.

use sdk::types::{ConsoleLine, SubSessionKind};

/// Line shown when a session starts unless overridden by `[console] welcome`.
pub const DEFAULT_WELCOME: &str =
    "Welcome to the AI terminal. Type 'help' for a list of commands.";

/// History, busy flag and sub-session state of one console.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSession {
    history: Vec<ConsoleLine>,
    busy: bool,
    sub_session: Option<SubSessionKind>,
}

impl ConsoleSession {
    /// New session whose history starts with a single welcome line.
    pub fn new(welcome: &str) -> Self {
        Self {
            history: vec![ConsoleLine::output(welcome)],
            busy: false,
            sub_session: None,
        }
    }

    pub fn append_input(&mut self, text: impl Into<String>) {
        self.history.push(ConsoleLine::input(text));
    }

    pub fn append_output(&mut self, text: impl Into<String>) {
        self.history.push(ConsoleLine::output(text));
    }

    pub fn push(&mut self, line: ConsoleLine) {
        self.history.push(line);
    }

    pub fn history(&self) -> &[ConsoleLine] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Claim the busy flag. Returns `false` if an evaluation is already running.
    pub fn try_begin_evaluation(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn end_evaluation(&mut self) {
        self.busy = false;
    }

    pub fn sub_session(&self) -> Option<SubSessionKind> {
        self.sub_session
    }

    pub fn begin_sub_session(&mut self, kind: SubSessionKind) {
        self.sub_session = Some(kind);
    }

    pub fn end_sub_session(&mut self) {
        self.sub_session = None;
    }
}
