//! Orchestrator
//!
//! Owns the workspace and console of one session and runs every submission
//! through the command router.
//!
//! # Ordering
//!
//! - A router effect (open a file, clear the workspace, enter a sub-session)
//!   is applied before the reply line that confirms it is appended. Console
//!   effects and their confirmation share one critical section, so no other
//!   submission can observe the new sub-session before its prompt.
//! - Progress lines of a streaming job are appended in order, and all of them
//!   before the job's terminal line.
//! - At most one non-sub-session evaluation is in flight. A submission that
//!   arrives while busy is dropped: history is not touched and
//!   [`SubmitOutcome::Rejected`] is returned so a front end may show a notice
//!   of its own. Sub-session rounds skip the gate only while nothing else is
//!   running, so a round never resolves inside another evaluation.
//!
//! The console lock is never held across the gateway call or a progress
//! delay, so the admission check stays responsive while a command runs.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sdk::errors::EngineError;
use sdk::types::{ConsoleLine, FileEntry, FileId, SubSessionKind};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::console::ConsoleSession;
use crate::effects::{Cue, EffectsObserver};
use crate::gateway::AiGateway;
use crate::message_bus::{Event, MessageBus};
use crate::registry::{FileRegistry, README_ID};
use crate::router::{CommandRouter, Effect, Resolution};
use crate::workspace::{WorkspaceSnapshot, WorkspaceState};

/// What happened to a submitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing recorded
    Ignored,
    /// Dropped because another command was still running
    Rejected,
    /// Consumed by the active sub-session
    SubSession,
    /// Evaluated as a command and its reply appended
    Completed,
}

pub struct Orchestrator {
    router: CommandRouter,
    console: Mutex<ConsoleSession>,
    workspace: Mutex<WorkspaceState>,
    rng: Mutex<StdRng>,
    effects: Arc<dyn EffectsObserver>,
    bus: Option<Arc<MessageBus>>,
    progress_step: Duration,
}

impl Orchestrator {
    pub fn new(
        router: CommandRouter,
        workspace: WorkspaceState,
        console: ConsoleSession,
        effects: Arc<dyn EffectsObserver>,
    ) -> Self {
        Self {
            router,
            console: Mutex::new(console),
            workspace: Mutex::new(workspace),
            rng: Mutex::new(StdRng::from_entropy()),
            effects,
            bus: None,
            progress_step: Duration::from_millis(50),
        }
    }

    /// Build a session from configuration: welcome line, optional readme tab.
    pub fn from_config(
        config: &Config,
        registry: Arc<FileRegistry>,
        gateway: Arc<dyn AiGateway>,
        effects: Arc<dyn EffectsObserver>,
    ) -> Self {
        let mut workspace = WorkspaceState::new(Arc::clone(&registry));
        if config.console.open_readme_on_start {
            let readme = FileId::from(README_ID);
            if workspace.open_file(&readme, effects.as_ref()).is_err() {
                debug!("registry has no readme entry, starting with no tabs");
            }
        }

        let console = ConsoleSession::new(&config.console.welcome);
        let router = CommandRouter::new(registry, gateway);

        Self::new(router, workspace, console, effects)
            .with_progress_step(Duration::from_millis(config.console.progress_step_ms))
    }

    pub fn with_bus(mut self, bus: Arc<MessageBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_progress_step(mut self, step: Duration) -> Self {
        self.progress_step = step;
        self
    }

    /// Submit one raw console line.
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        let input = raw.trim();
        if input.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let mut console = self.console.lock().await;

        if let Some(kind) = console.sub_session().filter(|_| !console.is_busy()) {
            self.push_line(&mut console, ConsoleLine::input(input)).await;
            let resolution = {
                let mut rng = self.rng.lock().await;
                self.router.resolve(Some(kind), input, &mut *rng)
            };
            if let Resolution::Reply { effect, output } = resolution {
                let text = match output {
                    Ok(text) => {
                        if effect == Some(Effect::EndSubSession) {
                            console.end_sub_session();
                            self.publish(Event::SubSessionChanged { sub_session: None })
                                .await;
                        }
                        text
                    }
                    Err(e) => e.to_string(),
                };
                self.push_line(&mut console, ConsoleLine::output(text)).await;
            }
            return SubmitOutcome::SubSession;
        }

        if !console.try_begin_evaluation() {
            warn!(input, "console busy, submission dropped");
            self.publish(Event::SubmissionRejected {
                input: input.to_string(),
            })
            .await;
            return SubmitOutcome::Rejected;
        }
        self.publish(Event::BusyChanged { busy: true }).await;
        self.push_line(&mut console, ConsoleLine::input(input)).await;
        drop(console);

        let resolution = {
            let mut rng = self.rng.lock().await;
            self.router.resolve(None, input, &mut *rng)
        };
        self.evaluate(resolution).await;

        self.effects.on_cue(Cue::Response);
        self.console.lock().await.end_evaluation();
        self.publish(Event::BusyChanged { busy: false }).await;
        SubmitOutcome::Completed
    }

    async fn evaluate(&self, resolution: Resolution) {
        match resolution {
            Resolution::Reply { effect, output } => match output {
                Ok(text) => self.apply_and_confirm(effect, text).await,
                Err(e) => {
                    debug!(error = ?e, "command failed");
                    self.append_output(e.to_string()).await;
                }
            },
            Resolution::Progress(job) => {
                info!(package = job.package(), "running progress job");
                let lines = job.lines(self.progress_step);
                futures::pin_mut!(lines);
                while let Some(line) = lines.next().await {
                    self.append_output(line).await;
                }
                let summary = {
                    let mut rng = self.rng.lock().await;
                    job.finish(&mut *rng)
                };
                self.append_output(summary).await;
            }
            Resolution::Delegate { prompt } => {
                let text = match self.router.delegate(&prompt).await {
                    Ok(text) => text,
                    Err(e) => e.to_string(),
                };
                self.append_output(text).await;
            }
        }
    }

    /// Apply `effect`, then append `text` while still holding the console lock
    /// taken for it.
    async fn apply_and_confirm(&self, effect: Option<Effect>, text: String) {
        let mut console = match effect {
            Some(Effect::OpenFile(id)) => {
                if let Err(e) = self.open_file(&id).await {
                    warn!(error = %e, "router resolved a file the workspace rejected");
                }
                self.console.lock().await
            }
            Some(Effect::ClearWorkspace) => {
                let snapshot = {
                    let mut workspace = self.workspace.lock().await;
                    workspace.clear_all();
                    workspace.snapshot()
                };
                self.publish_tabs(snapshot).await;
                self.console.lock().await
            }
            Some(Effect::BeginSubSession(kind)) => {
                let mut console = self.console.lock().await;
                console.begin_sub_session(kind);
                self.publish(Event::SubSessionChanged {
                    sub_session: Some(kind),
                })
                .await;
                console
            }
            Some(Effect::EndSubSession) => {
                let mut console = self.console.lock().await;
                console.end_sub_session();
                self.publish(Event::SubSessionChanged { sub_session: None })
                    .await;
                console
            }
            None => self.console.lock().await,
        };
        self.push_line(&mut console, ConsoleLine::output(text)).await;
    }

    async fn append_output(&self, text: String) {
        let mut console = self.console.lock().await;
        self.push_line(&mut console, ConsoleLine::output(text)).await;
    }

    async fn push_line(&self, console: &mut ConsoleSession, line: ConsoleLine) {
        console.push(line.clone());
        self.publish(Event::LineAppended {
            index: console.len() - 1,
            line,
        })
        .await;
    }

    async fn publish(&self, event: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(event).await;
        }
    }

    async fn publish_tabs(&self, snapshot: WorkspaceSnapshot) {
        self.publish(Event::TabsChanged {
            workspace: snapshot,
        })
        .await;
    }

    // Direct tab actions from the front end.

    pub async fn open_file(&self, id: &FileId) -> Result<(), EngineError> {
        let snapshot = {
            let mut workspace = self.workspace.lock().await;
            workspace.open_file(id, self.effects.as_ref())?;
            workspace.snapshot()
        };
        self.publish_tabs(snapshot).await;
        Ok(())
    }

    pub async fn select_tab(&self, id: &FileId) -> bool {
        let (selected, snapshot) = {
            let mut workspace = self.workspace.lock().await;
            let selected = workspace.select_tab(id, self.effects.as_ref());
            (selected, workspace.snapshot())
        };
        if selected {
            self.publish_tabs(snapshot).await;
        }
        selected
    }

    pub async fn close_tab(&self, id: &FileId) -> bool {
        let (closed, snapshot) = {
            let mut workspace = self.workspace.lock().await;
            let closed = workspace.close_tab(id, self.effects.as_ref());
            (closed, workspace.snapshot())
        };
        if closed {
            self.publish_tabs(snapshot).await;
        }
        closed
    }

    // Read-only views.

    pub async fn history(&self) -> Vec<ConsoleLine> {
        self.console.lock().await.history().to_vec()
    }

    pub async fn is_busy(&self) -> bool {
        self.console.lock().await.is_busy()
    }

    pub async fn sub_session(&self) -> Option<SubSessionKind> {
        self.console.lock().await.sub_session()
    }

    pub async fn workspace(&self) -> WorkspaceSnapshot {
        self.workspace.lock().await.snapshot()
    }

    pub async fn active_entry(&self) -> Option<FileEntry> {
        self.workspace.lock().await.active_entry().cloned()
    }

    pub fn registry(&self) -> &FileRegistry {
        self.router.registry()
    }

    pub fn gateway(&self) -> &dyn AiGateway {
        self.router.gateway()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::DEFAULT_WELCOME;
    use crate::effects::{NoopEffects, RecordingEffects};
    use crate::gateway::OfflineGateway;

    fn orchestrator(effects: Arc<dyn EffectsObserver>) -> Orchestrator {
        let registry = Arc::new(FileRegistry::builtin());
        let router = CommandRouter::new(Arc::clone(&registry), Arc::new(OfflineGateway));
        Orchestrator::new(
            router,
            WorkspaceState::new(registry),
            ConsoleSession::new(DEFAULT_WELCOME),
            effects,
        )
        .with_rng(StdRng::seed_from_u64(42))
        .with_progress_step(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let orch = orchestrator(Arc::new(NoopEffects));
        assert_eq!(orch.submit("   ").await, SubmitOutcome::Ignored);
        assert_eq!(orch.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_run_opens_before_confirmation() {
        let bus = Arc::new(MessageBus::new());
        let mut rx = bus.subscribe(crate::message_bus::EventType::All).await;
        let orch = orchestrator(Arc::new(NoopEffects)).with_bus(Arc::clone(&bus));

        orch.submit("run about.md").await;

        let mut saw_tabs = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::TabsChanged { workspace } => {
                    assert_eq!(workspace.active, Some(FileId::from("about")));
                    saw_tabs = true;
                }
                Event::LineAppended { line, .. } if line.text == "Opening about.md..." => {
                    assert!(saw_tabs, "confirmation appended before the tab opened");
                }
                _ => {}
            }
        }
        assert!(saw_tabs);
    }

    #[tokio::test]
    async fn test_response_cue_after_command() {
        let effects = Arc::new(RecordingEffects::new());
        let orch = orchestrator(Arc::clone(&effects) as Arc<dyn EffectsObserver>);
        orch.submit("ls").await;
        assert_eq!(effects.cues(), vec![Cue::Response]);
    }

    #[tokio::test]
    async fn test_sub_session_round_has_no_response_cue() {
        let effects = Arc::new(RecordingEffects::new());
        let orch = orchestrator(Arc::clone(&effects) as Arc<dyn EffectsObserver>);
        orch.submit("play rps").await;
        assert_eq!(orch.submit("rock").await, SubmitOutcome::SubSession);
        assert_eq!(effects.cues(), vec![Cue::Response]);
        assert!(orch.sub_session().await.is_none());
    }
}
