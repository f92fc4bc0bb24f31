//! Command Router
//!
//! Resolves one console line. Precedence, in order:
//!
//! 1. An active sub-session consumes the input; verbs are never consulted.
//! 2. A verb matching a built-in (case-insensitive) dispatches to it.
//! 3. Anything else is delegated to the AI gateway with the raw text.
//!
//! Built-in verbs are reserved and never reach the gateway. The router does
//! not touch workspace or console state itself; it describes the effect and
//! the orchestrator applies it.

use std::sync::Arc;

use rand::Rng;
use sdk::errors::CommandError;
use sdk::types::{FileId, SubSessionKind};
use tracing::{debug, warn};

use crate::gateway::AiGateway;
use crate::portfolio::ProfileContext;
use crate::registry::FileRegistry;
use crate::secrets::scrub_secrets;

pub mod builtins;
pub mod progress;
pub mod rps;

pub use builtins::{Builtin, BUILTINS};
pub use progress::ProgressJob;

/// A console line split into a verb and the untokenized remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    /// Trimmed input, case preserved
    pub raw: &'a str,
    /// First token, lowercased
    pub verb: String,
    /// Everything after the first token, trimmed, case preserved
    pub remainder: &'a str,
}

impl<'a> CommandLine<'a> {
    pub fn parse(input: &'a str) -> Self {
        let raw = input.trim();
        let (verb, remainder) = raw
            .split_once(char::is_whitespace)
            .unwrap_or((raw, ""));

        Self {
            raw,
            verb: verb.to_lowercase(),
            remainder: remainder.trim(),
        }
    }

    /// Whitespace-separated tokens of the remainder, for the few built-ins
    /// that take a secondary argument.
    pub fn args(&self) -> impl Iterator<Item = &'a str> {
        self.remainder.split_whitespace()
    }
}

/// State change a resolution asks the orchestrator to apply before the
/// reply line is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenFile(FileId),
    ClearWorkspace,
    BeginSubSession(SubSessionKind),
    EndSubSession,
}

/// Outcome of resolving one line.
#[derive(Debug)]
pub enum Resolution {
    /// A single reply line. `effect` is applied only when `output` is `Ok`.
    Reply {
        effect: Option<Effect>,
        output: Result<String, CommandError>,
    },
    /// A job with incremental output followed by a terminal line
    Progress(ProgressJob),
    /// Unmatched verb; ask the gateway with the raw text
    Delegate { prompt: String },
}

pub struct CommandRouter {
    registry: Arc<FileRegistry>,
    gateway: Arc<dyn AiGateway>,
    profile: ProfileContext,
}

impl CommandRouter {
    pub fn new(registry: Arc<FileRegistry>, gateway: Arc<dyn AiGateway>) -> Self {
        Self {
            registry,
            gateway,
            profile: ProfileContext::builtin(),
        }
    }

    /// Resolve a line against the sub-session, then the built-in table.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        sub_session: Option<SubSessionKind>,
        input: &str,
        rng: &mut R,
    ) -> Resolution {
        if let Some(kind) = sub_session {
            debug!(sub_session = %kind, "resolving sub-session round");
            return match kind {
                SubSessionKind::RockPaperScissors => match rps::resolve_round(input, rng) {
                    Ok(text) => Resolution::Reply {
                        effect: Some(Effect::EndSubSession),
                        output: Ok(text),
                    },
                    Err(e) => Resolution::Reply {
                        effect: None,
                        output: Err(e),
                    },
                },
            };
        }

        let line = CommandLine::parse(input);
        match builtins::lookup(&line.verb) {
            Some(builtin) => {
                debug!(verb = builtin.name, "dispatching built-in");
                (builtin.handler)(&self.registry, &line)
            }
            None => {
                debug!(verb = %line.verb, "no built-in matched, delegating");
                Resolution::Delegate {
                    prompt: line.raw.to_string(),
                }
            }
        }
    }

    /// Query the gateway. Every failure collapses to [`CommandError::Gateway`].
    pub async fn delegate(&self, prompt: &str) -> Result<String, CommandError> {
        self.gateway
            .query(prompt, &self.profile)
            .await
            .map_err(|e| {
                warn!(
                    gateway = self.gateway.name(),
                    error = %scrub_secrets(&e.to_string()),
                    "AI gateway query failed"
                );
                CommandError::Gateway
            })
    }

    pub fn gateway(&self) -> &dyn AiGateway {
        self.gateway.as_ref()
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::OfflineGateway;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn router() -> CommandRouter {
        CommandRouter::new(Arc::new(FileRegistry::builtin()), Arc::new(OfflineGateway))
    }

    fn reply_text(resolution: Resolution) -> Result<String, CommandError> {
        match resolution {
            Resolution::Reply { output, .. } => output,
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_command_line() {
        let line = CommandLine::parse("  Cowsay Hello World  ");
        assert_eq!(line.verb, "cowsay");
        assert_eq!(line.remainder, "Hello World");
        assert_eq!(line.raw, "Cowsay Hello World");

        let bare = CommandLine::parse("ls");
        assert_eq!(bare.verb, "ls");
        assert_eq!(bare.remainder, "");
    }

    #[test]
    fn test_verbs_are_case_insensitive() {
        let mut rng = StdRng::seed_from_u64(0);
        let output = reply_text(router().resolve(None, "HELP", &mut rng)).unwrap();
        assert!(output.starts_with("Available commands:"));
    }

    #[test]
    fn test_unknown_verb_delegates_raw_text() {
        let mut rng = StdRng::seed_from_u64(0);
        match router().resolve(None, "whoami  --Verbose", &mut rng) {
            Resolution::Delegate { prompt } => assert_eq!(prompt, "whoami  --Verbose"),
            other => panic!("expected delegation, got {:?}", other),
        }
    }

    #[test]
    fn test_sub_session_intercepts_builtins() {
        let mut rng = StdRng::seed_from_u64(0);
        let resolution = router().resolve(Some(SubSessionKind::RockPaperScissors), "help", &mut rng);
        assert!(matches!(
            resolution,
            Resolution::Reply {
                effect: None,
                output: Err(CommandError::InvalidChoice(_))
            }
        ));
    }

    #[test]
    fn test_valid_round_ends_sub_session() {
        let mut rng = StdRng::seed_from_u64(0);
        let resolution = router().resolve(Some(SubSessionKind::RockPaperScissors), "rock", &mut rng);
        assert!(matches!(
            resolution,
            Resolution::Reply {
                effect: Some(Effect::EndSubSession),
                output: Ok(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_delegate_failure_is_generic() {
        let err = router().delegate("whoami").await.unwrap_err();
        assert_eq!(err, CommandError::Gateway);
    }
}
