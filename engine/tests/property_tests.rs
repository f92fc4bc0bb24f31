use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use folio_engine::config::Config;
use folio_engine::effects::NoopEffects;
use folio_engine::registry::FileRegistry;
use folio_engine::router::CommandLine;
use folio_engine::workspace::WorkspaceState;
use sdk::types::FileId;

const IDS: &[&str] = &[
    "readme",
    "about",
    "experience",
    "skills",
    "projects",
    "contact",
    "settings",
];

#[derive(Debug, Clone)]
enum Action {
    Open(usize),
    Select(usize),
    Close(usize),
    Clear,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0..IDS.len()).prop_map(Action::Open),
        2 => (0..IDS.len()).prop_map(Action::Select),
        3 => (0..IDS.len()).prop_map(Action::Close),
        1 => Just(Action::Clear),
    ]
}

proptest! {
    #[test]
    fn test_workspace_invariants_hold_under_any_sequence(
        actions in prop::collection::vec(action(), 0..60)
    ) {
        let mut workspace = WorkspaceState::new(Arc::new(FileRegistry::builtin()));

        for action in actions {
            match action {
                Action::Open(i) => {
                    workspace.open_file(&FileId::from(IDS[i]), &NoopEffects).unwrap();
                    prop_assert_eq!(workspace.active(), Some(&FileId::from(IDS[i])));
                }
                Action::Select(i) => {
                    let id = FileId::from(IDS[i]);
                    let was_open = workspace.open_tabs().contains(&id);
                    prop_assert_eq!(workspace.select_tab(&id, &NoopEffects), was_open);
                }
                Action::Close(i) => {
                    let id = FileId::from(IDS[i]);
                    let before: Vec<FileId> = workspace.open_tabs().to_vec();
                    let was_active = workspace.active() == Some(&id);
                    let previous_active = workspace.active().cloned();
                    let pos = before.iter().position(|t| t == &id);

                    let closed = workspace.close_tab(&id, &NoopEffects);
                    prop_assert_eq!(closed, pos.is_some());

                    if let Some(pos) = pos {
                        if was_active {
                            let expected = if pos > 0 {
                                Some(before[pos - 1].clone())
                            } else {
                                workspace.open_tabs().first().cloned()
                            };
                            prop_assert_eq!(workspace.active().cloned(), expected);
                        } else {
                            prop_assert_eq!(workspace.active().cloned(), previous_active);
                        }
                    }
                }
                Action::Clear => {
                    workspace.clear_all();
                    prop_assert!(workspace.open_tabs().is_empty());
                }
            }

            let unique: HashSet<&FileId> = workspace.open_tabs().iter().collect();
            prop_assert_eq!(unique.len(), workspace.open_tabs().len());

            match workspace.active() {
                Some(active) => prop_assert!(workspace.open_tabs().contains(active)),
                None => prop_assert!(workspace.open_tabs().is_empty()),
            }
            if !workspace.open_tabs().is_empty() {
                prop_assert!(workspace.active().is_some());
            }
        }
    }

    #[test]
    fn test_tabs_keep_first_open_order(
        order in prop::collection::vec(0..IDS.len(), 1..30)
    ) {
        let mut workspace = WorkspaceState::new(Arc::new(FileRegistry::builtin()));
        let mut expected: Vec<FileId> = Vec::new();

        for i in order {
            let id = FileId::from(IDS[i]);
            workspace.open_file(&id, &NoopEffects).unwrap();
            if !expected.contains(&id) {
                expected.push(id);
            }
        }

        prop_assert_eq!(workspace.open_tabs(), expected.as_slice());
    }

    #[test]
    fn test_unknown_ids_never_open(name in "[a-z]{1,12}") {
        prop_assume!(!IDS.contains(&name.as_str()));
        let mut workspace = WorkspaceState::new(Arc::new(FileRegistry::builtin()));

        prop_assert!(workspace.open_file(&FileId::from(name.as_str()), &NoopEffects).is_err());
        prop_assert!(workspace.open_tabs().is_empty());
        prop_assert!(workspace.active().is_none());
    }

    #[test]
    fn test_command_line_verb_is_lowercase_first_token(
        verb in "[A-Za-z]{1,10}",
        rest in "[A-Za-z0-9 ]{0,20}",
    ) {
        let input = format!("{} {}", verb, rest);
        let line = CommandLine::parse(&input);
        prop_assert_eq!(line.verb, verb.to_lowercase());
        prop_assert_eq!(line.remainder, rest.trim());
    }

    #[test]
    fn test_config_parsing_round_trip(
        log_level in "error|warn|info|debug|trace",
        provider in "gemini|offline",
        timeout in 1..=300u64,
        step in 0..=5000u64,
        open_readme in any::<bool>(),
    ) {
        let mut config = Config::default();
        config.core.log_level = log_level.clone();
        config.gateway.provider = provider.clone();
        config.gateway.timeout_secs = timeout;
        config.console.progress_step_ms = step;
        config.console.open_readme_on_start = open_readme;

        let serialized = toml::to_string(&config).unwrap();
        let mut parsed: Config = toml::from_str(&serialized).unwrap();
        prop_assert!(parsed.validate_and_process().is_ok());

        prop_assert_eq!(parsed.core.log_level, log_level);
        prop_assert_eq!(parsed.gateway.provider, provider);
        prop_assert_eq!(parsed.gateway.timeout_secs, timeout);
        prop_assert_eq!(parsed.console.progress_step_ms, step);
        prop_assert_eq!(parsed.console.open_readme_on_start, open_readme);
    }
}
