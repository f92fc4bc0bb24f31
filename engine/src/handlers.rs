//! Command handlers for CLI operations
//!
//! - shell: interactive console session
//! - exec: submit lines in order and print the session
//! - files: list the file registry
//! - key: manage the stored API key
//! - analyze: AI write-up of one catalog project
//! - doctor: validate configuration and check the AI gateway

use anyhow::{anyhow, Context, Result};
use serde_json::json;
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use sdk::types::{ConsoleLine, FileId};

use crate::cli::KeyAction;
use crate::config::Config;
use crate::effects::TracingEffects;
use crate::gateway::{analyze_project, AiGateway, GeminiGateway, OfflineGateway};
use crate::markup;
use crate::message_bus::{Event, EventType, MessageBus};
use crate::orchestrator::{Orchestrator, SubmitOutcome};
use crate::portfolio::{find_project, Project, PROJECTS};
use crate::registry::FileRegistry;
use crate::secrets::{SecretManager, GEMINI_API_KEY};

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

const PROMPT: &str = "user@portfolio:~$";
const SUB_SESSION_PROMPT: &str = ">";

/// Load the configured catalog, or the built-in one.
pub fn load_registry(config: &Config) -> Result<FileRegistry> {
    match &config.registry.path {
        Some(path) => FileRegistry::load_from_path(path)
            .with_context(|| format!("Failed to load file registry from {:?}", path)),
        None => Ok(FileRegistry::builtin()),
    }
}

/// Pick the AI gateway: Gemini when a key is available, offline otherwise.
pub fn build_gateway(config: &Config) -> Result<Arc<dyn AiGateway>> {
    if config.gateway.provider == "offline" {
        tracing::info!("AI gateway disabled by configuration");
        return Ok(Arc::new(OfflineGateway));
    }

    match SecretManager::default().resolve_api_key(&config.gateway.api_key_env) {
        Some((key, source)) => {
            tracing::info!("Using Gemini gateway with key from {}", source);
            let gateway = GeminiGateway::new(&config.gateway, key)
                .context("Failed to build Gemini gateway")?;
            Ok(Arc::new(gateway))
        }
        None => {
            tracing::info!(
                "No Gemini API key in ${} or the keychain, AI fallback is offline",
                config.gateway.api_key_env
            );
            Ok(Arc::new(OfflineGateway))
        }
    }
}

/// Assemble a console session from configuration.
pub fn build_session(config: &Config, bus: Option<Arc<MessageBus>>) -> Result<Arc<Orchestrator>> {
    let registry = Arc::new(load_registry(config)?);
    let gateway = build_gateway(config)?;
    let orchestrator =
        Orchestrator::from_config(config, registry, gateway, Arc::new(TracingEffects));

    Ok(Arc::new(match bus {
        Some(bus) => orchestrator.with_bus(bus),
        None => orchestrator,
    }))
}

fn render_line(line: &ConsoleLine, color: bool) -> String {
    if line.is_input() {
        format!("{} {}", PROMPT, line.text)
    } else {
        markup::to_terminal(&line.text, color)
    }
}

/// Submit every line in order, then print the session.
pub async fn handle_exec(lines: Vec<String>, config: &Config, format: OutputFormat) -> Result<()> {
    let session = build_session(config, None)?;

    for line in &lines {
        let outcome = session.submit(line).await;
        tracing::debug!(line = %line, ?outcome, "submitted");
    }

    let history = session.history().await;
    let workspace = session.workspace().await;

    match format {
        OutputFormat::Text => {
            let color = std::io::stdout().is_terminal();
            for line in &history {
                println!("{}", render_line(line, color));
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "history": history,
                "workspace": workspace,
                "sub_session": session.sub_session().await,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Front-end commands typed at the shell, handled outside the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Tabs,
    Select(String),
    Close(String),
    Analyze(String),
    History,
    Quit,
    Unknown(String),
}

/// Parse a `:`-prefixed shell line. Other lines return `None`.
pub fn parse_meta(line: &str) -> Option<MetaCommand> {
    let body = line.trim().strip_prefix(':')?;
    let (name, arg) = body
        .split_once(char::is_whitespace)
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((body, ""));

    Some(match (name, arg) {
        ("tabs", _) => MetaCommand::Tabs,
        ("select", file) if !file.is_empty() => MetaCommand::Select(file.to_string()),
        ("close", file) if !file.is_empty() => MetaCommand::Close(file.to_string()),
        ("analyze", title) if !title.is_empty() => MetaCommand::Analyze(title.to_string()),
        ("history", _) => MetaCommand::History,
        ("quit" | "q", _) => MetaCommand::Quit,
        _ => MetaCommand::Unknown(body.to_string()),
    })
}

async fn print_tabs(session: &Orchestrator) {
    let workspace = session.workspace().await;
    if workspace.open.is_empty() {
        println!("(no open tabs)");
        return;
    }
    for id in &workspace.open {
        let name = session
            .registry()
            .get(id)
            .map(|e| e.display_name.as_str())
            .unwrap_or(id.as_str());
        let marker = if workspace.active.as_ref() == Some(id) { "*" } else { " " };
        println!("{} {}", marker, name);
    }
}

fn resolve_tab(session: &Orchestrator, name: &str) -> Option<FileId> {
    session.registry().find_by_name(name).map(|e| e.id.clone())
}

async fn run_meta(session: &Orchestrator, meta: MetaCommand) -> bool {
    match meta {
        MetaCommand::Tabs => print_tabs(session).await,
        MetaCommand::Select(name) => {
            let selected = match resolve_tab(session, &name) {
                Some(id) => session.select_tab(&id).await,
                None => false,
            };
            if selected {
                print_tabs(session).await;
            } else {
                eprintln!("No open tab named {}", name);
            }
        }
        MetaCommand::Close(name) => {
            let closed = match resolve_tab(session, &name) {
                Some(id) => session.close_tab(&id).await,
                None => false,
            };
            if closed {
                print_tabs(session).await;
            } else {
                eprintln!("No open tab named {}", name);
            }
        }
        MetaCommand::Analyze(title) => match lookup_project(&title) {
            Ok(project) => {
                let analysis = analyze_project(session.gateway(), project).await;
                println!("{}", analysis);
            }
            Err(e) => eprintln!("{}", e),
        },
        MetaCommand::History => {
            let color = std::io::stdout().is_terminal();
            for line in session.history().await {
                println!("{}", render_line(&line, color));
            }
        }
        MetaCommand::Quit => return false,
        MetaCommand::Unknown(name) => {
            eprintln!(
                "Unknown shell command :{} (try :tabs, :select, :close, :analyze, :history, :quit)",
                name
            );
        }
    }
    true
}

fn print_prompt(sub_session: bool) {
    use std::io::Write;
    print!("{} ", if sub_session { SUB_SESSION_PROMPT } else { PROMPT });
    std::io::stdout().flush().ok();
}

/// Interactive console. Lines are submitted concurrently, so typing while a
/// command runs hits the admission gate exactly as a UI would.
pub async fn handle_shell(config: &Config, format: OutputFormat) -> Result<()> {
    let bus = Arc::new(MessageBus::new());
    let mut events = bus.subscribe(EventType::All).await;
    let session = build_session(config, Some(Arc::clone(&bus)))?;
    let color = std::io::stdout().is_terminal();

    for line in session.history().await {
        println!("{}", render_line(&line, color));
    }
    if matches!(format, OutputFormat::Text) {
        print_tabs(&session).await;
        print_prompt(false);
    }

    let printer = tokio::spawn(async move {
        let mut in_sub_session = false;
        while let Some(event) = events.recv().await {
            match format {
                OutputFormat::Json => {
                    if let Ok(line) = serde_json::to_string(&event) {
                        println!("{}", line);
                    }
                }
                OutputFormat::Text => match event {
                    Event::LineAppended { line, .. } if !line.is_input() => {
                        println!("{}", markup::to_terminal(&line.text, color));
                        if in_sub_session {
                            print_prompt(true);
                        }
                    }
                    Event::SubSessionChanged { sub_session } => {
                        in_sub_session = sub_session.is_some();
                    }
                    Event::BusyChanged { busy: false } => print_prompt(in_sub_session),
                    Event::SubmissionRejected { input } => {
                        eprintln!("(busy, '{}' was not run)", input);
                    }
                    _ => {}
                },
            }
        }
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();

    while let Some(line) = stdin.next_line().await.context("Failed to read stdin")? {
        if let Some(meta) = parse_meta(&line) {
            if !run_meta(&session, meta).await {
                break;
            }
            continue;
        }

        let session = Arc::clone(&session);
        in_flight.spawn(async move { session.submit(&line).await });
    }

    while let Some(result) = in_flight.join_next().await {
        if let Ok(SubmitOutcome::Rejected) = result {
            tracing::debug!("a submission was dropped while busy");
        }
    }

    drop(session);
    drop(bus);
    printer.await.ok();
    Ok(())
}

/// Find a catalog project by title, listing the known titles on failure.
pub fn lookup_project(title: &str) -> Result<&'static Project> {
    find_project(title).ok_or_else(|| {
        let known: Vec<&str> = PROJECTS.iter().map(|p| p.title).collect();
        anyhow!(
            "Unknown project '{}'. Known projects: {}",
            title.trim(),
            known.join(", ")
        )
    })
}

/// Print the AI analysis of one project
pub async fn handle_analyze(title: &str, config: &Config, format: OutputFormat) -> Result<()> {
    let project = lookup_project(title)?;
    let gateway = build_gateway(config)?;
    let analysis = analyze_project(gateway.as_ref(), project).await;

    match format {
        OutputFormat::Text => {
            println!("{}", project.title);
            println!("{}", project.tech_stack.join(", "));
            println!();
            println!("{}", analysis);
        }
        OutputFormat::Json => {
            let output = json!({
                "project": project.title,
                "tech_stack": project.tech_stack,
                "gateway": gateway.name(),
                "analysis": analysis,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// List every registry entry
pub async fn handle_files(config: &Config, format: OutputFormat) -> Result<()> {
    let registry = load_registry(config)?;

    match format {
        OutputFormat::Text => {
            println!("{:<12} {:<16} {:<12} RENDERER", "ID", "NAME", "CATEGORY");
            for entry in registry.entries() {
                println!(
                    "{:<12} {:<16} {:<12} {}",
                    entry.id,
                    entry.display_name,
                    entry.category,
                    entry.renderer.as_str()
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(registry.entries())?);
        }
    }

    Ok(())
}

/// Manage the Gemini key in the OS keychain
pub async fn handle_key(action: KeyAction, config: &Config, format: OutputFormat) -> Result<()> {
    let manager = SecretManager::default();

    let status = match action {
        KeyAction::Set { value } => {
            manager.set_secret(GEMINI_API_KEY, &value)?;
            "stored".to_string()
        }
        KeyAction::Delete => {
            manager.delete_secret(GEMINI_API_KEY)?;
            "deleted".to_string()
        }
        KeyAction::Status => match manager.resolve_api_key(&config.gateway.api_key_env) {
            Some((key, source)) => format!("configured ({}, {})", key.hint(), source),
            None => "not configured".to_string(),
        },
    };

    match format {
        OutputFormat::Text => println!("Gemini API key: {}", status),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "gemini_api_key": status }))?
            );
        }
    }

    Ok(())
}

/// Run system diagnostics
pub async fn handle_doctor(config: &Config, format: OutputFormat) -> Result<()> {
    let mut issues = Vec::new();
    let mut checks: Vec<(&str, String)> = Vec::new();

    checks.push((
        "Version",
        format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_COMMIT_HASH")),
    ));

    // Config is already validated when loaded
    checks.push(("Configuration", "Valid".to_string()));

    match load_registry(config) {
        Ok(registry) => {
            let source = if config.registry.path.is_some() {
                "custom"
            } else {
                "built-in"
            };
            checks.push(("File registry", format!("{} files ({})", registry.len(), source)));

            if registry.is_empty() {
                issues.push("The file registry is empty; 'ls' will list nothing.".to_string());
            }
            if config.console.open_readme_on_start
                && !registry.contains(&FileId::from(crate::registry::README_ID))
            {
                issues.push(
                    "open_readme_on_start is set but the registry has no 'readme' entry."
                        .to_string(),
                );
            }
        }
        Err(e) => {
            checks.push(("File registry", "Invalid".to_string()));
            issues.push(format!("{:#}", e));
        }
    }

    checks.push(("AI provider", config.gateway.provider.clone()));
    if config.gateway.provider == "gemini" {
        match SecretManager::default().resolve_api_key(&config.gateway.api_key_env) {
            Some((_, source)) => checks.push(("Gemini API key", format!("Configured ({})", source))),
            None => {
                checks.push(("Gemini API key", "Not configured".to_string()));
                issues.push(format!(
                    "No Gemini API key. Set ${} or run 'folio key set <KEY>'; free-text questions will get an apology.",
                    config.gateway.api_key_env
                ));
            }
        }
    }

    match build_gateway(config) {
        Ok(gateway) => {
            let healthy = gateway.check_health().await;
            checks.push((
                "AI gateway",
                format!("{} ({})", gateway.name(), if healthy { "ready" } else { "unavailable" }),
            ));
        }
        Err(e) => {
            checks.push(("AI gateway", "Error".to_string()));
            issues.push(format!("{:#}", e));
        }
    }

    match format {
        OutputFormat::Text => {
            println!("Folio System Diagnostics");
            println!("========================");
            println!();

            println!("System Checks:");
            for (check, status) in &checks {
                println!("  {:<25} {}", format!("{}:", check), status);
            }

            println!();

            if issues.is_empty() {
                println!("✓ All checks passed!");
            } else {
                println!("⚠ Issues found:");
                println!();
                for (i, issue) in issues.iter().enumerate() {
                    println!("  {}. {}", i + 1, issue);
                }
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "checks": checks.iter().map(|(name, status)| {
                    json!({
                        "name": name,
                        "status": status
                    })
                }).collect::<Vec<_>>(),
                "issues": issues,
                "healthy": issues.is_empty()
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta() {
        assert_eq!(parse_meta(":tabs"), Some(MetaCommand::Tabs));
        assert_eq!(
            parse_meta(":select about.md"),
            Some(MetaCommand::Select("about.md".to_string()))
        );
        assert_eq!(parse_meta("  :q "), Some(MetaCommand::Quit));
        assert_eq!(
            parse_meta(":close"),
            Some(MetaCommand::Unknown("close".to_string()))
        );
        assert_eq!(parse_meta("run about.md"), None);
        assert_eq!(
            parse_meta(":analyze  CogniX AI "),
            Some(MetaCommand::Analyze("CogniX AI".to_string()))
        );
        assert_eq!(
            parse_meta(":analyze"),
            Some(MetaCommand::Unknown("analyze".to_string()))
        );
    }

    #[test]
    fn test_lookup_project() {
        assert_eq!(lookup_project("expense tracker").unwrap().title, "Expense Tracker");

        let err = lookup_project("Todo App").unwrap_err().to_string();
        assert!(err.starts_with("Unknown project 'Todo App'"));
        assert!(err.contains("FoodLens"));
    }

    #[test]
    fn test_render_input_line() {
        let line = ConsoleLine::input("ls");
        assert_eq!(render_line(&line, false), "user@portfolio:~$ ls");
    }

    #[test]
    fn test_offline_provider_skips_key_lookup() {
        let mut config = Config::default();
        config.gateway.provider = "offline".to_string();
        let gateway = build_gateway(&config).unwrap();
        assert_eq!(gateway.name(), "offline");
    }

    #[tokio::test]
    async fn test_exec_session_from_config() {
        let mut config = Config::default();
        config.gateway.provider = "offline".to_string();
        config.console.progress_step_ms = 0;

        let session = build_session(&config, None).unwrap();
        assert_eq!(
            session.workspace().await.active,
            Some(FileId::from("readme"))
        );
        session.submit("clear").await;
        assert!(session.workspace().await.open.is_empty());
    }
}
