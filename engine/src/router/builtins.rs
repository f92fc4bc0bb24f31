//! Built-in verb table
//!
//! Every reserved verb maps to one handler. `help` is generated from this
//! table so the listing can never drift from what actually dispatches.

use sdk::errors::{CommandError, NotFoundTarget};
use sdk::types::SubSessionKind;

use super::progress::ProgressJob;
use super::{rps, CommandLine, Effect, Resolution};
use crate::markup::{self, Style};
use crate::portfolio::{Dataset, OWNER_NAME, OWNER_ROLE, SKILLS};
use crate::registry::FileRegistry;

pub type Handler = fn(&FileRegistry, &CommandLine<'_>) -> Resolution;

/// One reserved verb.
pub struct Builtin {
    /// Lowercase verb matched against the first token
    pub name: &'static str,
    /// Synopsis shown by `help`
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

pub static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "help",
        usage: "help",
        summary: "Show this help message.",
        handler: help,
    },
    Builtin {
        name: "ls",
        usage: "ls",
        summary: "List all files.",
        handler: ls,
    },
    Builtin {
        name: "run",
        usage: "run [file]",
        summary: "Open a file in a new tab.",
        handler: run,
    },
    Builtin {
        name: "neofetch",
        usage: "neofetch",
        summary: "Display system information.",
        handler: neofetch,
    },
    Builtin {
        name: "api",
        usage: "api get",
        summary: "Get portfolio data (e.g., 'api get projects').",
        handler: api,
    },
    Builtin {
        name: "cowsay",
        usage: "cowsay [msg]",
        summary: "Let the cow speak.",
        handler: cowsay,
    },
    Builtin {
        name: "npm",
        usage: "npm [...]",
        summary: "Simulate npm commands (e.g., 'npm install motivation').",
        handler: npm,
    },
    Builtin {
        name: "play",
        usage: "play rps",
        summary: "Play Rock, Paper, Scissors.",
        handler: play,
    },
    Builtin {
        name: "clear",
        usage: "clear",
        summary: "Clear the workspace.",
        handler: clear,
    },
];

/// Trailing notice of the free-text fallback.
pub const FALLBACK_NOTICE: &str = "You can also ask me questions like 'what are your skills?'.";

const USAGE_COLUMN: usize = 14;

const DEFAULT_COW_MESSAGE: &str = "Moooo!";

const NS_LOGO: &[&str] = &[
    "███╗   ██╗███████╗",
    "████╗  ██║██╔════╝",
    "██╔██╗ ██║███████╗",
    "██║╚██╗██║╚════██║",
    "██║ ╚████║███████║",
    "╚═╝  ╚═══╝╚══════╝",
];

/// Case-insensitive verb lookup.
pub fn lookup(verb: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name.eq_ignore_ascii_case(verb))
}

fn reply(output: impl Into<String>) -> Resolution {
    Resolution::Reply {
        effect: None,
        output: Ok(output.into()),
    }
}

fn fail(error: CommandError) -> Resolution {
    Resolution::Reply {
        effect: None,
        output: Err(error),
    }
}

fn help(_registry: &FileRegistry, _line: &CommandLine<'_>) -> Resolution {
    let mut text = String::from("Available commands:");
    for builtin in BUILTINS {
        let pad = USAGE_COLUMN.saturating_sub(builtin.usage.len());
        text.push_str(&format!(
            "\n  {}{:pad$}- {}",
            markup::span(Style::Accent, builtin.usage),
            "",
            builtin.summary,
            pad = pad
        ));
    }
    text.push_str("\n\n");
    text.push_str(FALLBACK_NOTICE);
    reply(text)
}

fn ls(registry: &FileRegistry, _line: &CommandLine<'_>) -> Resolution {
    let listing = registry
        .entries()
        .iter()
        .map(|entry| markup::span(Style::File, &markup::escape(&entry.display_name)))
        .collect::<Vec<_>>()
        .join("\n");
    reply(listing)
}

fn run(registry: &FileRegistry, line: &CommandLine<'_>) -> Resolution {
    if line.remainder.is_empty() {
        return fail(CommandError::Usage("run [file]"));
    }

    match registry.find_by_name(line.remainder) {
        Some(entry) => Resolution::Reply {
            effect: Some(Effect::OpenFile(entry.id.clone())),
            output: Ok(format!("Opening {}...", markup::escape(&entry.display_name))),
        },
        None => fail(CommandError::NotFound(NotFoundTarget::File(
            markup::escape(line.remainder),
        ))),
    }
}

fn clear(_registry: &FileRegistry, _line: &CommandLine<'_>) -> Resolution {
    Resolution::Reply {
        effect: Some(Effect::ClearWorkspace),
        output: Ok("Workspace cleared.".to_string()),
    }
}

fn neofetch(_registry: &FileRegistry, _line: &CommandLine<'_>) -> Resolution {
    let logo = NS_LOGO
        .iter()
        .map(|row| markup::span(Style::Accent, row))
        .collect::<Vec<_>>()
        .join("\n");

    let skills = format!(
        "{}...",
        SKILLS.iter().take(4).copied().collect::<Vec<_>>().join(", ")
    );
    let os = format!("folio {}", env!("CARGO_PKG_VERSION"));

    let fields = [
        ("User", OWNER_NAME),
        ("Role", OWNER_ROLE),
        ("OS", os.as_str()),
        ("Shell", "ZSH (Simulated)"),
        ("Skills", skills.as_str()),
    ];

    let info = fields
        .iter()
        .map(|(label, value)| {
            format!(
                "{}:{:width$}{}",
                markup::span(Style::Bold, label),
                "",
                markup::escape(value),
                width = USAGE_COLUMN - label.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    reply(format!("{}\n{}", markup::pre(&format!("\n{}\n", logo)), info))
}

fn api(_registry: &FileRegistry, line: &CommandLine<'_>) -> Resolution {
    let mut args = line.args();
    let (Some(action), Some(resource)) = (args.next(), args.next()) else {
        return fail(CommandError::Usage("api get [projects|skills]"));
    };
    if !action.eq_ignore_ascii_case("get") {
        return fail(CommandError::Usage("api get [projects|skills]"));
    }

    match Dataset::parse(resource) {
        Some(dataset) => reply(markup::pre(&markup::escape(&dataset.to_json()))),
        None => fail(CommandError::NotFound(NotFoundTarget::Endpoint(
            markup::escape(resource),
        ))),
    }
}

fn cowsay(_registry: &FileRegistry, line: &CommandLine<'_>) -> Resolution {
    let message = if line.remainder.is_empty() {
        DEFAULT_COW_MESSAGE.to_string()
    } else {
        markup::escape(line.remainder)
    };

    reply(format!(
        concat!(
            "<pre>\n",
            "  &lt; {} &gt;\n",
            "   \\   ^__^\n",
            "    \\  (oo)\\_______\n",
            "       (__)\\       )\\/\\\n",
            "           ||----w |\n",
            "           ||     ||\n",
            "</pre>"
        ),
        message
    ))
}

fn npm(_registry: &FileRegistry, line: &CommandLine<'_>) -> Resolution {
    let args: Vec<&str> = line.args().collect();
    match args.as_slice() {
        [install, package]
            if install.eq_ignore_ascii_case("install")
                && package.eq_ignore_ascii_case(ProgressJob::motivation().package()) =>
        {
            Resolution::Progress(ProgressJob::motivation())
        }
        _ => fail(CommandError::Unsupported(
            "Only 'npm install motivation' is supported.",
        )),
    }
}

fn play(_registry: &FileRegistry, line: &CommandLine<'_>) -> Resolution {
    match line.args().next() {
        Some(game) if game.eq_ignore_ascii_case("rps") => Resolution::Reply {
            effect: Some(Effect::BeginSubSession(SubSessionKind::RockPaperScissors)),
            output: Ok(rps::PROMPT.to_string()),
        },
        other => fail(CommandError::NotFound(NotFoundTarget::Game(
            markup::escape(other.unwrap_or_default()),
        ))),
    }
}
