//! Workspace and console data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a registry entry (e.g. `readme`, `about`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Category tag of a registry entry, used by front ends for icons and colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Readme,
    Profile,
    Experience,
    Skills,
    Projects,
    Contact,
    Settings,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Readme => "readme",
            Category::Profile => "profile",
            Category::Experience => "experience",
            Category::Skills => "skills",
            Category::Projects => "projects",
            Category::Contact => "contact",
            Category::Settings => "settings",
        };
        f.write_str(s)
    }
}

/// Opaque name of the view a front end uses to render an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererRef(String);

impl RendererRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An openable document in the file registry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: FileId,
    pub display_name: String,
    pub category: Category,
    pub renderer: RendererRef,
}

impl FileEntry {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        category: Category,
        renderer: impl Into<String>,
    ) -> Self {
        Self {
            id: FileId::new(id),
            display_name: display_name.into(),
            category,
            renderer: RendererRef::new(renderer),
        }
    }
}

/// Whether a history line was typed by the user or produced by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Input,
    Output,
}

/// One entry of the append-only console history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleLine {
    pub kind: LineKind,
    /// Raw text for input lines, trusted markup for output lines
    pub text: String,
}

impl ConsoleLine {
    pub fn input(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Input,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Output,
            text: text.into(),
        }
    }

    pub fn is_input(&self) -> bool {
        self.kind == LineKind::Input
    }
}

/// Transient interaction modes that intercept console input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubSessionKind {
    RockPaperScissors,
}

impl fmt::Display for SubSessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubSessionKind::RockPaperScissors => write!(f, "rps"),
        }
    }
}
