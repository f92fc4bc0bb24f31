//! File Registry
//!
//! Read-only catalog of the documents the workspace can open. The catalog is
//! provided once at session start, either the built-in portfolio files or a
//! TOML file named by `[registry] path`, and is never mutated afterwards.
//!
//! ```toml
//! [[files]]
//! id = "readme"
//! display_name = "README.md"
//! category = "readme"
//! renderer = "ReadmeContent"
//! ```

use sdk::errors::EngineError;
use sdk::types::{Category, FileEntry, FileId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Id of the entry opened on startup when `open_readme_on_start` is set.
pub const README_ID: &str = "readme";

/// Ordered, id-unique catalog of openable documents.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct CatalogFile {
    files: Vec<FileEntry>,
}

impl FileRegistry {
    /// Build a registry, rejecting duplicate ids and blank display names.
    pub fn from_entries(entries: Vec<FileEntry>) -> Result<Self, EngineError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.clone()) {
                return Err(EngineError::DuplicateFileId(entry.id.to_string()));
            }
            if entry.display_name.trim().is_empty() {
                return Err(EngineError::Registry(format!(
                    "entry '{}' has an empty display name",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in portfolio catalog, in explorer order.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                FileEntry::new("readme", "README.md", Category::Readme, "ReadmeContent"),
                FileEntry::new("about", "about.md", Category::Profile, "About"),
                FileEntry::new("experience", "experience.js", Category::Experience, "Experience"),
                FileEntry::new("skills", "skills.json", Category::Skills, "Skills"),
                FileEntry::new("projects", "projects.jsx", Category::Projects, "Projects"),
                FileEntry::new("contact", "contact.html", Category::Contact, "Contact"),
                FileEntry::new("settings", "settings.json", Category::Settings, "Settings"),
            ],
        }
    }

    /// Load a catalog from a TOML file with a `[[files]]` array.
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Registry(format!("Failed to read catalog: {}", e)))?;
        let catalog: CatalogFile = toml::from_str(&contents)
            .map_err(|e| EngineError::Registry(format!("Failed to parse catalog: {}", e)))?;
        Self::from_entries(catalog.files)
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn get(&self, id: &FileId) -> Option<&FileEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.get(id).is_some()
    }

    /// Case-insensitive match against display names.
    pub fn find_by_name(&self, name: &str) -> Option<&FileEntry> {
        self.entries
            .iter()
            .find(|e| e.display_name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_order() {
        let registry = FileRegistry::builtin();
        let names: Vec<&str> = registry
            .entries()
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(names[0], "README.md");
        assert_eq!(names.len(), 7);
        assert!(registry.contains(&FileId::from(README_ID)));
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let registry = FileRegistry::builtin();
        let entry = registry.find_by_name("ABOUT.MD").unwrap();
        assert_eq!(entry.id, FileId::from("about"));
        assert!(registry.find_by_name("nosuch.md").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = FileRegistry::from_entries(vec![
            FileEntry::new("a", "a.md", Category::Readme, "A"),
            FileEntry::new("a", "b.md", Category::Readme, "B"),
        ]);
        assert!(matches!(result, Err(EngineError::DuplicateFileId(id)) if id == "a"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[files]]
id = "notes"
display_name = "notes.txt"
category = "readme"
renderer = "Notes"
"#
        )
        .unwrap();

        let registry = FileRegistry::load_from_path(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].renderer.as_str(), "Notes");
    }
}
