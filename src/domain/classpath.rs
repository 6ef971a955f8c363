//! Resolved classpath types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::module::VisibilityRuleSet;

/// A group of classpath files sharing one visibility rule set
///
/// Entries without rules are unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClasspathEntry {
    files: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visibility: Option<VisibilityRuleSet>,
}

impl ResolvedClasspathEntry {
    /// Creates an entry, dropping duplicate files while keeping order
    pub fn new(files: impl IntoIterator<Item = PathBuf>, visibility: Option<VisibilityRuleSet>) -> Self {
        let mut unique: Vec<PathBuf> = Vec::new();
        for file in files {
            if !unique.contains(&file) {
                unique.push(file);
            }
        }
        Self {
            files: unique,
            visibility,
        }
    }

    pub fn unrestricted(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self::new(files, None)
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn visibility(&self) -> Option<&VisibilityRuleSet> {
        self.visibility.as_ref()
    }

    /// Textual access rules, e.g. `+com/x/*;-**/*`
    pub fn access_restrictions(&self) -> Option<String> {
        self.visibility.as_ref().map(ToString::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Result of resolving a project's classpath
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedClasspath {
    pub classpath: Vec<ResolvedClasspathEntry>,
    pub boot_classpath: Vec<ResolvedClasspathEntry>,
    /// Workspace projects backing modules reached through a module container
    #[serde(default)]
    pub referenced_module_projects: Vec<String>,
}

impl ResolvedClasspath {
    pub fn new() -> Self {
        Self::default()
    }

    /// All classpath files in order
    pub fn files(&self) -> Vec<&Path> {
        flatten(&self.classpath)
    }

    /// All boot classpath files in order
    pub fn boot_files(&self) -> Vec<&Path> {
        flatten(&self.boot_classpath)
    }

    /// Joins the classpath files with `separator` (`:` or `;`)
    pub fn to_path_string(&self, separator: &str) -> String {
        self.files()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Serializes the classpath for the task layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub(crate) fn add_entry(&mut self, entry: ResolvedClasspathEntry) {
        push_unique(&mut self.classpath, entry);
    }

    pub(crate) fn add_boot_entry(&mut self, entry: ResolvedClasspathEntry) {
        push_unique(&mut self.boot_classpath, entry);
    }

    pub(crate) fn add_module_project(&mut self, name: &str) {
        if !self.referenced_module_projects.iter().any(|p| p == name) {
            self.referenced_module_projects.push(name.to_string());
        }
    }
}

fn flatten(entries: &[ResolvedClasspathEntry]) -> Vec<&Path> {
    entries
        .iter()
        .flat_map(|e| e.files.iter().map(PathBuf::as_path))
        .collect()
}

/// Appends `entry` minus the files an earlier entry already provides
fn push_unique(entries: &mut Vec<ResolvedClasspathEntry>, mut entry: ResolvedClasspathEntry) {
    entry
        .files
        .retain(|file| !entries.iter().any(|e| e.files.contains(file)));
    if !entry.is_empty() {
        entries.push(entry);
    }
}
