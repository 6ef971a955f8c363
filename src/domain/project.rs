//! Project domain types
//!
//! A project is a buildable unit of the workspace: a folder plus the raw
//! dependency entries declared for it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Classification of a raw dependency entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Source,
    Output,
    Library,
    Project,
    ModuleContainer,
    Variable,
}

/// A dependency entry as declared by the project model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDependencyEntry {
    pub kind: EntryKind,

    /// Entry value: a folder, a jar, `/OtherProject`, a container id or a
    /// variable-prefixed path depending on `kind`
    pub path: String,

    /// Visible to projects that depend on the declaring project
    #[serde(default)]
    pub exported: bool,

    /// Dedicated output folder of a source entry (project-relative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Extra arguments for container entries
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, String>,
}

impl RawDependencyEntry {
    pub fn new(kind: EntryKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            exported: false,
            output: None,
            args: BTreeMap::new(),
        }
    }

    pub fn source(path: impl Into<String>) -> Self {
        Self::new(EntryKind::Source, path)
    }

    pub fn output(path: impl Into<String>) -> Self {
        Self::new(EntryKind::Output, path)
    }

    pub fn library(path: impl Into<String>) -> Self {
        Self::new(EntryKind::Library, path)
    }

    /// Reference to another workspace project, written as `/name`
    pub fn project(name: &str) -> Self {
        Self::new(EntryKind::Project, format!("/{}", name.trim_start_matches('/')))
    }

    pub fn container(id: impl Into<String>) -> Self {
        Self::new(EntryKind::ModuleContainer, id)
    }

    pub fn variable(path: impl Into<String>) -> Self {
        Self::new(EntryKind::Variable, path)
    }

    #[must_use]
    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Name of the project referenced by a `Project` entry
    pub fn project_name(&self) -> &str {
        self.path.trim_start_matches('/')
    }

    /// Splits the path into its first segment and the remainder
    ///
    /// Used for container ids (`JRE_CONTAINER/jdk17`) and variables
    /// (`M2_REPO/junit/junit.jar`).
    pub fn head_and_tail(&self) -> (&str, Option<&str>) {
        let trimmed = self.path.trim_start_matches('/');
        match trimmed.split_once('/') {
            Some((head, tail)) if !tail.is_empty() => (head, Some(tail)),
            Some((head, _)) => (head, None),
            None => (trimmed, None),
        }
    }
}

/// A project of the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,

    /// Absolute project folder
    pub location: PathBuf,

    /// Whether the project participates in build ordering
    #[serde(default = "default_buildable")]
    pub buildable: bool,

    /// Raw dependency entries, in declaration order
    #[serde(default)]
    pub entries: Vec<RawDependencyEntry>,

    /// Directly referenced project names, in declaration order
    #[serde(default)]
    pub referenced_projects: Vec<String>,

    /// Project-relative default output folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_output: Option<String>,

    /// Symbolic name of the module this project backs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

fn default_buildable() -> bool {
    true
}

impl Project {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            buildable: true,
            entries: Vec::new(),
            referenced_projects: Vec::new(),
            default_output: None,
            module: None,
        }
    }

    #[must_use]
    pub fn non_buildable(mut self) -> Self {
        self.buildable = false;
        self
    }

    #[must_use]
    pub fn with_entry(mut self, entry: RawDependencyEntry) -> Self {
        self.entries.push(entry);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.referenced_projects.push(name.into());
        self
    }

    #[must_use]
    pub fn with_default_output(mut self, output: impl Into<String>) -> Self {
        self.default_output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Raw dependency entries in declaration order
    pub fn raw_dependency_entries(&self) -> &[RawDependencyEntry] {
        &self.entries
    }

    /// Names of directly referenced projects
    pub fn referenced_project_names(&self) -> &[String] {
        &self.referenced_projects
    }

    /// Output folders of the project: each source entry's dedicated output,
    /// explicit output entries, and the default output, deduplicated in
    /// declaration order
    pub fn output_folders(&self) -> Vec<PathBuf> {
        let mut folders: Vec<PathBuf> = Vec::new();
        let mut push = |relative: &str| {
            let folder = self.location.join(relative);
            if !folders.contains(&folder) {
                folders.push(folder);
            }
        };

        for entry in &self.entries {
            match entry.kind {
                EntryKind::Source => {
                    if let Some(output) = entry.output.as_deref() {
                        push(output);
                    }
                }
                EntryKind::Output => push(&entry.path),
                _ => {}
            }
        }
        if let Some(output) = self.default_output.as_deref() {
            push(output);
        }
        folders
    }
}
