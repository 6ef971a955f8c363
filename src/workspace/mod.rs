//! Workspace access
//!
//! The project registry is an external collaborator. Resolution only needs
//! name lookup, enumeration and the workspace root (for relative paths), so
//! that is all the [`Workspace`] trait asks for. [`InMemoryWorkspace`] is the
//! implementation used when the caller already holds the project model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Project;
use crate::error::{Result, order::project_not_found};

/// Read-only view of the projects in a workspace
pub trait Workspace {
    /// Workspace root folder
    fn root(&self) -> &Path;

    /// Looks up a project by name
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if no project has that name.
    fn project(&self, name: &str) -> Result<&Project>;

    /// All projects, ordered by name
    fn projects(&self) -> Vec<&Project>;

    fn has_project(&self, name: &str) -> bool {
        self.project(name).is_ok()
    }
}

/// Workspace backed by an in-memory project map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryWorkspace {
    root: PathBuf,
    #[serde(default)]
    projects: BTreeMap<String, Project>,
}

impl InMemoryWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            projects: BTreeMap::new(),
        }
    }

    /// Adds or replaces a project
    pub fn insert(&mut self, project: Project) -> Option<Project> {
        self.projects.insert(project.name.clone(), project)
    }

    #[must_use]
    pub fn with_project(mut self, project: Project) -> Self {
        self.insert(project);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Project> {
        self.projects.remove(name)
    }

    /// Location of a new project folder below the workspace root
    pub fn project_location(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl Workspace for InMemoryWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn project(&self, name: &str) -> Result<&Project> {
        self.projects
            .get(name)
            .ok_or_else(|| project_not_found(name))
    }

    fn projects(&self) -> Vec<&Project> {
        self.projects.values().collect()
    }
}
