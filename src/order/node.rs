//! Dependency nodes for build ordering

use crate::domain::Project;

/// A buildable project together with the projects it still waits for
///
/// Nodes are created per resolution and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode<'a> {
    project: &'a Project,
    required: Vec<String>,
}

impl<'a> DependencyNode<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            required: Vec::new(),
        }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    pub fn name(&self) -> &'a str {
        &self.project.name
    }

    /// Names of required nodes, in first-added order
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Adds a required node; returns false if it was already required
    pub fn add_required(&mut self, name: &str) -> bool {
        if self.required.iter().any(|r| r == name) {
            return false;
        }
        self.required.push(name.to_string());
        true
    }

    /// Removes a required node; returns whether it was required
    pub fn remove_required(&mut self, name: &str) -> bool {
        let before = self.required.len();
        self.required.retain(|r| r != name);
        self.required.len() != before
    }

    /// A node with nothing left to wait for
    pub fn is_leaf(&self) -> bool {
        self.required.is_empty()
    }
}
