//! Common test utilities for buildpath integration tests

use std::path::PathBuf;

use buildpath::domain::{ModuleDescriptor, ModuleId, ModuleLocation};
use buildpath::{InMemoryWorkspace, Project, RawDependencyEntry};
use tempfile::TempDir;

/// A workspace on disk for tests that need real files
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Create a project folder with the given output folders
    pub fn create_project(&self, name: &str, outputs: &[&str]) -> PathBuf {
        let project_path = self.path.join(name);
        for output in outputs {
            std::fs::create_dir_all(project_path.join(output))
                .expect("Failed to create output directory");
        }
        std::fs::create_dir_all(&project_path).expect("Failed to create project directory");
        project_path
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }
}

/// Project under `/ws` with one source folder, referencing `deps`
#[allow(dead_code)]
pub fn project(name: &str, deps: &[&str]) -> Project {
    deps.iter().fold(
        Project::new(name, format!("/ws/{name}"))
            .with_default_output("bin")
            .with_entry(RawDependencyEntry::source("src")),
        |project, dep| project.with_entry(RawDependencyEntry::project(dep).exported()),
    )
}

/// In-memory workspace rooted at `/ws`
#[allow(dead_code)]
pub fn workspace(projects: Vec<Project>) -> InMemoryWorkspace {
    projects
        .into_iter()
        .fold(InMemoryWorkspace::new("/ws"), InMemoryWorkspace::with_project)
}

#[allow(dead_code)]
pub fn id(name: &str) -> ModuleId {
    ModuleId::new(name, "1.0.0")
}

/// Resolved module packed as `/plugins/<name>_1.0.0.jar`
#[allow(dead_code)]
pub fn binary_module(name: &str) -> ModuleDescriptor {
    ModuleDescriptor::new(
        id(name),
        ModuleLocation::Binary(PathBuf::from(format!("/plugins/{name}_1.0.0.jar"))),
    )
}

/// Resolved module backed by workspace project `project`
#[allow(dead_code)]
pub fn project_module(name: &str, project: &str) -> ModuleDescriptor {
    ModuleDescriptor::new(id(name), ModuleLocation::Project(project.to_string()))
}

/// Names of `projects` in order
#[allow(dead_code)]
pub fn names(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|p| p.name.as_str()).collect()
}
