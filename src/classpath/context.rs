//! Shared state of one classpath resolution

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::classpath::paths::PathNormalizer;
use crate::config::ResolverConfig;
use crate::domain::{Project, RawDependencyEntry, ResolvedClasspath, ResolvedClasspathEntry};
use crate::module::{BundleLayoutResolver, ModuleState, VisibilityRuleSet};
use crate::workspace::Workspace;

/// Module state and layout used for module containers
#[derive(Clone, Copy)]
pub struct ModuleSupport<'a> {
    pub state: &'a dyn ModuleState,
    pub layout: &'a dyn BundleLayoutResolver,
}

/// Context for one `resolve_classpath` call
///
/// Created per call and never shared between resolutions.
pub struct ResolutionContext<'a> {
    pub(crate) workspace: &'a dyn Workspace,
    pub(crate) config: &'a ResolverConfig,
    pub(crate) modules: Option<ModuleSupport<'a>>,
    root: &'a Project,
    runtime: bool,
    paths: PathNormalizer,
    container_args: &'a BTreeMap<String, String>,
    /// Projects currently being resolved, root first
    stack: Vec<String>,
    /// Projects whose entries were already resolved
    resolved: HashSet<String>,
    /// (from, to) pairs already warned about
    warned: HashSet<(String, String)>,
    result: ResolvedClasspath,
}

impl<'a> ResolutionContext<'a> {
    pub(crate) fn new(
        workspace: &'a dyn Workspace,
        config: &'a ResolverConfig,
        modules: Option<ModuleSupport<'a>>,
        root: &'a Project,
        relative: bool,
        runtime: bool,
        container_args: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            workspace,
            config,
            modules,
            root,
            runtime,
            paths: PathNormalizer::new(workspace.root(), relative),
            container_args,
            stack: Vec::new(),
            resolved: HashSet::new(),
            warned: HashSet::new(),
            result: ResolvedClasspath::new(),
        }
    }

    pub fn root(&self) -> &'a Project {
        self.root
    }

    pub fn is_root(&self, project: &Project) -> bool {
        project.name == self.root.name
    }

    pub fn is_runtime(&self) -> bool {
        self.runtime
    }

    /// Whether `entry` of `project` takes part in this resolution
    ///
    /// The root project's entries are always followed. For other projects
    /// only exported entries, their own sources and outputs, or everything
    /// in a runtime resolution.
    pub fn follows(&self, project: &Project, entry: &RawDependencyEntry) -> bool {
        use crate::domain::EntryKind;

        self.is_root(project)
            || self.runtime
            || entry.exported
            || matches!(entry.kind, EntryKind::Source | EntryKind::Output)
    }

    /// Container argument `key`; caller arguments override entry arguments
    pub fn container_arg<'e>(&'e self, entry: &'e RawDependencyEntry, key: &str) -> Option<&'e str> {
        self.container_args
            .get(key)
            .or_else(|| entry.args.get(key))
            .map(String::as_str)
    }

    /// Path of `path` as written in `project`; relative paths are
    /// project-relative
    pub fn project_path(project: &Project, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project.location.join(path)
        }
    }

    /// Pushes `project` onto the resolution stack
    ///
    /// Returns false (and pushes nothing) if it is already being resolved
    /// or was resolved before in this resolution. The first time `from`
    /// reaches a project on the stack a warning is logged.
    ///
    /// Which entries of a non-root project are followed does not depend on
    /// the path it was reached by, so resolving it again adds nothing.
    pub fn enter(&mut self, from: &str, project: &str) -> bool {
        if self.stack.iter().any(|p| p == project) {
            if self.warned.insert((from.to_string(), project.to_string())) {
                warn!(
                    from = %from,
                    to = %project,
                    "skipping project already on the classpath resolution stack"
                );
            }
            return false;
        }
        if !self.resolved.insert(project.to_string()) {
            return false;
        }
        self.stack.push(project.to_string());
        true
    }

    pub fn leave(&mut self) {
        self.stack.pop();
    }

    /// Adds unrestricted classpath files
    pub fn add_files(&mut self, files: impl IntoIterator<Item = PathBuf>) {
        let entry = self.entry(files, None);
        self.result.add_entry(entry);
    }

    /// Adds classpath files restricted by `visibility`
    pub fn add_restricted_files(
        &mut self,
        files: impl IntoIterator<Item = PathBuf>,
        visibility: VisibilityRuleSet,
    ) {
        let entry = self.entry(files, Some(visibility));
        self.result.add_entry(entry);
    }

    pub fn add_boot_files(&mut self, files: impl IntoIterator<Item = PathBuf>) {
        let entry = self.entry(files, None);
        self.result.add_boot_entry(entry);
    }

    pub fn add_module_project(&mut self, name: &str) {
        self.result.add_module_project(name);
    }

    fn entry(
        &self,
        files: impl IntoIterator<Item = PathBuf>,
        visibility: Option<VisibilityRuleSet>,
    ) -> ResolvedClasspathEntry {
        ResolvedClasspathEntry::new(
            files.into_iter().map(|file| self.paths.output(&file)),
            visibility,
        )
    }

    pub(crate) fn into_result(self) -> ResolvedClasspath {
        self.result
    }
}
