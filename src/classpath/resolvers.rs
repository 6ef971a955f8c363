//! Classpath entry resolvers
//!
//! Each raw dependency entry is handed to the first resolver in
//! [`EntryResolver::CHAIN`] that can resolve it. Resolvers add their files to
//! the [`ResolutionContext`]; project entries recurse into the referenced
//! project with the same context.

use std::path::PathBuf;

use tracing::debug;

use crate::classpath::context::{ModuleSupport, ResolutionContext};
use crate::domain::{EntryKind, Project, RawDependencyEntry};
use crate::error::{
    Result,
    classpath::{unknown_container, unknown_variable},
    module::missing_state,
    order::unknown_reference,
};
use crate::module::{project_descriptor, resolve_module_classpath};

/// Resolver for one kind of raw dependency entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryResolver {
    Variable,
    ModuleContainer,
    Source,
    Project,
    Library,
    Output,
}

impl EntryResolver {
    /// Resolvers in precedence order
    pub const CHAIN: [EntryResolver; 6] = [
        EntryResolver::Variable,
        EntryResolver::ModuleContainer,
        EntryResolver::Source,
        EntryResolver::Project,
        EntryResolver::Library,
        EntryResolver::Output,
    ];

    /// First resolver of the chain that accepts `entry`
    pub fn for_entry(entry: &RawDependencyEntry) -> Option<Self> {
        Self::CHAIN.into_iter().find(|r| r.can_resolve(entry))
    }

    pub fn can_resolve(self, entry: &RawDependencyEntry) -> bool {
        let kind = match self {
            EntryResolver::Variable => EntryKind::Variable,
            EntryResolver::ModuleContainer => EntryKind::ModuleContainer,
            EntryResolver::Source => EntryKind::Source,
            EntryResolver::Project => EntryKind::Project,
            EntryResolver::Library => EntryKind::Library,
            EntryResolver::Output => EntryKind::Output,
        };
        entry.kind == kind
    }

    /// Adds the files `entry` of `project` stands for to `ctx`
    ///
    /// # Errors
    ///
    /// Returns the first error of an unknown variable, container, runtime,
    /// user library or project, or of module resolution.
    pub fn resolve(
        self,
        project: &Project,
        entry: &RawDependencyEntry,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<()> {
        match self {
            EntryResolver::Variable => resolve_variable(project, entry, ctx),
            EntryResolver::ModuleContainer => resolve_container(project, entry, ctx),
            EntryResolver::Source => {
                resolve_source(project, entry, ctx);
                Ok(())
            }
            EntryResolver::Project => resolve_project_entry(project, entry, ctx),
            EntryResolver::Library => {
                resolve_library(project, entry, ctx);
                Ok(())
            }
            EntryResolver::Output => {
                resolve_output(project, entry, ctx);
                Ok(())
            }
        }
    }
}

/// Runs the chain over every followed entry of `project`
pub(crate) fn resolve_project(project: &Project, ctx: &mut ResolutionContext<'_>) -> Result<()> {
    for entry in project.raw_dependency_entries() {
        if !ctx.follows(project, entry) {
            debug!(project = %project.name, entry = %entry.path, "entry not exported, skipping");
            continue;
        }
        match EntryResolver::for_entry(entry) {
            Some(resolver) => resolver.resolve(project, entry, ctx)?,
            None => debug!(project = %project.name, entry = %entry.path, "no resolver for entry"),
        }
    }
    Ok(())
}

fn resolve_variable(
    project: &Project,
    entry: &RawDependencyEntry,
    ctx: &mut ResolutionContext<'_>,
) -> Result<()> {
    let (name, rest) = entry.head_and_tail();
    let base = ctx
        .config
        .variable(name)
        .ok_or_else(|| unknown_variable(&project.name, name))?;
    let path = match rest {
        Some(rest) => base.join(rest),
        None => base.to_path_buf(),
    };
    ctx.add_files([path]);
    Ok(())
}

fn resolve_container(
    project: &Project,
    entry: &RawDependencyEntry,
    ctx: &mut ResolutionContext<'_>,
) -> Result<()> {
    let config = ctx.config;
    let (container, rest) = entry.head_and_tail();

    if container == config.module_container {
        return resolve_modules(project, ctx);
    }

    if container == config.runtime_container {
        let name = rest.or_else(|| ctx.container_arg(entry, "runtime"));
        let files = config.runtime(name)?.to_vec();
        ctx.add_boot_files(files);
        return Ok(());
    }

    if container == config.user_library_container {
        let name = rest.ok_or_else(|| unknown_container(&project.name, &entry.path))?;
        let files = config.user_library(name)?.to_vec();
        ctx.add_files(files);
        return Ok(());
    }

    Err(unknown_container(&project.name, container))
}

/// One restricted entry per bundle dependency of the project's module
fn resolve_modules(project: &Project, ctx: &mut ResolutionContext<'_>) -> Result<()> {
    let Some(ModuleSupport { state, layout }) = ctx.modules else {
        return Err(missing_state(&project.name));
    };

    let descriptor = project_descriptor(state, project)?;
    for dependency in resolve_module_classpath(state, descriptor)? {
        let files = dependency.classpath_files(state, layout)?;
        ctx.add_restricted_files(files, dependency.visibility(state));
        for name in dependency.projects(state) {
            ctx.add_module_project(name);
        }
    }
    Ok(())
}

fn resolve_source(project: &Project, entry: &RawDependencyEntry, ctx: &mut ResolutionContext<'_>) {
    if ctx.is_root(project) && !ctx.is_runtime() {
        return;
    }
    match entry.output.as_deref().or(project.default_output.as_deref()) {
        Some(output) => ctx.add_files([ResolutionContext::project_path(project, output)]),
        None => debug!(project = %project.name, source = %entry.path, "source folder without output"),
    }
}

fn resolve_output(project: &Project, entry: &RawDependencyEntry, ctx: &mut ResolutionContext<'_>) {
    if ctx.is_root(project) && !ctx.is_runtime() {
        return;
    }
    ctx.add_files([ResolutionContext::project_path(project, &entry.path)]);
}

fn resolve_project_entry(
    project: &Project,
    entry: &RawDependencyEntry,
    ctx: &mut ResolutionContext<'_>,
) -> Result<()> {
    let name = entry.project_name();
    let workspace = ctx.workspace;
    let target = workspace
        .project(name)
        .map_err(|_| unknown_reference(&project.name, name))?;

    if !ctx.enter(&project.name, name) {
        return Ok(());
    }
    let result = resolve_project(target, ctx);
    ctx.leave();
    result
}

/// `/Proj/rest` lives in workspace project `Proj`; other absolute paths are
/// taken as they are, relative ones are project-relative
fn resolve_library(project: &Project, entry: &RawDependencyEntry, ctx: &mut ResolutionContext<'_>) {
    let workspace = ctx.workspace;
    let path = if entry.path.starts_with('/') {
        let (head, rest) = entry.head_and_tail();
        match workspace.project(head) {
            Ok(owner) => match rest {
                Some(rest) => owner.location.join(rest),
                None => owner.location.clone(),
            },
            Err(_) => PathBuf::from(&entry.path),
        }
    } else {
        ResolutionContext::project_path(project, &entry.path)
    };
    ctx.add_files([path]);
}
