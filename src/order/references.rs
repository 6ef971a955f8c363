//! Discovery of the projects a project references

use tracing::debug;

use crate::config::ResolverConfig;
use crate::domain::{EntryKind, Project};
use crate::error::Result;
use crate::module::{ModuleState, project_descriptor, resolve_module_classpath};
use crate::order::ReferenceKind;

/// Direct references of `project` for the given kinds
///
/// Names come back deduplicated in first-seen order, kinds in the order
/// given. A project never references itself here; self-references are
/// dropped.
///
/// # Errors
///
/// Module references fail with `ModuleNotFound` when the project backs no
/// module, or `UnresolvedModule` when its module did not resolve.
pub fn referenced_projects(
    project: &Project,
    kinds: &[ReferenceKind],
    modules: Option<&dyn ModuleState>,
    config: &ResolverConfig,
) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if name != project.name && !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };

    for kind in kinds {
        match kind {
            ReferenceKind::Classpath => {
                for entry in project.raw_dependency_entries() {
                    if entry.kind == EntryKind::Project {
                        push(entry.project_name());
                    }
                }
            }
            ReferenceKind::Project => {
                for name in project.referenced_project_names() {
                    push(name);
                }
            }
            ReferenceKind::Module => {
                for name in module_references(project, modules, config)? {
                    push(name);
                }
            }
        }
    }

    Ok(names)
}

/// Workspace projects reached through the module container
fn module_references<'s>(
    project: &Project,
    modules: Option<&'s dyn ModuleState>,
    config: &ResolverConfig,
) -> Result<Vec<&'s str>> {
    let uses_container = project.raw_dependency_entries().iter().any(|entry| {
        entry.kind == EntryKind::ModuleContainer && entry.head_and_tail().0 == config.module_container
    });
    if !uses_container {
        return Ok(Vec::new());
    }

    let Some(state) = modules else {
        debug!(project = %project.name, "no module state, skipping module references");
        return Ok(Vec::new());
    };

    let descriptor = project_descriptor(state, project)?;
    let mut names = Vec::new();
    for dependency in resolve_module_classpath(state, descriptor)? {
        names.extend(dependency.projects(state));
    }
    Ok(names)
}
