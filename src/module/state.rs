//! Module resolver state
//!
//! The module resolver that decides constraint satisfaction lives outside
//! this crate. [`ModuleState`] is what resolution asks of it: descriptor
//! lookup by id, by backing project and by symbolic name.

use std::collections::BTreeMap;

use crate::domain::{ModuleDescriptor, ModuleId, Project};
use crate::error::{Result, module::not_found};

/// Read-only view of resolved module descriptors
pub trait ModuleState {
    fn descriptor(&self, id: &ModuleId) -> Option<&ModuleDescriptor>;

    /// All descriptors, ordered by id
    fn descriptors(&self) -> Vec<&ModuleDescriptor>;

    /// Descriptor of the module a workspace project backs
    fn descriptor_for_project(&self, project: &str) -> Option<&ModuleDescriptor> {
        self.descriptors()
            .into_iter()
            .find(|d| d.project() == Some(project))
    }

    /// First descriptor (by id order) with the given symbolic name
    fn descriptor_by_name(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.descriptors().into_iter().find(|d| d.id.name == name)
    }

    fn unresolved_descriptors(&self) -> Vec<&ModuleDescriptor> {
        self.descriptors()
            .into_iter()
            .filter(|d| !d.is_resolved())
            .collect()
    }

    /// Host of `id` if it is a fragment, otherwise `id` itself
    fn host_of(&self, id: &ModuleId) -> ModuleId {
        self.descriptor(id)
            .and_then(|d| d.host.clone())
            .unwrap_or_else(|| id.clone())
    }
}

/// In-memory set of module descriptors making up a target platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetPlatform {
    modules: BTreeMap<ModuleId, ModuleDescriptor>,
}

impl TargetPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a descriptor
    pub fn insert(&mut self, descriptor: ModuleDescriptor) -> Option<ModuleDescriptor> {
        self.modules.insert(descriptor.id.clone(), descriptor)
    }

    #[must_use]
    pub fn with_module(mut self, descriptor: ModuleDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<ModuleDescriptor> for TargetPlatform {
    fn from_iter<I: IntoIterator<Item = ModuleDescriptor>>(iter: I) -> Self {
        let mut platform = TargetPlatform::new();
        for descriptor in iter {
            platform.insert(descriptor);
        }
        platform
    }
}

impl ModuleState for TargetPlatform {
    fn descriptor(&self, id: &ModuleId) -> Option<&ModuleDescriptor> {
        self.modules.get(id)
    }

    fn descriptors(&self) -> Vec<&ModuleDescriptor> {
        self.modules.values().collect()
    }
}

/// Descriptor of the module backing `project`
///
/// Looks the project up by location first, then by its declared module name.
///
/// # Errors
///
/// Returns `ModuleNotFound` if the project backs no module in `state`.
pub fn project_descriptor<'s>(
    state: &'s dyn ModuleState,
    project: &Project,
) -> Result<&'s ModuleDescriptor> {
    state
        .descriptor_for_project(&project.name)
        .or_else(|| {
            project
                .module
                .as_deref()
                .and_then(|name| state.descriptor_by_name(name))
        })
        .ok_or_else(|| not_found(project.module.as_deref().unwrap_or(&project.name)))
}
