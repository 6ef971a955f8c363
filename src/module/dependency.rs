//! Module dependency resolution
//!
//! Computes which modules a resolved module can see, grouped per host
//! module, together with the packages it may access from each.
//!
//! ## Algorithm
//!
//! 1. **Imports**: each wired import records its package against the host of
//!    the supplying module (fragments collapse to their host).
//! 2. **Requires**: each required module's host is flagged as a required
//!    bundle, and everything it re-exports is added transitively with the
//!    same flag. A seen-set stops diamond and cyclic re-export graphs.
//!
//! Fragments attached to a host always contribute alongside it. The module
//! being resolved never appears in its own result, not even as a fragment of
//! one of its dependencies.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

use tracing::debug;

use crate::domain::{ModuleDescriptor, ModuleId, ResolvedClasspathEntry};
use crate::error::{
    Result,
    module::{not_found, unresolved},
};
use crate::module::root_cause::unresolved_details;
use crate::module::{BundleLayoutResolver, ModuleState, VisibilityRuleSet};

/// Everything one host module contributes to a consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDependency {
    host: ModuleId,
    fragments: Vec<ModuleId>,
    imported_packages: BTreeSet<String>,
    required_bundle: bool,
}

impl BundleDependency {
    fn new(host: ModuleId, fragments: Vec<ModuleId>) -> Self {
        Self {
            host,
            fragments,
            imported_packages: BTreeSet::new(),
            required_bundle: false,
        }
    }

    pub fn host(&self) -> &ModuleId {
        &self.host
    }

    pub fn fragments(&self) -> &[ModuleId] {
        &self.fragments
    }

    /// Packages the consumer imports from this host
    pub fn imported_packages(&self) -> &BTreeSet<String> {
        &self.imported_packages
    }

    /// Whether the host is reachable through a require edge
    pub fn is_required_bundle(&self) -> bool {
        self.required_bundle
    }

    /// Host followed by its fragments
    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        std::iter::once(&self.host).chain(self.fragments.iter())
    }

    /// Files contributed by the host and its fragments
    ///
    /// # Errors
    ///
    /// Returns `ModuleNotFound` if a module is missing from `state`, or the
    /// layout resolver's error.
    pub fn classpath_files(
        &self,
        state: &dyn ModuleState,
        layout: &dyn BundleLayoutResolver,
    ) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for id in self.modules() {
            let descriptor = state
                .descriptor(id)
                .ok_or_else(|| not_found(format!("module {id}")))?;
            files.extend(layout.classpath_entries(descriptor)?);
        }
        Ok(files)
    }

    /// Packages the consumer may access
    ///
    /// Imported packages are public. For a required bundle every package the
    /// host or a fragment exports is public as well. Everything else is
    /// excluded.
    pub fn visibility(&self, state: &dyn ModuleState) -> VisibilityRuleSet {
        let mut rules = VisibilityRuleSet::new(true);
        for package in &self.imported_packages {
            rules.add_public(package.clone());
        }
        if self.required_bundle {
            for descriptor in self.modules().filter_map(|id| state.descriptor(id)) {
                for package in &descriptor.exported_packages {
                    if !self.imported_packages.contains(package) {
                        rules.add_public(package.clone());
                    }
                }
            }
        }
        rules
    }

    /// Classpath entry with the files and rules of this dependency
    ///
    /// # Errors
    ///
    /// See [`BundleDependency::classpath_files`].
    pub fn to_classpath_entry(
        &self,
        state: &dyn ModuleState,
        layout: &dyn BundleLayoutResolver,
    ) -> Result<ResolvedClasspathEntry> {
        Ok(ResolvedClasspathEntry::new(
            self.classpath_files(state, layout)?,
            Some(self.visibility(state)),
        ))
    }

    /// Workspace projects backing the host or a fragment
    pub fn projects<'s>(&self, state: &'s dyn ModuleState) -> Vec<&'s str> {
        self.modules()
            .filter_map(|id| state.descriptor(id))
            .filter_map(ModuleDescriptor::project)
            .collect()
    }
}

/// Accumulates bundle dependencies keyed by host, in discovery order
struct DependencyCollector<'a> {
    state: &'a dyn ModuleState,
    consumer: &'a ModuleId,
    dependencies: Vec<BundleDependency>,
    index: HashMap<ModuleId, usize>,
}

impl<'a> DependencyCollector<'a> {
    fn new(state: &'a dyn ModuleState, consumer: &'a ModuleId) -> Self {
        Self {
            state,
            consumer,
            dependencies: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Dependency for the host of `module`, or `None` for the consumer
    fn entry(&mut self, module: &ModuleId) -> Option<&mut BundleDependency> {
        let host = self.state.host_of(module);
        if host == *self.consumer {
            return None;
        }

        let position = match self.index.get(&host) {
            Some(position) => *position,
            None => {
                let fragments = self
                    .state
                    .descriptor(&host)
                    .map(|d| {
                        d.fragments
                            .iter()
                            .filter(|f| *f != self.consumer)
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                self.dependencies
                    .push(BundleDependency::new(host.clone(), fragments));
                self.index.insert(host, self.dependencies.len() - 1);
                self.dependencies.len() - 1
            }
        };
        self.dependencies.get_mut(position)
    }

    fn add_import(&mut self, package: &str, supplier: &ModuleId) {
        if let Some(dependency) = self.entry(supplier) {
            dependency.imported_packages.insert(package.to_string());
        }
    }

    /// Flags the host of `module` as required and walks its re-exports
    fn add_required(&mut self, module: &ModuleId, seen: &mut HashSet<ModuleId>) {
        let host = self.state.host_of(module);
        if !seen.insert(host.clone()) {
            return;
        }

        let modules: Vec<ModuleId> = match self.entry(&host) {
            Some(dependency) => {
                dependency.required_bundle = true;
                dependency.modules().cloned().collect()
            }
            None => vec![host],
        };

        let reexported: Vec<ModuleId> = modules
            .iter()
            .filter_map(|id| self.state.descriptor(id))
            .flat_map(|d| d.resolved_requires.iter())
            .filter(|r| r.reexport)
            .map(|r| r.module.clone())
            .collect();

        for module in &reexported {
            self.add_required(module, seen);
        }
    }
}

/// Resolves the bundle dependencies of a resolved module
///
/// # Errors
///
/// Returns `UnresolvedModule` when `descriptor` is not resolved; the details
/// name its errors and those of its root cause.
pub fn resolve_module_classpath(
    state: &dyn ModuleState,
    descriptor: &ModuleDescriptor,
) -> Result<Vec<BundleDependency>> {
    if !descriptor.is_resolved() {
        return Err(unresolved(
            descriptor.id.to_string(),
            unresolved_details(descriptor, state),
        ));
    }

    let mut collector = DependencyCollector::new(state, &descriptor.id);

    for import in &descriptor.resolved_imports {
        collector.add_import(&import.package, &import.supplier);
    }

    let mut seen = HashSet::new();
    if let Some(host) = &descriptor.host {
        collector.add_required(host, &mut seen);
    }
    for require in &descriptor.resolved_requires {
        collector.add_required(&require.module, &mut seen);
    }

    debug!(
        module = %descriptor.id,
        dependencies = collector.dependencies.len(),
        "resolved module dependencies"
    );
    Ok(collector.dependencies)
}
