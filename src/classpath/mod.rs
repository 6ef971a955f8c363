//! Classpath resolution
//!
//! Turns a project's raw dependency entries into the ordered list of files
//! (plus the boot classpath) a compiler or launcher needs.
//!
//! ## Rules
//!
//! - Entries go through the resolver chain in [`EntryResolver::CHAIN`] order.
//! - Referenced projects are resolved recursively; only their exported
//!   entries count unless the resolution is a runtime one.
//! - The root project's own outputs are only part of a runtime classpath.
//! - Module containers expand to one entry per module dependency, each with
//!   its package visibility rules.
//! - A file appears at most once, in the position it was first reached.

pub mod context;
pub mod paths;
pub mod resolvers;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ResolverConfig;
use crate::domain::{Project, ResolvedClasspath};
use crate::error::Result;
use crate::module::{BundleLayoutResolver, ModuleState};
use crate::workspace::Workspace;

pub use context::{ModuleSupport, ResolutionContext};
pub use paths::PathNormalizer;
pub use resolvers::EntryResolver;

/// Resolves project classpaths within one workspace
#[derive(Clone, Copy)]
pub struct ClasspathResolver<'a> {
    workspace: &'a dyn Workspace,
    config: &'a ResolverConfig,
    modules: Option<ModuleSupport<'a>>,
}

impl<'a> ClasspathResolver<'a> {
    pub fn new(workspace: &'a dyn Workspace, config: &'a ResolverConfig) -> Self {
        Self {
            workspace,
            config,
            modules: None,
        }
    }

    /// Enables module containers, backed by `state` and `layout`
    #[must_use]
    pub fn with_modules(
        mut self,
        state: &'a dyn ModuleState,
        layout: &'a dyn BundleLayoutResolver,
    ) -> Self {
        self.modules = Some(ModuleSupport { state, layout });
        self
    }

    /// Resolves the classpath of `project`
    ///
    /// `relative` returns files below the workspace root workspace-relative.
    /// `runtime` resolves the launch classpath instead of the compile one.
    /// `container_args` override container arguments of the entries.
    ///
    /// # Errors
    ///
    /// - `UnknownReferencedProject` for a project entry naming no project
    /// - `UnknownVariable`, `UnknownContainer`, `UnknownRuntime` or
    ///   `UnknownUserLibrary` for entries the configuration cannot expand
    /// - `MissingModuleState`, `ModuleNotFound` or `UnresolvedModule` for
    ///   module containers
    pub fn resolve_classpath(
        &self,
        project: &Project,
        relative: bool,
        runtime: bool,
        container_args: &BTreeMap<String, String>,
    ) -> Result<ResolvedClasspath> {
        let mut ctx = ResolutionContext::new(
            self.workspace,
            self.config,
            self.modules,
            project,
            relative,
            runtime,
            container_args,
        );
        ctx.enter(&project.name, &project.name);
        resolvers::resolve_project(project, &mut ctx)?;

        let result = ctx.into_result();
        debug!(
            project = %project.name,
            runtime,
            entries = result.classpath.len(),
            boot_entries = result.boot_classpath.len(),
            "resolved classpath"
        );
        Ok(result)
    }
}
