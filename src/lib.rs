//! Buildpath - build order and classpath resolution
//!
//! Computes, for a set of workspace projects, the order in which they must
//! be built and the classpath each of them compiles or runs against. Plugin
//! style projects are resolved through their module descriptors, which adds
//! package-level visibility rules to the classpath.
//!
//! ## Modules
//!
//! - [`order`]: build order by leaf peeling, with cycle detection
//! - [`classpath`]: the classpath entry resolver chain
//! - [`module`]: module dependencies, visibility rules and root causes
//! - [`domain`]: projects, module descriptors and resolved classpaths
//! - [`workspace`]: access to the projects of a workspace
//! - [`config`]: resolver configuration (`buildpath.yaml`)
//! - [`error`]: error types and diagnostics

pub mod classpath;
pub mod config;
pub mod domain;
pub mod error;
pub mod module;
pub mod order;
pub mod workspace;

pub use classpath::ClasspathResolver;
pub use config::ResolverConfig;
pub use domain::{Project, RawDependencyEntry, ResolvedClasspath, ResolvedClasspathEntry};
pub use error::{BuildpathError, Result};
pub use module::{ModuleState, TargetPlatform, VisibilityRuleSet};
pub use order::{BuildOrderResolver, NonBuildablePolicy, ReferenceKind, resolve_build_order};
pub use workspace::{InMemoryWorkspace, Workspace};
