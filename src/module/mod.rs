//! Module-level resolution for plugin-style projects
//!
//! This module handles:
//! - Access to the external module resolver's state ([`ModuleState`])
//! - Mapping modules to classpath files ([`BundleLayoutResolver`])
//! - Transitive module dependencies with package visibility
//! - Root cause analysis of unresolved modules
//! - Caching of constructed target platforms

pub mod dependency;
pub mod layout;
pub mod registry;
pub mod root_cause;
pub mod state;
pub mod visibility;

pub use dependency::{BundleDependency, resolve_module_classpath};
pub use layout::{BundleLayoutResolver, DefaultBundleLayout};
pub use registry::{PlatformKey, PlatformRegistry};
pub use root_cause::{describe_errors, root_cause};
pub use state::{ModuleState, TargetPlatform, project_descriptor};
pub use visibility::VisibilityRuleSet;
