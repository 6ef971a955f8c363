//! Build order resolution
//!
//! This module handles:
//! - Discovery of project references by kind
//! - Dependency nodes and leaf peeling
//! - Cycle detection with a concrete chain
//! - Placement of non-buildable projects

pub mod node;
pub mod policy;
pub mod references;
pub mod sort;

pub use node::DependencyNode;
pub use policy::{NonBuildablePolicy, ReferenceKind};
pub use references::referenced_projects;
pub use sort::{BuildOrderResolver, resolve_build_order};
