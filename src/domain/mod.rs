//! Domain models for buildpath
//!
//! Projects and module descriptors are owned by the collaborators that
//! produce them; resolved classpaths are created per resolution call.

pub mod classpath;
pub mod module;
pub mod project;

pub use classpath::{ResolvedClasspath, ResolvedClasspathEntry};
pub use module::{
    ModuleDescriptor, ModuleId, ModuleLocation, ResolvedImport, ResolvedRequire, ResolverError,
};
pub use project::{EntryKind, Project, RawDependencyEntry};
