//! Build order errors

use super::BuildpathError;

/// Creates a circular dependency error
pub fn circular(chain: impl Into<String>) -> BuildpathError {
    BuildpathError::CyclicDependency {
        chain: chain.into(),
    }
}

/// Creates an unknown referenced project error
pub fn unknown_reference(from: impl Into<String>, to: impl Into<String>) -> BuildpathError {
    BuildpathError::UnknownReferencedProject {
        from: from.into(),
        to: to.into(),
    }
}

/// Creates a non-buildable project error
pub fn non_buildable(name: impl Into<String>) -> BuildpathError {
    BuildpathError::NonBuildableProject { name: name.into() }
}

/// Creates an unknown reference kind error
pub fn unknown_reference_kind(kind: impl Into<String>) -> BuildpathError {
    BuildpathError::UnknownReferenceKind { kind: kind.into() }
}

/// Creates a project not found error
pub fn project_not_found(name: impl Into<String>) -> BuildpathError {
    BuildpathError::ProjectNotFound { name: name.into() }
}
