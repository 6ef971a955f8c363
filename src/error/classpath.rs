//! Classpath entry errors

use super::BuildpathError;

/// Creates an unknown container error
pub fn unknown_container(
    project: impl Into<String>,
    container: impl Into<String>,
) -> BuildpathError {
    BuildpathError::UnknownContainer {
        project: project.into(),
        container: container.into(),
    }
}

/// Creates an unknown variable error
pub fn unknown_variable(project: impl Into<String>, variable: impl Into<String>) -> BuildpathError {
    BuildpathError::UnknownVariable {
        project: project.into(),
        variable: variable.into(),
    }
}

/// Creates an unknown runtime error
pub fn unknown_runtime(name: impl Into<String>) -> BuildpathError {
    BuildpathError::UnknownRuntime { name: name.into() }
}

/// Creates an unknown user library error
pub fn unknown_user_library(name: impl Into<String>) -> BuildpathError {
    BuildpathError::UnknownUserLibrary { name: name.into() }
}
