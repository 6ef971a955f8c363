//! Module resolution errors

use super::BuildpathError;

/// Creates an unresolved module error
pub fn unresolved(module: impl Into<String>, details: impl Into<String>) -> BuildpathError {
    BuildpathError::UnresolvedModule {
        module: module.into(),
        details: details.into(),
    }
}

/// Creates a module not found error
pub fn not_found(name: impl Into<String>) -> BuildpathError {
    BuildpathError::ModuleNotFound { name: name.into() }
}

/// Creates a missing module state error
pub fn missing_state(project: impl Into<String>) -> BuildpathError {
    BuildpathError::MissingModuleState {
        project: project.into(),
    }
}

/// Creates an invalid visibility rule error
pub fn invalid_rule(rule: impl Into<String>) -> BuildpathError {
    BuildpathError::InvalidVisibilityRule { rule: rule.into() }
}
