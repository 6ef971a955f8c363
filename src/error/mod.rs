//! Error types and handling for buildpath
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`order`]: Build order errors
//! - [`module`]: Module resolution errors
//! - [`classpath`]: Classpath entry errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors

pub mod classpath;
pub mod config;
pub mod fs;
pub mod module;
pub mod order;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for resolution operations
#[derive(Error, Diagnostic, Debug)]
pub enum BuildpathError {
    // Build order errors
    #[error("Circular dependency detected: {chain}")]
    #[diagnostic(
        code(buildpath::order::cycle),
        help("Remove one of the project references that close the cycle")
    )]
    CyclicDependency { chain: String },

    #[error("Project '{from}' references unknown project '{to}'")]
    #[diagnostic(
        code(buildpath::order::unknown_reference),
        help("Add the referenced project to the workspace or remove the reference")
    )]
    UnknownReferencedProject { from: String, to: String },

    #[error("Project '{name}' cannot take part in the build order")]
    #[diagnostic(
        code(buildpath::order::non_buildable),
        help("Choose a non-buildable policy other than 'fail' to ignore, prepend or append it")
    )]
    NonBuildableProject { name: String },

    #[error("Unknown reference kind: {kind}")]
    #[diagnostic(
        code(buildpath::order::unknown_reference_kind),
        help("Valid reference kinds: classpath (jdt), project (platform), module (pde)")
    )]
    UnknownReferenceKind { kind: String },

    #[error("Project not found: {name}")]
    #[diagnostic(code(buildpath::workspace::project_not_found))]
    ProjectNotFound { name: String },

    // Module errors
    #[error("Module '{module}' is not resolved:\n{details}")]
    #[diagnostic(
        code(buildpath::module::unresolved),
        help("Fix the root cause reported above; dependent modules resolve once it does")
    )]
    UnresolvedModule { module: String, details: String },

    #[error("No module descriptor found for {name}")]
    #[diagnostic(code(buildpath::module::not_found))]
    ModuleNotFound { name: String },

    #[error("Project '{project}' uses a module container but no target platform was supplied")]
    #[diagnostic(code(buildpath::module::missing_state))]
    MissingModuleState { project: String },

    #[error("Invalid visibility rule: {rule}")]
    #[diagnostic(
        code(buildpath::module::invalid_rule),
        help("Rules look like '+com/example/*' or '-com/example/*', separated by ';'")
    )]
    InvalidVisibilityRule { rule: String },

    // Classpath errors
    #[error("Unknown classpath container '{container}' in project '{project}'")]
    #[diagnostic(code(buildpath::classpath::unknown_container))]
    UnknownContainer { project: String, container: String },

    #[error("Unknown classpath variable '{variable}' in project '{project}'")]
    #[diagnostic(
        code(buildpath::classpath::unknown_variable),
        help("Define the variable under 'variables' in the resolver configuration")
    )]
    UnknownVariable { project: String, variable: String },

    #[error("Unknown runtime: {name}")]
    #[diagnostic(
        code(buildpath::classpath::unknown_runtime),
        help("Define the runtime under 'runtimes' in the resolver configuration")
    )]
    UnknownRuntime { name: String },

    #[error("Unknown user library: {name}")]
    #[diagnostic(code(buildpath::classpath::unknown_user_library))]
    UnknownUserLibrary { name: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(buildpath::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(buildpath::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration: {reason}")]
    #[diagnostic(code(buildpath::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(buildpath::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for BuildpathError {
    fn from(err: std::io::Error) -> Self {
        BuildpathError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BuildpathError {
    fn from(err: serde_yaml::Error) -> Self {
        BuildpathError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BuildpathError {
    fn from(err: serde_json::Error) -> Self {
        BuildpathError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BuildpathError>;
