//! Resolver configuration
//!
//! Everything resolution needs beyond the project and module models: the
//! ids of the classpath containers it understands, the runtimes and user
//! libraries those containers expand to, classpath variables, and the
//! build order defaults.
//!
//! ```yaml
//! default_runtime: jdk17
//! runtimes:
//!   jdk17: [/opt/jdk17/lib/jrt-fs.jar]
//! variables:
//!   M2_REPO: /home/dev/.m2/repository
//! reference_kinds: [classpath, module]
//! non_buildable_policy: append
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{
    Result,
    classpath::{unknown_runtime, unknown_user_library},
    config::{not_found, parse_failed, read_failed},
};
use crate::order::{NonBuildablePolicy, ReferenceKind};

/// Container id of the plugin dependencies container
pub const MODULE_CONTAINER: &str = "org.eclipse.pde.core.requiredPlugins";
/// Container id of the runtime (boot classpath) container
pub const RUNTIME_CONTAINER: &str = "org.eclipse.jdt.launching.JRE_CONTAINER";
/// Container id of the user library container
pub const USER_LIBRARY_CONTAINER: &str = "org.eclipse.jdt.USER_LIBRARY";

/// Resolver configuration (`buildpath.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub module_container: String,
    pub runtime_container: String,
    pub user_library_container: String,

    /// Runtime used when a runtime container names none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_runtime: Option<String>,

    /// Boot classpath of each named runtime
    pub runtimes: BTreeMap<String, Vec<PathBuf>>,

    /// Jars of each named user library
    pub user_libraries: BTreeMap<String, Vec<PathBuf>>,

    /// Classpath variables
    pub variables: BTreeMap<String, PathBuf>,

    /// Reference kinds followed when computing a build order
    pub reference_kinds: Vec<ReferenceKind>,

    pub non_buildable_policy: NonBuildablePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            module_container: MODULE_CONTAINER.to_string(),
            runtime_container: RUNTIME_CONTAINER.to_string(),
            user_library_container: USER_LIBRARY_CONTAINER.to_string(),
            default_runtime: None,
            runtimes: BTreeMap::new(),
            user_libraries: BTreeMap::new(),
            variables: BTreeMap::new(),
            reference_kinds: vec![ReferenceKind::Classpath],
            non_buildable_policy: NonBuildablePolicy::default(),
        }
    }
}

impl ResolverConfig {
    /// Parse configuration from YAML string
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseFailed` if the YAML is not a valid configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize configuration to YAML string
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseFailed` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file is missing, `ConfigReadFailed` if
    /// it cannot be read and `ConfigParseFailed` if it is not valid.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))
    }

    /// Boot classpath of the runtime `name`, or of the default runtime
    ///
    /// Without a name or default, an empty boot classpath is returned.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRuntime` if the runtime is not configured.
    pub fn runtime(&self, name: Option<&str>) -> Result<&[PathBuf]> {
        match name.or(self.default_runtime.as_deref()) {
            Some(name) => self
                .runtimes
                .get(name)
                .map(Vec::as_slice)
                .ok_or_else(|| unknown_runtime(name)),
            None => Ok(&[][..]),
        }
    }

    /// Jars of the user library `name`
    ///
    /// # Errors
    ///
    /// Returns `UnknownUserLibrary` if the library is not configured.
    pub fn user_library(&self, name: &str) -> Result<&[PathBuf]> {
        self.user_libraries
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| unknown_user_library(name))
    }

    pub fn variable(&self, name: &str) -> Option<&Path> {
        self.variables.get(name).map(PathBuf::as_path)
    }
}
