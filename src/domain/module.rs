//! Module descriptor types
//!
//! Descriptors are produced by an external module resolver after it has
//! decided which constraints are satisfiable. They are read-only here.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Symbolic identity of a module: name plus version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId {
    pub name: String,
    pub version: String,
}

impl ModuleId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Whether the version lies in a range such as `[1.0,2.0)`
    ///
    /// A bare version is a minimum. No range, or one that does not parse,
    /// admits every version.
    pub fn satisfies(&self, range: Option<&str>) -> bool {
        let Some(range) = range.map(str::trim).filter(|r| !r.is_empty()) else {
            return true;
        };
        let Some(version) = version_key(&self.version) else {
            return true;
        };

        let bounded = range.starts_with(['[', '(']) && range.ends_with([']', ')']);
        if !bounded {
            return version_key(range).is_none_or(|min| version >= min);
        }
        let Some((low, high)) = range[1..range.len() - 1].split_once(',') else {
            return true;
        };
        let (Some(low), Some(high)) = (version_key(low), version_key(high)) else {
            return true;
        };
        let above = if range.starts_with('[') { version >= low } else { version > low };
        let below = if range.ends_with(']') { version <= high } else { version < high };
        above && below
    }
}

/// `major.minor.micro.qualifier`, missing numbers are zero
fn version_key(version: &str) -> Option<(u64, u64, u64, &str)> {
    let mut parts = version.trim().splitn(4, '.');
    let mut numbers = [0u64; 3];
    for number in &mut numbers {
        if let Some(part) = parts.next() {
            *number = part.parse().ok()?;
        }
    }
    Some((numbers[0], numbers[1], numbers[2], parts.next().unwrap_or("")))
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.version)
    }
}

/// Where the code of a module lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleLocation {
    /// Backed by a workspace project
    Project(String),
    /// A jar or an unpacked directory outside the workspace
    Binary(PathBuf),
}

/// An import edge wired by the module resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImport {
    pub package: String,
    pub supplier: ModuleId,
}

/// A require edge wired by the module resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequire {
    pub module: ModuleId,
    /// Packages of `module` are re-exported to whoever requires the requester
    #[serde(default)]
    pub reexport: bool,
}

/// Why the module resolver could not resolve a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ResolverError {
    MissingImport {
        package: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version_range: Option<String>,
    },
    MissingRequire {
        module: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version_range: Option<String>,
    },
    MissingHost {
        host: String,
    },
    Other {
        message: String,
    },
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::MissingImport {
                package,
                version_range,
            } => {
                write!(f, "Missing imported package: {package}")?;
                if let Some(range) = version_range {
                    write!(f, " {range}")?;
                }
                Ok(())
            }
            ResolverError::MissingRequire {
                module,
                version_range,
            } => {
                write!(f, "Missing required module: {module}")?;
                if let Some(range) = version_range {
                    write!(f, " {range}")?;
                }
                Ok(())
            }
            ResolverError::MissingHost { host } => write!(f, "Missing fragment host: {host}"),
            ResolverError::Other { message } => f.write_str(message),
        }
    }
}

/// Resolved description of a plugin-style module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub id: ModuleId,

    pub location: ModuleLocation,

    #[serde(default)]
    pub resolved: bool,

    /// Packages this module exports
    #[serde(default)]
    pub exported_packages: Vec<String>,

    #[serde(default)]
    pub resolved_imports: Vec<ResolvedImport>,

    #[serde(default)]
    pub resolved_requires: Vec<ResolvedRequire>,

    /// Fragments attached to this module
    #[serde(default)]
    pub fragments: Vec<ModuleId>,

    /// Host of this module when it is a fragment itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<ModuleId>,

    /// Internal classpath of a binary module, relative to its location
    #[serde(default = "default_bundle_classpath")]
    pub bundle_classpath: Vec<String>,

    #[serde(default)]
    pub errors: Vec<ResolverError>,
}

fn default_bundle_classpath() -> Vec<String> {
    vec![".".to_string()]
}

impl ModuleDescriptor {
    /// Creates a resolved descriptor with no edges
    pub fn new(id: ModuleId, location: ModuleLocation) -> Self {
        Self {
            id,
            location,
            resolved: true,
            exported_packages: Vec::new(),
            resolved_imports: Vec::new(),
            resolved_requires: Vec::new(),
            fragments: Vec::new(),
            host: None,
            bundle_classpath: default_bundle_classpath(),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn exporting(mut self, package: impl Into<String>) -> Self {
        self.exported_packages.push(package.into());
        self
    }

    #[must_use]
    pub fn importing(mut self, package: impl Into<String>, supplier: &ModuleId) -> Self {
        self.resolved_imports.push(ResolvedImport {
            package: package.into(),
            supplier: supplier.clone(),
        });
        self
    }

    #[must_use]
    pub fn requiring(mut self, module: &ModuleId, reexport: bool) -> Self {
        self.resolved_requires.push(ResolvedRequire {
            module: module.clone(),
            reexport,
        });
        self
    }

    #[must_use]
    pub fn with_fragment(mut self, fragment: &ModuleId) -> Self {
        self.fragments.push(fragment.clone());
        self
    }

    #[must_use]
    pub fn fragment_of(mut self, host: &ModuleId) -> Self {
        self.host = Some(host.clone());
        self
    }

    #[must_use]
    pub fn with_bundle_classpath(mut self, entries: &[&str]) -> Self {
        self.bundle_classpath = entries.iter().map(|e| (*e).to_string()).collect();
        self
    }

    /// Marks the descriptor unresolved because of `error`
    #[must_use]
    pub fn unresolved_because(mut self, error: ResolverError) -> Self {
        self.resolved = false;
        self.errors.push(error);
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn is_fragment(&self) -> bool {
        self.host.is_some()
    }

    pub fn resolver_errors(&self) -> &[ResolverError] {
        &self.errors
    }

    /// Workspace project backing this module, if any
    pub fn project(&self) -> Option<&str> {
        match &self.location {
            ModuleLocation::Project(name) => Some(name),
            ModuleLocation::Binary(_) => None,
        }
    }

    pub fn exports(&self, package: &str) -> bool {
        self.exported_packages.iter().any(|p| p == package)
    }
}
