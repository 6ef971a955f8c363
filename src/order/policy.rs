//! Build order options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BuildpathError, order::unknown_reference_kind};

/// Which project references become build order edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `Project` entries of the dependency list
    #[serde(alias = "jdt")]
    Classpath,
    /// Plain project references
    #[serde(alias = "platform")]
    Project,
    /// Workspace projects reached through the module container
    #[serde(alias = "pde")]
    Module,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Classpath,
        ReferenceKind::Project,
        ReferenceKind::Module,
    ];

    /// Parses a list of kind names
    ///
    /// # Errors
    ///
    /// Returns `UnknownReferenceKind` for the first name that is not a kind.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, BuildpathError> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl FromStr for ReferenceKind {
    type Err = BuildpathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classpath" | "jdt" => Ok(ReferenceKind::Classpath),
            "project" | "platform" => Ok(ReferenceKind::Project),
            "module" | "pde" => Ok(ReferenceKind::Module),
            _ => Err(unknown_reference_kind(s)),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferenceKind::Classpath => "classpath",
            ReferenceKind::Project => "project",
            ReferenceKind::Module => "module",
        })
    }
}

/// What to do with projects that cannot take part in ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonBuildablePolicy {
    /// Leave them out of the result
    #[default]
    Ignore,
    /// Put them before the ordered projects
    Prepend,
    /// Put them after the ordered projects
    Append,
    /// Fail on the first one
    Fail,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds_with_aliases() {
        let kinds = ReferenceKind::parse_all(&["jdt", "Platform", "module"])
            .expect("kinds should parse");
        assert_eq!(kinds.to_vec(), ReferenceKind::ALL.to_vec());
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = ReferenceKind::parse_all(&["classpath", "maven"]).expect_err("maven is no kind");
        assert!(matches!(err, BuildpathError::UnknownReferenceKind { kind } if kind == "maven"));
    }

    #[test]
    fn test_kind_display_roundtrip() {
        for kind in ReferenceKind::ALL {
            assert_eq!(kind.to_string().parse::<ReferenceKind>().ok(), Some(kind));
        }
    }

    #[test]
    fn test_policy_serde() {
        let policy: NonBuildablePolicy =
            serde_yaml::from_str("prepend").expect("policy should parse");
        assert_eq!(policy, NonBuildablePolicy::Prepend);
        assert_eq!(NonBuildablePolicy::default(), NonBuildablePolicy::Ignore);
    }
}
