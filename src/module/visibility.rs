//! Package visibility rules
//!
//! A [`VisibilityRuleSet`] partitions package names into public and private
//! and carries a default for every other package. Its textual form is the
//! access-rule string compilers understand:
//!
//! ```text
//! +com/example/api/*;-com/example/internal/*;-**/*
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BuildpathError, module::invalid_rule};

const WILDCARD_RULE: &str = "**/*";

/// Public/private package sets with a default policy
///
/// A package name is never in both sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRuleSet {
    public_packages: BTreeSet<String>,
    private_packages: BTreeSet<String>,
    exclude_all_by_default: bool,
}

impl VisibilityRuleSet {
    pub fn new(exclude_all_by_default: bool) -> Self {
        Self {
            public_packages: BTreeSet::new(),
            private_packages: BTreeSet::new(),
            exclude_all_by_default,
        }
    }

    /// Marks `package` public, taking it out of the private set
    ///
    /// Returns false if it was already public.
    pub fn add_public(&mut self, package: impl Into<String>) -> bool {
        let package = package.into();
        self.private_packages.remove(&package);
        self.public_packages.insert(package)
    }

    /// Marks `package` private unless it is already public
    ///
    /// Returns false if nothing changed.
    pub fn add_private(&mut self, package: impl Into<String>) -> bool {
        let package = package.into();
        if self.public_packages.contains(&package) {
            return false;
        }
        self.private_packages.insert(package)
    }

    pub fn public_packages(&self) -> &BTreeSet<String> {
        &self.public_packages
    }

    pub fn private_packages(&self) -> &BTreeSet<String> {
        &self.private_packages
    }

    pub fn exclude_all_by_default(&self) -> bool {
        self.exclude_all_by_default
    }

    /// Whether a consumer may see `package`
    pub fn is_visible(&self, package: &str) -> bool {
        if self.public_packages.contains(package) {
            true
        } else if self.private_packages.contains(package) {
            false
        } else {
            !self.exclude_all_by_default
        }
    }

    /// Ordered textual rules, one per element
    pub fn rules(&self) -> Vec<String> {
        let mut rules: Vec<String> = Vec::new();
        rules.extend(self.public_packages.iter().map(|p| format!("+{}", package_rule(p))));
        rules.extend(self.private_packages.iter().map(|p| format!("-{}", package_rule(p))));
        let default = if self.exclude_all_by_default { '-' } else { '+' };
        rules.push(format!("{default}{WILDCARD_RULE}"));
        rules
    }
}

/// `com.example` becomes `com/example/*`
fn package_rule(package: &str) -> String {
    format!("{}/*", package.replace('.', "/"))
}

impl fmt::Display for VisibilityRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rules().join(";"))
    }
}

impl FromStr for VisibilityRuleSet {
    type Err = BuildpathError;

    /// Parses the textual form; a missing wildcard rule means everything
    /// else stays visible
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = VisibilityRuleSet::new(false);

        for raw in s.split(';').map(str::trim).filter(|r| !r.is_empty()) {
            let (public, pattern) = if let Some(rest) = raw.strip_prefix('+') {
                (true, rest)
            } else if let Some(rest) = raw.strip_prefix('-') {
                (false, rest)
            } else {
                return Err(invalid_rule(raw));
            };

            if pattern == WILDCARD_RULE {
                set.exclude_all_by_default = !public;
                continue;
            }

            let package = pattern
                .strip_suffix("/*")
                .filter(|p| !p.is_empty() && !p.contains('*'))
                .ok_or_else(|| invalid_rule(raw))?
                .replace('/', ".");

            if public {
                set.add_public(package);
            } else {
                set.add_private(package);
            }
        }

        Ok(set)
    }
}
