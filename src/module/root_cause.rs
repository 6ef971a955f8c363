//! Root cause analysis for unresolved modules
//!
//! A module is often unresolved only because something it needs is itself
//! unresolved. Following missing imports and requires through the other
//! unresolved descriptors finds the module that actually has to be fixed.

use std::collections::HashSet;
use std::fmt::Write as _;

use tracing::debug;

use crate::domain::{ModuleDescriptor, ModuleId, ResolverError};
use crate::module::ModuleState;

/// Finds the ultimately unresolved module behind `descriptor`
///
/// Missing-import errors continue at an unresolved module exporting the
/// package, missing-require errors at an unresolved module with the required
/// name and a version in the required range. Any other error stops at the current descriptor. Each descriptor is
/// visited at most once.
pub fn root_cause<'a>(
    descriptor: &'a ModuleDescriptor,
    state: &'a dyn ModuleState,
) -> &'a ModuleDescriptor {
    let unresolved = state.unresolved_descriptors();
    let mut visited: HashSet<&ModuleId> = HashSet::new();
    let mut current = descriptor;

    'walk: loop {
        visited.insert(&current.id);

        for error in current.resolver_errors() {
            let candidate = match error {
                ResolverError::MissingImport { package, .. } => unresolved
                    .iter()
                    .find(|c| !visited.contains(&c.id) && c.exports(package))
                    .copied(),
                ResolverError::MissingRequire {
                    module,
                    version_range,
                } => unresolved
                    .iter()
                    .find(|c| {
                        !visited.contains(&c.id)
                            && c.id.name == *module
                            && c.id.satisfies(version_range.as_deref())
                    })
                    .copied(),
                _ => return current,
            };

            if let Some(next) = candidate {
                debug!(from = %current.id, to = %next.id, "following unresolved dependency");
                current = next;
                continue 'walk;
            }
        }

        return current;
    }
}

/// Formats the resolver errors of a descriptor, one per line
pub fn describe_errors(descriptor: &ModuleDescriptor) -> String {
    let mut out = String::new();
    if descriptor.resolver_errors().is_empty() {
        let _ = write!(out, "  - {}: no resolver error reported", descriptor.id);
    }
    for (i, error) in descriptor.resolver_errors().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "  - {}: {}", descriptor.id, error);
    }
    out
}

/// Error details for an unresolved descriptor, including its root cause
pub fn unresolved_details(descriptor: &ModuleDescriptor, state: &dyn ModuleState) -> String {
    let cause = root_cause(descriptor, state);
    if cause.id == descriptor.id {
        describe_errors(descriptor)
    } else {
        format!(
            "{}\nRoot cause: {}\n{}",
            describe_errors(descriptor),
            cause.id,
            describe_errors(cause)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModuleLocation;
    use crate::module::TargetPlatform;
    use std::path::PathBuf;

    fn module(name: &str) -> ModuleDescriptor {
        ModuleDescriptor::new(
            ModuleId::new(name, "1.0.0"),
            ModuleLocation::Binary(PathBuf::from(format!("/plugins/{name}"))),
        )
    }

    fn missing_import(package: &str) -> ResolverError {
        ResolverError::MissingImport {
            package: package.to_string(),
            version_range: None,
        }
    }

    fn missing_require(name: &str) -> ResolverError {
        ResolverError::MissingRequire {
            module: name.to_string(),
            version_range: None,
        }
    }

    #[test]
    fn test_follows_import_then_require() {
        let a = module("a").unresolved_because(missing_import("org.b"));
        let platform = TargetPlatform::new()
            .with_module(a.clone())
            .with_module(
                module("b")
                    .exporting("org.b")
                    .unresolved_because(missing_require("c")),
            )
            .with_module(module("c").unresolved_because(ResolverError::Other {
                message: "platform filter does not match".to_string(),
            }));

        let cause = root_cause(&a, &platform);
        assert_eq!(cause.id.name, "c");
    }

    #[test]
    fn test_stops_when_nothing_matches() {
        let a = module("a").unresolved_because(missing_import("org.nowhere"));
        let platform = TargetPlatform::new().with_module(a.clone());

        assert_eq!(root_cause(&a, &platform).id.name, "a");
    }

    #[test]
    fn test_other_error_terminates() {
        let a = module("a")
            .unresolved_because(ResolverError::Other {
                message: "singleton".to_string(),
            })
            .unresolved_because(missing_require("b"));
        let platform = TargetPlatform::new()
            .with_module(a.clone())
            .with_module(module("b").unresolved_because(missing_import("x")));

        assert_eq!(root_cause(&a, &platform).id.name, "a");
    }

    #[test]
    fn test_cycle_terminates() {
        let a = module("a")
            .exporting("org.a")
            .unresolved_because(missing_require("b"));
        let platform = TargetPlatform::new()
            .with_module(a.clone())
            .with_module(
                module("b")
                    .exporting("org.b")
                    .unresolved_because(missing_import("org.a")),
            );

        assert_eq!(root_cause(&a, &platform).id.name, "b");
    }

    #[test]
    fn test_require_outside_version_range_is_not_followed() {
        let a = module("a").unresolved_because(ResolverError::MissingRequire {
            module: "b".to_string(),
            version_range: Some("[2.0,3.0)".to_string()),
        });
        let platform = TargetPlatform::new()
            .with_module(a.clone())
            .with_module(module("b").unresolved_because(missing_import("org.x")));

        assert_eq!(root_cause(&a, &platform).id.name, "a");

        let in_range = module("a").unresolved_because(ResolverError::MissingRequire {
            module: "b".to_string(),
            version_range: Some("[1.0,2.0)".to_string()),
        });
        assert_eq!(root_cause(&in_range, &platform).id.name, "b");
    }

    #[test]
    fn test_resolved_supplier_is_not_followed() {
        let a = module("a").unresolved_because(missing_import("org.b"));
        let platform = TargetPlatform::new()
            .with_module(a.clone())
            .with_module(module("b").exporting("org.b"));

        assert_eq!(root_cause(&a, &platform).id.name, "a");
    }

    #[test]
    fn test_unresolved_details() {
        let a = module("a").unresolved_because(missing_require("b"));
        let platform = TargetPlatform::new()
            .with_module(a.clone())
            .with_module(module("b").unresolved_because(missing_import("org.x")));

        let details = unresolved_details(&a, &platform);
        assert!(details.contains("Missing required module: b"));
        assert!(details.contains("Root cause: b_1.0.0"));
        assert!(details.contains("Missing imported package: org.x"));
    }

    #[test]
    fn test_describe_without_errors() {
        let text = describe_errors(&module("a"));
        assert!(text.contains("no resolver error reported"));
    }
}
