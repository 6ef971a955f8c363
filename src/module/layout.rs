//! Bundle layout: where the binary output of a module lives

use std::path::PathBuf;

use tracing::debug;

use crate::domain::{ModuleDescriptor, ModuleLocation};
use crate::error::Result;
use crate::workspace::Workspace;

/// Maps a module descriptor to the files it contributes to a classpath
pub trait BundleLayoutResolver {
    /// # Errors
    ///
    /// Returns an error if the module's backing location cannot be found.
    fn classpath_entries(&self, descriptor: &ModuleDescriptor) -> Result<Vec<PathBuf>>;
}

/// Layout for modules backed by workspace projects or plain binaries
///
/// Project-backed modules contribute the project's output folders (the
/// project folder when it declares none). Binary modules contribute their
/// location joined with each internal classpath entry; a packed jar only
/// contributes itself.
pub struct DefaultBundleLayout<'a> {
    workspace: &'a dyn Workspace,
}

impl<'a> DefaultBundleLayout<'a> {
    pub fn new(workspace: &'a dyn Workspace) -> Self {
        Self { workspace }
    }
}

impl BundleLayoutResolver for DefaultBundleLayout<'_> {
    fn classpath_entries(&self, descriptor: &ModuleDescriptor) -> Result<Vec<PathBuf>> {
        match &descriptor.location {
            ModuleLocation::Project(name) => {
                let project = self.workspace.project(name)?;
                let folders = project.output_folders();
                if folders.is_empty() {
                    Ok(vec![project.location.clone()])
                } else {
                    Ok(folders)
                }
            }
            ModuleLocation::Binary(path) if is_archive(path) => {
                let nested: Vec<&String> = descriptor
                    .bundle_classpath
                    .iter()
                    .filter(|e| e.as_str() != ".")
                    .collect();
                if !nested.is_empty() {
                    debug!(
                        module = %descriptor.id,
                        "skipping {} nested classpath entries of packed module",
                        nested.len()
                    );
                }
                Ok(vec![path.clone()])
            }
            ModuleLocation::Binary(path) => Ok(descriptor
                .bundle_classpath
                .iter()
                .map(|entry| match entry.as_str() {
                    "." => path.clone(),
                    other => path.join(other),
                })
                .collect()),
        }
    }
}

fn is_archive(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jar") || e.eq_ignore_ascii_case("zip"))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::{ModuleId, Project, RawDependencyEntry};
    use crate::workspace::InMemoryWorkspace;

    #[test]
    fn test_project_module_outputs() {
        let workspace = InMemoryWorkspace::new("/ws").with_project(
            Project::new("core", "/ws/core")
                .with_entry(RawDependencyEntry::source("src").with_output("bin")),
        );
        let layout = DefaultBundleLayout::new(&workspace);
        let descriptor = ModuleDescriptor::new(
            ModuleId::new("core", "1.0"),
            ModuleLocation::Project("core".to_string()),
        );

        let files = layout
            .classpath_entries(&descriptor)
            .expect("layout should resolve");
        assert_eq!(files, vec![PathBuf::from("/ws/core/bin")]);
    }

    #[test]
    fn test_project_module_without_outputs() {
        let workspace =
            InMemoryWorkspace::new("/ws").with_project(Project::new("core", "/ws/core"));
        let layout = DefaultBundleLayout::new(&workspace);
        let descriptor = ModuleDescriptor::new(
            ModuleId::new("core", "1.0"),
            ModuleLocation::Project("core".to_string()),
        );

        let files = layout
            .classpath_entries(&descriptor)
            .expect("layout should resolve");
        assert_eq!(files, vec![PathBuf::from("/ws/core")]);
    }

    #[test]
    fn test_missing_project() {
        let workspace = InMemoryWorkspace::new("/ws");
        let layout = DefaultBundleLayout::new(&workspace);
        let descriptor = ModuleDescriptor::new(
            ModuleId::new("core", "1.0"),
            ModuleLocation::Project("core".to_string()),
        );
        assert!(layout.classpath_entries(&descriptor).is_err());
    }

    #[test]
    fn test_binary_directory_module() {
        let workspace = InMemoryWorkspace::new("/ws");
        let layout = DefaultBundleLayout::new(&workspace);
        let descriptor = ModuleDescriptor::new(
            ModuleId::new("lib", "2.0"),
            ModuleLocation::Binary(PathBuf::from("/plugins/lib_2.0")),
        )
        .with_bundle_classpath(&[".", "lib/extra.jar"]);

        let files = layout
            .classpath_entries(&descriptor)
            .expect("layout should resolve");
        assert_eq!(
            files,
            vec![
                PathBuf::from("/plugins/lib_2.0"),
                PathBuf::from("/plugins/lib_2.0/lib/extra.jar")
            ]
        );
    }

    #[test]
    fn test_binary_jar_module() {
        let workspace = InMemoryWorkspace::new("/ws");
        let layout = DefaultBundleLayout::new(&workspace);
        let descriptor = ModuleDescriptor::new(
            ModuleId::new("lib", "2.0"),
            ModuleLocation::Binary(PathBuf::from("/plugins/lib_2.0.jar")),
        )
        .with_bundle_classpath(&[".", "lib/extra.jar"]);

        let files = layout
            .classpath_entries(&descriptor)
            .expect("layout should resolve");
        assert_eq!(files, vec![PathBuf::from("/plugins/lib_2.0.jar")]);
    }
}
