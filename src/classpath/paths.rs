//! Path normalization for resolved classpath files
//!
//! Every file that ends up in a resolved classpath goes through
//! [`PathNormalizer::output`], so that the same file is always spelled the
//! same way and duplicates can be detected by plain comparison.

use std::path::{Component, Path, PathBuf};

use normpath::PathExt;

/// Normalizes paths and optionally makes them workspace-relative
#[derive(Debug, Clone)]
pub struct PathNormalizer {
    workspace_root: PathBuf,
    relative: bool,
}

impl PathNormalizer {
    pub fn new(workspace_root: &Path, relative: bool) -> Self {
        let mut normalizer = Self {
            workspace_root: PathBuf::new(),
            relative,
        };
        normalizer.workspace_root = normalizer.normalize(workspace_root);
        normalizer
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Normalize a path
    ///
    /// `.` and `..` are removed lexically first. Existing paths are then
    /// resolved; for a path that does not exist, the longest existing
    /// ancestor is resolved and the remaining components appended, so that
    /// symlinked roots (e.g. /var -> /private/var on macOS) are spelled the
    /// same for existing and missing files.
    pub fn normalize(&self, path: &Path) -> PathBuf {
        let cleaned = clean(path);
        if let Ok(norm) = cleaned.normalize() {
            return norm.as_path().to_path_buf();
        }

        let mut current = cleaned.as_path();
        let mut missing = Vec::new();
        while !current.exists() {
            match (current.file_name(), current.parent()) {
                (Some(name), Some(parent)) => {
                    missing.push(name);
                    current = parent;
                }
                _ => return cleaned,
            }
        }

        let mut result = current
            .normalize()
            .map(|norm| norm.as_path().to_path_buf())
            .unwrap_or_else(|_| current.to_path_buf());
        for component in missing.iter().rev() {
            result.push(component);
        }
        result
    }

    /// Path relative to the workspace root, `None` if outside of it
    pub fn relative_from_root(&self, path: &Path) -> Option<PathBuf> {
        let normalized = self.normalize(path);
        normalized
            .strip_prefix(&self.workspace_root)
            .ok()
            .map(|rel| {
                if rel.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    rel.to_path_buf()
                }
            })
    }

    /// Path as it should appear in a resolved classpath
    pub fn output(&self, path: &Path) -> PathBuf {
        if self.relative {
            if let Some(rel) = self.relative_from_root(path) {
                return rel;
            }
        }
        self.normalize(path)
    }
}

/// Removes `.` and resolvable `..` components without touching the disk
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
