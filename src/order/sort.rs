//! Build order computation by iterative leaf peeling
//!
//! Produces an order in which every project comes after the projects it
//! references, so that building in that order never builds a project before
//! its dependencies.
//!
//! ## Algorithm
//!
//! 1. **Partition**: buildable projects become [`DependencyNode`]s indexed by
//!    name; non-buildable projects are set aside for the policy.
//! 2. **Edges**: each node requires the projects it references (see
//!    [`referenced_projects`]). A reference to a non-buildable project is
//!    not an edge; a reference outside the input set is an error.
//! 3. **Peel**: every round removes all nodes without remaining requirements
//!    (in name order) and strikes them from the other nodes. A round with no
//!    such node means the remaining nodes contain a cycle.
//! 4. **Policy**: non-buildable projects are dropped, prepended or appended
//!    in input order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use buildpath::order::{NonBuildablePolicy, ReferenceKind, resolve_build_order};
//!
//! let order = resolve_build_order(&projects, &[ReferenceKind::Classpath], NonBuildablePolicy::Ignore)?;
//! ```

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::config::ResolverConfig;
use crate::domain::Project;
use crate::error::{
    Result,
    order::{circular, non_buildable, unknown_reference},
};
use crate::module::ModuleState;
use crate::order::{DependencyNode, NonBuildablePolicy, ReferenceKind, referenced_projects};

/// Computes build orders for sets of projects
pub struct BuildOrderResolver<'a> {
    config: ResolverConfig,
    modules: Option<&'a dyn ModuleState>,
}

impl<'a> BuildOrderResolver<'a> {
    pub fn new(reference_kinds: &[ReferenceKind], policy: NonBuildablePolicy) -> Self {
        Self {
            config: ResolverConfig {
                reference_kinds: reference_kinds.to_vec(),
                non_buildable_policy: policy,
                ..ResolverConfig::default()
            },
            modules: None,
        }
    }

    /// Resolver using the kinds, policy and module container of `config`
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            config: config.clone(),
            modules: None,
        }
    }

    /// Supplies the module state needed for [`ReferenceKind::Module`]
    #[must_use]
    pub fn with_modules(mut self, modules: &'a dyn ModuleState) -> Self {
        self.modules = Some(modules);
        self
    }

    pub fn reference_kinds(&self) -> &[ReferenceKind] {
        &self.config.reference_kinds
    }

    pub fn policy(&self) -> NonBuildablePolicy {
        self.config.non_buildable_policy
    }

    /// Orders `projects` so that dependencies come first
    ///
    /// # Errors
    ///
    /// - `NonBuildableProject` for the first non-buildable project under
    ///   [`NonBuildablePolicy::Fail`]
    /// - `UnknownReferencedProject` if a reference leaves the input set
    /// - `CyclicDependency` naming one cycle among the buildable projects
    /// - module errors while discovering module references
    ///
    /// # Example
    ///
    /// ```text
    /// Projects:
    ///   app  references core
    ///   core references util
    ///   util references nothing
    ///
    /// Result: [util, core, app]
    /// ```
    pub fn resolve(&self, projects: &[Project]) -> Result<Vec<Project>> {
        let policy = self.policy();
        let (buildable, skipped): (Vec<&Project>, Vec<&Project>) =
            projects.iter().partition(|p| p.buildable);

        if policy == NonBuildablePolicy::Fail {
            if let Some(project) = skipped.first() {
                return Err(non_buildable(&project.name));
            }
        }

        let mut nodes: BTreeMap<&str, DependencyNode> = buildable
            .iter()
            .map(|p| (p.name.as_str(), DependencyNode::new(p)))
            .collect();
        let skipped_names: HashSet<&str> = skipped.iter().map(|p| p.name.as_str()).collect();

        for project in &buildable {
            // a later project with the same name replaced this one in the index
            let shadowed = nodes
                .get(project.name.as_str())
                .is_some_and(|node| !std::ptr::eq(node.project(), *project));
            if shadowed {
                debug!(project = %project.name, "duplicate project name, earlier one ignored");
                continue;
            }
            let references =
                referenced_projects(project, self.reference_kinds(), self.modules, &self.config)?;
            for reference in references {
                if skipped_names.contains(reference.as_str()) {
                    debug!(from = %project.name, to = %reference, "reference to non-buildable project");
                    continue;
                }
                if !nodes.contains_key(reference.as_str()) {
                    return Err(unknown_reference(&project.name, reference));
                }
                if let Some(node) = nodes.get_mut(project.name.as_str()) {
                    node.add_required(&reference);
                }
            }
        }

        let ordered = peel_leaves(nodes)?;
        debug!(
            ordered = ordered.len(),
            non_buildable = skipped.len(),
            ?policy,
            "resolved build order"
        );

        let ordered = ordered.into_iter().cloned();
        let skipped = skipped.into_iter().cloned();
        Ok(match policy {
            NonBuildablePolicy::Prepend => skipped.chain(ordered).collect(),
            NonBuildablePolicy::Append => ordered.chain(skipped).collect(),
            NonBuildablePolicy::Ignore | NonBuildablePolicy::Fail => ordered.collect(),
        })
    }
}

/// Removes leaves round by round until no node is left
fn peel_leaves<'a>(mut nodes: BTreeMap<&'a str, DependencyNode<'a>>) -> Result<Vec<&'a Project>> {
    let mut ordered = Vec::with_capacity(nodes.len());

    while !nodes.is_empty() {
        let leaves: Vec<&'a str> = nodes
            .values()
            .filter(|node| node.is_leaf())
            .map(DependencyNode::name)
            .collect();
        if leaves.is_empty() {
            return Err(circular(cycle_chain(&nodes)));
        }

        for leaf in &leaves {
            if let Some(node) = nodes.remove(leaf) {
                ordered.push(node.project());
            }
        }
        for node in nodes.values_mut() {
            for leaf in &leaves {
                node.remove_required(leaf);
            }
        }
    }

    Ok(ordered)
}

/// Follows first requirements from the smallest name until a node repeats
///
/// Only called when every remaining node still requires another remaining
/// node, so the walk always closes a cycle.
fn cycle_chain(nodes: &BTreeMap<&str, DependencyNode>) -> String {
    let mut path: Vec<&str> = Vec::new();
    let mut current = nodes.keys().next().copied();

    while let Some(name) = current {
        if let Some(start) = path.iter().position(|n| *n == name) {
            let mut chain = path.split_off(start);
            chain.push(name);
            return chain.join(" -> ");
        }
        path.push(name);
        current = nodes
            .get(name)
            .and_then(|node| node.required().first())
            .map(String::as_str);
    }

    path.join(" -> ")
}

/// Orders `projects` with the given reference kinds and policy
///
/// # Errors
///
/// See [`BuildOrderResolver::resolve`].
pub fn resolve_build_order(
    projects: &[Project],
    reference_kinds: &[ReferenceKind],
    policy: NonBuildablePolicy,
) -> Result<Vec<Project>> {
    BuildOrderResolver::new(reference_kinds, policy).resolve(projects)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::MODULE_CONTAINER;
    use crate::domain::{ModuleDescriptor, ModuleId, ModuleLocation, RawDependencyEntry};
    use crate::error::BuildpathError;
    use crate::module::TargetPlatform;

    fn create_test_project(name: &str, deps: &[&str]) -> Project {
        deps.iter().fold(
            Project::new(name, format!("/ws/{name}")),
            |project, dep| project.with_entry(RawDependencyEntry::project(dep)),
        )
    }

    fn names(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.name.as_str()).collect()
    }

    fn classpath_order(projects: &[Project]) -> Result<Vec<Project>> {
        resolve_build_order(projects, &[ReferenceKind::Classpath], NonBuildablePolicy::Ignore)
    }

    #[test]
    fn test_build_order_simple() {
        let projects = vec![
            create_test_project("a", &["b"]),
            create_test_project("b", &[]),
        ];
        let order = classpath_order(&projects).expect("build order should resolve");
        assert_eq!(names(&order), vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_name_keeps_last_references() {
        let projects = vec![
            create_test_project("a", &["b"]),
            create_test_project("b", &[]),
            create_test_project("a", &["c"]),
            create_test_project("c", &[]),
        ];
        let order = classpath_order(&projects).expect("build order should resolve");
        assert_eq!(names(&order), vec!["b", "c", "a"]);
        assert_eq!(order[2].entries, projects[2].entries);

        let cyclic_shadow = vec![
            create_test_project("a", &["b"]),
            create_test_project("b", &["a"]),
            create_test_project("a", &[]),
        ];
        let order = classpath_order(&cyclic_shadow).expect("shadowed reference is no edge");
        assert_eq!(names(&order), vec!["a", "b"]);
    }

    #[test]
    fn test_build_order_transitive() {
        let projects = vec![
            create_test_project("a", &["b"]),
            create_test_project("b", &["c"]),
            create_test_project("c", &[]),
        ];
        let order = classpath_order(&projects).expect("build order should resolve");
        assert_eq!(names(&order), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_build_order_ties_broken_by_name() {
        let projects = vec![
            create_test_project("zeta", &[]),
            create_test_project("app", &["zeta", "beta"]),
            create_test_project("beta", &[]),
            create_test_project("alpha", &[]),
        ];
        let first = classpath_order(&projects).expect("build order should resolve");
        assert_eq!(names(&first), vec!["alpha", "beta", "zeta", "app"]);

        let mut reversed = projects.clone();
        reversed.reverse();
        let second = classpath_order(&reversed).expect("build order should resolve");
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_order_cycle_detection() {
        let projects = vec![
            create_test_project("a", &["b"]),
            create_test_project("b", &["a"]),
            create_test_project("c", &[]),
        ];
        let err = classpath_order(&projects).expect_err("cycle should be detected");
        match err {
            BuildpathError::CyclicDependency { chain } => assert_eq!(chain, "a -> b -> a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_chain_skips_tail() {
        let projects = vec![
            create_test_project("a", &["b"]),
            create_test_project("b", &["c"]),
            create_test_project("c", &["b"]),
        ];
        let err = classpath_order(&projects).expect_err("cycle should be detected");
        assert!(matches!(err, BuildpathError::CyclicDependency { chain } if chain == "b -> c -> b"));
    }

    #[test]
    fn test_unknown_reference() {
        let projects = vec![create_test_project("a", &["missing"])];
        let err = classpath_order(&projects).expect_err("unknown reference should fail");
        assert!(matches!(
            err,
            BuildpathError::UnknownReferencedProject { from, to } if from == "a" && to == "missing"
        ));
    }

    #[test]
    fn test_non_buildable_policies() {
        let projects = vec![
            create_test_project("app", &["docs", "core"]),
            create_test_project("docs", &[]).non_buildable(),
            create_test_project("core", &[]),
            create_test_project("site", &[]).non_buildable(),
        ];
        let kinds = [ReferenceKind::Classpath];

        let ignore = resolve_build_order(&projects, &kinds, NonBuildablePolicy::Ignore)
            .expect("build order should resolve");
        assert_eq!(names(&ignore), vec!["core", "app"]);

        let prepend = resolve_build_order(&projects, &kinds, NonBuildablePolicy::Prepend)
            .expect("build order should resolve");
        assert_eq!(names(&prepend), vec!["docs", "site", "core", "app"]);

        let append = resolve_build_order(&projects, &kinds, NonBuildablePolicy::Append)
            .expect("build order should resolve");
        assert_eq!(names(&append), vec!["core", "app", "docs", "site"]);

        let err = resolve_build_order(&projects, &kinds, NonBuildablePolicy::Fail)
            .expect_err("non-buildable project should fail");
        assert!(matches!(err, BuildpathError::NonBuildableProject { name } if name == "docs"));
    }

    #[test]
    fn test_project_references_kind() {
        let projects = vec![
            Project::new("app", "/ws/app").with_reference("core"),
            create_test_project("core", &[]),
        ];

        let classpath_only = classpath_order(&projects).expect("build order should resolve");
        assert_eq!(names(&classpath_only), vec!["app", "core"]);

        let with_refs = resolve_build_order(
            &projects,
            &[ReferenceKind::Classpath, ReferenceKind::Project],
            NonBuildablePolicy::Ignore,
        )
        .expect("build order should resolve");
        assert_eq!(names(&with_refs), vec!["core", "app"]);
    }

    #[test]
    fn test_module_references_with_state() {
        let projects = vec![
            Project::new("app", "/ws/app").with_entry(RawDependencyEntry::container(MODULE_CONTAINER)),
            Project::new("base", "/ws/base"),
        ];
        let platform = TargetPlatform::new()
            .with_module(
                ModuleDescriptor::new(
                    ModuleId::new("org.app", "1.0.0"),
                    ModuleLocation::Project("app".to_string()),
                )
                .requiring(&ModuleId::new("org.base", "1.0.0"), false),
            )
            .with_module(ModuleDescriptor::new(
                ModuleId::new("org.base", "1.0.0"),
                ModuleLocation::Project("base".to_string()),
            ));

        let resolver = BuildOrderResolver::new(&[ReferenceKind::Module], NonBuildablePolicy::Ignore)
            .with_modules(&platform);
        let order = resolver.resolve(&projects).expect("build order should resolve");
        assert_eq!(names(&order), vec!["base", "app"]);
    }

    #[test]
    fn test_empty_input() {
        let order = classpath_order(&[]).expect("empty input should resolve");
        assert!(order.is_empty());
    }
}
