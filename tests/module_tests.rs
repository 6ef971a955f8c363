//! Module resolution integration tests

mod common;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use buildpath::domain::ResolverError;
use buildpath::module::{
    BundleDependency, DefaultBundleLayout, PlatformKey, PlatformRegistry, describe_errors,
    resolve_module_classpath, root_cause,
};
use buildpath::{BuildpathError, InMemoryWorkspace, TargetPlatform, VisibilityRuleSet};
use common::{binary_module, id};

fn hosts(dependencies: &[BundleDependency]) -> Vec<&str> {
    dependencies.iter().map(|d| d.host().name.as_str()).collect()
}

#[test]
fn test_visibility_formatting() {
    let mut rules = VisibilityRuleSet::new(true);
    rules.add_public("com.x");
    assert_eq!(rules.to_string(), "+com/x/*;-**/*");

    let parsed: VisibilityRuleSet = "+com/x/*;-**/*".parse().expect("rules should parse");
    assert_eq!(parsed, rules);
    assert!(parsed.is_visible("com.x"));
    assert!(!parsed.is_visible("com.y"));
}

#[test]
fn test_reexports_are_transitive() {
    let p = binary_module("p").requiring(&id("q"), true);
    let platform = TargetPlatform::new()
        .with_module(p.clone())
        .with_module(binary_module("q").exporting("org.q").requiring(&id("r"), true))
        .with_module(binary_module("r").exporting("org.r"));

    let dependencies = resolve_module_classpath(&platform, &p).expect("module should resolve");

    assert_eq!(hosts(&dependencies), vec!["q", "r"]);
    assert!(dependencies.iter().all(BundleDependency::is_required_bundle));
}

#[test]
fn test_fragment_files_share_host_dependency() {
    let consumer = binary_module("app").importing("org.lib", &id("lib"));
    let platform = TargetPlatform::new()
        .with_module(consumer.clone())
        .with_module(binary_module("lib").exporting("org.lib").with_fragment(&id("lib.linux")))
        .with_module(binary_module("lib.linux").fragment_of(&id("lib")));
    let workspace = InMemoryWorkspace::new("/ws");
    let layout = DefaultBundleLayout::new(&workspace);

    let dependencies =
        resolve_module_classpath(&platform, &consumer).expect("module should resolve");
    assert_eq!(dependencies.len(), 1);

    let files = dependencies[0]
        .classpath_files(&platform, &layout)
        .expect("files should resolve");
    assert_eq!(
        files,
        vec![
            PathBuf::from("/plugins/lib_1.0.0.jar"),
            PathBuf::from("/plugins/lib.linux_1.0.0.jar"),
        ]
    );
}

#[test]
fn test_module_never_depends_on_itself() {
    let p = binary_module("p")
        .requiring(&id("q"), true)
        .importing("org.p.nl", &id("p.nl"))
        .with_fragment(&id("p.nl"));
    let platform = TargetPlatform::new()
        .with_module(p.clone())
        .with_module(binary_module("q").requiring(&id("p"), true))
        .with_module(binary_module("p.nl").fragment_of(&id("p")).exporting("org.p.nl"));

    let dependencies = resolve_module_classpath(&platform, &p).expect("module should resolve");

    assert_eq!(hosts(&dependencies), vec!["q"]);
    assert!(dependencies.iter().all(|d| d.host() != &p.id));
}

#[test]
fn test_root_cause_follows_missing_imports() {
    let app = binary_module("app").unresolved_because(ResolverError::MissingImport {
        package: "org.core".to_string(),
        version_range: None,
    });
    let core = binary_module("core")
        .exporting("org.core")
        .unresolved_because(ResolverError::MissingRequire {
            module: "base".to_string(),
            version_range: Some("[1.0,2.0)".to_string()),
        });
    let base = binary_module("base").unresolved_because(ResolverError::Other {
        message: "Missing Constraint: Bundle-RequiredExecutionEnvironment: JavaSE-21".to_string(),
    });
    let platform = TargetPlatform::new()
        .with_module(app.clone())
        .with_module(core)
        .with_module(base);

    let cause = root_cause(&app, &platform);
    assert_eq!(cause.id.name, "base");
    assert!(describe_errors(cause).contains("JavaSE-21"));

    let err = resolve_module_classpath(&platform, &app).expect_err("app is unresolved");
    assert!(matches!(err, BuildpathError::UnresolvedModule { .. }));
    assert!(err.to_string().contains("app_1.0.0"));
}

#[test]
fn test_root_cause_terminates_on_cycles() {
    let a = binary_module("a")
        .exporting("org.a")
        .unresolved_because(ResolverError::MissingImport {
            package: "org.b".to_string(),
            version_range: None,
        });
    let b = binary_module("b")
        .exporting("org.b")
        .unresolved_because(ResolverError::MissingImport {
            package: "org.a".to_string(),
            version_range: None,
        });
    let platform = TargetPlatform::new().with_module(a.clone()).with_module(b);

    assert_eq!(root_cause(&a, &platform).id.name, "b");
}

#[test]
fn test_registry_builds_platform_once() {
    let registry: PlatformRegistry = PlatformRegistry::new();
    let key = PlatformKey::new("/ws")
        .with_location("/opt/eclipse/plugins")
        .with_setting("os", "linux");
    let builds = AtomicUsize::new(0);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let platform = registry
                    .get_or_try_insert(&key, || {
                        builds.fetch_add(1, Ordering::SeqCst);
                        Ok(TargetPlatform::new().with_module(binary_module("org.slf4j")))
                    })
                    .expect("platform should build");
                assert_eq!(platform.len(), 1);
            });
        }
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(registry.invalidate(&key));
    assert!(registry.get(&key).is_none());
}
