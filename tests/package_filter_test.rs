use pretty_assertions::assert_eq;
use test_case::test_case;

use std::sync::Arc;

use type_scanner::{
    extract_static_fields, find, ClasspathScanner, DeclaredType, FieldValue, FindQuery,
    PackageExclusions, PackageFilter, ReflectError, ScanOptions, StaticField, TypeDescriptor,
    TypeRegistry, Visibility,
};

const RUNNABLE: &str = "java.lang.Runnable";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tasks_registry() -> TypeRegistry {
    [
        DeclaredType::class("com.acme.tasks.Ping").extends(RUNNABLE),
        DeclaredType::class("com.acme.tasks.sub.Pong").extends(RUNNABLE),
        DeclaredType::abstract_class("com.acme.tasks.BaseTask").extends(RUNNABLE),
        DeclaredType::interface("com.acme.tasks.Task").extends(RUNNABLE),
        DeclaredType::class("com.acme.tasks.Worker").extends("com.acme.tasks.BaseTask"),
        DeclaredType::class("com.acme.tasks.Worker$Retry").extends(RUNNABLE),
        DeclaredType::class("com.acme.tasks.Plain"),
        DeclaredType::class("com.acme.tasksextra.Stray").extends(RUNNABLE),
        DeclaredType::class("com.acme.other.Elsewhere").extends(RUNNABLE),
    ]
    .into_iter()
    .collect()
}

fn names(types: &[Arc<DeclaredType>]) -> Vec<&str> {
    types.iter().map(|t| t.qualified_name()).collect()
}

#[test]
fn non_recursive_returns_only_direct_concrete_types() {
    init_logging();
    let registry = tasks_registry();

    let found = find(&registry, RUNNABLE, "com.acme.tasks", false, false, false, &[]).unwrap();

    assert_eq!(names(&found), vec!["com.acme.tasks.Ping", "com.acme.tasks.Worker"]);
}

#[test]
fn recursive_includes_sub_packages() {
    init_logging();
    let registry = tasks_registry();

    let found = find(&registry, RUNNABLE, "com.acme.tasks", true, false, false, &[]).unwrap();

    // The literal include prefix also reaches `com.acme.tasksextra`
    assert_eq!(
        names(&found),
        vec![
            "com.acme.tasks.Ping",
            "com.acme.tasks.Worker",
            "com.acme.tasks.sub.Pong",
            "com.acme.tasksextra.Stray",
        ]
    );
}

#[test]
fn ping_and_pong_example() {
    let registry: TypeRegistry = [
        DeclaredType::class("com.acme.tasks.Ping").extends(RUNNABLE),
        DeclaredType::class("com.acme.tasks.sub.Pong").extends(RUNNABLE),
        DeclaredType::abstract_class("com.acme.tasks.BaseTask").extends(RUNNABLE),
    ]
    .into_iter()
    .collect();

    let flat = find(&registry, RUNNABLE, "com.acme.tasks", false, false, false, &[]).unwrap();
    assert_eq!(names(&flat), vec!["com.acme.tasks.Ping"]);

    let deep = find(&registry, RUNNABLE, "com.acme.tasks", true, false, false, &[]).unwrap();
    assert_eq!(names(&deep), vec!["com.acme.tasks.Ping", "com.acme.tasks.sub.Pong"]);
}

#[test_case(false, false, &["com.acme.tasks.Ping", "com.acme.tasks.Worker"] ; "concrete only")]
#[test_case(true, false, &["com.acme.tasks.Ping", "com.acme.tasks.Task", "com.acme.tasks.Worker"] ; "with interfaces")]
#[test_case(false, true, &["com.acme.tasks.BaseTask", "com.acme.tasks.Ping", "com.acme.tasks.Worker"] ; "with abstracts")]
#[test_case(true, true, &["com.acme.tasks.BaseTask", "com.acme.tasks.Ping", "com.acme.tasks.Task", "com.acme.tasks.Worker"] ; "everything")]
fn interface_and_abstract_flags_are_independent(keep_interfaces: bool, keep_abstracts: bool, expected: &[&str]) {
    let registry = tasks_registry();
    let query = FindQuery::new("com.acme.tasks")
        .keep_interfaces(keep_interfaces)
        .keep_abstracts(keep_abstracts);

    let found = PackageFilter::new(&registry).find_types(RUNNABLE, &query).unwrap();

    assert_eq!(names(&found), expected.to_vec());
}

#[test]
fn nested_types_never_appear() {
    let registry = tasks_registry();
    let query = FindQuery::new("com.acme")
        .recursive(true)
        .keep_interfaces(true)
        .keep_abstracts(true);

    let found = PackageFilter::new(&registry).find_types(RUNNABLE, &query).unwrap();

    assert!(found.iter().all(|t| !t.is_nested()));
    assert!(found.iter().all(|t| t.qualified_name() != "com.acme.tasks.Worker$Retry"));
}

/// Scanner that ignores case when matching the package root
struct CaseFoldingScanner(TypeRegistry);

impl ClasspathScanner for CaseFoldingScanner {
    fn scan(&self, package: &str, _exclusions: &PackageExclusions) -> Vec<Arc<DeclaredType>> {
        let package = package.to_ascii_lowercase();
        self.0.iter()
            .filter(|t| t.qualified_name.to_ascii_lowercase().starts_with(&package))
            .cloned()
            .collect()
    }

    fn is_assignable(&self, type_name: &str, marker: &str) -> bool {
        self.0.is_assignable(type_name, marker)
    }
}

#[test]
fn package_match_is_case_insensitive() {
    let scanner = CaseFoldingScanner(
        [
            DeclaredType::class("COM.ACME.Tasks.Ping").extends(RUNNABLE),
            DeclaredType::class("com.acme.tasks.deep.Pong").extends(RUNNABLE),
        ]
        .into_iter()
        .collect(),
    );

    let found = find(&scanner, RUNNABLE, "com.acme.tasks", false, false, false, &[]).unwrap();

    assert_eq!(names(&found), vec!["COM.ACME.Tasks.Ping"]);
}

#[test]
fn exclusions_are_literal_prefixes() {
    let registry = tasks_registry();

    let found = find(&registry, RUNNABLE, "com.acme", true, false, false, &["com.acme.tasks"]).unwrap();

    // `com.acme.tasks` also removes `com.acme.tasksextra`
    assert_eq!(names(&found), vec!["com.acme.other.Elsewhere"]);
}

#[test]
fn segment_aware_exclusions_keep_sibling_packages() {
    let registry = tasks_registry();
    let options = ScanOptions {
        segment_aware_excludes: true,
        ..ScanOptions::default()
    };
    let query = FindQuery::new("com.acme").recursive(true).exclude("com.acme.tasks");

    let found = PackageFilter::with_options(&registry, &options).find_types(RUNNABLE, &query).unwrap();

    assert_eq!(names(&found), vec!["com.acme.other.Elsewhere", "com.acme.tasksextra.Stray"]);
}

#[test]
fn results_are_assignable_to_the_marker() {
    let registry = tasks_registry();
    let query = FindQuery::new("com.acme").recursive(true).keep_abstracts(true);

    let found = PackageFilter::new(&registry).find_types("com.acme.tasks.BaseTask", &query).unwrap();

    assert_eq!(names(&found), vec!["com.acme.tasks.BaseTask", "com.acme.tasks.Worker"]);
}

#[test_case("", "com.acme" , "marker" ; "empty marker")]
#[test_case("java.lang.Runnable", "  ", "package" ; "blank package")]
#[test_case("java..Runnable", "com.acme", "marker" ; "malformed marker")]
fn invalid_arguments_fail_the_call(marker: &str, package: &str, argument: &str) {
    let registry = tasks_registry();

    let err = find(&registry, marker, package, true, true, true, &[]).unwrap_err();

    match err {
        ReflectError::InvalidArgument { name, .. } => assert_eq!(name, argument),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
#[allow(clippy::approx_constant)]
fn math_constants_example() {
    let ty = DeclaredType::class("com.acme.MathConstants")
        .with_field(StaticField::constant("PI_APPROX", Visibility::Public, FieldValue::Float(3.14)))
        .with_field(StaticField::constant("cache", Visibility::Private, FieldValue::Integer(0)));

    assert_eq!(extract_static_fields(&ty), vec![FieldValue::Float(3.14)]);
}

#[test]
fn packages_with_unicode_identifiers_are_scanned() {
    let registry: TypeRegistry = [
        DeclaredType::class("com.café.Ping").extends(RUNNABLE),
        DeclaredType::class("com.café.Außen$Innen").extends(RUNNABLE),
        DeclaredType::class("com.cafe.Ping").extends(RUNNABLE),
    ]
    .into_iter()
    .collect();

    let found = find(&registry, RUNNABLE, "com.café", false, false, false, &[]).unwrap();

    assert_eq!(names(&found), vec!["com.café.Ping"]);
}
