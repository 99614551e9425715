use super::*;
use crate::case::{TestCase, TestClass};
use crate::data::TestAttrs;
use crate::error::{fail, TestFailure, UnitTestError};
use crate::runtime::{InlineModule, InlineTest};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};

const ALL: &[&str] = &[];

struct Serial;

impl TestClass for Serial {
    fn test(&self) -> Result<(), UnitTestError> {
        Ok(())
    }
}

fn pass() -> Result<(), UnitTestError> {
    Ok(())
}

fn inline_block() {}

static INLINE: InlineTest = InlineTest::new("app::inline", file!(), line!(), inline_block);

fn case<'a>(tests: &'a TestSet, path: &str) -> &'a SharedTestCase {
    tests.iter().find(|case| case.path() == path).unwrap()
}

fn installed_builtins() -> BuiltinRegistry {
    let builtins = BuiltinRegistry::new();
    builtins.module_unit_tester(vec![InlineModule::new("app.inline", vec![&INLINE])]);
    builtins
}

#[test]
fn test_function_tests_sorted_by_path() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![TestModule::new("app.net")
        .function("zeta", TestAttrs::empty(), pass)
        .function("alpha", TestAttrs::empty(), pass)];

    let tests = factory.create_tests(&modules, ALL).unwrap();
    assert_eq!(tests.paths(), vec!["app.net.alpha", "app.net.zeta"]);
}

#[test]
fn test_single_threaded_grouped_into_one_composite() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![TestModule::new("app.db")
        .function("second", TestAttrs::SINGLE_THREADED, pass)
        .function("free", TestAttrs::empty(), pass)
        .function("first", TestAttrs::SINGLE_THREADED, pass)];

    let tests = factory.create_tests(&modules, ALL).unwrap();
    assert_eq!(tests.paths(), vec!["app.db", "app.db.free"]);
    assert_eq!(tests.num_tests(), 3);

    let composite = case(&tests, "app.db");
    assert_eq!(
        composite.test_paths(),
        vec!["app.db.second", "app.db.first"]
    );
    assert_eq!(composite.num_tests(), 2);
}

#[test]
fn test_one_composite_per_module() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![
        TestModule::new("app.a").function("t", TestAttrs::SINGLE_THREADED, pass),
        TestModule::new("app.b")
            .class("Serial", TestAttrs::SINGLE_THREADED, || Serial)
            .function("t", TestAttrs::SINGLE_THREADED, pass),
    ];

    let tests = factory.create_tests(&modules, ALL).unwrap();
    assert_eq!(tests.paths(), vec!["app.a", "app.b"]);
    assert_eq!(
        case(&tests, "app.b").test_paths(),
        vec!["app.b.Serial", "app.b.t"]
    );
}

#[test]
fn test_abstract_class_skipped_silently() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![TestModule::new("app.widgets")
        .abstract_class("WidgetCase")
        .class("Button", TestAttrs::empty(), || Serial)];

    let tests = factory.create_tests(&modules, ALL).unwrap();
    assert_eq!(tests.paths(), vec!["app.widgets.Button"]);
}

#[test]
fn test_single_threaded_abstract_class_creates_no_composite() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![TestModule::new("app.widgets").abstract_class("WidgetCase")];

    let tests = factory.create_tests(&modules, ALL).unwrap();
    assert!(tests.is_empty());
    assert_eq!(tests.num_tests(), 0);
}

#[test]
fn test_builtins_are_merged_and_filtered() {
    let builtins = installed_builtins();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![TestModule::new("app.net").function("t", TestAttrs::empty(), pass)];

    let all = factory.create_tests(&modules, ALL).unwrap();
    assert_eq!(all.paths(), vec!["app.inline.unittest", "app.net.t"]);

    let only_net = factory.create_tests(&modules, &["app.net"]).unwrap();
    assert_eq!(only_net.paths(), vec!["app.net.t"]);

    let by_package = factory.create_tests(&modules, &["app"]).unwrap();
    assert_eq!(by_package.len(), 2);
}

#[test]
fn test_builtins_not_double_counted_across_calls() {
    let builtins = installed_builtins();
    let modules = vec![TestModule::new("app.net").function("t", TestAttrs::empty(), pass)];

    let first = TestFactory::with_builtins(&builtins)
        .create_tests(&modules, ALL)
        .unwrap();
    let second = TestFactory::with_builtins(&builtins)
        .create_tests(&modules, ALL)
        .unwrap();

    let mut merged = first;
    merged.merge(second);
    let builtin_count = merged
        .iter()
        .filter(|case| case.path() == "app.inline.unittest")
        .count();
    assert_eq!(builtin_count, 1);
    assert_eq!(merged.len(), 3);
}

#[test]
fn test_repeated_calls_build_fresh_composites() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![TestModule::new("app.db")
        .function("a", TestAttrs::SINGLE_THREADED, pass)
        .function("b", TestAttrs::SINGLE_THREADED, pass)];

    let first = factory.create_tests(&modules, ALL).unwrap();
    let second = factory.create_tests(&modules, ALL).unwrap();

    assert_eq!(case(&first, "app.db").num_tests(), 2);
    assert_eq!(case(&second, "app.db").num_tests(), 2);
    assert!(!second.contains(case(&first, "app.db")));
}

#[test]
fn test_narrower_selection_excludes_earlier_children() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let b_runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&b_runs);
    let modules = vec![TestModule::new("app.db")
        .function("a", TestAttrs::SINGLE_THREADED, pass)
        .function("b", TestAttrs::SINGLE_THREADED, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })];

    let all = factory.create_tests(&modules, ALL).unwrap();
    assert_eq!(case(&all, "app.db").test_paths(), vec!["app.db.a", "app.db.b"]);

    let only_a = factory.create_tests(&modules, &["app.db.a"]).unwrap();
    assert_eq!(only_a.paths(), vec!["app.db"]);
    assert_eq!(case(&only_a, "app.db").test_paths(), vec!["app.db.a"]);
    for test in &only_a {
        test.test().unwrap();
    }
    assert_eq!(b_runs.load(Ordering::SeqCst), 0);
}

#[test]
fn test_concurrent_calls_each_get_one_composite() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![TestModule::new("app.db")
        .function("a", TestAttrs::SINGLE_THREADED, pass)
        .function("b", TestAttrs::SINGLE_THREADED, pass)];

    let sets: Vec<TestSet> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| factory.create_tests(&modules, ALL).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for set in &sets {
        assert_eq!(set.paths(), vec!["app.db"]);
        assert_eq!(
            case(set, "app.db").test_paths(),
            vec!["app.db.a", "app.db.b"]
        );
    }
}

#[test]
fn test_composite_in_result_reports_all_child_failures() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);
    let modules = vec![TestModule::new("app.db")
        .function("broken", TestAttrs::SINGLE_THREADED, || fail("broken"))
        .function("after", TestAttrs::SINGLE_THREADED, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })];

    let tests = factory.create_tests(&modules, ALL).unwrap();
    let failure = tests.as_slice()[0].test().unwrap_err();
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert!(matches!(failure, TestFailure::Composite { total: 2, .. }));
}

#[test]
fn test_discovery_errors_propagate() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let modules = vec![TestModule::new("app..bad").function("t", TestAttrs::empty(), pass)];
    assert_eq!(
        factory.create_tests(&modules, ALL).unwrap_err(),
        DiscoveryError::InvalidModuleName("app..bad".into())
    );
}

#[test]
fn test_global_class_registry_fallback() {
    crate::registry::register_class("factory_tests.global.Remote", || Serial);

    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);
    let case = factory.construct_class("factory_tests.global.Remote");
    assert!(case.is_some_and(|case| case.test().is_ok()));
    assert!(factory.construct_class("factory_tests.global.Missing").is_none());
}

fn end_to_end_modules() -> Vec<TestModule> {
    vec![TestModule::new("tests.e2e")
        .class("Serial", TestAttrs::SINGLE_THREADED, || Serial)
        .function("hidden", TestAttrs::HIDDEN, pass)
        .function("normal", TestAttrs::empty(), pass)]
}

#[test]
fn test_end_to_end_default_selection() {
    let builtins = BuiltinRegistry::new();
    let tests = TestFactory::with_builtins(&builtins)
        .create_tests(&end_to_end_modules(), ALL)
        .unwrap();

    assert_eq!(tests.paths(), vec!["tests.e2e", "tests.e2e.normal"]);
    assert_eq!(tests.as_slice()[0].test_paths(), vec!["tests.e2e.Serial"]);
    assert!(tests.iter().all(|case| case.test().is_ok()));
}

#[test]
fn test_end_to_end_hidden_selected_by_exact_name() {
    let builtins = BuiltinRegistry::new();
    let factory = TestFactory::with_builtins(&builtins);

    let tests = factory
        .create_tests(&end_to_end_modules(), &["tests.e2e", "tests.e2e.hidden"])
        .unwrap();
    assert_eq!(
        tests.paths(),
        vec!["tests.e2e", "tests.e2e.hidden", "tests.e2e.normal"]
    );

    let only_hidden = factory
        .create_tests(&end_to_end_modules(), &["tests.e2e.hidden"])
        .unwrap();
    assert_eq!(only_hidden.paths(), vec!["tests.e2e.hidden"]);
}

#[test]
fn test_free_function_uses_fresh_factory() {
    let modules = vec![TestModule::new("factory_tests.free")
        .function("a", TestAttrs::SINGLE_THREADED, pass)];
    let first = create_tests(&modules, &["factory_tests.free"]).unwrap();
    let second = create_tests(&modules, &["factory_tests.free"]).unwrap();
    assert_eq!(first.paths(), vec!["factory_tests.free"]);
    assert_eq!(second.paths(), vec!["factory_tests.free"]);
    assert!(!second.contains(&first.as_slice()[0]));
}
