use super::*;
use crate::error::UnitTestError;

fn failure(message: &str) -> TestFailure {
    UnitTestError::at(message, "src/lib.rs", 1).into()
}

#[test]
fn test_outcome_predicates() {
    assert!(TestOutcome::Passed.is_passed());
    assert!(!TestOutcome::Passed.is_failed());
    assert!(TestOutcome::Passed.failure().is_none());

    let failed = TestOutcome::Failed(failure("error"));
    assert!(failed.is_failed());
    assert_eq!(failed.failure(), Some(&failure("error")));
}

#[test]
fn test_summary_counts() {
    let mut summary = TestSummary::new();
    summary.add_result(TestResult::passed("a.one", 1, Duration::from_millis(10)));
    summary.add_result(TestResult::passed("a.serial", 3, Duration::from_millis(5)));
    summary.add_result(TestResult::failed(
        "a.two",
        1,
        failure("error"),
        Duration::from_millis(5),
    ));

    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.tests_run, 5);
    assert!(summary.has_failures());

    let failed: Vec<&str> = summary.failures().map(|r| r.path.as_str()).collect();
    assert_eq!(failed, vec!["a.two"]);
}

#[test]
fn test_summary_exit_code() {
    let mut summary = TestSummary::new();
    assert_eq!(summary.exit_code(), 2); // No tests

    summary.passed = 1;
    assert_eq!(summary.exit_code(), 0); // All pass

    summary.failed = 1;
    assert_eq!(summary.exit_code(), 1); // Test failures
}
