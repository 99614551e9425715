//! Test result types.

use std::time::Duration;

use crate::error::TestFailure;

/// Outcome of a single test case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestOutcome {
    /// Test passed successfully.
    Passed,
    /// Test failed.
    Failed(TestFailure),
}

impl TestOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestOutcome::Failed(_))
    }

    /// The failure, if the test failed.
    pub fn failure(&self) -> Option<&TestFailure> {
        match self {
            TestOutcome::Passed => None,
            TestOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// Result of running a single test case.
#[derive(Clone, Debug)]
pub struct TestResult {
    /// Path of the test case.
    pub path: String,
    /// Number of tests the case ran (composites run several).
    pub num_tests: usize,
    /// Outcome of the test case.
    pub outcome: TestOutcome,
    /// Time taken to run the test case.
    pub duration: Duration,
}

impl TestResult {
    /// Create a passed test result.
    pub fn passed(path: impl Into<String>, num_tests: usize, duration: Duration) -> Self {
        TestResult {
            path: path.into(),
            num_tests,
            outcome: TestOutcome::Passed,
            duration,
        }
    }

    /// Create a failed test result.
    #[cold]
    pub fn failed(
        path: impl Into<String>,
        num_tests: usize,
        failure: TestFailure,
        duration: Duration,
    ) -> Self {
        TestResult {
            path: path.into(),
            num_tests,
            outcome: TestOutcome::Failed(failure),
            duration,
        }
    }
}

/// Overall summary of a test run.
#[derive(Clone, Debug, Default)]
pub struct TestSummary {
    /// Individual results in run order.
    pub results: Vec<TestResult>,
    /// Test cases that passed.
    pub passed: usize,
    /// Test cases that failed.
    pub failed: usize,
    /// Individual tests run, counting composite children.
    pub tests_run: usize,
    /// Total time for all tests.
    pub duration: Duration,
}

impl TestSummary {
    pub fn new() -> Self {
        TestSummary::default()
    }

    pub fn add_result(&mut self, result: TestResult) {
        match &result.outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed(_) => self.failed += 1,
        }
        self.tests_run += result.num_tests;
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Iterate over failed results.
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    /// Get exit code: 0 = all pass, 1 = failures, 2 = no tests found.
    pub fn exit_code(&self) -> i32 {
        if self.total() == 0 {
            2
        } else {
            i32::from(self.has_failures())
        }
    }
}

#[cfg(test)]
mod tests;
