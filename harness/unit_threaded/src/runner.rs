//! Test execution engine.
//!
//! Runs the test cases produced by the factory and collects results.
//! Composites serialize their own children, so running different test cases
//! in parallel never runs two single-threaded tests of a module at once.

use std::time::Instant;

use rayon::prelude::*;

use crate::capture::catch_failure;
use crate::case::{SharedTestCase, TestCase};
use crate::discovery::TestModule;
use crate::error::DiscoveryError;
use crate::factory::{create_tests, TestSet};
use crate::result::{TestResult, TestSummary};

/// Configuration for the test runner.
#[derive(Clone, Debug)]
pub struct TestRunnerConfig {
    /// Selection patterns: exact test names or package prefixes.
    /// Empty runs every non-hidden test.
    pub patterns: Vec<String>,
    /// Run test cases in parallel.
    pub parallel: bool,
    /// Stack size of parallel worker threads, in bytes.
    pub stack_size: usize,
    /// Stop after the first failing test case. Only applies to sequential runs.
    pub fail_fast: bool,
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        TestRunnerConfig {
            patterns: Vec::new(),
            parallel: true,
            stack_size: 32 * 1024 * 1024,
            fail_fast: false,
        }
    }
}

/// Test runner.
#[derive(Debug, Default)]
pub struct TestRunner {
    config: TestRunnerConfig,
}

impl TestRunner {
    /// Create a new test runner with default config.
    pub fn new() -> Self {
        TestRunner::default()
    }

    /// Create a test runner with custom config.
    pub fn with_config(config: TestRunnerConfig) -> Self {
        TestRunner { config }
    }

    pub fn config(&self) -> &TestRunnerConfig {
        &self.config
    }

    /// Run every test case in `tests`.
    pub fn run(&self, tests: &TestSet) -> TestSummary {
        if self.config.parallel {
            self.run_parallel(tests.as_slice())
        } else {
            self.run_sequential(tests.as_slice())
        }
    }

    /// Run test cases sequentially.
    fn run_sequential(&self, cases: &[SharedTestCase]) -> TestSummary {
        let mut summary = TestSummary::new();
        let start = Instant::now();

        for case in cases {
            let result = Self::run_case(case.as_ref());
            let failed = result.outcome.is_failed();
            summary.add_result(result);
            if failed && self.config.fail_fast {
                tracing::debug!(path = case.path(), "stopping after first failure");
                break;
            }
        }

        summary.duration = start.elapsed();
        summary
    }

    /// Run test cases in parallel on a scoped rayon thread pool.
    ///
    /// `build_scoped` guarantees the pool is torn down before returning.
    fn run_parallel(&self, cases: &[SharedTestCase]) -> TestSummary {
        let start = Instant::now();

        let results = rayon::ThreadPoolBuilder::new()
            .stack_size(self.config.stack_size)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    cases
                        .par_iter()
                        .map(|case| Self::run_case(case.as_ref()))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                cases
                    .iter()
                    .map(|case| Self::run_case(case.as_ref()))
                    .collect()
            });

        let mut summary = TestSummary::new();
        for result in results {
            summary.add_result(result);
        }

        summary.duration = start.elapsed();
        summary
    }

    /// Run a single test case, catching panics from its body.
    pub fn run_case(case: &dyn TestCase) -> TestResult {
        let start = Instant::now();
        match catch_failure(|| case.test()) {
            Ok(()) => TestResult::passed(case.path(), case.num_tests(), start.elapsed()),
            Err(failure) => {
                tracing::debug!(path = case.path(), %failure, "test failed");
                TestResult::failed(case.path(), case.num_tests(), failure, start.elapsed())
            }
        }
    }
}

/// Create and run the tests of `modules` selected by `config.patterns`.
pub fn run_tests(
    modules: &[TestModule],
    config: TestRunnerConfig,
) -> Result<TestSummary, DiscoveryError> {
    let tests = create_tests(modules, &config.patterns)?;
    Ok(TestRunner::with_config(config).run(&tests))
}
