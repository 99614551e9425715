//! Test case factory.
//!
//! Turns module declarations into the set of test cases to run:
//! discovery, selection, construction, per-module grouping of
//! single-threaded tests, and merging of intercepted inline tests.

mod set;

pub use set::TestSet;

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::case::{ClassTestCase, CompositeTestCase, FunctionTestCase, SharedTestCase};
use crate::data::TestData;
use crate::discovery::{discover, TestModule};
use crate::error::DiscoveryError;
use crate::registry::{self, ClassRegistry};
use crate::runtime::{self, BuiltinRegistry};
use crate::selection::{is_wanted_test, module_name};

/// Builds test cases from module declarations.
///
/// Every call to [`TestFactory::create_tests`] builds fresh composites, so a
/// composite only ever holds the single-threaded tests selected by that call.
pub struct TestFactory<'a> {
    classes: ClassRegistry,
    builtins: &'a BuiltinRegistry,
}

impl TestFactory<'static> {
    /// Create a factory reading the process-wide builtin registry.
    pub fn new() -> Self {
        TestFactory::with_builtins(runtime::builtins())
    }
}

impl Default for TestFactory<'static> {
    fn default() -> Self {
        TestFactory::new()
    }
}

impl<'a> TestFactory<'a> {
    /// Create a factory reading builtin test cases from `builtins`.
    pub fn with_builtins(builtins: &'a BuiltinRegistry) -> Self {
        TestFactory {
            classes: ClassRegistry::new(),
            builtins,
        }
    }

    /// Create the test cases selected by `patterns`.
    ///
    /// Returns the set sorted by path. Class tests that cannot be
    /// constructed (unknown or abstract) are left out silently.
    pub fn create_tests<S: AsRef<str>>(
        &self,
        modules: &[TestModule],
        patterns: &[S],
    ) -> Result<TestSet, DiscoveryError> {
        let data = discover(modules)?;
        for module in modules {
            module.register_classes(&self.classes);
        }

        let mut composites = FxHashMap::default();
        let mut tests = TestSet::new();
        for datum in &data {
            if !is_wanted_test(datum, patterns) {
                tracing::trace!(test = datum.name(), "not selected");
                continue;
            }
            if let Some(case) = self.create_test_case(datum, &mut composites) {
                tests.insert(case);
            }
        }

        if !self.builtins.is_installed() {
            tracing::debug!("inline tests not intercepted; call runtime::install() first");
        }
        for builtin in self.builtins.test_cases() {
            if is_wanted_test(builtin.data(), patterns) {
                tests.insert(Arc::clone(builtin) as SharedTestCase);
            }
        }

        tests.sort_by_path();
        tracing::debug!(
            cases = tests.len(),
            tests = tests.num_tests(),
            "created test cases"
        );
        Ok(tests)
    }

    /// Build the test case for `data`. Single-threaded tests are appended to
    /// their module's composite in `composites`, which is returned instead.
    fn create_test_case(
        &self,
        data: &TestData,
        composites: &mut FxHashMap<String, Arc<CompositeTestCase>>,
    ) -> Option<SharedTestCase> {
        let case: SharedTestCase = if data.is_class() {
            let Some(case) = self.construct_class(data.name()) else {
                tracing::debug!(test = data.name(), "class not constructible, skipping");
                return None;
            };
            Arc::new(case)
        } else {
            Arc::new(FunctionTestCase::new(data))
        };

        if !data.is_single_threaded() {
            return Some(case);
        }

        let module = module_name(data.name());
        let composite = Arc::clone(
            composites
                .entry(module.to_string())
                .or_insert_with(|| Arc::new(CompositeTestCase::new(module))),
        );
        composite.push(case);
        Some(composite as SharedTestCase)
    }

    /// Construct a class from this factory's modules, falling back to the
    /// global registry for classes registered elsewhere.
    fn construct_class(&self, name: &str) -> Option<ClassTestCase> {
        if self.classes.contains(name) {
            self.classes.construct(name)
        } else {
            registry::registry().construct(name)
        }
    }
}

/// Create the test cases of `modules` selected by `patterns`, using a fresh
/// factory and the process-wide builtin registry.
pub fn create_tests<S: AsRef<str>>(
    modules: &[TestModule],
    patterns: &[S],
) -> Result<TestSet, DiscoveryError> {
    TestFactory::new().create_tests(modules, patterns)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
