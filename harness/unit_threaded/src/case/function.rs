use std::fmt;

use crate::data::{TestData, TestFn};
use crate::error::{TestFailure, UnitTestError};

use super::TestCase;

/// A test case wrapping a plain callable.
///
/// Failures propagate unchanged; a panicking body unwinds out of
/// [`TestCase::test`].
#[derive(Clone)]
pub struct FunctionTestCase {
    path: String,
    test: TestFn,
}

impl FunctionTestCase {
    /// Build from function-based test data.
    ///
    /// # Panics
    ///
    /// Panics if `data` has no callable. Class-based data must go through
    /// the class registry; reaching this point with one is a framework bug.
    pub fn new(data: &TestData) -> Self {
        let Some(test) = data.test() else {
            panic!(
                "internal error: function test case requested for class test `{}`",
                data.name()
            );
        };
        FunctionTestCase {
            path: data.name().to_string(),
            test: test.clone(),
        }
    }

    pub fn from_fn<F>(path: impl Into<String>, test: F) -> Self
    where
        F: Fn() -> Result<(), UnitTestError> + Send + Sync + 'static,
    {
        FunctionTestCase {
            path: path.into(),
            test: std::sync::Arc::new(test),
        }
    }
}

impl TestCase for FunctionTestCase {
    fn path(&self) -> &str {
        &self.path
    }

    fn test(&self) -> Result<(), TestFailure> {
        (self.test)().map_err(TestFailure::from)
    }
}

impl fmt::Debug for FunctionTestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTestCase")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
