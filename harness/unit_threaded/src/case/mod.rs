//! Runnable test cases.
//!
//! Every test, whatever its origin, is run through the [`TestCase`] trait:
//! - [`FunctionTestCase`]: a plain callable
//! - [`ClassTestCase`]: an instance of a registered [`TestClass`]
//! - [`CompositeTestCase`]: children of one module run sequentially
//! - [`BuiltinTestCase`]: a module's `unittest!` blocks

mod builtin;
mod class;
mod composite;
mod function;

pub use builtin::BuiltinTestCase;
pub use class::{ClassTestCase, TestClass};
pub use composite::CompositeTestCase;
pub use function::FunctionTestCase;

use std::sync::Arc;

use crate::error::TestFailure;

/// A runnable unit.
///
/// Identity is the allocation: the factory deduplicates shared test cases by
/// pointer, never by path.
pub trait TestCase: Send + Sync {
    /// Qualified name used for reporting and matching.
    fn path(&self) -> &str;

    /// Run the test.
    fn test(&self) -> Result<(), TestFailure>;

    /// Number of tests this case runs.
    fn num_tests(&self) -> usize {
        1
    }

    /// Paths of the tests this case runs.
    fn test_paths(&self) -> Vec<String> {
        vec![self.path().to_string()]
    }
}

/// A test case shared between the factory's result set and composites.
pub type SharedTestCase = Arc<dyn TestCase>;
