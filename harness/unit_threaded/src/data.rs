//! Descriptors of discovered tests.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::error::UnitTestError;
use crate::selection;

/// A zero-argument test body.
///
/// Returns normally to pass, or reports failure through [`UnitTestError`].
pub type TestFn = Arc<dyn Fn() -> Result<(), UnitTestError> + Send + Sync>;

bitflags! {
    /// Attributes attached to a test declaration.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TestAttrs: u8 {
        /// Not run unless selected by exact name.
        const HIDDEN = 1;
        /// Runs sequentially with the other single-threaded tests of its module.
        const SINGLE_THREADED = 1 << 1;
    }
}

/// Immutable description of one discoverable test.
///
/// Class-based tests carry no callable; they are constructed by name from a
/// [`ClassRegistry`](crate::registry::ClassRegistry).
#[derive(Clone)]
pub struct TestData {
    name: String,
    hidden: bool,
    test: Option<TestFn>,
    single_threaded: bool,
}

impl TestData {
    pub fn new(
        name: impl Into<String>,
        hidden: bool,
        test: Option<TestFn>,
        single_threaded: bool,
    ) -> Self {
        TestData {
            name: name.into(),
            hidden,
            test,
            single_threaded,
        }
    }

    /// Describe a function-based test.
    pub fn function<F>(name: impl Into<String>, attrs: TestAttrs, test: F) -> Self
    where
        F: Fn() -> Result<(), UnitTestError> + Send + Sync + 'static,
    {
        Self::with_attrs(name, attrs, Some(Arc::new(test)))
    }

    /// Describe a class-based test.
    pub fn class(name: impl Into<String>, attrs: TestAttrs) -> Self {
        Self::with_attrs(name, attrs, None)
    }

    fn with_attrs(name: impl Into<String>, attrs: TestAttrs, test: Option<TestFn>) -> Self {
        Self::new(
            name,
            attrs.contains(TestAttrs::HIDDEN),
            test,
            attrs.contains(TestAttrs::SINGLE_THREADED),
        )
    }

    /// Fully qualified, dot-separated name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_single_threaded(&self) -> bool {
        self.single_threaded
    }

    /// The callable, absent for class-based tests.
    pub fn test(&self) -> Option<&TestFn> {
        self.test.as_ref()
    }

    pub fn is_class(&self) -> bool {
        self.test.is_none()
    }

    /// Name of the module the test was declared in.
    pub fn module_name(&self) -> &str {
        selection::module_name(&self.name)
    }
}

impl fmt::Debug for TestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestData")
            .field("name", &self.name)
            .field("hidden", &self.hidden)
            .field("test", &self.test.as_ref().map(|_| "<fn>"))
            .field("single_threaded", &self.single_threaded)
            .finish()
    }
}
