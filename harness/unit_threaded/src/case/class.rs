use crate::capture::catch_failure;
use crate::error::{TestFailure, UnitTestError};

use super::TestCase;

/// A class-based test.
///
/// Instances are created by name through a
/// [`ClassRegistry`](crate::registry::ClassRegistry), one instance per run.
pub trait TestClass: Send + Sync {
    /// Prepare state before [`TestClass::test`].
    fn setup(&self) -> Result<(), UnitTestError> {
        Ok(())
    }

    fn test(&self) -> Result<(), UnitTestError>;

    /// Release state after [`TestClass::test`].
    ///
    /// Always called once per run, also when `setup` or `test` failed or
    /// panicked.
    fn shutdown(&self) {}
}

/// A test case holding a constructed [`TestClass`] instance.
pub struct ClassTestCase {
    path: String,
    instance: Box<dyn TestClass>,
}

impl ClassTestCase {
    pub fn new(path: impl Into<String>, instance: Box<dyn TestClass>) -> Self {
        ClassTestCase {
            path: path.into(),
            instance,
        }
    }
}

impl TestCase for ClassTestCase {
    fn path(&self) -> &str {
        &self.path
    }

    fn test(&self) -> Result<(), TestFailure> {
        let result = catch_failure(|| {
            self.instance.setup()?;
            self.instance.test()?;
            Ok(())
        });
        self.instance.shutdown();
        result
    }
}

impl std::fmt::Debug for ClassTestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassTestCase")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
