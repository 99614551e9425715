use crate::capture::catch_panic;
use crate::data::TestData;
use crate::error::{TestFailure, UnitTestError};

use super::{FunctionTestCase, TestCase};

/// Adapter for a module's inline `unittest!` blocks.
///
/// Inline blocks fail by panicking. Any panic is caught and turned into a
/// [`UnitTestError`] carrying the panic message, file and line, so these
/// tests report like every other test case.
#[derive(Debug)]
pub struct BuiltinTestCase {
    data: TestData,
    inner: FunctionTestCase,
    file: &'static str,
    line: u32,
}

impl BuiltinTestCase {
    /// Wrap function test data for inline blocks declared at `file:line`.
    ///
    /// The declared location is used when a panic carries no location.
    pub fn new(data: TestData, file: &'static str, line: u32) -> Self {
        let inner = FunctionTestCase::new(&data);
        BuiltinTestCase {
            data,
            inner,
            file,
            line,
        }
    }

    /// The descriptor used for selection.
    pub fn data(&self) -> &TestData {
        &self.data
    }
}

impl TestCase for BuiltinTestCase {
    fn path(&self) -> &str {
        self.inner.path()
    }

    fn test(&self) -> Result<(), TestFailure> {
        match catch_panic(|| self.inner.test()) {
            Ok(result) => result,
            Err(error) if error.has_location() => Err(error.into()),
            Err(error) => Err(UnitTestError::at(error.message, self.file, self.line).into()),
        }
    }
}
