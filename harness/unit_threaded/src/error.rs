//! Failure channel and discovery errors.

use std::panic::Location;

use thiserror::Error;

/// A failure signalled by an assertion.
///
/// This is the one channel through which assertion code reports failures to
/// the engine. `file` and `line` point at the failing check. Inline test
/// blocks that panic are converted into this type as well, so results look
/// the same regardless of where a test came from.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{file}:{line}: {message}")]
pub struct UnitTestError {
    /// What went wrong.
    pub message: String,
    /// Source file of the failing check.
    pub file: String,
    /// Line of the failing check.
    pub line: u32,
}

impl UnitTestError {
    /// Create a failure located at the caller.
    #[cold]
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self::at(message, location.file(), location.line())
    }

    /// Create a failure with an explicit source location.
    #[cold]
    pub fn at(message: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        UnitTestError {
            message: message.into(),
            file: file.into(),
            line,
        }
    }

    /// Whether the failure carries a known source location.
    pub fn has_location(&self) -> bool {
        !self.file.is_empty()
    }
}

/// Fail the current test at the caller's location.
///
/// ```text
/// if got != want {
///     return fail(format!("expected {want}, got {got}"));
/// }
/// ```
#[track_caller]
pub fn fail<T>(message: impl Into<String>) -> Result<T, UnitTestError> {
    Err(UnitTestError::new(message))
}

/// Outcome of a failed `TestCase::test` call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TestFailure {
    /// A single test failed.
    #[error(transparent)]
    Assertion(#[from] UnitTestError),

    /// One or more children of a composite failed.
    ///
    /// Every child runs; `failures` lists each failed child by path.
    #[error("{path}: {} of {total} tests failed", .failures.len())]
    Composite {
        /// Path of the composite (its module name).
        path: String,
        /// Number of children that ran.
        total: usize,
        /// Failed children in run order.
        failures: Vec<(String, TestFailure)>,
    },
}

impl TestFailure {
    /// Iterate over every leaf failure, flattening composites.
    pub fn leaves(&self) -> Vec<&UnitTestError> {
        match self {
            TestFailure::Assertion(error) => vec![error],
            TestFailure::Composite { failures, .. } => failures
                .iter()
                .flat_map(|(_, failure)| failure.leaves())
                .collect(),
        }
    }
}

/// Misconfigured module declarations found during discovery.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// Module names must be non-empty dotted identifiers.
    #[error("invalid module name `{0}`")]
    InvalidModuleName(String),

    /// Test names are a single non-empty segment.
    #[error("invalid test name `{name}` in module `{module}`")]
    InvalidTestName { module: String, name: String },

    /// Two declarations resolve to the same qualified name.
    #[error("test `{0}` is declared more than once")]
    DuplicateTest(String),
}
