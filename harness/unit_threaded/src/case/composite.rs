use std::sync::Arc;

use parking_lot::Mutex;

use crate::capture::catch_failure;
use crate::error::TestFailure;
use crate::selection::is_package_prefix;

use super::{SharedTestCase, TestCase};

/// Test cases of one module that must not run concurrently.
///
/// Children run strictly one after another, in the order they were added,
/// whatever policy the caller uses for running other test cases. Concurrent
/// calls to [`TestCase::test`] on the same composite are serialized too.
///
/// A failing child does not stop its siblings: every child runs and the
/// composite reports all failures at once.
pub struct CompositeTestCase {
    path: String,
    children: Mutex<Vec<SharedTestCase>>,
    running: Mutex<()>,
}

impl CompositeTestCase {
    /// Create an empty composite for `module`.
    pub fn new(module: impl Into<String>) -> Self {
        CompositeTestCase {
            path: module.into(),
            children: Mutex::new(Vec::new()),
            running: Mutex::new(()),
        }
    }

    /// Append a child.
    ///
    /// Returns `false` and leaves the composite unchanged if the same child,
    /// or another child with the same path, was added before.
    pub fn push(&self, child: SharedTestCase) -> bool {
        debug_assert!(
            is_package_prefix(&self.path, child.path()),
            "child `{}` does not belong to module `{}`",
            child.path(),
            self.path
        );

        let mut children = self.children.lock();
        if children
            .iter()
            .any(|c| Arc::ptr_eq(c, &child) || c.path() == child.path())
        {
            return false;
        }
        children.push(child);
        true
    }

    /// Snapshot of the children in run order.
    pub fn children(&self) -> Vec<SharedTestCase> {
        self.children.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.children.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.lock().is_empty()
    }
}

impl TestCase for CompositeTestCase {
    fn path(&self) -> &str {
        &self.path
    }

    fn test(&self) -> Result<(), TestFailure> {
        let _running = self.running.lock();
        let children = self.children();

        let mut failures = Vec::new();
        for child in &children {
            if let Err(failure) = catch_failure(|| child.test()) {
                tracing::debug!(composite = %self.path, child = child.path(), "child test failed");
                failures.push((child.path().to_string(), failure));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TestFailure::Composite {
                path: self.path.clone(),
                total: children.len(),
                failures,
            })
        }
    }

    fn num_tests(&self) -> usize {
        self.children.lock().iter().map(|c| c.num_tests()).sum()
    }

    fn test_paths(&self) -> Vec<String> {
        self.children
            .lock()
            .iter()
            .flat_map(|c| c.test_paths())
            .collect()
    }
}

impl std::fmt::Debug for CompositeTestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeTestCase")
            .field("path", &self.path)
            .field("children", &self.test_paths())
            .finish()
    }
}
