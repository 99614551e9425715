use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::case::SharedTestCase;

/// Test cases ready to run, deduplicated by identity.
///
/// Inserting the same `Arc` twice has no effect; two distinct test cases
/// with equal paths are both kept.
#[derive(Clone, Default)]
pub struct TestSet {
    cases: Vec<SharedTestCase>,
    identities: FxHashSet<usize>,
}

fn identity(case: &SharedTestCase) -> usize {
    Arc::as_ptr(case).cast::<()>() as usize
}

impl TestSet {
    pub fn new() -> Self {
        TestSet::default()
    }

    /// Add a test case. Returns `false` if it is already present.
    pub fn insert(&mut self, case: SharedTestCase) -> bool {
        if !self.identities.insert(identity(&case)) {
            return false;
        }
        self.cases.push(case);
        true
    }

    pub fn contains(&self, case: &SharedTestCase) -> bool {
        self.identities.contains(&identity(case))
    }

    /// Add every test case of `other` not already present.
    pub fn merge(&mut self, other: TestSet) {
        for case in other.cases {
            self.insert(case);
        }
    }

    /// Order test cases by path.
    pub fn sort_by_path(&mut self) {
        self.cases.sort_by(|a, b| a.path().cmp(b.path()));
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Total number of tests, counting composite children.
    pub fn num_tests(&self) -> usize {
        self.cases.iter().map(|case| case.num_tests()).sum()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.cases.iter().map(|case| case.path()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SharedTestCase> {
        self.cases.iter()
    }

    pub fn as_slice(&self) -> &[SharedTestCase] {
        &self.cases
    }

    pub fn into_vec(self) -> Vec<SharedTestCase> {
        self.cases
    }
}

impl<'a> IntoIterator for &'a TestSet {
    type Item = &'a SharedTestCase;
    type IntoIter = std::slice::Iter<'a, SharedTestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

impl IntoIterator for TestSet {
    type Item = SharedTestCase;
    type IntoIter = std::vec::IntoIter<SharedTestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.into_iter()
    }
}

impl std::fmt::Debug for TestSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.paths()).finish()
    }
}
