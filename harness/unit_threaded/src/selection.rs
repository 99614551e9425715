//! Name-based test selection.
//!
//! Patterns select tests either by exact qualified name or as a package
//! prefix. Hidden tests only run when named exactly.

use crate::data::TestData;

/// Separator between the segments of a qualified name.
pub const SEPARATOR: char = '.';

/// Decide whether `data` runs for the given selection `patterns`.
///
/// With no patterns every non-hidden test runs. Otherwise a test runs if any
/// pattern equals its name, or, for non-hidden tests, if a pattern is a
/// package prefix of its name (see [`is_package_prefix`]).
pub fn is_wanted_test<S: AsRef<str>>(data: &TestData, patterns: &[S]) -> bool {
    if patterns.is_empty() {
        return !data.is_hidden();
    }

    patterns.iter().any(|pattern| {
        let pattern = pattern.as_ref();
        matches_exactly(pattern, data) || matches_package(pattern, data)
    })
}

fn matches_exactly(pattern: &str, data: &TestData) -> bool {
    pattern == data.name()
}

fn matches_package(pattern: &str, data: &TestData) -> bool {
    !data.is_hidden() && is_package_prefix(pattern, data.name())
}

/// Whether `prefix` names a package enclosing `name`.
///
/// `name` must be strictly longer than `prefix`, start with it, and continue
/// with a separator right after it: `"a.b"` encloses `"a.b.c"` but not
/// `"a.bc"`.
pub fn is_package_prefix(prefix: &str, name: &str) -> bool {
    name.len() > prefix.len()
        && name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
}

/// Module part of a qualified name: every segment except the last.
///
/// `"p.q.r.s"` yields `"p.q.r"`; a name without separator yields `""`.
pub fn module_name(name: &str) -> &str {
    name.rsplit_once(SEPARATOR).map_or("", |(module, _)| module)
}
