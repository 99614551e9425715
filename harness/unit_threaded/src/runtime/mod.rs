//! Inline test blocks.
//!
//! `unittest! { ... }` declares an unnamed test block inside ordinary source.
//! Blocks are collected process-wide and handed to
//! [`BuiltinRegistry::module_unit_tester`]
//! once, through [`install`], before test discovery:
//! - blocks of this crate's own modules run immediately
//! - every other module's blocks are deferred into one [`BuiltinTestCase`]
//!   per module, named `<module>.unittest`, and picked up by the factory

use std::sync::{Arc, OnceLock};

use crate::case::{BuiltinTestCase, TestCase};
use crate::data::{TestAttrs, TestData};
use crate::discovery::dotted;
use crate::selection::{is_package_prefix, SEPARATOR};

/// Module namespace whose inline blocks run at interception time.
pub const INTERNAL_NAMESPACE: &str = "unit_threaded";

/// One `unittest!` block.
#[derive(Debug)]
pub struct InlineTest {
    module: &'static str,
    file: &'static str,
    line: u32,
    test: fn(),
}

impl InlineTest {
    pub const fn new(module: &'static str, file: &'static str, line: u32, test: fn()) -> Self {
        InlineTest {
            module,
            file,
            line,
            test,
        }
    }

    /// Rust module path of the declaring module.
    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Run the block natively; failure panics.
    pub fn run(&self) {
        (self.test)();
    }
}

inventory::collect!(InlineTest);

/// Declare an inline test block in the enclosing module.
///
/// The block fails by panicking, e.g. through `assert!`.
///
/// ```text
/// unit_threaded::unittest! {
///     assert_eq!(parse("1 + 2"), 3);
/// }
/// ```
#[macro_export]
macro_rules! unittest {
    ($($body:tt)*) => {
        #[allow(unsafe_code)]
        const _: () = {
            fn __unittest() {
                $($body)*
            }
            $crate::inventory::submit! {
                $crate::runtime::InlineTest::new(module_path!(), file!(), line!(), __unittest)
            }
        };
    };
}

/// All inline blocks of one module, in declaration order.
#[derive(Clone, Debug)]
pub struct InlineModule {
    name: String,
    tests: Vec<&'static InlineTest>,
}

impl InlineModule {
    /// Group blocks under a dotted module name.
    pub fn new(name: impl Into<String>, tests: Vec<&'static InlineTest>) -> Self {
        InlineModule {
            name: name.into(),
            tests,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tests(&self) -> &[&'static InlineTest] {
        &self.tests
    }

    fn is_internal(&self) -> bool {
        self.name == INTERNAL_NAMESPACE || is_package_prefix(INTERNAL_NAMESPACE, &self.name)
    }

    /// Run every block natively, in order.
    fn run_native(&self) {
        for test in &self.tests {
            test.run();
        }
    }

    /// Defer the blocks into a builtin test case.
    fn into_test_case(self) -> Option<BuiltinTestCase> {
        let first = *self.tests.first()?;
        let path = format!("{}{SEPARATOR}unittest", self.name);
        let tests = self.tests;
        let data = TestData::function(path, TestAttrs::empty(), move || {
            for test in &tests {
                test.run();
            }
            Ok(())
        });
        Some(BuiltinTestCase::new(data, first.file(), first.line()))
    }
}

/// Enumerate every `unittest!` block linked into the process, grouped by
/// module and sorted by module name.
pub fn collect_modules() -> Vec<InlineModule> {
    let mut modules: Vec<InlineModule> = Vec::new();
    for test in inventory::iter::<InlineTest> {
        let name = dotted(test.module());
        match modules.iter_mut().find(|m| m.name == name) {
            Some(module) => module.tests.push(test),
            None => modules.push(InlineModule::new(name, vec![test])),
        }
    }
    for module in &mut modules {
        module.tests.sort_by_key(|test| (test.file(), test.line()));
    }
    modules.sort_by(|a, b| a.name.cmp(&b.name));
    modules
}

/// Builtin test cases deferred by the interception pass.
///
/// Written once, read any number of times afterwards.
#[derive(Debug, Default)]
pub struct BuiltinRegistry {
    tests: OnceLock<Vec<Arc<BuiltinTestCase>>>,
}

impl BuiltinRegistry {
    pub const fn new() -> Self {
        BuiltinRegistry {
            tests: OnceLock::new(),
        }
    }

    /// Intercept the inline blocks of `modules`.
    ///
    /// Internal modules run now; a panic in one propagates and leaves the
    /// registry unpopulated. Other modules become builtin test cases. Only
    /// the first call has an effect. Always returns `true`: deferred blocks
    /// report through their test cases, not through this call.
    pub fn module_unit_tester(&self, modules: Vec<InlineModule>) -> bool {
        if self.is_installed() {
            tracing::debug!("inline tests already intercepted");
            return true;
        }

        self.tests.get_or_init(|| {
            let mut deferred = Vec::new();
            for module in modules {
                if module.is_internal() {
                    tracing::debug!(module = module.name(), "running internal inline tests");
                    module.run_native();
                } else if let Some(case) = module.into_test_case() {
                    tracing::trace!(path = case.path(), "deferred inline tests");
                    deferred.push(Arc::new(case));
                }
            }
            tracing::debug!(deferred = deferred.len(), "intercepted inline tests");
            deferred
        });
        true
    }

    /// Whether the interception pass has populated this registry.
    pub fn is_installed(&self) -> bool {
        self.tests.get().is_some()
    }

    /// Deferred test cases; empty before interception.
    pub fn test_cases(&self) -> &[Arc<BuiltinTestCase>] {
        self.tests.get().map(Vec::as_slice).unwrap_or_default()
    }
}

static BUILTINS: BuiltinRegistry = BuiltinRegistry::new();

/// The process-wide builtin registry.
pub fn builtins() -> &'static BuiltinRegistry {
    &BUILTINS
}

/// Intercept every `unittest!` block in the process.
///
/// Call once at startup before creating tests. Later calls are no-ops.
pub fn install() -> bool {
    if BUILTINS.is_installed() {
        return true;
    }
    BUILTINS.module_unit_tester(collect_modules())
}
