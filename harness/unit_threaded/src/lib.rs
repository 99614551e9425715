//! Test discovery and execution engine.
//!
//! This crate provides:
//! - Discovery: enumerating test classes and test functions declared by modules
//! - Selection: exact-name and package-prefix filtering with hidden tests
//! - Grouping: single-threaded tests of one module run inside a composite
//! - Inline tests: `unittest!` blocks collected process-wide and adapted into
//!   the same test-case abstraction
//! - Execution: running the resulting test cases and collecting outcomes
//!
//! # Usage
//!
//! ```text
//! use unit_threaded::{create_tests, TestAttrs, TestModule};
//!
//! unit_threaded::runtime::install();
//!
//! let modules = vec![TestModule::new("app.math")
//!     .function("adds", TestAttrs::empty(), || check_add())];
//! let tests = create_tests(&modules, &["app.math"])?;
//! for test in &tests {
//!     test.test()?;
//! }
//! ```

pub mod case;
mod capture;
pub mod data;
pub mod discovery;
pub mod error;
pub mod factory;
pub mod registry;
pub mod result;
pub mod runner;
pub mod runtime;
pub mod selection;

pub use case::{
    BuiltinTestCase, ClassTestCase, CompositeTestCase, FunctionTestCase, SharedTestCase,
    TestCase, TestClass,
};
pub use data::{TestAttrs, TestData, TestFn};
pub use discovery::{discover, TestModule};
pub use error::{fail, DiscoveryError, TestFailure, UnitTestError};
pub use factory::{create_tests, TestFactory, TestSet};
pub use registry::{register_abstract_class, register_class, ClassRegistry};
pub use result::{TestOutcome, TestResult, TestSummary};
pub use runner::{run_tests, TestRunner, TestRunnerConfig};
pub use selection::{is_wanted_test, module_name};

#[doc(hidden)]
pub use inventory;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=unit_threaded=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
