//! Test discovery.
//!
//! A [`TestModule`] declares the test classes and test functions of one
//! module. [`discover`] turns a list of modules into [`TestData`], class-based
//! tests first, then function-based tests, modules in the order given.

use rustc_hash::FxHashSet;

use crate::case::TestClass;
use crate::data::{TestAttrs, TestData};
use crate::error::{DiscoveryError, UnitTestError};
use crate::registry::{ClassFactory, ClassRegistry};
use crate::selection::SEPARATOR;

/// A declared test class.
#[derive(Clone)]
struct ClassDecl {
    data: TestData,
    /// `None` for abstract classes.
    factory: Option<ClassFactory>,
}

/// Test declarations of one module.
///
/// ```text
/// let module = TestModule::new("tests.server")
///     .class("Subscribe", TestAttrs::SINGLE_THREADED, Subscribe::default)
///     .abstract_class("ServerCase")
///     .function("test_connect", TestAttrs::empty(), test_connect);
/// ```
#[derive(Clone)]
pub struct TestModule {
    name: String,
    classes: Vec<ClassDecl>,
    functions: Vec<TestData>,
}

impl TestModule {
    /// Declare a module by its dotted name.
    pub fn new(name: impl Into<String>) -> Self {
        TestModule {
            name: name.into(),
            classes: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Declare a module from a Rust module path such as `module_path!()`.
    pub fn from_module_path(path: &str) -> Self {
        Self::new(dotted(path))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a test class built by `factory`.
    #[must_use]
    pub fn class<C, F>(mut self, name: &str, attrs: TestAttrs, factory: F) -> Self
    where
        C: TestClass + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let boxed: ClassFactory =
            std::sync::Arc::new(move || Box::new(factory()) as Box<dyn TestClass>);
        let data = TestData::class(self.qualify(name), attrs);
        self.classes.push(ClassDecl {
            data,
            factory: Some(boxed),
        });
        self
    }

    /// Declare an abstract test class. It is discovered but never runs.
    #[must_use]
    pub fn abstract_class(mut self, name: &str) -> Self {
        let data = TestData::class(self.qualify(name), TestAttrs::empty());
        self.classes.push(ClassDecl {
            data,
            factory: None,
        });
        self
    }

    /// Declare a test function.
    #[must_use]
    pub fn function<F>(mut self, name: &str, attrs: TestAttrs, test: F) -> Self
    where
        F: Fn() -> Result<(), UnitTestError> + Send + Sync + 'static,
    {
        let data = TestData::function(self.qualify(name), attrs, test);
        self.functions.push(data);
        self
    }

    /// Class-based tests in declaration order.
    pub fn class_tests(&self) -> impl Iterator<Item = &TestData> {
        self.classes.iter().map(|decl| &decl.data)
    }

    /// Function-based tests in declaration order.
    pub fn function_tests(&self) -> impl Iterator<Item = &TestData> {
        self.functions.iter()
    }

    /// Make this module's classes constructible by name.
    pub fn register_classes(&self, registry: &ClassRegistry) {
        for decl in &self.classes {
            let name = decl.data.name();
            match &decl.factory {
                Some(factory) => registry.register_factory(name, factory.clone()),
                None => registry.register_abstract(name),
            }
        }
    }

    fn qualify(&self, name: &str) -> String {
        format!("{}{SEPARATOR}{name}", self.name)
    }

    fn validate(&self) -> Result<(), DiscoveryError> {
        if !is_dotted_name(&self.name) {
            return Err(DiscoveryError::InvalidModuleName(self.name.clone()));
        }

        let prefix_len = self.name.len() + SEPARATOR.len_utf8();
        for data in self.class_tests().chain(self.function_tests()) {
            let local = &data.name()[prefix_len..];
            if local.is_empty() || local.contains(SEPARATOR) {
                return Err(DiscoveryError::InvalidTestName {
                    module: self.name.clone(),
                    name: local.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Discover every test declared by `modules`.
///
/// Class-based tests of all modules come first, then function-based tests,
/// each group following the order of `modules`.
pub fn discover(modules: &[TestModule]) -> Result<Vec<TestData>, DiscoveryError> {
    for module in modules {
        module.validate()?;
    }

    let classes = modules.iter().flat_map(TestModule::class_tests);
    let functions = modules.iter().flat_map(TestModule::function_tests);

    let mut seen = FxHashSet::default();
    let mut tests = Vec::new();
    for data in classes.chain(functions) {
        if !seen.insert(data.name()) {
            return Err(DiscoveryError::DuplicateTest(data.name().to_string()));
        }
        tests.push(data.clone());
    }

    tracing::debug!(
        modules = modules.len(),
        tests = tests.len(),
        "discovered tests"
    );
    Ok(tests)
}

/// Convert a Rust module path (`a::b`) into a dotted name (`a.b`).
pub fn dotted(path: &str) -> String {
    path.replace("::", ".")
}

fn is_dotted_name(name: &str) -> bool {
    !name.is_empty() && name.split(SEPARATOR).all(|segment| !segment.is_empty())
}
