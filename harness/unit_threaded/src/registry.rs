//! Class registry: construction of class-based tests by qualified name.
//!
//! Each test module registers a zero-argument constructor per test class.
//! Abstract classes are registered without one, so looking them up yields
//! no test case instead of an error.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::case::{ClassTestCase, TestClass};

/// Factory function for creating class instances.
pub type ClassFactory = Arc<dyn Fn() -> Box<dyn TestClass> + Send + Sync>;

/// Entry in the class registry.
#[derive(Clone)]
enum ClassEntry {
    Concrete(ClassFactory),
    Abstract,
}

/// Mapping from qualified class name to constructor.
#[derive(Default)]
pub struct ClassRegistry {
    classes: RwLock<FxHashMap<String, ClassEntry>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        ClassRegistry::default()
    }

    /// Register a constructible class.
    pub fn register<C, F>(&self, name: impl Into<String>, factory: F)
    where
        C: TestClass + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.register_factory(name, Arc::new(move || Box::new(factory()) as Box<dyn TestClass>));
    }

    /// Register a class through an already boxed factory.
    pub fn register_factory(&self, name: impl Into<String>, factory: ClassFactory) {
        self.classes
            .write()
            .insert(name.into(), ClassEntry::Concrete(factory));
    }

    /// Register a class that cannot be instantiated.
    pub fn register_abstract(&self, name: impl Into<String>) {
        self.classes.write().insert(name.into(), ClassEntry::Abstract);
    }

    /// Check if a class is registered, abstract or not.
    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    /// Instantiate the class registered under `name`.
    ///
    /// Returns `None` for unknown and abstract classes.
    pub fn construct(&self, name: &str) -> Option<ClassTestCase> {
        let factory = match self.classes.read().get(name)? {
            ClassEntry::Concrete(factory) => Arc::clone(factory),
            ClassEntry::Abstract => return None,
        };
        Some(ClassTestCase::new(name, factory()))
    }
}

/// Global registry instance
static REGISTRY: LazyLock<ClassRegistry> = LazyLock::new(ClassRegistry::new);

/// Get a reference to the global registry.
pub fn registry() -> &'static ClassRegistry {
    &REGISTRY
}

/// Register a class with the global registry.
pub fn register_class<C, F>(name: impl Into<String>, factory: F)
where
    C: TestClass + 'static,
    F: Fn() -> C + Send + Sync + 'static,
{
    REGISTRY.register(name, factory);
}

/// Register an abstract class with the global registry.
pub fn register_abstract_class(name: impl Into<String>) {
    REGISTRY.register_abstract(name);
}
