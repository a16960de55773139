use std::collections::HashMap;

use dson_types::Factory;

/// Name → factory lookup used to reconstruct caller-defined types.
///
/// Built fresh per decode (or per clone, where the pre-scan populates it from
/// the instances actually present in the input graph); never persisted. The
/// built-in binary type names are handled by the decoder itself and do not
/// belong in this registry.
#[derive(Default)]
pub struct TypeResolver {
    factories: HashMap<String, Factory>,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a type name. A later registration for the same
    /// name wins; within one graph a name maps to one concrete type.
    pub fn register(&mut self, name: impl Into<String>, factory: Factory) {
        self.factories.insert(name.into(), factory);
    }

    /// Look up the factory for a type name.
    pub fn resolve(&self, name: &str) -> Option<Factory> {
        self.factories.get(name).cloned()
    }

    /// Registered type names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
