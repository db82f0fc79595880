//! Reference resolution: dotted paths back to live values.
//!
//! The original design resolved `__type__`/`__function__`/`__module__`
//! payloads by dynamic import against the host runtime's module graph. Here
//! that step is an injected capability: a [`SymbolResolver`] maps a dotted
//! path to an optional live [`Value`], so the decoder can be driven by a
//! real application registry or by a fake in tests, and resolution can never
//! execute arbitrary code.
//!
//! [`SymbolTable`] is the standard implementation: an explicit registry the
//! application populates with the symbols it is willing to hand back.
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{SymbolKind, SymbolResolver, SymbolTable};
//!
//! let mut table = SymbolTable::new();
//! table.register_type("collections.OrderedDict");
//!
//! assert!(table.resolve(SymbolKind::Type, "collections.OrderedDict").is_some());
//! assert!(table.resolve(SymbolKind::Type, "collections.Missing").is_none());
//! ```

use crate::{SymbolRef, Value};
use indexmap::IndexMap;

/// Which tag a payload arrived under. Resolvers may ignore it or use it to
/// keep separate namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Type,
    Function,
    Module,
}

/// Maps a dotted path to a live value, or `None` when the path is unknown.
///
/// Returning `None` is not an error at this boundary; the decoder degrades
/// the leaf to the raw path string and records a diagnostic.
pub trait SymbolResolver {
    fn resolve(&self, kind: SymbolKind, path: &str) -> Option<Value>;
}

/// An explicit symbol registry.
///
/// Entries are keyed by `(kind, path)`. The convenience registrars build the
/// canonical reference value for a path; [`register`](SymbolTable::register)
/// accepts any value, which is how an application binds a path to something
/// richer than a reference (a dtype descriptor, say).
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<(SymbolKind, String), Value>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a path to an arbitrary value under the given kind.
    pub fn register(&mut self, kind: SymbolKind, path: &str, value: Value) {
        self.symbols.insert((kind, path.to_string()), value);
    }

    /// Registers a type reference under its own dotted path.
    pub fn register_type(&mut self, path: &str) {
        self.register(SymbolKind::Type, path, Value::Type(SymbolRef::from_path(path)));
    }

    /// Registers a function reference under its own dotted path.
    pub fn register_function(&mut self, path: &str) {
        self.register(
            SymbolKind::Function,
            path,
            Value::Function(SymbolRef::from_path(path)),
        );
    }

    /// Registers a module reference under its own dotted path.
    pub fn register_module(&mut self, path: &str) {
        self.register(SymbolKind::Module, path, Value::Module(path.to_string()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, kind: SymbolKind, path: &str) -> Option<Value> {
        self.symbols.get(&(kind, path.to_string())).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_resolves_nothing() {
        let table = SymbolTable::new();
        assert!(table.resolve(SymbolKind::Module, "os.path").is_none());
    }

    #[test]
    fn test_kinds_are_separate_namespaces() {
        let mut table = SymbolTable::new();
        table.register_type("pkg.Thing");

        assert!(table.resolve(SymbolKind::Type, "pkg.Thing").is_some());
        assert!(table.resolve(SymbolKind::Function, "pkg.Thing").is_none());
    }

    #[test]
    fn test_registered_value_returned_verbatim() {
        let mut table = SymbolTable::new();
        table.register(SymbolKind::Type, "sentinel", Value::from(99));
        assert_eq!(
            table.resolve(SymbolKind::Type, "sentinel"),
            Some(Value::from(99))
        );
    }
}
