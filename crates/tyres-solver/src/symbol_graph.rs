//! Symbol graph: every function and method of an analysis unit together with
//! its current type.
//!
//! The front end declares each symbol once with its first-pass type, which
//! may still contain references. The resolver then overwrites entries with
//! their final types. After resolution the graph is read-only.
//!
//! Lookups that miss return `None`. That is a normal outcome which the
//! resolver turns into `Unknown`, never an error.

use crate::types::{Name, SymbolId, SymbolPath, Type};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::trace;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

#[derive(Clone, Debug)]
struct SymbolEntry {
    path: SymbolPath,
    ty: Type,
}

/// Symbols of one analysis unit, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct SymbolGraph {
    entries: Vec<SymbolEntry>,
    functions: FxIndexMap<Name, SymbolId>,
    /// Class name -> method name -> symbol, both in declaration order.
    classes: FxIndexMap<Name, FxIndexMap<Name, SymbolId>>,
    by_path: FxHashMap<SymbolPath, SymbolId>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Population (front end)
    // -------------------------------------------------------------------------

    /// Declare a free function. Redeclaring replaces the initial type.
    pub fn declare_function(&mut self, name: impl Into<Name>, ty: Type) -> SymbolId {
        self.declare(SymbolPath::function(name), ty)
    }

    /// Declare a method, implicitly declaring its class.
    pub fn declare_method(
        &mut self,
        class: impl Into<Name>,
        name: impl Into<Name>,
        ty: Type,
    ) -> SymbolId {
        self.declare(SymbolPath::method(class, name), ty)
    }

    /// Declare a class, possibly without any methods.
    pub fn declare_class(&mut self, class: impl Into<Name>) {
        self.classes.entry(class.into()).or_default();
    }

    /// Declare any symbol by path.
    pub fn declare(&mut self, path: SymbolPath, ty: Type) -> SymbolId {
        if let Some(&id) = self.by_path.get(&path) {
            trace!(symbol = %path, "redeclared; replacing initial type");
            self.entries[id.index()].ty = ty;
            return id;
        }

        let id = SymbolId(self.entries.len() as u32);
        match &path.owner {
            Some(class) => {
                self.classes
                    .entry(class.clone())
                    .or_default()
                    .insert(path.name.clone(), id);
            }
            None => {
                self.functions.insert(path.name.clone(), id);
            }
        }
        self.by_path.insert(path.clone(), id);
        self.entries.push(SymbolEntry { path, ty });
        id
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Current type of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this graph.
    pub fn get(&self, id: SymbolId) -> &Type {
        &self.entries[id.index()].ty
    }

    /// Overwrite the type of `id`.
    pub fn set(&mut self, id: SymbolId, ty: Type) {
        self.entries[id.index()].ty = ty;
    }

    pub fn path(&self, id: SymbolId) -> &SymbolPath {
        &self.entries[id.index()].path
    }

    /// A symbol is resolved once no reference is reachable from its type.
    pub fn is_resolved(&self, id: SymbolId) -> bool {
        !self.get(id).contains_reference()
    }

    pub fn lookup(&self, path: &SymbolPath) -> Option<SymbolId> {
        self.by_path.get(path).copied()
    }

    pub fn lookup_method(&self, class: &str, method: &str) -> Option<SymbolId> {
        self.classes.get(class)?.get(method).copied()
    }

    pub fn lookup_function(&self, name: &str) -> Option<SymbolId> {
        self.functions.get(name).copied()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Methods of `class` in declaration order; empty for unknown classes.
    pub fn methods_of(&self, class: &str) -> impl Iterator<Item = (&Name, SymbolId)> + '_ {
        self.classes
            .get(class)
            .into_iter()
            .flat_map(|methods| methods.iter().map(|(name, &id)| (name, id)))
    }

    pub fn classes(&self) -> impl Iterator<Item = &Name> + '_ {
        self.classes.keys()
    }

    pub fn functions(&self) -> impl Iterator<Item = (&Name, SymbolId)> + '_ {
        self.functions.iter().map(|(name, &id)| (name, id))
    }

    /// All symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.entries.len() as u32).map(SymbolId)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/symbol_graph_tests.rs"]
mod tests;
