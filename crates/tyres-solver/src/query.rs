//! Query facade for downstream consumers.
//!
//! [`ProgramTypes`] owns the symbol graph of one analysis unit and resolves
//! symbols lazily, on first access. Every type it hands out is final.

use crate::error::ResolveError;
use crate::program::SymbolSource;
use crate::resolve::{ReferenceResolver, ResolutionStats, ResolverOptions};
use crate::symbol_graph::SymbolGraph;
use crate::types::{Name, SymbolId, Type};
use tracing::debug;

pub struct ProgramTypes {
    graph: SymbolGraph,
    options: ResolverOptions,
    stats: ResolutionStats,
}

impl ProgramTypes {
    pub fn new(graph: SymbolGraph) -> Self {
        Self::with_options(graph, ResolverOptions::default())
    }

    pub fn with_options(graph: SymbolGraph, options: ResolverOptions) -> Self {
        Self {
            graph,
            options,
            stats: ResolutionStats::default(),
        }
    }

    pub fn from_source(source: &dyn SymbolSource) -> Self {
        Self::new(SymbolGraph::from_source(source))
    }

    /// Run `f` with a resolver over the owned graph, keeping its counters.
    pub fn with_resolver<T>(&mut self, f: impl FnOnce(&mut ReferenceResolver<'_>) -> T) -> T {
        let mut resolver = ReferenceResolver::with_options(&mut self.graph, self.options);
        let result = f(&mut resolver);
        self.stats.merge(resolver.stats());
        result
    }

    /// Resolved type of free function `name`; `Unknown` if undeclared.
    pub fn function_type(&mut self, name: &str) -> Type {
        match self.graph.lookup_function(name) {
            Some(id) => self.resolve(id),
            None => {
                debug!(function = name, "undeclared function");
                Type::Unknown
            }
        }
    }

    pub fn try_function_type(&mut self, name: &str) -> Result<Type, ResolveError> {
        match self.graph.lookup_function(name) {
            Some(id) => self.try_resolve(id),
            None => Ok(Type::Unknown),
        }
    }

    /// Method view of `class`. Undeclared classes yield an empty view.
    pub fn class_type(&mut self, class: &str) -> ClassTypes<'_> {
        ClassTypes {
            class: Name::from(class),
            program: self,
        }
    }

    pub fn resolve(&mut self, id: SymbolId) -> Type {
        self.with_resolver(|resolver| resolver.resolve(id))
    }

    pub fn try_resolve(&mut self, id: SymbolId) -> Result<Type, ResolveError> {
        self.with_resolver(|resolver| resolver.try_resolve(id))
    }

    /// Finalize every symbol eagerly.
    pub fn resolve_all(&mut self) {
        self.with_resolver(|resolver| resolver.resolve_all());
    }

    pub fn try_resolve_all(&mut self) -> Result<(), ResolveError> {
        self.with_resolver(|resolver| resolver.try_resolve_all())
    }

    pub fn graph(&self) -> &SymbolGraph {
        &self.graph
    }

    pub fn into_graph(self) -> SymbolGraph {
        self.graph
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }
}

/// Methods of one class, resolved on first access.
pub struct ClassTypes<'p> {
    program: &'p mut ProgramTypes,
    class: Name,
}

impl ClassTypes<'_> {
    pub fn name(&self) -> &Name {
        &self.class
    }

    pub fn exists(&self) -> bool {
        self.program.graph.has_class(&self.class)
    }

    /// Resolved type of `method`; `Unknown` if the class has no such method.
    pub fn method_type(&mut self, method: &str) -> Type {
        match self.program.graph.lookup_method(&self.class, method) {
            Some(id) => self.program.resolve(id),
            None => {
                debug!(class = %self.class, method, "undeclared method");
                Type::Unknown
            }
        }
    }

    pub fn try_method_type(&mut self, method: &str) -> Result<Type, ResolveError> {
        match self.program.graph.lookup_method(&self.class, method) {
            Some(id) => self.program.try_resolve(id),
            None => Ok(Type::Unknown),
        }
    }

    pub fn method_names(&self) -> Vec<Name> {
        self.program
            .graph
            .methods_of(&self.class)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Every method with its resolved type, in declaration order.
    pub fn methods(&mut self) -> Vec<(Name, Type)> {
        let ids: Vec<(Name, SymbolId)> = self
            .program
            .graph
            .methods_of(&self.class)
            .map(|(name, id)| (name.clone(), id))
            .collect();
        ids.into_iter()
            .map(|(name, id)| (name, self.program.resolve(id)))
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/query_tests.rs"]
mod tests;
