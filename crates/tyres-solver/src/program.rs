//! Front-end boundary.
//!
//! A front end hands its first-pass results over through [`SymbolSource`].
//! [`ProgramDump`] is the serialized form of the same information, used by
//! the command-line driver and by fixtures:
//!
//! ```json
//! {
//!   "functions": { "foo": { "kind": "function", "data": { "return": ... } } },
//!   "classes": { "Foo": { "bar": { "kind": "function", "data": { "return": ... } } } }
//! }
//! ```

use crate::error::DumpError;
use crate::symbol_graph::SymbolGraph;
use crate::types::{Name, SymbolPath, Type};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// First-pass results of one analysis unit.
pub trait SymbolSource {
    /// Declared classes, including classes without methods.
    fn classes(&self) -> Vec<Name>;

    /// Every function and method, in declaration order.
    fn symbols(&self) -> Vec<SymbolPath>;

    /// First-pass type of `symbol`, possibly containing references.
    fn initial_type(&self, symbol: &SymbolPath) -> Type;
}

impl SymbolGraph {
    /// Populate a graph from a front end.
    pub fn from_source(source: &dyn SymbolSource) -> Self {
        let mut graph = SymbolGraph::new();
        for class in source.classes() {
            graph.declare_class(class);
        }
        for path in source.symbols() {
            let ty = source.initial_type(&path);
            graph.declare(path, ty);
        }
        debug!(symbols = graph.len(), "symbol graph populated");
        graph
    }
}

/// Serialized first-pass results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDump {
    #[serde(default)]
    pub functions: IndexMap<Name, Type>,
    /// Class -> method -> type.
    #[serde(default)]
    pub classes: IndexMap<Name, IndexMap<Name, Type>>,
}

impl ProgramDump {
    pub fn from_json(text: &str) -> Result<Self, DumpError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DumpError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add_function(&mut self, name: impl Into<Name>, ty: Type) -> &mut Self {
        self.functions.insert(name.into(), ty);
        self
    }

    pub fn add_method(
        &mut self,
        class: impl Into<Name>,
        name: impl Into<Name>,
        ty: Type,
    ) -> &mut Self {
        self.classes
            .entry(class.into())
            .or_default()
            .insert(name.into(), ty);
        self
    }

    pub fn into_graph(self) -> SymbolGraph {
        SymbolGraph::from_source(&self)
    }
}

impl SymbolSource for ProgramDump {
    fn classes(&self) -> Vec<Name> {
        self.classes.keys().cloned().collect()
    }

    fn symbols(&self) -> Vec<SymbolPath> {
        let functions = self.functions.keys().cloned().map(SymbolPath::function);
        let methods = self.classes.iter().flat_map(|(class, methods)| {
            methods
                .keys()
                .map(move |method| SymbolPath::method(class.clone(), method.clone()))
        });
        functions.chain(methods).collect()
    }

    fn initial_type(&self, symbol: &SymbolPath) -> Type {
        let found = match &symbol.owner {
            Some(class) => self
                .classes
                .get(class)
                .and_then(|methods| methods.get(&symbol.name)),
            None => self.functions.get(&symbol.name),
        };
        found.cloned().unwrap_or(Type::Unknown)
    }
}

#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod tests;
