//! Reference resolution and type finalization.
//!
//! A first analysis pass infers a type for every function and method body.
//! Where a body depends on a symbol that was not analyzed yet (declared
//! later, mutually recursive, or the body's own recursive call) it records a
//! [`Type::Reference`] placeholder instead. This crate resolves those
//! placeholders once the whole program has been walked:
//!
//! - [`types`]: the type algebra, including the reference variant
//! - [`SymbolGraph`]: symbol identity to current type, plus method lookup
//! - [`canonicalize_union`]: flatten / unknown-first / dedupe normal form
//! - [`ReferenceResolver`]: cycle-safe resolution with call chains and
//!   memoization back into the graph
//! - [`render`]: the canonical string form
//! - [`ProgramTypes`]: lazy per-symbol queries for downstream consumers
//!
//! Missing information never fails: it is represented by [`Type::Unknown`].
//!
//! ```
//! use tyres_solver::{ProgramTypes, SymbolGraph, SymbolPath, Type, render};
//!
//! let mut graph = SymbolGraph::new();
//! graph.declare_method("Foo", "foo", Type::returning(Type::call(SymbolPath::method("Foo", "bar"))));
//! graph.declare_method("Foo", "bar", Type::returning(Type::int(2)));
//!
//! let mut program = ProgramTypes::new(graph);
//! let foo = program.class_type("Foo").method_type("foo");
//! assert_eq!(render(&foo).unwrap(), "(): int(2)");
//! ```

pub mod canonicalize;
mod error;
mod format;
pub mod program;
mod query;
pub mod recursion;
pub mod resolve;
mod symbol_graph;
pub mod types;

pub use canonicalize::canonicalize_union;
pub use error::{DumpError, PreconditionError, ResolveError};
pub use format::{DisplayType, render, render_into};
pub use program::{ProgramDump, SymbolSource};
pub use query::{ClassTypes, ProgramTypes};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use resolve::{ReferenceResolver, ResolutionStats, ResolverOptions};
pub use symbol_graph::SymbolGraph;
pub use types::{
    ArrayEntry, ArrayKey, ChainOp, FunctionSignature, LiteralValue, Name, OrderedFloat, Param,
    Reference, SymbolId, SymbolPath, Type,
};

// Most test modules are attached by their source files via #[path]; the
// end-to-end scenarios span several modules and live here.
#[cfg(test)]
#[path = "../tests/scenario_tests.rs"]
mod scenario_tests;
#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod types_tests;
