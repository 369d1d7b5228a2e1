//! Reference resolution.
//!
//! After the first pass every symbol in the [`SymbolGraph`] holds a type that
//! may contain [`Reference`] placeholders anywhere. The resolver walks those
//! trees, follows each reference into the graph, applies its call chain and
//! writes the concrete result back, so later lookups are constant-time.
//!
//! ## Cycles
//!
//! A reference whose target is already open higher up the stack resolves to
//! `Unknown` for that occurrence only. The open symbols live in a
//! [`RecursionGuard`] owned by one top-level resolution.
//!
//! ## Memoization
//!
//! The symbol a caller asked for is always written back. A symbol resolved
//! on the way is written back only if every cycle cut during its walk closed
//! onto itself or onto something entered after it; otherwise its result
//! depends on where the walk started and it is recomputed on demand.
//!
//! ## Failure
//!
//! Missing symbols, missing methods and chains applied to non-objects all
//! degrade to `Unknown`. The only errors are an exhausted
//! [`RecursionProfile`] budget and precondition violations in the input.

use crate::canonicalize::canonicalize_union;
use crate::error::ResolveError;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::symbol_graph::SymbolGraph;
use crate::types::{ChainOp, Reference, SymbolId, SymbolPath, Type};
use tracing::{debug, trace, warn};

/// Remaining stack below which a new segment is allocated.
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each newly allocated stack segment.
const STACK_GROWTH: usize = 1024 * 1024;

/// Marks "no cycle cut since the innermost symbol was entered".
const NO_LINK: usize = usize::MAX;

/// Knobs for a resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Depth and work budget applied to each top-level resolution.
    pub profile: RecursionProfile,
}

/// Counters accumulated over the lifetime of a resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Symbol bodies walked.
    pub walks: u64,
    /// Lookups answered from an already final symbol type.
    pub memo_hits: u64,
    /// References cut to `Unknown` because their target was open.
    pub cycles_cut: u64,
    /// References or member calls whose target does not exist.
    pub unresolved_targets: u64,
    /// Final types written back to the graph.
    pub writes: u64,
}

impl ResolutionStats {
    pub fn merge(&mut self, other: ResolutionStats) {
        self.walks += other.walks;
        self.memo_hits += other.memo_hits;
        self.cycles_cut += other.cycles_cut;
        self.unresolved_targets += other.unresolved_targets;
        self.writes += other.writes;
    }
}

/// State of one top-level resolution.
struct Pass {
    guard: RecursionGuard<SymbolId>,
    /// Lowest stack position a cut cycle closed onto since the innermost
    /// open symbol was entered.
    low_link: usize,
}

impl Pass {
    fn new(profile: RecursionProfile) -> Self {
        Self {
            guard: RecursionGuard::with_profile(profile),
            low_link: NO_LINK,
        }
    }
}

/// Resolves references against a [`SymbolGraph`], finalizing it in place.
///
/// Holding the graph mutably serializes every resolution on it.
pub struct ReferenceResolver<'g> {
    graph: &'g mut SymbolGraph,
    options: ResolverOptions,
    stats: ResolutionStats,
}

impl<'g> ReferenceResolver<'g> {
    pub fn new(graph: &'g mut SymbolGraph) -> Self {
        Self::with_options(graph, ResolverOptions::default())
    }

    pub fn with_options(graph: &'g mut SymbolGraph, options: ResolverOptions) -> Self {
        Self {
            graph,
            options,
            stats: ResolutionStats::default(),
        }
    }

    pub fn graph(&self) -> &SymbolGraph {
        self.graph
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    // -------------------------------------------------------------------------
    // Public entry points
    // -------------------------------------------------------------------------

    /// Fully resolved type of `id`, memoized.
    ///
    /// Never fails: an aborted or malformed resolution is reported through
    /// `tracing` and yields `Unknown`. Use [`try_resolve`](Self::try_resolve)
    /// to observe the error.
    pub fn resolve(&mut self, id: SymbolId) -> Type {
        self.try_resolve(id).unwrap_or_else(|err| {
            warn!(symbol = %self.graph.path(id), %err, "resolution failed; degrading to unknown");
            Type::Unknown
        })
    }

    pub fn try_resolve(&mut self, id: SymbolId) -> Result<Type, ResolveError> {
        let mut pass = Pass::new(self.options.profile);
        self.resolve_symbol(id, &mut pass)
    }

    /// Resolve by path; an undeclared symbol is `Unknown`.
    pub fn resolve_path(&mut self, path: &SymbolPath) -> Type {
        match self.graph.lookup(path) {
            Some(id) => self.resolve(id),
            None => {
                self.stats.unresolved_targets += 1;
                debug!(symbol = %path, "undeclared symbol");
                Type::Unknown
            }
        }
    }

    /// Resolve every symbol in declaration order.
    pub fn resolve_all(&mut self) {
        let ids: Vec<SymbolId> = self.graph.symbols().collect();
        for id in ids {
            self.resolve(id);
        }
    }

    /// Resolve every symbol, stopping at the first error.
    pub fn try_resolve_all(&mut self) -> Result<(), ResolveError> {
        let ids: Vec<SymbolId> = self.graph.symbols().collect();
        for id in ids {
            self.try_resolve(id)?;
        }
        Ok(())
    }

    /// Resolve a free-standing type (one not stored on any symbol).
    pub fn resolve_type(&mut self, ty: &Type) -> Type {
        self.try_resolve_type_within(ty, &[]).unwrap_or_else(|err| {
            warn!(%err, "type resolution failed; degrading to unknown");
            Type::Unknown
        })
    }

    /// Resolve `ty` as if `visiting` were already open, outermost first.
    ///
    /// References to any of `visiting` are cut to `Unknown`.
    pub fn try_resolve_type_within(
        &mut self,
        ty: &Type,
        visiting: &[SymbolId],
    ) -> Result<Type, ResolveError> {
        let mut pass = Pass::new(self.options.profile);
        let mut seeded = Vec::with_capacity(visiting.len());
        let mut denied = None;
        for &id in visiting {
            match pass.guard.enter(id) {
                RecursionResult::Entered => seeded.push(id),
                RecursionResult::Cycle { .. } => {}
                RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                    denied = Some(id);
                    break;
                }
            }
        }

        let result = match denied {
            Some(id) => Err(self.aborted(id, &pass)),
            None => self.resolve_in(ty, &mut pass),
        };
        for id in seeded.into_iter().rev() {
            pass.guard.leave(id);
        }
        result
    }

    // -------------------------------------------------------------------------
    // Walk
    // -------------------------------------------------------------------------

    fn resolve_symbol(&mut self, id: SymbolId, pass: &mut Pass) -> Result<Type, ResolveError> {
        // An open symbol is cut before its stored type is looked at, even if
        // that type is already final.
        if let Some(position) = pass.guard.position(&id) {
            return Ok(self.cut_cycle(id, position, pass));
        }

        let current = self.graph.get(id);
        if !current.contains_reference() {
            self.stats.memo_hits += 1;
            return Ok(current.clone());
        }

        match pass.guard.enter(id) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle { position } => return Ok(self.cut_cycle(id, position, pass)),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                return Err(self.aborted(id, pass));
            }
        }
        let position = pass.guard.depth() as usize - 1;

        self.stats.walks += 1;
        trace!(symbol = %self.graph.path(id), position, "walking symbol");
        let outer_link = std::mem::replace(&mut pass.low_link, NO_LINK);
        let body = self.graph.get(id).clone();
        let result =
            stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.resolve_in(&body, pass));
        pass.guard.leave(id);
        let inner_link = std::mem::replace(&mut pass.low_link, outer_link);
        let resolved = result?;

        if inner_link < position {
            // Closed onto a symbol still open below us: provisional.
            pass.low_link = pass.low_link.min(inner_link);
            debug!(symbol = %self.graph.path(id), "result depends on an open cycle; not memoized");
        } else {
            debug!(symbol = %self.graph.path(id), "memoized");
            self.graph.set(id, resolved.clone());
            self.stats.writes += 1;
        }
        Ok(resolved)
    }

    fn cut_cycle(&mut self, id: SymbolId, position: usize, pass: &mut Pass) -> Type {
        self.stats.cycles_cut += 1;
        pass.low_link = pass.low_link.min(position);
        trace!(symbol = %self.graph.path(id), position, "cycle closed; yielding unknown");
        Type::Unknown
    }

    fn resolve_in(&mut self, ty: &Type, pass: &mut Pass) -> Result<Type, ResolveError> {
        match ty {
            Type::Unknown | Type::Literal(_) | Type::Object(_) => Ok(ty.clone()),
            Type::Array(_) | Type::Function(_) => {
                ty.try_substitute(|child| self.resolve_in(child, pass))
            }
            Type::Union(members) => {
                // Canonicalize only after every branch is final: a branch may
                // itself turn into a union or into `Unknown`.
                let resolved = members
                    .iter()
                    .map(|member| self.resolve_in(member, pass))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(canonicalize_union(resolved)?)
            }
            Type::Reference(reference) => self.resolve_reference(reference, pass),
        }
    }

    fn resolve_reference(
        &mut self,
        reference: &Reference,
        pass: &mut Pass,
    ) -> Result<Type, ResolveError> {
        let Some(target) = self.graph.lookup(&reference.target) else {
            self.stats.unresolved_targets += 1;
            trace!(target = %reference.target, "reference to undeclared symbol");
            return Ok(Type::Unknown);
        };
        let base = self.resolve_symbol(target, pass)?;
        self.apply_chain(base, &reference.chain, pass)
    }

    /// Apply `chain` left to right to `current`.
    ///
    /// `CallResult` takes the return type of a signature and is a no-op on
    /// anything already a call result. `MemberCall` needs an object.
    fn apply_chain(
        &mut self,
        mut current: Type,
        chain: &[ChainOp],
        pass: &mut Pass,
    ) -> Result<Type, ResolveError> {
        for op in chain {
            current = match op {
                ChainOp::CallResult => current.into_call_result(),
                ChainOp::MemberCall(method) => {
                    let Type::Object(class) = &current else {
                        trace!(%method, "member call on a non-object; chain collapses");
                        return Ok(Type::Unknown);
                    };
                    let Some(id) = self.graph.lookup_method(class, method) else {
                        self.stats.unresolved_targets += 1;
                        trace!(%class, %method, "method not found; chain collapses");
                        return Ok(Type::Unknown);
                    };
                    self.resolve_symbol(id, pass)?.into_call_result()
                }
            };
        }
        Ok(current)
    }

    fn aborted(&self, id: SymbolId, pass: &Pass) -> ResolveError {
        ResolveError::Aborted {
            symbol: self.graph.path(id).clone(),
            depth: pass.guard.depth(),
            iterations: pass.guard.iterations(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/resolve_tests.rs"]
mod tests;
