//! Error kinds surfaced by the solver.
//!
//! Missing information is not an error anywhere in this crate; it becomes
//! [`Type::Unknown`](crate::Type::Unknown). The errors below are either
//! programming-contract violations or an exhausted caller-imposed budget.

use crate::types::SymbolPath;

/// A caller broke a sequencing contract of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    /// A union of zero alternatives was requested.
    #[error("cannot canonicalize an empty union")]
    EmptyUnion,
    /// A type still containing a reference reached the renderer.
    #[error("type still references `{target}`; resolve it before rendering")]
    UnresolvedReference { target: SymbolPath },
}

/// Failure of a budgeted resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(
        "resolution of `{symbol}` aborted after {iterations} steps at depth {depth}: budget exhausted"
    )]
    Aborted {
        symbol: SymbolPath,
        depth: u32,
        iterations: u32,
    },
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// The front-end program dump could not be read.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("invalid program dump: {0}")]
    Json(#[from] serde_json::Error),
}
