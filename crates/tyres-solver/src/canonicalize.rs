//! Union canonicalization.
//!
//! Branch-merged result types are combined here. The normal form is:
//!
//! 1. nested unions flattened in place, relative order kept;
//! 2. every `Unknown` kept, in order, ahead of all other members;
//! 3. the remaining members deduplicated, first occurrence wins;
//! 4. a single surviving member returned bare.
//!
//! Positional structures (array shapes, signatures) never pass through here.

use crate::error::PreconditionError;
use crate::types::Type;
use smallvec::SmallVec;

const UNION_INLINE: usize = 8;

type UnionBuffer = SmallVec<[Type; UNION_INLINE]>;

/// Normalize a sequence of already-resolved alternatives into one type.
pub fn canonicalize_union<I>(alternatives: I) -> Result<Type, PreconditionError>
where
    I: IntoIterator<Item = Type>,
{
    let mut unknowns: UnionBuffer = SmallVec::new();
    let mut others: UnionBuffer = SmallVec::new();
    for alternative in alternatives {
        push_union_member(&mut unknowns, &mut others, alternative);
    }

    let mut flat = unknowns;
    flat.extend(others);
    match flat.len() {
        0 => Err(PreconditionError::EmptyUnion),
        1 => Ok(flat.remove(0)),
        _ => Ok(Type::Union(flat.into_vec())),
    }
}

fn push_union_member(unknowns: &mut UnionBuffer, others: &mut UnionBuffer, member: Type) {
    match member {
        Type::Union(members) => {
            for inner in members {
                push_union_member(unknowns, others, inner);
            }
        }
        Type::Unknown => unknowns.push(Type::Unknown),
        other => {
            if !others.iter().any(|seen| seen.dedup_eq(&other)) {
                others.push(other);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/canonicalize_tests.rs"]
mod tests;
