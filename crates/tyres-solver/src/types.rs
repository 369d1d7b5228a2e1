//! Type representation for the reference-resolution stage.
//!
//! Types are plain immutable trees. A first analysis pass produces them per
//! symbol, possibly with [`Type::Reference`] placeholders nested anywhere;
//! the resolver in [`crate::resolve`] replaces every placeholder with a
//! concrete type.
//!
//! Two notions of equality coexist:
//!
//! - `PartialEq` is full structural equality (`Unknown == Unknown`). It is
//!   what tests and idempotence checks use.
//! - [`Type::dedup_eq`] is the stricter relation used when collapsing union
//!   members. Anything that carries `Unknown` is never equal to anything,
//!   so distinct unresolved origins stay visible.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

/// Shared immutable name (class, function, method, array key).
pub type Name = Arc<str>;

// =============================================================================
// Symbol identity
// =============================================================================

/// Symbol identity as written by the front end: `(owner class, name)`.
///
/// Free functions have no owner. Reference nodes carry a `SymbolPath`
/// rather than a [`SymbolId`] because their target may not exist at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Name>,
    pub name: Name,
}

impl SymbolPath {
    pub fn function(name: impl Into<Name>) -> Self {
        Self {
            owner: None,
            name: name.into(),
        }
    }

    pub fn method(class: impl Into<Name>, name: impl Into<Name>) -> Self {
        Self {
            owner: Some(class.into()),
            name: name.into(),
        }
    }

    pub fn is_method(&self) -> bool {
        self.owner.is_some()
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{owner}::{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Dense handle for a symbol registered in a [`crate::SymbolGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Leaf payloads
// =============================================================================

/// `f64` wrapper with bitwise equality so literals can be `Eq`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

/// Statically known scalar value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralValue {
    Int(i64),
    Float(OrderedFloat),
    String(Name),
    Bool(bool),
    Null,
}

/// Key of an array shape entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayKey {
    Int(i64),
    String(Name),
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(index) => write!(f, "{index}"),
            ArrayKey::String(name) => f.write_str(name),
        }
    }
}

/// One positional entry of an array shape. Order is significant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayEntry {
    pub key: ArrayKey,
    #[serde(rename = "type")]
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: Type,
}

/// Callable shape. Only the return type takes part in resolution output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(rename = "return")]
    pub ret: Type,
}

/// Follow-on operation applied once a reference's target resolves.
///
/// `a()->b()->c()` is a reference to `a` with the chain
/// `[CallResult, MemberCall(b), MemberCall(c)]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainOp {
    CallResult,
    MemberCall(Name),
}

/// Unresolved placeholder emitted by the first pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub target: SymbolPath,
    #[serde(default)]
    pub chain: Vec<ChainOp>,
}

// =============================================================================
// Type
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Type {
    /// No information. Never deduplicated against another `Unknown`.
    Unknown,
    Literal(LiteralValue),
    /// Instance of a declared class.
    Object(Name),
    Array(Vec<ArrayEntry>),
    Function(Box<FunctionSignature>),
    /// Canonical unions hold at least two members and no nested unions.
    Union(Vec<Type>),
    Reference(Box<Reference>),
}

impl Type {
    pub fn int(value: i64) -> Self {
        Type::Literal(LiteralValue::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Type::Literal(LiteralValue::Float(OrderedFloat(value)))
    }

    pub fn string(value: impl Into<Name>) -> Self {
        Type::Literal(LiteralValue::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Type::Literal(LiteralValue::Bool(value))
    }

    pub fn object(class: impl Into<Name>) -> Self {
        Type::Object(class.into())
    }

    /// Array shape with implicit `0..n` integer keys.
    pub fn list(items: impl IntoIterator<Item = Type>) -> Self {
        Type::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, ty)| ArrayEntry {
                    key: ArrayKey::Int(index as i64),
                    ty,
                })
                .collect(),
        )
    }

    pub fn function(params: Vec<Param>, ret: Type) -> Self {
        Type::Function(Box::new(FunctionSignature { params, ret }))
    }

    /// Parameterless signature, the common shape produced for bodies.
    pub fn returning(ret: Type) -> Self {
        Self::function(Vec::new(), ret)
    }

    /// Raw union node. Not canonicalized; see [`crate::canonicalize_union`].
    pub fn union(members: Vec<Type>) -> Self {
        Type::Union(members)
    }

    pub fn reference(target: SymbolPath, chain: Vec<ChainOp>) -> Self {
        Type::Reference(Box::new(Reference { target, chain }))
    }

    /// Reference to the result of calling `target`.
    pub fn call(target: SymbolPath) -> Self {
        Self::reference(target, vec![ChainOp::CallResult])
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Return type of a function signature, if this is one.
    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Type::Function(sig) => Some(&sig.ret),
            _ => None,
        }
    }

    /// Unwrap a function signature to its return type, or keep `self`.
    pub fn into_call_result(self) -> Type {
        match self {
            Type::Function(sig) => sig.ret,
            other => other,
        }
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// Visit every immediate child type.
    pub fn for_each_child<'a>(&'a self, mut f: impl FnMut(&'a Type)) {
        match self {
            Type::Unknown | Type::Literal(_) | Type::Object(_) | Type::Reference(_) => {}
            Type::Array(entries) => entries.iter().for_each(|entry| f(&entry.ty)),
            Type::Function(sig) => {
                sig.params.iter().for_each(|param| f(&param.ty));
                f(&sig.ret);
            }
            Type::Union(members) => members.iter().for_each(f),
        }
    }

    /// Rebuild the same variant with `f` applied to every immediate child.
    ///
    /// Key and parameter order are preserved. Unions are reassembled as-is;
    /// re-canonicalizing is the caller's job.
    pub fn try_substitute<E>(
        &self,
        mut f: impl FnMut(&Type) -> Result<Type, E>,
    ) -> Result<Type, E> {
        Ok(match self {
            Type::Unknown | Type::Literal(_) | Type::Object(_) | Type::Reference(_) => {
                self.clone()
            }
            Type::Array(entries) => Type::Array(
                entries
                    .iter()
                    .map(|entry| {
                        Ok::<_, E>(ArrayEntry {
                            key: entry.key.clone(),
                            ty: f(&entry.ty)?,
                        })
                    })
                    .collect::<Result<_, E>>()?,
            ),
            Type::Function(sig) => {
                let params = sig
                    .params
                    .iter()
                    .map(|param| {
                        Ok::<_, E>(Param {
                            name: param.name.clone(),
                            ty: f(&param.ty)?,
                        })
                    })
                    .collect::<Result<_, E>>()?;
                Self::function(params, f(&sig.ret)?)
            }
            Type::Union(members) => {
                Type::Union(members.iter().map(&mut f).collect::<Result<_, E>>()?)
            }
        })
    }

    pub fn substitute(&self, mut f: impl FnMut(&Type) -> Type) -> Type {
        match self.try_substitute(|child| Ok::<_, Infallible>(f(child))) {
            Ok(ty) => ty,
            Err(never) => match never {},
        }
    }

    /// Does `self` or any nested type satisfy `pred`?
    pub fn contains_matching(&self, pred: &dyn Fn(&Type) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        let mut found = false;
        self.for_each_child(|child| {
            if !found {
                found = child.contains_matching(pred);
            }
        });
        found
    }

    /// Structural check used for memoization: a type is final once no
    /// `Reference` is reachable from it.
    pub fn contains_reference(&self) -> bool {
        self.contains_matching(&|ty| matches!(ty, Type::Reference(_)))
    }

    /// Leftmost reference reachable from `self`, if any.
    pub fn first_reference(&self) -> Option<&Reference> {
        if let Type::Reference(reference) = self {
            return Some(reference);
        }
        let mut found = None;
        self.for_each_child(|child| {
            if found.is_none() {
                found = child.first_reference();
            }
        });
        found
    }

    pub fn contains_unknown(&self) -> bool {
        self.contains_matching(&Type::is_unknown)
    }

    /// Equality for union deduplication.
    ///
    /// Like `==`, except that a type carrying `Unknown` anywhere is distinct
    /// from every type, itself included.
    pub fn dedup_eq(&self, other: &Type) -> bool {
        !self.contains_unknown() && self == other
    }
}

impl From<LiteralValue> for Type {
    fn from(value: LiteralValue) -> Self {
        Type::Literal(value)
    }
}
