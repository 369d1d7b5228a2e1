//! Canonical textual form of resolved types.
//!
//! This string form is the compatibility surface consumers and tests
//! compare against:
//!
//! | Type | Rendering |
//! |------|-----------|
//! | `Unknown` | `unknown` |
//! | int literal | `int(2)` |
//! | float / string / bool literal | `float(1.5)`, `string(abc)`, `bool(true)` |
//! | null literal | `null` |
//! | object | class name |
//! | array shape | `array{0: int(2), key: unknown}` |
//! | union | `unknown|int(1)` in canonical member order |
//! | function | `(): <return>` |
//!
//! Rendering never resolves anything. A `Reference` is a precondition error.

use crate::error::PreconditionError;
use crate::types::{ChainOp, LiteralValue, Type};
use std::fmt::{self, Write};

/// Render `ty` in canonical form.
pub fn render(ty: &Type) -> Result<String, PreconditionError> {
    if let Some(reference) = ty.first_reference() {
        return Err(PreconditionError::UnresolvedReference {
            target: reference.target.clone(),
        });
    }
    Ok(ty.display().to_string())
}

/// Render into an existing buffer, e.g. when printing many symbols.
pub fn render_into(out: &mut String, ty: &Type) -> Result<(), PreconditionError> {
    if let Some(reference) = ty.first_reference() {
        return Err(PreconditionError::UnresolvedReference {
            target: reference.target.clone(),
        });
    }
    out.push_str(&ty.display().to_string());
    Ok(())
}

fn write_literal(out: &mut impl Write, literal: &LiteralValue) -> fmt::Result {
    match literal {
        LiteralValue::Int(value) => write!(out, "int({value})"),
        LiteralValue::Float(value) => write!(out, "float({})", value.0),
        LiteralValue::String(value) => write!(out, "string({value})"),
        LiteralValue::Bool(value) => write!(out, "bool({value})"),
        LiteralValue::Null => out.write_str("null"),
    }
}

/// Debug-oriented `Display` adapter; see [`Type::display`].
pub struct DisplayType<'a>(&'a Type);

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_display(f, self.0)
    }
}

fn write_display(f: &mut fmt::Formatter<'_>, ty: &Type) -> fmt::Result {
    match ty {
        Type::Reference(reference) => {
            write!(f, "ref({})", reference.target)?;
            for op in &reference.chain {
                match op {
                    ChainOp::CallResult => f.write_str("()")?,
                    ChainOp::MemberCall(method) => write!(f, "->{method}()")?,
                }
            }
            Ok(())
        }
        Type::Array(entries) => {
            f.write_str("array{")?;
            for (index, entry) in entries.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: ", entry.key)?;
                write_display(f, &entry.ty)?;
            }
            f.write_str("}")
        }
        Type::Union(members) => {
            for (index, member) in members.iter().enumerate() {
                if index > 0 {
                    f.write_str("|")?;
                }
                write_display(f, member)?;
            }
            Ok(())
        }
        Type::Function(sig) => {
            f.write_str("(): ")?;
            write_display(f, &sig.ret)
        }
        Type::Unknown => f.write_str("unknown"),
        Type::Literal(literal) => write_literal(f, literal),
        Type::Object(class) => f.write_str(class),
    }
}

impl Type {
    /// `Display` adapter for logs and debugging.
    ///
    /// Matches [`render`] on resolved types and prints pending references as
    /// `ref(Target)()->method()`. Not the canonical form.
    pub fn display(&self) -> DisplayType<'_> {
        DisplayType(self)
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
