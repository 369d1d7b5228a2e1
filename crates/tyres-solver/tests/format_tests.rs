use super::*;
use crate::error::PreconditionError;
use crate::types::{ArrayEntry, ArrayKey, ChainOp, LiteralValue, Param, SymbolPath, Type};

fn canonical(ty: &Type) -> String {
    render(ty).expect("no references")
}

#[test]
fn test_render_leaves() {
    assert_eq!(canonical(&Type::Unknown), "unknown");
    assert_eq!(canonical(&Type::int(2)), "int(2)");
    assert_eq!(canonical(&Type::int(-7)), "int(-7)");
    assert_eq!(canonical(&Type::float(1.5)), "float(1.5)");
    assert_eq!(canonical(&Type::string("abc")), "string(abc)");
    assert_eq!(canonical(&Type::bool(false)), "bool(false)");
    assert_eq!(canonical(&Type::Literal(LiteralValue::Null)), "null");
    assert_eq!(canonical(&Type::object("Foo")), "Foo");
}

#[test]
fn test_render_array_keeps_stored_order() {
    let shape = Type::Array(vec![
        ArrayEntry {
            key: ArrayKey::String("b".into()),
            ty: Type::int(2),
        },
        ArrayEntry {
            key: ArrayKey::Int(0),
            ty: Type::Unknown,
        },
    ]);
    assert_eq!(canonical(&shape), "array{b: int(2), 0: unknown}");
    assert_eq!(canonical(&Type::list(Vec::new())), "array{}");
}

#[test]
fn test_render_union_in_member_order() {
    let union = Type::union(vec![Type::Unknown, Type::int(1), Type::object("Foo")]);
    assert_eq!(canonical(&union), "unknown|int(1)|Foo");
}

#[test]
fn test_render_function_ignores_params() {
    let sig = Type::function(
        vec![Param {
            name: "x".into(),
            ty: Type::int(1),
        }],
        Type::list([Type::int(2), Type::int(2)]),
    );
    assert_eq!(canonical(&sig), "(): array{0: int(2), 1: int(2)}");
}

#[test]
fn test_render_rejects_nested_reference() {
    let pending = Type::returning(Type::list([
        Type::int(1),
        Type::call(SymbolPath::method("Foo", "bar")),
    ]));
    assert_eq!(
        render(&pending),
        Err(PreconditionError::UnresolvedReference {
            target: SymbolPath::method("Foo", "bar"),
        })
    );
    let mut out = String::from("foo: ");
    assert!(render_into(&mut out, &pending).is_err());
    assert_eq!(out, "foo: ");
}

#[test]
fn test_render_into_appends() {
    let mut out = String::from("foo: ");
    render_into(&mut out, &Type::returning(Type::int(2))).expect("no references");
    assert_eq!(out, "foo: (): int(2)");
}

#[test]
fn test_display_shows_pending_references() {
    let pending = Type::returning(Type::union(vec![
        Type::int(1),
        Type::reference(
            SymbolPath::method("Foo", "bar"),
            vec![ChainOp::CallResult, ChainOp::MemberCall("two".into())],
        ),
    ]));
    assert_eq!(
        pending.display().to_string(),
        "(): int(1)|ref(Foo::bar)()->two()"
    );
}
