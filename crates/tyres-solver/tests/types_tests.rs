use crate::types::*;

fn foo_bar() -> SymbolPath {
    SymbolPath::method("Foo", "bar")
}

#[test]
fn test_symbol_path_display() {
    assert_eq!(foo_bar().to_string(), "Foo::bar");
    assert_eq!(SymbolPath::function("bar").to_string(), "bar");
    assert!(foo_bar().is_method());
    assert!(!SymbolPath::function("bar").is_method());
}

#[test]
fn test_list_assigns_positional_keys() {
    let Type::Array(entries) = Type::list([Type::int(1), Type::Unknown]) else {
        panic!("expected an array shape");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].key, ArrayKey::Int(0));
    assert_eq!(entries[1].key, ArrayKey::Int(1));
    assert_eq!(entries[1].ty, Type::Unknown);
}

#[test]
fn test_substitute_preserves_variant_and_order() {
    let shape = Type::Array(vec![
        ArrayEntry {
            key: ArrayKey::String("b".into()),
            ty: Type::call(foo_bar()),
        },
        ArrayEntry {
            key: ArrayKey::String("a".into()),
            ty: Type::int(1),
        },
    ]);
    let rebuilt = shape.substitute(|child| match child {
        Type::Reference(_) => Type::int(9),
        other => other.clone(),
    });
    assert_eq!(
        rebuilt,
        Type::Array(vec![
            ArrayEntry {
                key: ArrayKey::String("b".into()),
                ty: Type::int(9),
            },
            ArrayEntry {
                key: ArrayKey::String("a".into()),
                ty: Type::int(1),
            },
        ])
    );
}

#[test]
fn test_substitute_maps_params_and_return() {
    let sig = Type::function(
        vec![Param {
            name: "x".into(),
            ty: Type::Unknown,
        }],
        Type::Unknown,
    );
    let rebuilt = sig.substitute(|_| Type::bool(true));
    let Type::Function(rebuilt) = rebuilt else {
        panic!("expected a signature");
    };
    assert_eq!(rebuilt.params[0].name.as_ref(), "x");
    assert_eq!(rebuilt.params[0].ty, Type::bool(true));
    assert_eq!(rebuilt.ret, Type::bool(true));
}

#[test]
fn test_substitute_keeps_union_uncanonicalized() {
    let union = Type::union(vec![Type::int(1), Type::int(2)]);
    let rebuilt = union.substitute(|_| Type::int(1));
    assert_eq!(rebuilt, Type::union(vec![Type::int(1), Type::int(1)]));
}

#[test]
fn test_try_substitute_propagates_errors() {
    let shape = Type::list([Type::int(1), Type::int(2)]);
    let result: Result<Type, &str> = shape.try_substitute(|child| match child {
        Type::Literal(LiteralValue::Int(2)) => Err("two"),
        other => Ok(other.clone()),
    });
    assert_eq!(result, Err("two"));
}

#[test]
fn test_contains_reference_is_deep() {
    let nested = Type::returning(Type::list([
        Type::int(1),
        Type::union(vec![Type::Unknown, Type::call(foo_bar())]),
    ]));
    assert!(nested.contains_reference());
    assert_eq!(
        nested.first_reference().map(|r| r.target.clone()),
        Some(foo_bar())
    );
    assert!(!Type::returning(Type::list([Type::int(1)])).contains_reference());
    assert!(Type::returning(Type::Unknown).contains_unknown());
}

#[test]
fn test_dedup_eq_never_matches_unknown() {
    assert_eq!(Type::Unknown, Type::Unknown);
    assert!(!Type::Unknown.dedup_eq(&Type::Unknown));
    let with_unknown = Type::list([Type::Unknown]);
    assert!(!with_unknown.dedup_eq(&with_unknown.clone()));
    assert!(Type::int(2).dedup_eq(&Type::int(2)));
    assert!(!Type::int(2).dedup_eq(&Type::int(3)));
}

#[test]
fn test_into_call_result() {
    assert_eq!(Type::returning(Type::int(2)).into_call_result(), Type::int(2));
    assert_eq!(Type::object("Foo").into_call_result(), Type::object("Foo"));
    assert_eq!(Type::returning(Type::int(2)).return_type(), Some(&Type::int(2)));
    assert_eq!(Type::int(2).return_type(), None);
}

#[test]
fn test_float_literals_compare_bitwise() {
    assert_eq!(Type::float(1.5), Type::float(1.5));
    assert_ne!(Type::float(0.0), Type::float(-0.0));
    assert_eq!(Type::float(f64::NAN), Type::float(f64::NAN));
}

#[test]
fn test_type_serde_shape() {
    let ty = Type::returning(Type::union(vec![
        Type::int(1),
        Type::reference(
            SymbolPath::method("Foo", "foo"),
            vec![ChainOp::CallResult, ChainOp::MemberCall("two".into())],
        ),
    ]));
    let json = serde_json::to_value(&ty).expect("serializes");
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "function",
            "data": {
                "params": [],
                "return": {
                    "kind": "union",
                    "data": [
                        { "kind": "literal", "data": { "int": 1 } },
                        {
                            "kind": "reference",
                            "data": {
                                "target": { "owner": "Foo", "name": "foo" },
                                "chain": ["call_result", { "member_call": "two" }]
                            }
                        }
                    ]
                }
            }
        })
    );
    let back: Type = serde_json::from_value(json).expect("deserializes");
    assert_eq!(back, ty);
}

#[test]
fn test_type_deserializes_string_keys_and_unit_variants() {
    let ty: Type = serde_json::from_value(serde_json::json!({
        "kind": "array",
        "data": [
            { "key": 0, "type": { "kind": "unknown" } },
            { "key": "name", "type": { "kind": "object", "data": "Foo" } },
            { "key": 1, "type": { "kind": "literal", "data": "null" } }
        ]
    }))
    .expect("deserializes");
    assert_eq!(
        ty,
        Type::Array(vec![
            ArrayEntry {
                key: ArrayKey::Int(0),
                ty: Type::Unknown,
            },
            ArrayEntry {
                key: ArrayKey::String("name".into()),
                ty: Type::object("Foo"),
            },
            ArrayEntry {
                key: ArrayKey::Int(1),
                ty: Type::Literal(LiteralValue::Null),
            },
        ])
    );
}
