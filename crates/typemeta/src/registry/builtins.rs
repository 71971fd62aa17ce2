// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in type definitions: the root, scalars, `String` and containers.

use crate::model::{TypeDef, TypeDefBuilder};
use crate::object::DynamicObject;
use crate::types::{RawType, TypeExpr, OBJECT, VOID};
use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Scalar type names.
pub const SCALARS: [&str; 12] = [
    "bool", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64", "char",
];

pub const STRING: &str = "String";
pub const ITERABLE: &str = "Iterable";
pub const COLLECTION: &str = "Collection";
pub const LIST: &str = "List";
pub const SET: &str = "Set";
pub const SORTED_SET: &str = "SortedSet";
pub const QUEUE: &str = "Queue";
pub const DEQUE: &str = "Deque";
pub const MAP: &str = "Map";
pub const SORTED_MAP: &str = "SortedMap";

/// Whether `raw` is a basic type: a scalar, `String` or `Object`.
///
/// Basic properties have no nested descriptor.
pub fn is_basic(raw: &RawType) -> bool {
    match raw {
        RawType::Named(name) => {
            &**name == STRING || &**name == OBJECT || SCALARS.contains(&&**name)
        }
        RawType::Array(_) => false,
    }
}

fn sub_interface(name: &str, params: &[&str], parent: &str) -> TypeDef {
    let args = params.iter().map(|p| TypeExpr::var(*p, name)).collect();
    params
        .iter()
        .fold(TypeDefBuilder::interface(name), |b, p| b.type_param(*p))
        .implements(TypeExpr::parameterized(parent, args))
        .build()
}

fn container<F>(name: &str, params: &[&str], interface: &str, factory: F) -> TypeDef
where
    F: Fn() -> Value + Send + Sync + 'static,
{
    let args = params.iter().map(|p| TypeExpr::var(*p, name)).collect();
    params
        .iter()
        .fold(TypeDefBuilder::class(name), |b, p| b.type_param(*p))
        .implements(TypeExpr::parameterized(interface, args))
        .factory(factory)
        .build()
}

/// All built-in definitions.
pub fn definitions() -> Vec<TypeDef> {
    let mut defs = vec![
        TypeDefBuilder::class(OBJECT)
            .factory(|| Value::Object(Arc::new(DynamicObject::new(OBJECT))))
            .build(),
        TypeDefBuilder::primitive(VOID).build(),
        TypeDefBuilder::class(STRING)
            .factory(|| Value::String(String::new()))
            .build(),
    ];
    defs.extend(SCALARS.iter().map(|s| TypeDefBuilder::primitive(*s).build()));

    defs.push(TypeDefBuilder::interface(ITERABLE).type_param("T").build());
    defs.push(sub_interface(COLLECTION, &["E"], ITERABLE));
    defs.push(sub_interface(LIST, &["E"], COLLECTION));
    defs.push(sub_interface(SET, &["E"], COLLECTION));
    defs.push(sub_interface(SORTED_SET, &["E"], SET));
    defs.push(sub_interface(QUEUE, &["E"], COLLECTION));
    defs.push(sub_interface(DEQUE, &["E"], QUEUE));
    defs.push(
        TypeDefBuilder::interface(MAP)
            .type_param("K")
            .type_param("V")
            .build(),
    );
    defs.push(sub_interface(SORTED_MAP, &["K", "V"], MAP));

    let empty_sequence = || Value::Sequence(Vec::new());
    let empty_map = || Value::Map(BTreeMap::new());
    defs.push(container("Vec", &["E"], LIST, empty_sequence));
    defs.push(container("VecDeque", &["E"], DEQUE, empty_sequence));
    defs.push(container("HashSet", &["E"], SET, empty_sequence));
    defs.push(container("BTreeSet", &["E"], SORTED_SET, empty_sequence));
    defs.push(container("HashMap", &["K", "V"], MAP, empty_map));
    defs.push(container("BTreeMap", &["K", "V"], SORTED_MAP, empty_map));
    defs
}
