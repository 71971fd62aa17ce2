// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bean naming conventions.

use crate::model::MethodDef;
use crate::types::TypeExpr;

const PREFIX_GET: &str = "get";
const PREFIX_SET: &str = "set";
const PREFIX_IS: &str = "is";

/// Role of a method in a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Accessor,
    Mutator,
}

/// Property name and role implied by a method signature, if any.
///
/// - `getX()` with a non-void return is an accessor;
/// - `isX()` returning `bool` is an accessor;
/// - `setX(v)` returning void is a mutator.
pub fn classify(method: &MethodDef) -> Option<(String, Role)> {
    let name = &*method.name;
    let arity = method.params.len();

    if let Some(rest) = name.strip_prefix(PREFIX_SET) {
        if !rest.is_empty() && arity == 1 && method.is_void() {
            return Some((decapitalize(rest), Role::Mutator));
        }
    }
    if let Some(rest) = name.strip_prefix(PREFIX_GET) {
        if !rest.is_empty() && arity == 0 && !method.is_void() {
            return Some((decapitalize(rest), Role::Accessor));
        }
    }
    if let Some(rest) = name.strip_prefix(PREFIX_IS) {
        if !rest.is_empty() && arity == 0 && method.returns == TypeExpr::raw("bool") {
            return Some((decapitalize(rest), Role::Accessor));
        }
    }
    None
}

/// Lower-case the first character, unless the first two are both upper case
/// (`URL` stays `URL`, `Name` becomes `name`).
pub fn decapitalize(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if first.is_uppercase() && chars.next().is_some_and(char::is_uppercase) {
        return value.to_string();
    }
    first.to_lowercase().chain(value[first.len_utf8()..].chars()).collect()
}

/// Upper-case the first character.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
