// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Supertype queries over a [`TypeRegistry`].
//!
//! Arrays are not registered. An array type extends `Object`, implements
//! nothing, and is a subtype of another array type when its component is.
//! Unknown types have no supertypes besides `Object`.

use super::TypeRegistry;
use crate::error::{CatalogError, Result};
use crate::model::TypeDef;
use crate::types::{GenericDeclaration, RawType, TypeExpr, TypeVariable};
use std::collections::HashSet;
use std::sync::Arc;

/// Longest variable-to-bound chain followed by [`erasure`].
const MAX_ERASURE_DEPTH: usize = 32;

/// Definition of `raw`, or [`CatalogError::UnknownType`].
pub fn type_def(registry: &dyn TypeRegistry, raw: &RawType) -> Result<Arc<TypeDef>> {
    registry
        .lookup(raw)
        .ok_or_else(|| CatalogError::UnknownType(raw.clone()))
}

/// Generic superclass of `raw`. `None` for `Object`, interfaces and unknown types.
pub fn superclass(registry: &dyn TypeRegistry, raw: &RawType) -> Option<TypeExpr> {
    if raw.is_array() {
        return Some(TypeExpr::object());
    }
    registry.lookup(raw).and_then(|def| def.superclass.clone())
}

/// Generic interfaces directly implemented by `raw`.
pub fn interfaces(registry: &dyn TypeRegistry, raw: &RawType) -> Vec<TypeExpr> {
    if raw.is_array() {
        return Vec::new();
    }
    registry
        .lookup(raw)
        .map(|def| def.interfaces.clone())
        .unwrap_or_default()
}

pub fn is_interface(registry: &dyn TypeRegistry, raw: &RawType) -> bool {
    registry.lookup(raw).is_some_and(|def| def.is_interface())
}

/// Whether a value of `sub` can be used where `sup` is expected.
pub fn is_subtype(registry: &dyn TypeRegistry, sub: &RawType, sup: &RawType) -> bool {
    if sub == sup || sup.is_object() {
        return true;
    }
    match (sub, sup) {
        (RawType::Array(a), RawType::Array(b)) => return is_subtype(registry, a, b),
        (RawType::Array(_), _) | (_, RawType::Array(_)) => return false,
        _ => {}
    }

    let mut visited = HashSet::new();
    let mut pending = vec![sub.clone()];
    while let Some(current) = pending.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        let supers = superclass(registry, &current)
            .into_iter()
            .chain(interfaces(registry, &current));
        for parent in supers {
            let parent = parent.raw_type();
            if &parent == sup {
                return true;
            }
            pending.push(parent);
        }
    }
    false
}

/// Fail with [`CatalogError::InheritanceCycle`] if `raw` reaches itself
/// through its superclasses or interfaces.
pub fn check_hierarchy(registry: &dyn TypeRegistry, raw: &RawType) -> Result<()> {
    fn visit(
        registry: &dyn TypeRegistry,
        raw: &RawType,
        on_path: &mut Vec<RawType>,
        done: &mut HashSet<RawType>,
    ) -> Result<()> {
        if done.contains(raw) {
            return Ok(());
        }
        if on_path.contains(raw) {
            return Err(CatalogError::InheritanceCycle(raw.clone()));
        }
        on_path.push(raw.clone());
        let supers = superclass(registry, raw)
            .into_iter()
            .chain(interfaces(registry, raw));
        for parent in supers {
            visit(registry, &parent.raw_type(), on_path, done)?;
        }
        on_path.pop();
        done.insert(raw.clone());
        Ok(())
    }

    visit(registry, raw, &mut Vec::new(), &mut HashSet::new())
}

/// Bounds declared for `var`, empty when the declaration is unknown.
fn bounds_of(registry: &dyn TypeRegistry, var: &TypeVariable) -> Vec<TypeExpr> {
    let (owner, method) = match &var.declared_by {
        GenericDeclaration::Type(owner) => (owner, None),
        GenericDeclaration::Method { owner, method } => (owner, Some(method)),
    };
    let Some(def) = registry.lookup(owner) else {
        return Vec::new();
    };
    let bounds = match method {
        None => def.type_params.iter().find(|p| p.name == var.name),
        Some(method) => def
            .methods_named(method)
            .flat_map(|m| m.type_params.iter())
            .find(|p| p.name == var.name),
    }
    .map(|p| p.bounds.clone())
    .unwrap_or_default();
    bounds
}

/// Erased raw type of `expr`. A variable erases to its first bound, or
/// `Object` when unbounded.
pub fn erasure(registry: &dyn TypeRegistry, expr: &TypeExpr) -> RawType {
    fn erase(registry: &dyn TypeRegistry, expr: &TypeExpr, depth: usize) -> RawType {
        if depth > MAX_ERASURE_DEPTH {
            return RawType::object();
        }
        match expr {
            TypeExpr::Raw(raw) => raw.clone(),
            TypeExpr::Parameterized { raw, .. } => raw.clone(),
            TypeExpr::Array(component) => {
                RawType::array_of(erase(registry, component, depth + 1))
            }
            TypeExpr::Variable(var) => bounds_of(registry, var)
                .first()
                .map_or_else(RawType::object, |b| erase(registry, b, depth + 1)),
            TypeExpr::Wildcard(w) => w
                .upper
                .as_deref()
                .map_or_else(RawType::object, |b| erase(registry, b, depth + 1)),
        }
    }

    erase(registry, expr, 0)
}

/// Generic form of the ancestor `target` as seen from `context`, whose raw
/// type is `context_raw`.
///
/// The result is expressed in the type variables of the type that declares
/// the supertype edge, so callers resolve it again against `context`.
/// Returns `Raw(target)` when `target` is not reachable.
pub fn generic_supertype(
    registry: &dyn TypeRegistry,
    context: &TypeExpr,
    context_raw: &RawType,
    target: &RawType,
) -> TypeExpr {
    let mut visited = HashSet::new();
    supertype_step(registry, context, context_raw, target, &mut visited)
}

fn supertype_step(
    registry: &dyn TypeRegistry,
    context: &TypeExpr,
    context_raw: &RawType,
    target: &RawType,
    visited: &mut HashSet<RawType>,
) -> TypeExpr {
    if context_raw == target {
        return context.clone();
    }
    if !visited.insert(context_raw.clone()) {
        log::warn!("[type-info] inheritance cycle through {}", context_raw);
        return TypeExpr::Raw(target.clone());
    }

    if is_interface(registry, target) {
        for generic in interfaces(registry, context_raw) {
            let raw = generic.raw_type();
            if &raw == target {
                return generic;
            }
            if is_subtype(registry, &raw, target) {
                return supertype_step(registry, &generic, &raw, target, visited);
            }
        }
    }

    if !is_interface(registry, context_raw) {
        let mut current = context_raw.clone();
        while !current.is_object() {
            let Some(generic) = superclass(registry, &current) else {
                break;
            };
            let raw = generic.raw_type();
            if &raw == target {
                return generic;
            }
            if is_subtype(registry, &raw, target) {
                return supertype_step(registry, &generic, &raw, target, visited);
            }
            if !visited.insert(raw.clone()) {
                break;
            }
            current = raw;
        }
    }

    TypeExpr::Raw(target.clone())
}
