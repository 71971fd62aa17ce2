// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolved type expressions.

use crate::catalog::PropertyDescriptor;
use crate::error::{CatalogError, Result};
use crate::model::{FieldDef, MethodDef};
use crate::registry::{self, TypeRegistry};
use crate::types::{RawType, TypeExpr, TypeVariable, Wildcard};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Upper bound on variable-to-variable hops during one resolution.
const MAX_RESOLUTION_STEPS: usize = 64;

/// A type expression together with its raw type.
///
/// A `TypeInfo` is also a resolution context: variables in other expressions
/// are bound against its position in the type hierarchy. For example, with
/// `Child extends Parent<HashMap<String, i32>>` and `Parent<B>`, resolving
/// the variable `B` against `Child` gives `HashMap<String, i32>`.
///
/// Equality and hashing only consider the expression.
#[derive(Clone)]
pub struct TypeInfo {
    raw: RawType,
    expr: TypeExpr,
    annotated: Option<Arc<PropertyDescriptor>>,
}

impl TypeInfo {
    /// Type info for a generic expression.
    pub fn for_type(expr: impl Into<TypeExpr>) -> Self {
        let expr = expr.into();
        Self {
            raw: expr.raw_type(),
            expr,
            annotated: None,
        }
    }

    /// Type info for a raw type.
    pub fn for_raw(raw: impl Into<RawType>) -> Self {
        Self::for_type(TypeExpr::Raw(raw.into()))
    }

    /// Same expression, attached to the property that carries it.
    pub fn with_annotated(&self, property: Arc<PropertyDescriptor>) -> Self {
        Self {
            raw: self.raw.clone(),
            expr: self.expr.clone(),
            annotated: Some(property),
        }
    }

    pub fn raw_type(&self) -> &RawType {
        &self.raw
    }

    pub fn expr(&self) -> &TypeExpr {
        &self.expr
    }

    /// Property carrying this type, used to read use-site tags.
    pub fn annotated(&self) -> Option<&Arc<PropertyDescriptor>> {
        self.annotated.as_ref()
    }

    pub fn is_array(&self) -> bool {
        self.raw.is_array()
    }

    /// Whether the expression carries type arguments.
    pub fn has_parameters(&self) -> bool {
        matches!(self.expr, TypeExpr::Parameterized { .. })
    }

    /// Resolved element type, `None` for non-arrays.
    pub fn component_type(&self, registry: &dyn TypeRegistry) -> Option<TypeInfo> {
        match &self.expr {
            TypeExpr::Array(component) => Some(self.derived(self.resolve(registry, component))),
            TypeExpr::Raw(RawType::Array(component)) => {
                Some(self.derived(Self::for_raw(component.as_ref().clone())))
            }
            _ => None,
        }
    }

    /// Resolved type argument at `index`, `None` when the expression has no
    /// type arguments.
    pub fn resolve_parameter(
        &self,
        registry: &dyn TypeRegistry,
        index: usize,
    ) -> Result<Option<TypeInfo>> {
        let TypeExpr::Parameterized { args, .. } = &self.expr else {
            return Ok(None);
        };
        let arg = args.get(index).ok_or_else(|| CatalogError::TypeArgumentOutOfRange {
            ty: self.expr.to_string(),
            index,
            count: args.len(),
        })?;
        Ok(Some(self.derived(self.resolve(registry, arg))))
    }

    /// `view` of a part of this type, keeping the carrying property.
    fn derived(&self, view: TypeInfo) -> TypeInfo {
        TypeInfo {
            annotated: self.annotated.clone(),
            ..view
        }
    }

    /// Resolve `expr` against this context.
    pub fn resolve(&self, registry: &dyn TypeRegistry, expr: &TypeExpr) -> TypeInfo {
        Self::for_type(self.resolve_type(registry, expr))
    }

    /// Resolve every known type variable in `expr` against this context.
    ///
    /// Returns an expression equal to `expr` when nothing could be resolved.
    /// Variables without a binding in this context are left in place, and so
    /// is a variable met again inside its own binding.
    pub fn resolve_type(&self, registry: &dyn TypeRegistry, expr: &TypeExpr) -> TypeExpr {
        self.resolve_inner(registry, expr, &mut Vec::new())
    }

    /// `expanding` holds the variables whose bindings enclose `expr`.
    fn resolve_inner(
        &self,
        registry: &dyn TypeRegistry,
        expr: &TypeExpr,
        expanding: &mut Vec<TypeVariable>,
    ) -> TypeExpr {
        let mark = expanding.len();
        let resolved = self.resolve_expanding(registry, expr, expanding);
        expanding.truncate(mark);
        resolved
    }

    fn resolve_expanding(
        &self,
        registry: &dyn TypeRegistry,
        expr: &TypeExpr,
        expanding: &mut Vec<TypeVariable>,
    ) -> TypeExpr {
        let mut current = expr.clone();
        for _ in 0..MAX_RESOLUTION_STEPS {
            let TypeExpr::Variable(var) = &current else {
                return self.resolve_structure(registry, &current, expanding);
            };
            if expanding.contains(var) {
                log::warn!(
                    "[type-info] {} recurs in its own binding in {}, left unresolved",
                    current,
                    self.expr
                );
                return current;
            }
            let next = self.resolve_variable(registry, var);
            if next == current {
                return next;
            }
            expanding.push(var.clone());
            current = next;
        }

        log::warn!(
            "[type-info] resolution of {} in {} did not settle after {} steps",
            expr,
            self.expr,
            MAX_RESOLUTION_STEPS
        );
        current
    }

    /// Resolve the parts of a non-variable expression.
    fn resolve_structure(
        &self,
        registry: &dyn TypeRegistry,
        expr: &TypeExpr,
        expanding: &mut Vec<TypeVariable>,
    ) -> TypeExpr {
        match expr {
            TypeExpr::Array(component) => {
                let resolved = self.resolve_inner(registry, component, expanding);
                if &resolved == component.as_ref() {
                    expr.clone()
                } else {
                    TypeExpr::array_of(resolved)
                }
            }
            TypeExpr::Parameterized { owner, raw, args } => {
                let new_owner = owner
                    .as_ref()
                    .map(|o| self.resolve_inner(registry, o, expanding));
                let mut changed = new_owner.as_ref() != owner.as_deref();
                let mut new_args = Vec::with_capacity(args.len());
                for arg in args {
                    let resolved = self.resolve_inner(registry, arg, expanding);
                    changed |= &resolved != arg;
                    new_args.push(resolved);
                }
                if changed {
                    TypeExpr::parameterized_with_owner(new_owner, raw.clone(), new_args)
                } else {
                    expr.clone()
                }
            }
            TypeExpr::Wildcard(Wildcard { lower, upper }) => {
                if let Some(lower) = lower {
                    let resolved = self.resolve_inner(registry, lower, expanding);
                    if &resolved != lower.as_ref() {
                        return TypeExpr::supertype_of(resolved);
                    }
                } else if let Some(upper) = upper {
                    let resolved = self.resolve_inner(registry, upper, expanding);
                    if &resolved != upper.as_ref() {
                        return TypeExpr::subtype_of(resolved);
                    }
                }
                expr.clone()
            }
            TypeExpr::Raw(_) | TypeExpr::Variable(_) => expr.clone(),
        }
    }

    /// Binding of `var` implied by this context, or the variable itself.
    fn resolve_variable(&self, registry: &dyn TypeRegistry, var: &TypeVariable) -> TypeExpr {
        let unresolved = || TypeExpr::Variable(var.clone());
        let Some(declared_raw) = var.declaring_type() else {
            return unresolved();
        };
        let declared_by = registry::generic_supertype(registry, &self.expr, &self.raw, declared_raw);
        let TypeExpr::Parameterized { args, .. } = declared_by else {
            return unresolved();
        };
        registry
            .lookup(declared_raw)
            .and_then(|def| def.type_param_index(&var.name))
            .and_then(|index| args.get(index).cloned())
            .unwrap_or_else(unresolved)
    }

    /// Generic form of the ancestor `target`, resolved against this type.
    ///
    /// With `Vec<String>` as context, `Iterable` yields `Iterable<String>`.
    pub fn supertype(&self, registry: &dyn TypeRegistry, target: &RawType) -> Result<TypeInfo> {
        if !registry::is_subtype(registry, &self.raw, target) {
            return Err(CatalogError::NotASupertype {
                target: target.clone(),
                context: self.expr.to_string(),
            });
        }
        let generic = registry::generic_supertype(registry, &self.expr, &self.raw, target);
        Ok(self.resolve(registry, &generic))
    }

    /// Resolved superclass, `None` for `Object`, interfaces and primitives.
    pub fn super_type(&self, registry: &dyn TypeRegistry) -> Option<TypeInfo> {
        let superclass = registry::superclass(registry, &self.raw)?;
        self.supertype(registry, &superclass.raw_type()).ok()
    }

    fn check_member(
        &self,
        registry: &dyn TypeRegistry,
        declared_by: &RawType,
        member: impl FnOnce() -> String,
    ) -> Result<()> {
        if registry::is_subtype(registry, &self.raw, declared_by) {
            Ok(())
        } else {
            Err(CatalogError::ForeignMember {
                member: member(),
                context: self.expr.to_string(),
            })
        }
    }

    /// Resolved type of `field`, which must be declared by this type or a supertype.
    pub fn field_type(&self, registry: &dyn TypeRegistry, field: &FieldDef) -> Result<TypeInfo> {
        self.check_member(registry, &field.declared_by, || {
            format!("{}.{}", field.declared_by, field.name)
        })?;
        Ok(self.resolve(registry, &field.ty))
    }

    /// Resolved parameter types of `method`.
    pub fn parameter_types(
        &self,
        registry: &dyn TypeRegistry,
        method: &MethodDef,
    ) -> Result<Vec<TypeInfo>> {
        self.check_member(registry, &method.declared_by, || method.signature())?;
        Ok(self.resolve_all(registry, &method.params))
    }

    /// Resolved exception types of `method`.
    pub fn exception_types(
        &self,
        registry: &dyn TypeRegistry,
        method: &MethodDef,
    ) -> Result<Vec<TypeInfo>> {
        self.check_member(registry, &method.declared_by, || method.signature())?;
        Ok(self.resolve_all(registry, &method.exceptions))
    }

    /// Resolved return type of `method`.
    pub fn return_type(&self, registry: &dyn TypeRegistry, method: &MethodDef) -> Result<TypeInfo> {
        self.check_member(registry, &method.declared_by, || method.signature())?;
        Ok(self.resolve(registry, &method.returns))
    }

    fn resolve_all(&self, registry: &dyn TypeRegistry, exprs: &[TypeExpr]) -> Vec<TypeInfo> {
        exprs.iter().map(|e| self.resolve(registry, e)).collect()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expr.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("raw", &self.raw)
            .field("expr", &self.expr)
            .field("annotated", &self.annotated.as_ref().map(|p| p.name()))
            .finish()
    }
}
