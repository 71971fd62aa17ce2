// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One structural property of a type.

use super::descriptor::TypeDescriptor;
use super::scanner::TypeScanner;
use crate::error::{CatalogError, Result};
use crate::generics::TypeInfo;
use crate::model::{FieldDef, MethodDef, Tag};
use crate::registry::{self, builtins, TypeRegistry};
use crate::types::{RawType, TypeExpr};
use crate::value::{FromValue, IntoValue, Value};
use indexmap::IndexMap;
use std::any::Any;
use std::sync::Arc;

/// A readable and/or writable property discovered on a type.
///
/// Properties are immutable once their descriptor is published. An
/// inherited property is shared with the parent descriptor unless its
/// generic type depends on type variables, in which case each descriptor
/// owns a copy whose `owner` is used as resolution context.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub(crate) name: Arc<str>,
    pub(crate) declared_type: RawType,
    pub(crate) accessor: Option<Arc<MethodDef>>,
    pub(crate) mutator: Option<Arc<MethodDef>>,
    pub(crate) candidate_mutators: IndexMap<RawType, Arc<MethodDef>>,
    pub(crate) field: Option<Arc<FieldDef>>,
    pub(crate) tags: IndexMap<RawType, Tag>,
    pub(crate) owner: RawType,
}

impl PropertyDescriptor {
    pub(crate) fn new(name: impl Into<Arc<str>>, declared_type: RawType, owner: RawType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            accessor: None,
            mutator: None,
            candidate_mutators: IndexMap::new(),
            field: None,
            tags: IndexMap::new(),
            owner,
        }
    }

    /// Copy re-homed on `owner`. Tags and mutator candidates are kept.
    pub(crate) fn copy_for(&self, owner: &RawType) -> Self {
        let mut copy = self.clone();
        copy.owner = owner.clone();
        copy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Erased type, refined by the accessor, then by the field.
    pub fn declared_type(&self) -> &RawType {
        &self.declared_type
    }

    /// Type whose descriptor this property was discovered on.
    pub fn owner(&self) -> &RawType {
        &self.owner
    }

    pub fn accessor(&self) -> Option<&Arc<MethodDef>> {
        self.accessor.as_ref()
    }

    /// Canonical mutator.
    pub fn mutator(&self) -> Option<&Arc<MethodDef>> {
        self.mutator.as_ref()
    }

    /// Every mutator overload, keyed by erased parameter type.
    pub fn candidate_mutators(&self) -> &IndexMap<RawType, Arc<MethodDef>> {
        &self.candidate_mutators
    }

    /// Backing field slot, whatever its visibility.
    pub fn field(&self) -> Option<&Arc<FieldDef>> {
        self.field.as_ref()
    }

    fn accessible_field(&self) -> Option<&FieldDef> {
        self.field
            .as_deref()
            .filter(|f| f.is_accessible() && f.access.is_some())
    }

    /// Has an accessor, or a public/protected field with access functions.
    pub fn is_readable(&self) -> bool {
        self.accessor.is_some() || self.accessible_field().is_some()
    }

    /// Has a canonical mutator, or a public/protected field with access functions.
    pub fn is_writable(&self) -> bool {
        self.mutator.is_some() || self.accessible_field().is_some()
    }

    /// Generic type from the field, else the accessor, else the mutator.
    pub fn generic_type(&self) -> TypeExpr {
        if let Some(field) = &self.field {
            return field.ty.clone();
        }
        if let Some(accessor) = &self.accessor {
            return accessor.returns.clone();
        }
        self.mutator
            .as_ref()
            .and_then(|m| m.params.first().cloned())
            .unwrap_or_else(|| TypeExpr::Raw(self.declared_type.clone()))
    }

    /// Whether the generic type carries more than the declared raw type.
    pub(crate) fn is_generic(&self) -> bool {
        self.generic_type() != TypeExpr::Raw(self.declared_type.clone())
    }

    /// Generic type resolved against the owner, annotated with this property.
    pub fn resolved_type(self: &Arc<Self>, registry: &dyn TypeRegistry) -> TypeInfo {
        TypeInfo::for_raw(self.owner.clone())
            .resolve(registry, &self.generic_type())
            .with_annotated(Arc::clone(self))
    }

    /// Descriptor of the property's resolved type.
    ///
    /// `None` for basic types (scalars, `String`, `Object`) and arrays.
    pub fn nested(&self, scanner: &TypeScanner) -> Result<Option<Arc<TypeDescriptor>>> {
        let registry = scanner.registry();
        let resolved = TypeInfo::for_raw(self.owner.clone()).resolve_type(registry, &self.generic_type());
        let raw = registry::erasure(registry, &resolved);
        if raw.is_array() || builtins::is_basic(&raw) {
            return Ok(None);
        }
        scanner.descriptor(&raw).map(Some)
    }

    /// Read the property from `instance`.
    pub fn get_value(&self, instance: &dyn Any) -> Result<Value> {
        if let Some(accessor) = &self.accessor {
            return accessor.invoke_read(instance);
        }
        match self.accessible_field().and_then(|f| f.access.as_ref()) {
            Some(access) => access.read(instance),
            None => Err(CatalogError::NotReadable {
                owner: self.owner.clone(),
                property: self.name.to_string(),
            }),
        }
    }

    /// Write `value` into `instance`.
    pub fn set_value(&self, instance: &mut dyn Any, value: Value) -> Result<()> {
        if let Some(mutator) = &self.mutator {
            return mutator.invoke_write(instance, value);
        }
        match self.accessible_field().and_then(|f| f.access.as_ref()) {
            Some(access) => access.write(instance, value),
            None => Err(CatalogError::NotWritable {
                owner: self.owner.clone(),
                property: self.name.to_string(),
            }),
        }
    }

    /// Typed read.
    pub fn get<T: FromValue>(&self, instance: &dyn Any) -> Result<T> {
        T::from_value(&self.get_value(instance)?)
    }

    /// Typed write.
    pub fn set<V: IntoValue>(&self, instance: &mut dyn Any, value: V) -> Result<()> {
        self.set_value(instance, value.into_value())
    }

    pub fn tag(&self, tag_type: &RawType) -> Option<&Tag> {
        self.tags.get(tag_type)
    }

    pub fn has_tag(&self, tag_type: &RawType) -> bool {
        self.tags.contains_key(tag_type)
    }

    /// Merged tags in merge order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn is_collection(&self, registry: &dyn TypeRegistry) -> bool {
        self.is_a(registry, builtins::COLLECTION)
    }

    pub fn is_mapping(&self, registry: &dyn TypeRegistry) -> bool {
        self.is_a(registry, builtins::MAP)
    }

    pub fn is_iterable(&self, registry: &dyn TypeRegistry) -> bool {
        self.is_a(registry, builtins::ITERABLE)
    }

    fn is_a(&self, registry: &dyn TypeRegistry, name: &str) -> bool {
        registry::is_subtype(registry, &self.declared_type, &RawType::named(name))
    }
}
