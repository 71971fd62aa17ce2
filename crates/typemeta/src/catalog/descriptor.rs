// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type catalog node.

use super::index::{self, AnyIndex, CatalogIndex};
use super::property::PropertyDescriptor;
use super::scanner::TypeScanner;
use crate::error::{CatalogError, Result};
use crate::model::{Tag, TypeDef};
use crate::registry::{self, TypeRegistry};
use crate::types::RawType;
use dashmap::DashMap;
use indexmap::IndexMap;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Properties, parent link, type-level tags and indexes of one type.
///
/// Immutable once published by the scanner, except for the index map which
/// only ever grows.
pub struct TypeDescriptor {
    raw: RawType,
    def: Arc<TypeDef>,
    parent: Option<Arc<TypeDescriptor>>,
    properties: IndexMap<Arc<str>, Arc<PropertyDescriptor>>,
    indexes: DashMap<TypeId, AnyIndex>,
}

impl TypeDescriptor {
    pub(crate) fn new(
        def: Arc<TypeDef>,
        parent: Option<Arc<TypeDescriptor>>,
        properties: IndexMap<Arc<str>, Arc<PropertyDescriptor>>,
    ) -> Self {
        Self {
            raw: def.raw.clone(),
            def,
            parent,
            properties,
            indexes: DashMap::new(),
        }
    }

    pub(crate) fn insert_index(&self, type_id: TypeId, index: AnyIndex) {
        self.indexes.insert(type_id, index);
    }

    pub fn raw_type(&self) -> &RawType {
        &self.raw
    }

    /// Declared definition this descriptor was scanned from.
    pub fn def(&self) -> &Arc<TypeDef> {
        &self.def
    }

    pub fn parent(&self) -> Option<&Arc<TypeDescriptor>> {
        self.parent.as_ref()
    }

    /// Local properties first, then inherited ones.
    pub fn properties(&self) -> impl Iterator<Item = &Arc<PropertyDescriptor>> {
        self.properties.values()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|k| &**k)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.properties.get(name)
    }

    /// Property `name`, checked to be usable as `expected`.
    ///
    /// Fails with [`CatalogError::NotAssignable`] when the declared type is
    /// not a subtype of `expected`.
    pub fn property_expecting(
        &self,
        registry: &dyn TypeRegistry,
        name: &str,
        expected: &RawType,
    ) -> Result<Option<&Arc<PropertyDescriptor>>> {
        let Some(property) = self.property(name) else {
            return Ok(None);
        };
        check_assignable(registry, property, expected)?;
        Ok(Some(property))
    }

    /// Walk `path` through nested descriptors.
    ///
    /// Returns `None` when a segment does not exist or a non-final segment
    /// has no nested descriptor.
    pub fn property_by_path(
        &self,
        scanner: &TypeScanner,
        path: &[&str],
    ) -> Result<Option<Arc<PropertyDescriptor>>> {
        let (first, rest) = path.split_first().ok_or(CatalogError::EmptyPath)?;
        let Some(property) = self.property(first) else {
            return Ok(None);
        };
        if rest.is_empty() {
            return Ok(Some(Arc::clone(property)));
        }
        match property.nested(scanner)? {
            Some(nested) => nested.property_by_path(scanner, rest),
            None => Ok(None),
        }
    }

    /// [`property_by_path`](Self::property_by_path) with an expected type check
    /// on the final property.
    pub fn property_by_path_expecting(
        &self,
        scanner: &TypeScanner,
        path: &[&str],
        expected: &RawType,
    ) -> Result<Option<Arc<PropertyDescriptor>>> {
        let Some(property) = self.property_by_path(scanner, path)? else {
            return Ok(None);
        };
        check_assignable(scanner.registry(), &property, expected)?;
        Ok(Some(property))
    }

    /// Like [`property_by_path`](Self::property_by_path), failing with
    /// [`CatalogError::UnresolvedPathSegment`] instead of returning `None`.
    pub fn require_path(
        &self,
        scanner: &TypeScanner,
        path: &[&str],
    ) -> Result<Arc<PropertyDescriptor>> {
        let (first, rest) = path.split_first().ok_or(CatalogError::EmptyPath)?;
        let unresolved = |owner: &RawType, segment: &str| CatalogError::UnresolvedPathSegment {
            owner: owner.clone(),
            segment: segment.to_string(),
        };
        let property = self
            .property(first)
            .ok_or_else(|| unresolved(&self.raw, first))?;
        let Some(next) = rest.first() else {
            return Ok(Arc::clone(property));
        };
        match property.nested(scanner)? {
            Some(nested) => nested.require_path(scanner, rest),
            None => Err(unresolved(property.declared_type(), next)),
        }
    }

    /// Type-level tag.
    pub fn tag(&self, tag_type: &RawType) -> Option<&Tag> {
        self.def.tag(tag_type)
    }

    pub fn has_tag(&self, tag_type: &RawType) -> bool {
        self.tag(tag_type).is_some()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.def.tags
    }

    /// Index of kind `I`, built on first request when it was not built
    /// during the scan.
    pub fn index<I: CatalogIndex>(&self) -> Result<Arc<I>> {
        let type_id = TypeId::of::<I>();
        if let Some(existing) = self.indexes.get(&type_id).map(|e| Arc::clone(e.value())) {
            return Ok(downcast_index(existing));
        }

        // Built outside the map so index hooks may read this descriptor.
        let built: AnyIndex = Arc::new(index::build_index::<I>(self)?);
        let winner = Arc::clone(self.indexes.entry(type_id).or_insert(built).value());
        Ok(downcast_index(winner))
    }
}

fn downcast_index<I: CatalogIndex>(index: AnyIndex) -> Arc<I> {
    match index.downcast::<I>() {
        Ok(index) => index,
        // Keys are the TypeId of the stored value.
        Err(_) => unreachable!("index stored under a foreign TypeId"),
    }
}

fn check_assignable(
    registry: &dyn TypeRegistry,
    property: &PropertyDescriptor,
    expected: &RawType,
) -> Result<()> {
    if registry::is_subtype(registry, property.declared_type(), expected) {
        Ok(())
    } else {
        Err(CatalogError::NotAssignable {
            property: property.name().to_string(),
            declared: property.declared_type().clone(),
            expected: expected.clone(),
        })
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("raw", &self.raw)
            .field("parent", &self.parent.as_ref().map(|p| p.raw_type()))
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("indexes", &self.indexes.len())
            .finish()
    }
}
