// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pluggable secondary indexes over a type descriptor.
//!
//! An index kind is a Rust type implementing [`CatalogIndex`]. It is built
//! either while scanning (when registered through
//! [`ScannerConfig::with_index`](super::ScannerConfig::with_index)) or on
//! first request through [`TypeDescriptor::index`]. Either way it sees
//! every property of the finished descriptor, then the descriptor itself.
//!
//! Index hooks must not request descriptors from the scanner: a scan-time
//! index runs while the scanned type's cache slot is held.

use super::descriptor::TypeDescriptor;
use super::property::PropertyDescriptor;
use crate::error::Result;
use crate::types::RawType;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A secondary lookup structure attached to a [`TypeDescriptor`].
pub trait CatalogIndex: Any + Send + Sync + Sized {
    /// Create an empty index. A failure aborts the scan that requested it.
    fn create() -> Result<Self>;

    /// Called once per property of the owning descriptor.
    fn index_property(&mut self, _owner: &TypeDescriptor, _property: &Arc<PropertyDescriptor>) {}

    /// Called once, after every property was indexed.
    fn index_type(&mut self, _owner: &TypeDescriptor) {}
}

pub(crate) type AnyIndex = Arc<dyn Any + Send + Sync>;

/// Type-erased handle on an index kind.
#[derive(Clone, Copy)]
pub struct IndexSpec {
    type_id: TypeId,
    name: &'static str,
    build: fn(&TypeDescriptor) -> Result<AnyIndex>,
}

impl IndexSpec {
    pub fn of<I: CatalogIndex>() -> Self {
        Self {
            type_id: TypeId::of::<I>(),
            name: type_name::<I>(),
            build: build_erased::<I>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn build(&self, owner: &TypeDescriptor) -> Result<AnyIndex> {
        (self.build)(owner)
    }
}

impl fmt::Debug for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Create `I` and feed it `owner`.
pub(crate) fn build_index<I: CatalogIndex>(owner: &TypeDescriptor) -> Result<I> {
    let mut index = I::create()?;
    for property in owner.properties() {
        index.index_property(owner, property);
    }
    index.index_type(owner);
    Ok(index)
}

fn build_erased<I: CatalogIndex>(owner: &TypeDescriptor) -> Result<AnyIndex> {
    Ok(Arc::new(build_index::<I>(owner)?))
}

/// Properties grouped by the tag types they carry.
#[derive(Debug, Default)]
pub struct PropertyByTagIndex {
    storage: HashMap<RawType, Vec<Arc<PropertyDescriptor>>>,
}

impl PropertyByTagIndex {
    /// Properties tagged with `tag_type`, in descriptor order.
    pub fn by_tag(&self, tag_type: &RawType) -> &[Arc<PropertyDescriptor>] {
        self.storage.get(tag_type).map(Vec::as_slice).unwrap_or_default()
    }
}

impl CatalogIndex for PropertyByTagIndex {
    fn create() -> Result<Self> {
        Ok(Self::default())
    }

    fn index_property(&mut self, _owner: &TypeDescriptor, property: &Arc<PropertyDescriptor>) {
        for tag in property.tags() {
            self.storage
                .entry(tag.tag_type().clone())
                .or_default()
                .push(Arc::clone(property));
        }
    }
}

/// Properties grouped by declared type.
#[derive(Debug, Default)]
pub struct PropertyByTypeIndex {
    storage: HashMap<RawType, Vec<Arc<PropertyDescriptor>>>,
}

impl PropertyByTypeIndex {
    /// Properties declared as exactly `ty`, in descriptor order.
    pub fn by_type(&self, ty: &RawType) -> &[Arc<PropertyDescriptor>] {
        self.storage.get(ty).map(Vec::as_slice).unwrap_or_default()
    }
}

impl CatalogIndex for PropertyByTypeIndex {
    fn create() -> Result<Self> {
        Ok(Self::default())
    }

    fn index_property(&mut self, _owner: &TypeDescriptor, property: &Arc<PropertyDescriptor>) {
        self.storage
            .entry(property.declared_type().clone())
            .or_default()
            .push(Arc::clone(property));
    }
}
