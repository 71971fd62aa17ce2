// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type universe lookup.
//!
//! The scanner and the resolution engine never own type definitions. They
//! consult a [`TypeRegistry`] that maps a [`RawType`] to its [`TypeDef`].
//! Array types are never registered; their shape is derived from the
//! component type (see [`hierarchy`]).

pub mod builtins;
mod hierarchy;

pub use hierarchy::{
    check_hierarchy, erasure, generic_supertype, interfaces, is_interface, is_subtype,
    superclass, type_def,
};

use crate::model::TypeDef;
use crate::types::RawType;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry that resolves raw types to their declared definitions.
///
/// Implementations must be shareable across threads: one registry usually
/// backs a scanner used from many callers.
pub trait TypeRegistry: Send + Sync {
    /// Look up a [`TypeDef`] by raw type.
    ///
    /// Returns `None` if the type is unknown.
    fn lookup(&self, raw: &RawType) -> Option<Arc<TypeDef>>;
}

/// Simple [`HashMap`]-backed [`TypeRegistry`].
///
/// Populate it up front, then share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct HashMapTypeRegistry {
    types: HashMap<RawType, Arc<TypeDef>>,
}

impl HashMapTypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `Object`, `void`, the scalars, `String` and
    /// the container hierarchy.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in builtins::definitions() {
            registry.register(def);
        }
        registry
    }

    /// Register a definition under its own raw type, replacing any previous one.
    pub fn register(&mut self, def: TypeDef) {
        self.types.insert(def.raw.clone(), Arc::new(def));
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for HashMapTypeRegistry {
    fn lookup(&self, raw: &RawType) -> Option<Arc<TypeDef>> {
        self.types.get(raw).cloned()
    }
}
