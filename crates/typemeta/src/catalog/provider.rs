// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default instances for abstract and concrete types.
//!
//! Used by navigators that create missing intermediate values on the way
//! down a property path.

use super::property::PropertyDescriptor;
use crate::error::{CatalogError, Result};
use crate::model::TypeKind;
use crate::object::DynamicObject;
use crate::registry::{builtins, TypeRegistry};
use crate::types::RawType;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Creates fresh values of a type.
pub trait InstanceProvider: Send + Sync {
    /// New instance of `ty`. `context` is the property the value is created
    /// for, when there is one.
    fn new_instance(
        &self,
        registry: &dyn TypeRegistry,
        ty: &RawType,
        context: Option<&PropertyDescriptor>,
    ) -> Result<Value>;
}

/// Maps container interfaces to concrete containers, then calls the
/// concrete type's factory. Classes without a factory become an empty
/// [`DynamicObject`].
#[derive(Debug, Clone)]
pub struct DefaultInstanceProvider {
    concrete: HashMap<RawType, RawType>,
}

impl DefaultInstanceProvider {
    #[must_use]
    pub fn new() -> Self {
        let concrete = [
            (builtins::COLLECTION, "Vec"),
            (builtins::LIST, "Vec"),
            (builtins::SET, "HashSet"),
            (builtins::MAP, "HashMap"),
            (builtins::QUEUE, "VecDeque"),
            (builtins::DEQUE, "VecDeque"),
            (builtins::SORTED_MAP, "BTreeMap"),
            (builtins::SORTED_SET, "BTreeSet"),
        ]
        .into_iter()
        .map(|(abstract_ty, concrete_ty)| (RawType::named(abstract_ty), RawType::named(concrete_ty)))
        .collect();
        Self { concrete }
    }

    /// Instantiate `concrete` whenever `abstract_ty` is requested.
    pub fn with_mapping(mut self, abstract_ty: impl Into<RawType>, concrete: impl Into<RawType>) -> Self {
        self.concrete.insert(abstract_ty.into(), concrete.into());
        self
    }

    /// Type actually instantiated for `ty`.
    pub fn concrete_for<'a>(&'a self, ty: &'a RawType) -> &'a RawType {
        self.concrete.get(ty).unwrap_or(ty)
    }
}

impl Default for DefaultInstanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceProvider for DefaultInstanceProvider {
    fn new_instance(
        &self,
        registry: &dyn TypeRegistry,
        ty: &RawType,
        _context: Option<&PropertyDescriptor>,
    ) -> Result<Value> {
        let concrete = self.concrete_for(ty);
        let def = registry.lookup(concrete).ok_or_else(|| CatalogError::Instantiation {
            ty: ty.clone(),
            reason: format!("`{}` is not registered", concrete),
        })?;

        if let Some(factory) = &def.factory {
            return Ok(factory());
        }
        match def.kind {
            TypeKind::Class => Ok(Value::Object(Arc::new(DynamicObject::new(concrete.clone())))),
            TypeKind::Interface => Err(CatalogError::Instantiation {
                ty: ty.clone(),
                reason: "no concrete type mapped for interface".to_string(),
            }),
            TypeKind::Tag | TypeKind::Primitive => Err(CatalogError::Instantiation {
                ty: ty.clone(),
                reason: "type has no factory".to_string(),
            }),
        }
    }
}
