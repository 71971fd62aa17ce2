// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name-keyed field storage for beans described only through a [`TypeDef`].
//!
//! [`FieldDef::stored`](crate::model::FieldDef::stored) wires a field slot to
//! an entry of a [`DynamicObject`], so a type can be declared and exercised
//! without a backing Rust struct.
//!
//! [`TypeDef`]: crate::model::TypeDef

use crate::error::CatalogError;
use crate::types::RawType;
use crate::value::{FromValue, Value};
use std::collections::HashMap;

/// Field store tagged with the raw type it is an instance of.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicObject {
    type_name: RawType,
    values: HashMap<String, Value>,
}

impl DynamicObject {
    /// Create an empty instance of `type_name`.
    pub fn new(type_name: impl Into<RawType>) -> Self {
        Self {
            type_name: type_name.into(),
            values: HashMap::new(),
        }
    }

    /// Builder-style initial value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn type_name(&self) -> &RawType {
        &self.type_name
    }

    /// Stored value, `Null` when never set.
    pub fn get(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Typed read of a stored value.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, CatalogError> {
        T::from_value(&self.get(name))
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Iterate over stored entries.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
