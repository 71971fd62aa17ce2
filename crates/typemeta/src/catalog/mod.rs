// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type metadata catalog.
//!
//! [`TypeScanner`] turns a [`TypeDef`](crate::model::TypeDef) into a
//! [`TypeDescriptor`]: the readable and writable properties of the type,
//! their merged tags and their generic types, linked to the descriptor of
//! the superclass. Descriptors are memoized per raw type and shared.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use typemeta::catalog::TypeScanner;
//! use typemeta::model::TypeDefBuilder;
//! use typemeta::object::DynamicObject;
//! use typemeta::registry::HashMapTypeRegistry;
//!
//! let mut registry = HashMapTypeRegistry::with_builtins();
//! registry.register(
//!     TypeDefBuilder::class("Person")
//!         .bean_property("name", "String")
//!         .bean_property("age", "i32")
//!         .build(),
//! );
//! let scanner = TypeScanner::new(Arc::new(registry));
//!
//! let person = scanner.descriptor(&"Person".into()).unwrap();
//! let age = person.property("age").unwrap();
//!
//! let mut bob = DynamicObject::new("Person");
//! age.set(&mut bob, 42i32).unwrap();
//! assert_eq!(age.get::<i32>(&bob).unwrap(), 42);
//! ```

mod descriptor;
mod index;
pub mod naming;
mod policy;
mod property;
mod provider;
mod scanner;

#[cfg(test)]
mod tests;

pub use descriptor::TypeDescriptor;
pub use index::{CatalogIndex, IndexSpec, PropertyByTagIndex, PropertyByTypeIndex};
pub use policy::{DefaultScanPolicy, PredicatePolicy, ScanPolicy, ScannerConfig};
pub use property::PropertyDescriptor;
pub use provider::{DefaultInstanceProvider, InstanceProvider};
pub use scanner::TypeScanner;
