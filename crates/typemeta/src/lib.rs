// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # typemeta - Runtime type metadata catalog
//!
//! Structural metadata for declared types: which properties a type exposes,
//! which tags they carry once meta-tags are merged in, and what their generic
//! types are once the type variables of the declaring type are bound.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use typemeta::{HashMapTypeRegistry, Result, Tag, TagTargets, TypeDefBuilder, TypeScanner};
//!
//! fn main() -> Result<()> {
//!     let mut registry = HashMapTypeRegistry::with_builtins();
//!     registry.register(TypeDefBuilder::tag_type("Column", TagTargets::FIELD).build());
//!     registry.register(
//!         TypeDefBuilder::class("Order")
//!             .bean_property("total", "f64")
//!             .field(typemeta::FieldDef::stored("ref", "String").public().tag(Tag::new("Column")))
//!             .build(),
//!     );
//!
//!     let scanner = TypeScanner::new(Arc::new(registry));
//!     let order = scanner.descriptor(&"Order".into())?;
//!     let total = order.property("total").expect("declared above");
//!     assert!(total.is_readable() && total.is_writable());
//!     assert!(order.property("ref").is_some_and(|p| p.has_tag(&"Column".into())));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  TypeScanner  -> TypeDescriptor -> PropertyDescriptor               |
//! |      |              | indexes        | get/set, resolved_type       |
//! +------|--------------|----------------|------------------------------+
//! |  TagMergeCache   ComputeCache     TypeInfo (generic resolution)     |
//! +---------------------------------------------------------------------+
//! |  TypeRegistry: TypeDef / FieldDef / MethodDef / Tag / TypeExpr      |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`model`] - declared types, members and tags
//! - [`registry`] - type lookup, builtins and hierarchy queries
//! - [`catalog`] - scanner, descriptors, policies and indexes
//! - [`generics`] - type variable resolution
//! - [`merge`] - meta-tag closures
//! - [`cache`] - concurrent compute-once cache

pub mod cache;
pub mod catalog;
pub mod error;
pub mod generics;
pub mod merge;
pub mod model;
pub mod object;
pub mod registry;
pub mod types;
pub mod value;

pub use catalog::{
    CatalogIndex, DefaultInstanceProvider, DefaultScanPolicy, IndexSpec, InstanceProvider,
    PredicatePolicy, PropertyByTagIndex, PropertyByTypeIndex, PropertyDescriptor, ScanPolicy,
    ScannerConfig, TypeDescriptor, TypeScanner,
};
pub use error::{CatalogError, Result};
pub use generics::TypeInfo;
pub use merge::TagMergeCache;
pub use model::{
    FieldAccess, FieldDef, MethodBody, MethodDef, Tag, TagTargets, TypeDef, TypeDefBuilder,
    TypeKind, TypeParam, Visibility,
};
pub use object::DynamicObject;
pub use registry::{HashMapTypeRegistry, TypeRegistry};
pub use types::{RawType, TypeExpr, TypeVariable, Wildcard};
pub use value::{FromValue, IntoValue, Value};
