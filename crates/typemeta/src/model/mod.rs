// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative type model.
//!
//! Types are described up front through [`TypeDefBuilder`] and registered in a
//! [`TypeRegistry`](crate::registry::TypeRegistry). The scanner and the
//! resolution engine only ever look at these definitions.
//!
//! # Example
//!
//! ```
//! use typemeta::model::{FieldDef, Tag, TagTargets, TypeDefBuilder};
//!
//! let column = TypeDefBuilder::tag_type("Column", TagTargets::FIELD | TagTargets::METHOD).build();
//! let person = TypeDefBuilder::class("Person")
//!     .bean_property("name", "String")
//!     .field(FieldDef::stored("id", "i64").public().tag(Tag::new("Column").with("name", "ID")))
//!     .build();
//!
//! assert!(column.is_tag());
//! assert_eq!(person.fields.len(), 2);
//! ```

mod builder;
mod def;
mod tag;

pub use builder::TypeDefBuilder;
pub use def::{
    Factory, FieldAccess, FieldDef, MethodBody, MethodDef, ReadFn, TypeDef, TypeKind, TypeParam,
    Visibility, WriteFn,
};
pub use tag::{Tag, TagTargets};
