// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic type resolution.
//!
//! [`TypeInfo`] binds type variables of a generic declaration to the type
//! arguments supplied somewhere along a concrete type's supertype chain.
//!
//! ```
//! use typemeta::generics::TypeInfo;
//! use typemeta::registry::HashMapTypeRegistry;
//! use typemeta::types::{RawType, TypeExpr};
//!
//! let registry = HashMapTypeRegistry::with_builtins();
//! let strings = TypeInfo::for_type(TypeExpr::parameterized("Vec", vec![TypeExpr::raw("String")]));
//! let iterable = strings.supertype(&registry, &RawType::named("Iterable")).unwrap();
//! assert_eq!(iterable.to_string(), "Iterable<String>");
//! ```

mod type_info;

pub use type_info::TypeInfo;
