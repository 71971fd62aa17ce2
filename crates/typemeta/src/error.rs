// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for the catalog.
//!
//! Every failure is local to the call that raised it. The catalog performs no
//! I/O, so nothing here is transient and nothing is retried.

use crate::types::RawType;
use thiserror::Error;

/// Errors raised by the catalog, the resolution engine and property access.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// `get_value` on a property without accessor or accessible field.
    #[error("property `{property}` of `{owner}` is not readable")]
    NotReadable { owner: RawType, property: String },

    /// `set_value` on a property without mutator or accessible field.
    #[error("property `{property}` of `{owner}` is not writable")]
    NotWritable { owner: RawType, property: String },

    /// A property was requested with an expected type its declared type cannot satisfy.
    #[error("property `{property}` has type `{declared}` which is not assignable to `{expected}`")]
    NotAssignable {
        property: String,
        declared: RawType,
        expected: RawType,
    },

    /// A supertype view was requested for a type that is not an ancestor.
    #[error("`{target}` is not a supertype of `{context}`")]
    NotASupertype { target: RawType, context: String },

    /// A member was resolved against a context that does not inherit it.
    #[error("`{member}` is not defined by a supertype of `{context}`")]
    ForeignMember { member: String, context: String },

    #[error("unknown type `{0}`")]
    UnknownType(RawType),

    #[error("`{0}` is not a tag type")]
    NotATagType(RawType),

    /// Declarative metadata references itself through meta-tags.
    #[error("tag metadata cycle: {path}")]
    TagCycle { path: String },

    #[error("inheritance cycle through `{0}`")]
    InheritanceCycle(RawType),

    /// A pluggable index could not be constructed.
    #[error("cannot instantiate index `{index}`: {reason}")]
    IndexInstantiation { index: &'static str, reason: String },

    /// The instance provider could not construct a value.
    #[error("cannot instantiate `{ty}`: {reason}")]
    Instantiation { ty: RawType, reason: String },

    #[error("no property `{segment}` on `{owner}`")]
    UnresolvedPathSegment { owner: RawType, segment: String },

    #[error("property path is empty")]
    EmptyPath,

    /// An accessor closure received an instance of the wrong Rust type.
    #[error("instance is not a `{expected}`")]
    InstanceMismatch { expected: &'static str },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// The member exists but carries no callable body.
    #[error("`{member}` has no invocable body")]
    NotInvocable { member: String },

    #[error("type argument {index} out of range for `{ty}` ({count} arguments)")]
    TypeArgumentOutOfRange {
        ty: String,
        index: usize,
        count: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CatalogError>;
