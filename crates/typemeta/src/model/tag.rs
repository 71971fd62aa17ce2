// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative tags and their applicability targets.

use crate::types::RawType;
use crate::value::Value;
use bitflags::bitflags;
use std::collections::BTreeMap;
use std::sync::Arc;

bitflags! {
    /// Declaration sites a tag type may be attached to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TagTargets: u16 {
        const FIELD = 1 << 0;
        const METHOD = 1 << 1;
        const TYPE = 1 << 2;
        /// Tag types themselves (meta-tagging).
        const TAG_TYPE = 1 << 3;
        const CONSTRUCTOR = 1 << 4;
        const PARAMETER = 1 << 5;
        const MODULE = 1 << 6;
        /// Targets relevant to property discovery.
        const MEMBER = Self::FIELD.bits() | Self::METHOD.bits() | Self::TYPE.bits();
    }
}

impl TagTargets {
    /// Whether a tag with these targets takes part in property discovery.
    pub fn is_member_applicable(self) -> bool {
        self.intersects(Self::MEMBER)
    }
}

/// An immutable tag instance: its tag type plus named attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    tag_type: RawType,
    attributes: BTreeMap<Arc<str>, Value>,
}

impl Tag {
    /// Tag of type `tag_type` without attributes.
    pub fn new(tag_type: impl Into<RawType>) -> Self {
        Self {
            tag_type: tag_type.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set an attribute.
    pub fn with(mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn tag_type(&self) -> &RawType {
        &self.tag_type
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (&**k, v))
    }
}
