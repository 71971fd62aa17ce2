// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Meta-tag closures.
//!
//! A tag type may itself carry tags. When a member is tagged with `T`, every
//! applicable tag reachable from `T` through such meta-tags is merged into the
//! member's tag set as well. Applicable means the meta-tag's own tag type
//! targets fields, methods or types.
//!
//! Closures depend only on the type universe, so they are computed once per
//! tag type and never invalidated.

use crate::cache::{ComputeCache, LookupStats};
use crate::error::{CatalogError, Result};
use crate::model::Tag;
use crate::registry::{self, TypeRegistry};
use crate::types::RawType;
use std::collections::HashSet;
use std::sync::Arc;

/// Memoized tag type → transitive applicable meta-tags.
#[derive(Default)]
pub struct TagMergeCache {
    closures: ComputeCache<RawType, Arc<[Tag]>>,
}

impl TagMergeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitive applicable meta-tags of `tag_type`, deepest first.
    ///
    /// Fails with [`CatalogError::UnknownType`] or
    /// [`CatalogError::NotATagType`] for bad input and with
    /// [`CatalogError::TagCycle`] when meta-tags reference themselves.
    pub fn closure_of(&self, registry: &dyn TypeRegistry, tag_type: &RawType) -> Result<Arc<[Tag]>> {
        if let Some(closure) = self.closures.get(tag_type) {
            return Ok(closure);
        }
        let def = registry::type_def(registry, tag_type)?;
        if !def.is_tag() {
            return Err(CatalogError::NotATagType(tag_type.clone()));
        }
        check_acyclic(registry, tag_type)?;

        self.closures.get_or_try_compute(tag_type, || {
            let mut closure: Vec<Tag> = Vec::new();
            for meta in def.tags.iter().filter(|t| is_applicable(registry, t.tag_type())) {
                for inherited in self.closure_of(registry, meta.tag_type())?.iter() {
                    push_unique(&mut closure, inherited.clone());
                }
                push_unique(&mut closure, meta.clone());
            }
            log::trace!(
                "[tag-merge] closure of {} has {} tag(s)",
                tag_type,
                closure.len()
            );
            Ok::<_, CatalogError>(closure.into())
        })
    }

    /// Number of memoized closures.
    pub fn len(&self) -> usize {
        self.closures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        self.closures.stats()
    }
}

/// Whether tags of `tag_type` take part in property discovery.
///
/// Unknown types and non-tag types are not applicable.
pub fn is_applicable(registry: &dyn TypeRegistry, tag_type: &RawType) -> bool {
    registry
        .lookup(tag_type)
        .is_some_and(|def| def.is_tag() && def.targets.is_member_applicable())
}

fn push_unique(closure: &mut Vec<Tag>, tag: Tag) {
    if !closure.contains(&tag) {
        closure.push(tag);
    }
}

/// Depth-first walk over applicable meta-tag edges from `root`.
fn check_acyclic(registry: &dyn TypeRegistry, root: &RawType) -> Result<()> {
    fn visit(
        registry: &dyn TypeRegistry,
        current: &RawType,
        path: &mut Vec<RawType>,
        done: &mut HashSet<RawType>,
    ) -> Result<()> {
        if let Some(start) = path.iter().position(|p| p == current) {
            let mut cycle: Vec<String> = path[start..].iter().map(ToString::to_string).collect();
            cycle.push(current.to_string());
            return Err(CatalogError::TagCycle {
                path: cycle.join(" -> "),
            });
        }
        if done.contains(current) {
            return Ok(());
        }
        let Some(def) = registry.lookup(current) else {
            return Ok(());
        };
        path.push(current.clone());
        for meta in def.tags.iter().filter(|t| is_applicable(registry, t.tag_type())) {
            visit(registry, meta.tag_type(), path, done)?;
        }
        path.pop();
        done.insert(current.clone());
        Ok(())
    }

    visit(registry, root, &mut Vec::new(), &mut HashSet::new())
}
