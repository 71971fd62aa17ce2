// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property discovery and the descriptor cache.
//!
//! A scan runs in two phases. The collect phase walks the declared methods
//! (accessors before mutators, sorted by property name) and then the
//! declared fields (sorted by name), building properties and gathering
//! mutator overloads. The finalize phase picks the canonical mutator of
//! every property, inherits the parent's remaining properties and builds
//! the scan-time indexes.
//!
//! Tag priority within a property is field > accessor > mutator: accessor
//! and field tags overwrite, mutator tags never replace an existing key.

use super::descriptor::TypeDescriptor;
use super::naming::{self, Role};
use super::policy::ScannerConfig;
use super::property::PropertyDescriptor;
use crate::cache::{ComputeCache, LookupStats};
use crate::error::Result;
use crate::merge::TagMergeCache;
use crate::model::{FieldDef, MethodDef, Tag, TypeDef, Visibility};
use crate::registry::{self, TypeRegistry};
use crate::types::RawType;
use crate::value::Value;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::sync::Arc;

/// Builds [`TypeDescriptor`]s and memoizes them per raw type.
///
/// One scanner holds one configuration; descriptors are computed at most
/// once per type and shared by every caller afterwards.
pub struct TypeScanner {
    registry: Arc<dyn TypeRegistry>,
    config: ScannerConfig,
    merge_cache: Arc<TagMergeCache>,
    descriptors: ComputeCache<RawType, Arc<TypeDescriptor>>,
}

impl TypeScanner {
    /// Scanner with the default configuration.
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self::with_config(registry, ScannerConfig::default())
    }

    pub fn with_config(registry: Arc<dyn TypeRegistry>, config: ScannerConfig) -> Self {
        Self {
            registry,
            config,
            merge_cache: Arc::new(TagMergeCache::new()),
            descriptors: ComputeCache::new(),
        }
    }

    /// Share tag closures with other scanners over the same registry.
    pub fn with_merge_cache(mut self, merge_cache: Arc<TagMergeCache>) -> Self {
        self.merge_cache = merge_cache;
        self
    }

    pub fn registry(&self) -> &dyn TypeRegistry {
        &*self.registry
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn merge_cache(&self) -> &Arc<TagMergeCache> {
        &self.merge_cache
    }

    /// Descriptor cache statistics.
    #[must_use]
    pub fn stats(&self) -> LookupStats {
        self.descriptors.stats()
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor of `raw`, scanning it and its ancestors on first request.
    pub fn descriptor(&self, raw: &RawType) -> Result<Arc<TypeDescriptor>> {
        if let Some(descriptor) = self.descriptors.get(raw) {
            return Ok(descriptor);
        }
        // A cycle would make the computation below wait on its own slot.
        registry::check_hierarchy(self.registry(), raw)?;

        self.descriptors.get_or_try_compute(raw, || {
            let def = registry::type_def(self.registry(), raw)?;
            let parent = match parent_type(self.registry(), &def) {
                Some(parent) => Some(self.descriptor(&parent)?),
                None => None,
            };
            log::debug!("[scanner] cache miss for {}", raw);
            self.scan(def, parent).map(Arc::new)
        })
    }

    /// Fresh descriptor of `raw`, scanning it and all its ancestors again.
    /// Nothing is read from or written to the cache.
    pub fn descriptor_uncached(&self, raw: &RawType) -> Result<TypeDescriptor> {
        registry::check_hierarchy(self.registry(), raw)?;
        self.scan_uncached(raw)
    }

    fn scan_uncached(&self, raw: &RawType) -> Result<TypeDescriptor> {
        let def = registry::type_def(self.registry(), raw)?;
        let parent = match parent_type(self.registry(), &def) {
            Some(parent) => Some(Arc::new(self.scan_uncached(&parent)?)),
            None => None,
        };
        self.scan(def, parent)
    }

    /// New instance of `ty` from the configured instance provider.
    pub fn new_instance(&self, ty: &RawType, context: Option<&PropertyDescriptor>) -> Result<Value> {
        self.config
            .instance_provider
            .new_instance(self.registry(), ty, context)
    }

    fn scan(&self, def: Arc<TypeDef>, parent: Option<Arc<TypeDescriptor>>) -> Result<TypeDescriptor> {
        let registry = self.registry();
        let raw = def.raw.clone();
        let parent = parent.filter(|p| self.config.policy.use_parent(p));
        let mut properties: IndexMap<Arc<str>, PropertyDescriptor> = IndexMap::new();

        for (name, role, method) in classified_methods(&def) {
            let property = match properties.entry(Arc::from(name)) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let inherited = parent.as_ref().and_then(|p| p.property(entry.key()));
                    let property = match inherited {
                        Some(inherited) => {
                            let mut copy = inherited.copy_for(&raw);
                            // Re-chosen below against this type's overloads.
                            copy.mutator = None;
                            copy
                        }
                        None => {
                            let seed = match role {
                                Role::Accessor => registry::erasure(registry, &method.returns),
                                Role::Mutator => registry::erasure(registry, &method.params[0]),
                            };
                            PropertyDescriptor::new(Arc::clone(entry.key()), seed, raw.clone())
                        }
                    };
                    entry.insert(property)
                }
            };

            match role {
                Role::Accessor => {
                    property.declared_type = registry::erasure(registry, &method.returns);
                    self.merge_tags(&mut property.tags, &method.tags, true)?;
                    property.accessor = Some(Arc::clone(method));
                }
                Role::Mutator => {
                    let key = registry::erasure(registry, &method.params[0]);
                    property.candidate_mutators.insert(key, Arc::clone(method));
                }
            }
        }

        let mut fields: Vec<&Arc<FieldDef>> = def.fields.iter().filter(|f| !f.is_static).collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        for field in fields {
            let field_type = registry::erasure(registry, &field.ty);
            if let Some(property) = properties.get_mut(&*field.name) {
                property.field = Some(Arc::clone(field));
                property.declared_type = field_type;
                self.merge_tags(&mut property.tags, &field.tags, true)?;
                continue;
            }
            if field.visibility != Visibility::Public {
                continue;
            }
            let mut property =
                PropertyDescriptor::new(Arc::clone(&field.name), field_type, raw.clone());
            property.field = Some(Arc::clone(field));
            self.merge_tags(&mut property.tags, &field.tags, true)?;
            if !self.config.policy.use_property(&property) {
                continue;
            }
            properties.insert(Arc::clone(&field.name), property);
        }

        for property in properties.values_mut() {
            if property.mutator.is_some() {
                continue;
            }
            if let Some(mutator) = canonical_mutator(registry, property) {
                self.merge_tags(&mut property.tags, &mutator.tags, false)?;
                property.mutator = Some(mutator);
            }
        }

        let mut finished: IndexMap<Arc<str>, Arc<PropertyDescriptor>> = properties
            .into_iter()
            .map(|(name, property)| (name, Arc::new(property)))
            .collect();
        if let Some(parent) = &parent {
            for inherited in parent.properties() {
                if finished.contains_key(inherited.name()) {
                    continue;
                }
                let property = if inherited.is_generic() {
                    Arc::new(inherited.copy_for(&raw))
                } else {
                    Arc::clone(inherited)
                };
                finished.insert(Arc::clone(&inherited.name), property);
            }
        }

        let descriptor = TypeDescriptor::new(def, parent, finished);
        for spec in &self.config.indexes {
            let index = spec.build(&descriptor)?;
            descriptor.insert_index(spec.type_id(), index);
        }

        log::debug!(
            "[scanner] scanned {} ({} properties, parent={})",
            raw,
            descriptor.len(),
            descriptor
                .parent()
                .map_or_else(|| "none".to_string(), |p| p.raw_type().to_string())
        );
        Ok(descriptor)
    }

    /// Merge `tags` and their meta-tag closures into `target`.
    fn merge_tags(&self, target: &mut IndexMap<RawType, Tag>, tags: &[Tag], overwrite: bool) -> Result<()> {
        for tag in tags {
            put_tag(target, tag.clone(), overwrite);
            let closure = self.merge_cache.closure_of(self.registry(), tag.tag_type())?;
            for candidate in closure.iter() {
                if self.config.policy.merge_tags(tag.tag_type(), candidate.tag_type()) {
                    put_tag(target, candidate.clone(), overwrite);
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for TypeScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeScanner")
            .field("config", &self.config)
            .field("descriptors", &self.descriptors.len())
            .finish_non_exhaustive()
    }
}

fn put_tag(target: &mut IndexMap<RawType, Tag>, tag: Tag, overwrite: bool) {
    if overwrite {
        target.insert(tag.tag_type().clone(), tag);
    } else {
        target.entry(tag.tag_type().clone()).or_insert(tag);
    }
}

/// Superclass whose descriptor becomes the parent. Interfaces and direct
/// subclasses of `Object` have none.
fn parent_type(registry: &dyn TypeRegistry, def: &TypeDef) -> Option<RawType> {
    if def.is_interface() {
        return None;
    }
    let superclass = registry::erasure(registry, def.superclass.as_ref()?);
    (!superclass.is_object()).then_some(superclass)
}

/// Public instance methods that follow the bean conventions, in scan order.
fn classified_methods(def: &TypeDef) -> Vec<(String, Role, &Arc<MethodDef>)> {
    let mut classified: Vec<_> = def
        .methods
        .iter()
        .filter(|m| m.visibility == Visibility::Public && !m.is_static)
        .filter_map(|m| naming::classify(m).map(|(name, role)| (name, role, m)))
        .collect();
    classified.sort_by_cached_key(|(name, role, m)| {
        let params: Vec<String> = m.params.iter().map(ToString::to_string).collect();
        (name.clone(), *role, Arc::clone(&m.name), params.join(","))
    });
    classified
}

/// Overload matching the field type, else the accessor type, else the only
/// candidate of a property with neither.
fn canonical_mutator(registry: &dyn TypeRegistry, property: &PropertyDescriptor) -> Option<Arc<MethodDef>> {
    let candidates = &property.candidate_mutators;
    if candidates.is_empty() {
        return None;
    }
    let by_field = property
        .field
        .as_ref()
        .and_then(|f| candidates.get(&registry::erasure(registry, &f.ty)));
    let by_accessor = || {
        property
            .accessor
            .as_ref()
            .and_then(|a| candidates.get(&registry::erasure(registry, &a.returns)))
    };
    let lone = || {
        let unanchored = property.field.is_none() && property.accessor.is_none();
        (unanchored && candidates.len() == 1)
            .then(|| candidates.values().next())
            .flatten()
    };
    by_field.or_else(by_accessor).or_else(lone).cloned()
}
