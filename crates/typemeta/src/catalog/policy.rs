// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scanner configuration.

use super::descriptor::TypeDescriptor;
use super::index::{CatalogIndex, IndexSpec};
use super::property::PropertyDescriptor;
use super::provider::{DefaultInstanceProvider, InstanceProvider};
use crate::types::RawType;
use std::fmt;
use std::sync::Arc;

/// Decisions the scanner delegates to the caller.
pub trait ScanPolicy: Send + Sync {
    /// Admit a property discovered from a public field alone.
    fn use_property(&self, _property: &PropertyDescriptor) -> bool {
        true
    }

    /// Inherit properties from `parent`. Returning `false` detaches the parent.
    fn use_parent(&self, _parent: &TypeDescriptor) -> bool {
        true
    }

    /// Merge `candidate`, reached through the meta-tags of `tagged`.
    fn merge_tags(&self, _tagged: &RawType, _candidate: &RawType) -> bool {
        true
    }
}

/// Accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultScanPolicy;

impl ScanPolicy for DefaultScanPolicy {}

type PropertyFilter = Box<dyn Fn(&PropertyDescriptor) -> bool + Send + Sync>;
type ParentFilter = Box<dyn Fn(&TypeDescriptor) -> bool + Send + Sync>;
type TagFilter = Box<dyn Fn(&RawType, &RawType) -> bool + Send + Sync>;

/// Policy assembled from closures. Unset predicates accept everything.
///
/// ```
/// use typemeta::catalog::PredicatePolicy;
///
/// let policy = PredicatePolicy::new()
///     .with_property_filter(|p| !p.name().starts_with('_'))
///     .with_tag_filter(|_, candidate| candidate.name() != "Internal");
/// ```
#[derive(Default)]
pub struct PredicatePolicy {
    property: Option<PropertyFilter>,
    parent: Option<ParentFilter>,
    tags: Option<TagFilter>,
}

impl PredicatePolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&PropertyDescriptor) -> bool + Send + Sync + 'static,
    {
        self.property = Some(Box::new(filter));
        self
    }

    pub fn with_parent_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.parent = Some(Box::new(filter));
        self
    }

    pub fn with_tag_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&RawType, &RawType) -> bool + Send + Sync + 'static,
    {
        self.tags = Some(Box::new(filter));
        self
    }
}

impl ScanPolicy for PredicatePolicy {
    fn use_property(&self, property: &PropertyDescriptor) -> bool {
        self.property.as_ref().map_or(true, |f| f(property))
    }

    fn use_parent(&self, parent: &TypeDescriptor) -> bool {
        self.parent.as_ref().map_or(true, |f| f(parent))
    }

    fn merge_tags(&self, tagged: &RawType, candidate: &RawType) -> bool {
        self.tags.as_ref().map_or(true, |f| f(tagged, candidate))
    }
}

/// Everything a [`TypeScanner`](super::TypeScanner) is configured with.
#[derive(Clone)]
pub struct ScannerConfig {
    pub policy: Arc<dyn ScanPolicy>,
    pub instance_provider: Arc<dyn InstanceProvider>,
    /// Index kinds built while scanning, in registration order.
    pub indexes: Vec<IndexSpec>,
}

impl ScannerConfig {
    pub fn with_policy(mut self, policy: impl ScanPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn with_instance_provider(mut self, provider: impl InstanceProvider + 'static) -> Self {
        self.instance_provider = Arc::new(provider);
        self
    }

    /// Build index kind `I` for every scanned type.
    pub fn with_index<I: CatalogIndex>(mut self) -> Self {
        let spec = IndexSpec::of::<I>();
        if !self.indexes.iter().any(|s| s.type_id() == spec.type_id()) {
            self.indexes.push(spec);
        }
        self
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            policy: Arc::new(DefaultScanPolicy),
            instance_provider: Arc::new(DefaultInstanceProvider::new()),
            indexes: Vec::new(),
        }
    }
}

impl fmt::Debug for ScannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannerConfig")
            .field("indexes", &self.indexes)
            .finish_non_exhaustive()
    }
}
