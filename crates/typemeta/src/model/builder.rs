// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDef.

use crate::catalog::naming;
use crate::model::def::{Factory, FieldDef, MethodBody, MethodDef, TypeDef, TypeKind, TypeParam};
use crate::model::tag::{Tag, TagTargets};
use crate::types::{RawType, TypeExpr};
use crate::value::Value;
use std::sync::Arc;

/// Builder for creating TypeDef instances.
pub struct TypeDefBuilder {
    raw: RawType,
    kind: TypeKind,
    type_params: Vec<TypeParam>,
    superclass: Option<TypeExpr>,
    interfaces: Vec<TypeExpr>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    tags: Vec<Tag>,
    targets: TagTargets,
    factory: Option<Factory>,
}

impl TypeDefBuilder {
    fn new(raw: RawType, kind: TypeKind) -> Self {
        Self {
            raw,
            kind,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            tags: Vec::new(),
            targets: TagTargets::empty(),
            factory: None,
        }
    }

    /// Start a class. Its superclass defaults to `Object`.
    pub fn class(name: impl Into<RawType>) -> Self {
        let raw = name.into();
        let mut builder = Self::new(raw.clone(), TypeKind::Class);
        if !raw.is_object() {
            builder.superclass = Some(TypeExpr::object());
        }
        builder
    }

    /// Start an interface.
    pub fn interface(name: impl Into<RawType>) -> Self {
        Self::new(name.into(), TypeKind::Interface)
    }

    /// Start a tag type applicable to `targets`.
    pub fn tag_type(name: impl Into<RawType>, targets: TagTargets) -> Self {
        let mut builder = Self::new(name.into(), TypeKind::Tag);
        builder.targets = targets;
        builder
    }

    /// Start a member-less scalar type.
    pub fn primitive(name: impl Into<RawType>) -> Self {
        Self::new(name.into(), TypeKind::Primitive)
    }

    /// Declare an unbounded type parameter.
    pub fn type_param(mut self, name: impl Into<Arc<str>>) -> Self {
        self.type_params.push(TypeParam::new(name));
        self
    }

    /// Declare a bounded type parameter.
    pub fn bounded_type_param(mut self, name: impl Into<Arc<str>>, bounds: Vec<TypeExpr>) -> Self {
        self.type_params.push(TypeParam::bounded(name, bounds));
        self
    }

    /// Set the generic superclass.
    pub fn extends(mut self, superclass: impl Into<TypeExpr>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Add a generic interface.
    pub fn implements(mut self, interface: impl Into<TypeExpr>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Attach a type-level tag (a meta-tag when building a tag type).
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Factory used by the default instance provider.
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Add a bean property stored in a [`DynamicObject`](crate::object::DynamicObject):
    /// a private field plus a public getter (`isX` for `bool`) and setter.
    pub fn bean_property(self, name: &str, ty: impl Into<TypeExpr>) -> Self {
        let ty = ty.into();
        let capitalized = naming::capitalize(name);
        let getter = if ty == TypeExpr::raw("bool") {
            format!("is{}", capitalized)
        } else {
            format!("get{}", capitalized)
        };
        self.field(FieldDef::stored(name, ty.clone()))
            .method(MethodDef::getter(
                getter,
                ty.clone(),
                MethodBody::read_stored(name),
            ))
            .method(MethodDef::setter(
                format!("set{}", capitalized),
                ty,
                MethodBody::write_stored(name),
            ))
    }

    /// Build the TypeDef, stamping the declaring type onto every member.
    pub fn build(self) -> TypeDef {
        let raw = self.raw;
        let fields = self
            .fields
            .into_iter()
            .map(|mut f| {
                f.declared_by = raw.clone();
                Arc::new(f)
            })
            .collect();
        let methods = self
            .methods
            .into_iter()
            .map(|mut m| {
                m.declared_by = raw.clone();
                Arc::new(m)
            })
            .collect();

        TypeDef {
            raw,
            kind: self.kind,
            type_params: self.type_params,
            superclass: self.superclass,
            interfaces: self.interfaces,
            fields,
            methods,
            tags: self.tags,
            targets: self.targets,
            factory: self.factory,
        }
    }
}
