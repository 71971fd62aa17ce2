// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared shape of a type: fields, methods, type parameters, supertypes.
//!
//! These definitions stand in for runtime reflection. Member bodies are
//! closures over `&dyn Any`, so the same definition works for user structs
//! (downcast) and for [`DynamicObject`] instances.

use crate::error::{CatalogError, Result};
use crate::model::tag::{Tag, TagTargets};
use crate::object::DynamicObject;
use crate::types::{RawType, TypeExpr};
use crate::value::Value;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// Reads a value out of an instance.
pub type ReadFn = Arc<dyn Fn(&dyn Any) -> Result<Value> + Send + Sync>;
/// Writes a value into an instance.
pub type WriteFn = Arc<dyn Fn(&mut dyn Any, Value) -> Result<()> + Send + Sync>;
/// Produces a fresh instance of a type.
pub type Factory = Arc<dyn Fn() -> Value + Send + Sync>;

fn downcast_ref<T: Any>(instance: &dyn Any) -> Result<&T> {
    instance
        .downcast_ref::<T>()
        .ok_or(CatalogError::InstanceMismatch {
            expected: type_name::<T>(),
        })
}

fn downcast_mut<T: Any>(instance: &mut dyn Any) -> Result<&mut T> {
    instance
        .downcast_mut::<T>()
        .ok_or(CatalogError::InstanceMismatch {
            expected: type_name::<T>(),
        })
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

/// Kind of declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    /// A declarative tag type.
    Tag,
    /// Scalar without members.
    Primitive,
}

/// Declared type parameter with its bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParam {
    pub name: Arc<str>,
    pub bounds: Vec<TypeExpr>,
}

impl TypeParam {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<Arc<str>>, bounds: Vec<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// Read/write functions of a field slot.
#[derive(Clone)]
pub struct FieldAccess {
    read: ReadFn,
    write: WriteFn,
}

impl FieldAccess {
    /// Field access on a concrete Rust type `T`.
    pub fn new<T, G, S>(get: G, set: S) -> Self
    where
        T: Any,
        G: Fn(&T) -> Value + Send + Sync + 'static,
        S: Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(move |instance| Ok(get(downcast_ref::<T>(instance)?))),
            write: Arc::new(move |instance, value| set(downcast_mut::<T>(instance)?, value)),
        }
    }

    /// Field access backed by the `name` entry of a [`DynamicObject`].
    pub fn stored(name: impl Into<Arc<str>>) -> Self {
        let key: Arc<str> = name.into();
        let write_key = Arc::clone(&key);
        Self {
            read: Arc::new(move |instance| Ok(downcast_ref::<DynamicObject>(instance)?.get(&key))),
            write: Arc::new(move |instance, value| {
                downcast_mut::<DynamicObject>(instance)?.set(&*write_key, value);
                Ok(())
            }),
        }
    }

    pub fn read(&self, instance: &dyn Any) -> Result<Value> {
        (self.read)(instance)
    }

    pub fn write(&self, instance: &mut dyn Any, value: Value) -> Result<()> {
        (self.write)(instance, value)
    }
}

impl fmt::Debug for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccess").finish_non_exhaustive()
    }
}

/// A declared field slot.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: Arc<str>,
    pub ty: TypeExpr,
    pub visibility: Visibility,
    pub is_static: bool,
    pub tags: Vec<Tag>,
    /// Stamped by [`TypeDefBuilder::build`](crate::model::TypeDefBuilder::build).
    pub declared_by: RawType,
    pub access: Option<FieldAccess>,
}

impl FieldDef {
    /// Private instance field without access functions.
    pub fn new(name: impl Into<Arc<str>>, ty: impl Into<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            visibility: Visibility::Private,
            is_static: false,
            tags: Vec::new(),
            declared_by: RawType::object(),
            access: None,
        }
    }

    /// Private field stored in a [`DynamicObject`] entry of the same name.
    pub fn stored(name: impl Into<Arc<str>>, ty: impl Into<TypeExpr>) -> Self {
        let name = name.into();
        let access = FieldAccess::stored(Arc::clone(&name));
        Self::new(name, ty).with_access(access)
    }

    pub fn public(self) -> Self {
        self.with_visibility(Visibility::Public)
    }

    pub fn protected(self) -> Self {
        self.with_visibility(Visibility::Protected)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_access(mut self, access: FieldAccess) -> Self {
        self.access = Some(access);
        self
    }

    /// Public or protected fields can back reads and writes.
    pub fn is_accessible(&self) -> bool {
        matches!(self.visibility, Visibility::Public | Visibility::Protected)
    }
}

/// Callable body of a method.
#[derive(Clone, Default)]
pub enum MethodBody {
    /// Declared for metadata only.
    #[default]
    Opaque,
    Read(ReadFn),
    Write(WriteFn),
}

impl MethodBody {
    /// Zero-argument body over a concrete Rust type `T`.
    pub fn read<T, F>(f: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self::Read(Arc::new(move |instance| Ok(f(downcast_ref::<T>(instance)?))))
    }

    /// Single-argument body over a concrete Rust type `T`.
    pub fn write<T, F>(f: F) -> Self
    where
        T: Any,
        F: Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
    {
        Self::Write(Arc::new(move |instance, value| {
            f(downcast_mut::<T>(instance)?, value)
        }))
    }

    /// Reads the `field` entry of a [`DynamicObject`].
    pub fn read_stored(field: impl Into<Arc<str>>) -> Self {
        let key: Arc<str> = field.into();
        Self::read(move |obj: &DynamicObject| obj.get(&key))
    }

    /// Writes the `field` entry of a [`DynamicObject`].
    pub fn write_stored(field: impl Into<Arc<str>>) -> Self {
        let key: Arc<str> = field.into();
        Self::write(move |obj: &mut DynamicObject, value| {
            obj.set(&*key, value);
            Ok(())
        })
    }
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opaque => f.write_str("Opaque"),
            Self::Read(_) => f.write_str("Read(..)"),
            Self::Write(_) => f.write_str("Write(..)"),
        }
    }
}

/// A declared method.
#[derive(Debug, Clone)]
pub struct MethodDef {
    pub name: Arc<str>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<TypeExpr>,
    pub returns: TypeExpr,
    pub exceptions: Vec<TypeExpr>,
    pub tags: Vec<Tag>,
    /// Stamped by [`TypeDefBuilder::build`](crate::model::TypeDefBuilder::build).
    pub declared_by: RawType,
    pub body: MethodBody,
}

impl MethodDef {
    /// Public, void, parameterless instance method.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            type_params: Vec::new(),
            params: Vec::new(),
            returns: TypeExpr::void(),
            exceptions: Vec::new(),
            tags: Vec::new(),
            declared_by: RawType::object(),
            body: MethodBody::Opaque,
        }
    }

    /// `returns name()`.
    pub fn getter(name: impl Into<Arc<str>>, returns: impl Into<TypeExpr>, body: MethodBody) -> Self {
        Self::new(name).returns(returns).body(body)
    }

    /// `void name(param)`.
    pub fn setter(name: impl Into<Arc<str>>, param: impl Into<TypeExpr>, body: MethodBody) -> Self {
        Self::new(name).param(param).body(body)
    }

    pub fn param(mut self, ty: impl Into<TypeExpr>) -> Self {
        self.params.push(ty.into());
        self
    }

    pub fn returns(mut self, ty: impl Into<TypeExpr>) -> Self {
        self.returns = ty.into();
        self
    }

    pub fn throws(mut self, ty: impl Into<TypeExpr>) -> Self {
        self.exceptions.push(ty.into());
        self
    }

    pub fn type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn body(mut self, body: MethodBody) -> Self {
        self.body = body;
        self
    }

    pub fn is_void(&self) -> bool {
        matches!(&self.returns, TypeExpr::Raw(raw) if raw.is_void())
    }

    /// `Owner.name(A, B)`, used in diagnostics.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        format!("{}.{}({})", self.declared_by, self.name, params.join(", "))
    }

    /// Invoke a read body.
    pub fn invoke_read(&self, instance: &dyn Any) -> Result<Value> {
        match &self.body {
            MethodBody::Read(f) => f(instance),
            _ => Err(CatalogError::NotInvocable {
                member: self.signature(),
            }),
        }
    }

    /// Invoke a write body.
    pub fn invoke_write(&self, instance: &mut dyn Any, value: Value) -> Result<()> {
        match &self.body {
            MethodBody::Write(f) => f(instance, value),
            _ => Err(CatalogError::NotInvocable {
                member: self.signature(),
            }),
        }
    }
}

/// A declared type.
#[derive(Clone)]
pub struct TypeDef {
    pub raw: RawType,
    pub kind: TypeKind,
    pub type_params: Vec<TypeParam>,
    /// Generic superclass; `None` for roots and interfaces.
    pub superclass: Option<TypeExpr>,
    pub interfaces: Vec<TypeExpr>,
    pub fields: Vec<Arc<FieldDef>>,
    pub methods: Vec<Arc<MethodDef>>,
    /// Type-level tags; meta-tags when `kind` is [`TypeKind::Tag`].
    pub tags: Vec<Tag>,
    /// Applicability of a tag type.
    pub targets: TagTargets,
    pub factory: Option<Factory>,
}

impl TypeDef {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_tag(&self) -> bool {
        self.kind == TypeKind::Tag
    }

    pub fn field(&self, name: &str) -> Option<&Arc<FieldDef>> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<MethodDef>> {
        self.methods.iter().filter(move |m| &*m.name == name)
    }

    /// Position of a type parameter by name.
    pub fn type_param_index(&self, name: &str) -> Option<usize> {
        self.type_params.iter().position(|p| &*p.name == name)
    }

    /// Type-level tag by tag type.
    pub fn tag(&self, tag_type: &RawType) -> Option<&Tag> {
        self.tags.iter().find(|t| t.tag_type() == tag_type)
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("raw", &self.raw)
            .field("kind", &self.kind)
            .field("type_params", &self.type_params)
            .field("superclass", &self.superclass)
            .field("interfaces", &self.interfaces)
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
    }

    #[test]
    fn test_field_access_downcasts() {
        let access = FieldAccess::new(
            |p: &Point| Value::from(p.x),
            |p: &mut Point, v| {
                p.x = v.as_i32().unwrap_or_default();
                Ok(())
            },
        );
        let mut point = Point { x: 1 };
        access.write(&mut point, Value::from(5i32)).unwrap();
        assert_eq!(access.read(&point).unwrap(), Value::from(5i32));

        let err = access.read(&"not a point").unwrap_err();
        assert!(matches!(err, CatalogError::InstanceMismatch { .. }));
    }

    #[test]
    fn test_opaque_method_not_invocable() {
        let m = MethodDef::getter("getX", "i32", MethodBody::Opaque);
        let err = m.invoke_read(&Point { x: 0 }).unwrap_err();
        assert!(matches!(err, CatalogError::NotInvocable { .. }));
        assert!(!m.is_void());
        assert!(MethodDef::new("run").is_void());
    }

    #[test]
    fn test_field_accessibility() {
        assert!(!FieldDef::new("a", "i32").is_accessible());
        assert!(FieldDef::new("a", "i32").public().is_accessible());
        assert!(FieldDef::new("a", "i32").protected().is_accessible());
        assert!(!FieldDef::new("a", "i32")
            .with_visibility(Visibility::Package)
            .is_accessible());
    }
}
