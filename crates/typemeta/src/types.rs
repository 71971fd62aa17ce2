// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type expressions.
//!
//! [`RawType`] is the erased identity of a type. [`TypeExpr`] is the generic
//! form carried alongside it: a tree of raw types, type variables,
//! parameterized types, generic arrays and wildcards.
//!
//! Both compare and hash structurally, so two expressions that denote the same
//! construction are equal even when built independently. Constructors keep
//! expressions canonical:
//!
//! - an array whose component is a plain raw type is a raw array type
//!   (`String[]` is `Raw(Array(String))`, never `Array(Raw(String))`);
//! - `? extends Object` is the unbounded wildcard `?`.

use std::fmt;
use std::sync::Arc;

/// Name of the root type every other type is a subtype of.
pub const OBJECT: &str = "Object";
/// Name of the pseudo type returned by methods without a result.
pub const VOID: &str = "void";

/// Erased identity of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RawType {
    /// A declared type, identified by name.
    Named(Arc<str>),
    /// Array of a raw component type.
    Array(Arc<RawType>),
}

impl RawType {
    /// Named raw type.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Raw array type of `component`.
    pub fn array_of(component: RawType) -> Self {
        Self::Array(Arc::new(component))
    }

    pub fn object() -> Self {
        Self::named(OBJECT)
    }

    pub fn void() -> Self {
        Self::named(VOID)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Named(n) if &**n == OBJECT)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Named(n) if &**n == VOID)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Component type for arrays.
    pub fn component(&self) -> Option<&RawType> {
        match self {
            Self::Array(c) => Some(c),
            Self::Named(_) => None,
        }
    }

    /// Type name (`String[]` for arrays).
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => f.write_str(n),
            Self::Array(c) => write!(f, "{}[]", c),
        }
    }
}

impl From<&str> for RawType {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for RawType {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

/// Declaration site of a type variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericDeclaration {
    /// Declared by a generic type (`class Box<T>`).
    Type(RawType),
    /// Declared by a generic method (`<T> T pick()`); never bound by an owning type.
    Method { owner: RawType, method: Arc<str> },
}

/// Reference to a type parameter.
///
/// Identity is the declaration site plus the name. Bounds live on the
/// declaring [`TypeDef`](crate::model::TypeDef) or method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariable {
    pub name: Arc<str>,
    pub declared_by: GenericDeclaration,
}

impl TypeVariable {
    /// Variable declared by the type `owner`.
    pub fn of_type(name: impl Into<Arc<str>>, owner: impl Into<RawType>) -> Self {
        Self {
            name: name.into(),
            declared_by: GenericDeclaration::Type(owner.into()),
        }
    }

    /// Variable declared by method `method` of type `owner`.
    pub fn of_method(
        name: impl Into<Arc<str>>,
        owner: impl Into<RawType>,
        method: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_by: GenericDeclaration::Method {
                owner: owner.into(),
                method: method.into(),
            },
        }
    }

    /// Declaring type, if the variable is type-level.
    pub fn declaring_type(&self) -> Option<&RawType> {
        match &self.declared_by {
            GenericDeclaration::Type(raw) => Some(raw),
            GenericDeclaration::Method { .. } => None,
        }
    }
}

/// Wildcard bounds. Both absent means unbounded (`?`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Wildcard {
    pub lower: Option<Box<TypeExpr>>,
    pub upper: Option<Box<TypeExpr>>,
}

/// A possibly generic type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Raw(RawType),
    Variable(TypeVariable),
    Parameterized {
        owner: Option<Box<TypeExpr>>,
        raw: RawType,
        args: Vec<TypeExpr>,
    },
    /// Array with a generic component.
    Array(Box<TypeExpr>),
    Wildcard(Wildcard),
}

impl TypeExpr {
    pub fn raw(raw: impl Into<RawType>) -> Self {
        Self::Raw(raw.into())
    }

    pub fn object() -> Self {
        Self::Raw(RawType::object())
    }

    pub fn void() -> Self {
        Self::Raw(RawType::void())
    }

    /// Type-level variable reference.
    pub fn var(name: impl Into<Arc<str>>, owner: impl Into<RawType>) -> Self {
        Self::Variable(TypeVariable::of_type(name, owner))
    }

    /// Method-level variable reference.
    pub fn method_var(
        name: impl Into<Arc<str>>,
        owner: impl Into<RawType>,
        method: impl Into<Arc<str>>,
    ) -> Self {
        Self::Variable(TypeVariable::of_method(name, owner, method))
    }

    /// `raw<args..>` without an owner type.
    pub fn parameterized(raw: impl Into<RawType>, args: Vec<TypeExpr>) -> Self {
        Self::Parameterized {
            owner: None,
            raw: raw.into(),
            args,
        }
    }

    /// `owner.raw<args..>`.
    pub fn parameterized_with_owner(
        owner: Option<TypeExpr>,
        raw: impl Into<RawType>,
        args: Vec<TypeExpr>,
    ) -> Self {
        Self::Parameterized {
            owner: owner.map(Box::new),
            raw: raw.into(),
            args,
        }
    }

    /// Array of `component`, canonicalized to a raw array when possible.
    pub fn array_of(component: TypeExpr) -> Self {
        match component {
            Self::Raw(raw) => Self::Raw(RawType::array_of(raw)),
            other => Self::Array(Box::new(other)),
        }
    }

    /// `? extends upper`.
    pub fn subtype_of(upper: TypeExpr) -> Self {
        if matches!(&upper, Self::Raw(r) if r.is_object()) {
            return Self::unbounded();
        }
        Self::Wildcard(Wildcard {
            lower: None,
            upper: Some(Box::new(upper)),
        })
    }

    /// `? super lower`.
    pub fn supertype_of(lower: TypeExpr) -> Self {
        Self::Wildcard(Wildcard {
            lower: Some(Box::new(lower)),
            upper: None,
        })
    }

    /// `?`.
    pub fn unbounded() -> Self {
        Self::Wildcard(Wildcard {
            lower: None,
            upper: None,
        })
    }

    /// Raw type without consulting declarations.
    ///
    /// Variables and unbounded wildcards map to `Object`; use
    /// [`erasure`](crate::registry::erasure) for bound-aware erasure.
    pub fn raw_type(&self) -> RawType {
        match self {
            Self::Raw(raw) => raw.clone(),
            Self::Parameterized { raw, .. } => raw.clone(),
            Self::Array(component) => RawType::array_of(component.raw_type()),
            Self::Variable(_) => RawType::object(),
            Self::Wildcard(w) => w
                .upper
                .as_ref()
                .map_or_else(RawType::object, |upper| upper.raw_type()),
        }
    }

    /// Whether any type variable occurs in this expression.
    pub fn mentions_variables(&self) -> bool {
        match self {
            Self::Raw(_) => false,
            Self::Variable(_) => true,
            Self::Parameterized { owner, args, .. } => {
                owner.as_ref().is_some_and(|o| o.mentions_variables())
                    || args.iter().any(TypeExpr::mentions_variables)
            }
            Self::Array(component) => component.mentions_variables(),
            Self::Wildcard(w) => {
                w.lower.as_ref().is_some_and(|b| b.mentions_variables())
                    || w.upper.as_ref().is_some_and(|b| b.mentions_variables())
            }
        }
    }
}

impl From<RawType> for TypeExpr {
    fn from(raw: RawType) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for TypeExpr {
    fn from(name: &str) -> Self {
        Self::Raw(RawType::named(name))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(raw) => write!(f, "{}", raw),
            Self::Variable(v) => f.write_str(&v.name),
            Self::Parameterized { raw, args, .. } => {
                write!(f, "{}", raw)?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            Self::Array(component) => write!(f, "{}[]", component),
            Self::Wildcard(w) => match (&w.lower, &w.upper) {
                (Some(lower), _) => write!(f, "? super {}", lower),
                (None, Some(upper)) => write!(f, "? extends {}", upper),
                (None, None) => f.write_str("?"),
            },
        }
    }
}
