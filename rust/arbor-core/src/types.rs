// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;

/// Name used for [`TypeRef::Any`] in documents.
pub const ANY_NAME: &str = "object";
/// Name used for list values declared as [`TypeRef::Any`].
pub const LIST_NAME: &str = "list";
/// Name used for map values declared as [`TypeRef::Any`].
pub const MAP_NAME: &str = "map";
/// Suffix marking an array type name.
pub const ARRAY_SUFFIX: &str = "[]";

/// Scalar kinds that convert to and from a single text value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Date,
    DateTime,
}

pub static PRIMITIVE_KINDS: [PrimitiveKind; 11] = [
    PrimitiveKind::Bool,
    PrimitiveKind::Char,
    PrimitiveKind::Byte,
    PrimitiveKind::Short,
    PrimitiveKind::Int,
    PrimitiveKind::Long,
    PrimitiveKind::Float,
    PrimitiveKind::Double,
    PrimitiveKind::String,
    PrimitiveKind::Date,
    PrimitiveKind::DateTime,
];

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::String => "string",
            PrimitiveKind::Date => "date",
            PrimitiveKind::DateTime => "datetime",
        }
    }

    pub fn from_name(name: &str) -> Option<PrimitiveKind> {
        PRIMITIVE_KINDS.iter().copied().find(|k| k.name() == name)
    }
}

/// Declared or runtime type of a value.
///
/// Class and enum types are referenced by their registered name and resolved
/// through the [`TypeResolver`](crate::resolver::TypeResolver).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Any value, the concrete type must be named by the document.
    Any,
    Primitive(PrimitiveKind),
    Enum(String),
    Class(String),
    /// Fixed length array of the component type.
    Array(Box<TypeRef>),
    List(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    pub const BOOL: TypeRef = TypeRef::Primitive(PrimitiveKind::Bool);
    pub const CHAR: TypeRef = TypeRef::Primitive(PrimitiveKind::Char);
    pub const BYTE: TypeRef = TypeRef::Primitive(PrimitiveKind::Byte);
    pub const SHORT: TypeRef = TypeRef::Primitive(PrimitiveKind::Short);
    pub const INT: TypeRef = TypeRef::Primitive(PrimitiveKind::Int);
    pub const LONG: TypeRef = TypeRef::Primitive(PrimitiveKind::Long);
    pub const FLOAT: TypeRef = TypeRef::Primitive(PrimitiveKind::Float);
    pub const DOUBLE: TypeRef = TypeRef::Primitive(PrimitiveKind::Double);
    pub const STRING: TypeRef = TypeRef::Primitive(PrimitiveKind::String);
    pub const DATE: TypeRef = TypeRef::Primitive(PrimitiveKind::Date);
    pub const DATETIME: TypeRef = TypeRef::Primitive(PrimitiveKind::DateTime);

    pub fn class(name: impl Into<String>) -> TypeRef {
        TypeRef::Class(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> TypeRef {
        TypeRef::Enum(name.into())
    }

    pub fn array_of(component: TypeRef) -> TypeRef {
        TypeRef::Array(Box::new(component))
    }

    pub fn list_of(item: TypeRef) -> TypeRef {
        TypeRef::List(Box::new(item))
    }

    pub fn map_of(key: TypeRef, value: TypeRef) -> TypeRef {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    /// True for types whose values are a single text value.
    #[inline(always)]
    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeRef::Primitive(_) | TypeRef::Enum(_))
    }

    #[inline(always)]
    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(name) => Some(name),
            _ => None,
        }
    }

    pub fn component(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Whether a value of `actual` can stand for `self` without naming its type.
    ///
    /// Lists and maps carry no element type at runtime, so they only compare by shape.
    pub fn same_shape(&self, actual: &TypeRef) -> bool {
        match (self, actual) {
            (TypeRef::List(_), TypeRef::List(_)) => true,
            (TypeRef::Map(_, _), TypeRef::Map(_, _)) => true,
            _ => self == actual,
        }
    }

    /// Calls `f` for every class or enum name this type mentions.
    pub fn for_each_named(&self, f: &mut impl FnMut(&TypeRef)) {
        match self {
            TypeRef::Class(_) | TypeRef::Enum(_) => f(self),
            TypeRef::Array(inner) | TypeRef::List(inner) => inner.for_each_named(f),
            TypeRef::Map(key, value) => {
                key.for_each_named(f);
                value.for_each_named(f);
            }
            TypeRef::Any | TypeRef::Primitive(_) => {}
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Any => f.write_str(ANY_NAME),
            TypeRef::Primitive(kind) => f.write_str(kind.name()),
            TypeRef::Enum(name) | TypeRef::Class(name) => f.write_str(name),
            TypeRef::Array(component) => write!(f, "{}{}", component, ARRAY_SUFFIX),
            TypeRef::List(_) => f.write_str(LIST_NAME),
            TypeRef::Map(_, _) => f.write_str(MAP_NAME),
        }
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }
}

/// Names that may never be registered as a class or enum.
pub fn is_builtin_name(name: &str) -> bool {
    name == ANY_NAME
        || name == LIST_NAME
        || name == MAP_NAME
        || name.ends_with(ARRAY_SUFFIX)
        || PrimitiveKind::from_name(name).is_some()
}

/// Lowercases the first character, `PurchaseOrder` becomes `purchaseOrder`.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
