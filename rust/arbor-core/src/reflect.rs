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

//! Mapping from Rust types to declared types.
//!
//! The `Describe` derive uses [`TypeOf`] to compute the declared type of
//! every member, so any Rust type used as a member must implement it.

use crate::meta::TypeDef;
use crate::types::{PrimitiveKind, TypeRef};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};

/// The declared type a Rust type stands for.
pub trait TypeOf {
    fn type_ref() -> TypeRef;

    /// Whether a member of this type may be absent. Only `Option` says yes.
    fn is_option() -> bool {
        false
    }
}

/// A Rust type that describes its own class or enum definition.
pub trait Describe: TypeOf {
    fn describe() -> TypeDef;
}

macro_rules! impl_type_of_primitive {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl TypeOf for $ty {
                #[inline(always)]
                fn type_ref() -> TypeRef {
                    TypeRef::Primitive(PrimitiveKind::$kind)
                }
            }
        )+
    };
}

impl_type_of_primitive!(
    bool => Bool,
    char => Char,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
);

impl<T: TypeOf> TypeOf for Option<T> {
    fn type_ref() -> TypeRef {
        T::type_ref()
    }

    fn is_option() -> bool {
        true
    }
}

impl<T: TypeOf> TypeOf for Vec<T> {
    fn type_ref() -> TypeRef {
        TypeRef::list_of(T::type_ref())
    }
}

impl<T: TypeOf, const N: usize> TypeOf for [T; N] {
    fn type_ref() -> TypeRef {
        TypeRef::array_of(T::type_ref())
    }
}

impl<T: TypeOf> TypeOf for Box<[T]> {
    fn type_ref() -> TypeRef {
        TypeRef::array_of(T::type_ref())
    }
}

impl<K: TypeOf, V: TypeOf> TypeOf for HashMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map_of(K::type_ref(), V::type_ref())
    }
}

impl<K: TypeOf, V: TypeOf> TypeOf for BTreeMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map_of(K::type_ref(), V::type_ref())
    }
}
