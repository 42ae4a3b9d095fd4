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

use crate::error::{Error, SchemaError};
use crate::meta::{ClassDef, EnumDef, TypeDef};
use crate::not_allowed;
use crate::types::{
    decapitalize, is_builtin_name, PrimitiveKind, TypeRef, ANY_NAME, ARRAY_SUFFIX, LIST_NAME,
    MAP_NAME,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Entry name used when the entry type has no name of its own.
pub const DEFAULT_ENTRY_NAME: &str = "entry";

/// TypeResolver is the registry of class and enum definitions, it takes the
/// place of host type loading.
#[derive(Clone, Debug, Default)]
pub struct TypeResolver {
    classes: HashMap<String, Arc<ClassDef>>,
    enums: HashMap<String, Arc<EnumDef>>,
}

impl TypeResolver {
    pub fn register(&mut self, def: TypeDef) -> Result<(), Error> {
        match def {
            TypeDef::Class(def) => self.register_class(def),
            TypeDef::Enum(def) => self.register_enum(def),
        }
    }

    pub fn register_class(&mut self, def: ClassDef) -> Result<(), Error> {
        self.check_name(&def.name)?;
        self.classes.insert(def.name.clone(), Arc::new(def));
        Ok(())
    }

    pub fn register_enum(&mut self, def: EnumDef) -> Result<(), Error> {
        self.check_name(&def.name)?;
        self.enums.insert(def.name.clone(), Arc::new(def));
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<(), Error> {
        if name.is_empty() {
            not_allowed!("type name must not be empty");
        }
        if is_builtin_name(name) {
            not_allowed!("type name '{}' is reserved for a built-in type", name);
        }
        if self.classes.contains_key(name) || self.enums.contains_key(name) {
            not_allowed!("type '{}' is already registered", name);
        }
        Ok(())
    }

    #[inline(always)]
    pub fn get_class(&self, name: &str) -> Option<&Arc<ClassDef>> {
        self.classes.get(name)
    }

    #[inline(always)]
    pub fn get_enum(&self, name: &str) -> Option<&Arc<EnumDef>> {
        self.enums.get(name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Checks that every class and enum a type mentions is registered, returning
    /// the reason when one is not.
    pub fn check_resolved(&self, ty: &TypeRef) -> Result<(), String> {
        let mut missing = None;
        ty.for_each_named(&mut |named| {
            if missing.is_some() {
                return;
            }
            match named {
                TypeRef::Class(name) if !self.classes.contains_key(name) => {
                    missing = Some(format!("class '{}' is not registered", name));
                }
                TypeRef::Enum(name) if !self.enums.contains_key(name) => {
                    missing = Some(format!("enum '{}' is not registered", name));
                }
                _ => {}
            }
        });
        match missing {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// The inheritance chain of `name`, most specialized first.
    pub fn hierarchy(&self, name: &str) -> Result<Vec<Arc<ClassDef>>, SchemaError> {
        let mut chain: Vec<Arc<ClassDef>> = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self
            .classes
            .get(name)
            .ok_or_else(|| SchemaError::UnresolvedType {
                class: name.to_string(),
                member: name.to_string(),
                reason: "class is not registered".to_string(),
            })?
            .clone();
        loop {
            seen.insert(current.name.clone());
            let parent = current.extends.clone();
            chain.push(current);
            let Some(parent) = parent else {
                return Ok(chain);
            };
            if seen.contains(&parent) {
                return Err(SchemaError::UnresolvedType {
                    class: name.to_string(),
                    member: parent,
                    reason: "inheritance chain is cyclic".to_string(),
                });
            }
            current = self
                .classes
                .get(&parent)
                .ok_or_else(|| SchemaError::UnresolvedType {
                    class: name.to_string(),
                    member: parent.clone(),
                    reason: "parent class is not registered".to_string(),
                })?
                .clone();
        }
    }

    /// Whether `class` is `ancestor` or extends it, directly or transitively.
    pub fn is_subclass(&self, class: &str, ancestor: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(class);
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            if !seen.insert(name) {
                return false;
            }
            current = self
                .classes
                .get(name)
                .and_then(|def| def.extends.as_deref());
        }
        false
    }

    /// Whether a value of type `actual` may be stored where `declared` is expected.
    pub fn is_assignable(&self, declared: &TypeRef, actual: &TypeRef) -> bool {
        match (declared, actual) {
            (TypeRef::Any, _) => true,
            (TypeRef::Class(d), TypeRef::Class(a)) => self.is_subclass(a, d),
            (TypeRef::Array(d), TypeRef::Array(a)) => self.is_assignable(d, a),
            (TypeRef::List(_), TypeRef::List(_)) => true,
            (TypeRef::Map(_, _), TypeRef::Map(_, _)) => true,
            _ => declared == actual,
        }
    }

    /// Resolves a type name as written in a document.
    pub fn resolve_name(&self, name: &str) -> Option<TypeRef> {
        if let Some(component) = name.strip_suffix(ARRAY_SUFFIX) {
            return self.resolve_name(component).map(TypeRef::array_of);
        }
        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Some(TypeRef::Primitive(kind));
        }
        match name {
            ANY_NAME => Some(TypeRef::Any),
            LIST_NAME => Some(TypeRef::list_of(TypeRef::Any)),
            MAP_NAME => Some(TypeRef::map_of(TypeRef::Any, TypeRef::Any)),
            _ if self.classes.contains_key(name) => Some(TypeRef::class(name)),
            _ if self.enums.contains_key(name) => Some(TypeRef::enumeration(name)),
            _ => None,
        }
    }

    /// Root node name of a class, taken from its own root tag only.
    pub fn root_name(&self, class: &str) -> String {
        self.classes
            .get(class)
            .and_then(|def| def.root.as_ref())
            .and_then(|root| root.name.clone())
            .unwrap_or_else(|| decapitalize(class))
    }

    /// Default node name for an entry of the given type.
    pub fn entry_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Class(name) => self.root_name(name),
            TypeRef::Primitive(kind) => kind.name().to_string(),
            _ => DEFAULT_ENTRY_NAME.to_string(),
        }
    }

    /// Node name of a value written without a label, such as the document root.
    pub fn node_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Class(name) => self.root_name(name),
            other => other.to_string(),
        }
    }
}
