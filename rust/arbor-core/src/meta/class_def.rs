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

use crate::meta::tag::{DefaultAccess, DefaultTag, Lifecycle, OrderTag, RootTag, Tag};
use crate::object::{Heap, ObjectId};
use crate::types::TypeRef;
use std::sync::Arc;

/// A member of a class as declared on the host type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberDef {
    pub name: String,
    pub declared: TypeRef,
    pub tag: Option<Tag>,
    pub access: DefaultAccess,
    /// Can only be populated through a constructor.
    pub read_only: bool,
    /// Never mapped, even under a default access policy.
    pub transient: bool,
}

impl MemberDef {
    pub fn new(name: impl Into<String>, declared: TypeRef) -> Self {
        MemberDef {
            name: name.into(),
            declared,
            tag: None,
            access: DefaultAccess::Field,
            read_only: false,
            transient: false,
        }
    }

    pub fn tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn access(mut self, access: DefaultAccess) -> Self {
        self.access = access;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn transient(mut self, transient: bool) -> Self {
        self.transient = transient;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDef {
    pub name: String,
    pub declared: TypeRef,
    pub tag: Option<Tag>,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, declared: TypeRef) -> Self {
        ParamDef {
            name: name.into(),
            declared,
            tag: None,
        }
    }

    pub fn tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstructorDef {
    pub params: Vec<ParamDef>,
}

impl ConstructorDef {
    /// The zero parameter constructor.
    pub fn new() -> Self {
        ConstructorDef::default()
    }

    pub fn param(mut self, param: ParamDef) -> Self {
        self.params.push(param);
        self
    }

    pub fn is_default(&self) -> bool {
        self.params.is_empty()
    }

    /// Only constructors whose parameters are all tagged are considered.
    pub fn is_tagged(&self) -> bool {
        self.params.iter().all(|p| p.tag.is_some())
    }
}

/// Definition of a class registered with the
/// [`TypeResolver`](crate::resolver::TypeResolver).
///
/// ```rust
/// use arbor_core::meta::{ClassDef, ConstructorDef, MemberDef, ParamDef, Tag};
/// use arbor_core::types::TypeRef;
///
/// let point = ClassDef::new("Point")
///     .member(MemberDef::new("x", TypeRef::INT).tag(Tag::attribute()).read_only(true))
///     .member(MemberDef::new("y", TypeRef::INT).tag(Tag::attribute()).read_only(true))
///     .constructor(
///         ConstructorDef::new()
///             .param(ParamDef::new("x", TypeRef::INT).tag(Tag::attribute()))
///             .param(ParamDef::new("y", TypeRef::INT).tag(Tag::attribute())),
///     );
/// assert_eq!(point.members.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: String,
    pub extends: Option<String>,
    pub is_abstract: bool,
    pub root: Option<RootTag>,
    pub order: Option<OrderTag>,
    pub default: Option<DefaultTag>,
    pub members: Vec<MemberDef>,
    pub constructors: Vec<ConstructorDef>,
    pub lifecycle: Lifecycle,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDef {
            name: name.into(),
            extends: None,
            is_abstract: false,
            root: None,
            order: None,
            default: None,
            members: Vec::new(),
            constructors: Vec::new(),
            lifecycle: Lifecycle::default(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn abstract_class(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn root(mut self, root: RootTag) -> Self {
        self.root = Some(root);
        self
    }

    pub fn order(mut self, order: OrderTag) -> Self {
        self.order = Some(order);
        self
    }

    pub fn default_access(mut self, default: DefaultTag) -> Self {
        self.default = Some(default);
        self
    }

    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn constructor(mut self, constructor: ConstructorDef) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn persist<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Heap, ObjectId) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.lifecycle.persist = Some(Arc::new(hook));
        self
    }

    pub fn complete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Heap, ObjectId) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.lifecycle.complete = Some(Arc::new(hook));
        self
    }

    pub fn validate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Heap, ObjectId) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.lifecycle.validate = Some(Arc::new(hook));
        self
    }

    pub fn commit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Heap, ObjectId) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.lifecycle.commit = Some(Arc::new(hook));
        self
    }

    pub fn find_member(&self, name: &str) -> Option<&MemberDef> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        EnumDef {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variants.push(variant.into());
        self
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }
}

/// A registrable type definition.
#[derive(Clone, Debug)]
pub enum TypeDef {
    Class(ClassDef),
    Enum(EnumDef),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Class(c) => &c.name,
            TypeDef::Enum(e) => &e.name,
        }
    }
}

impl From<ClassDef> for TypeDef {
    fn from(def: ClassDef) -> Self {
        TypeDef::Class(def)
    }
}

impl From<EnumDef> for TypeDef {
    fn from(def: EnumDef) -> Self {
        TypeDef::Enum(def)
    }
}
