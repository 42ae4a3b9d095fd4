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

//! Declarative metadata attached to members and classes.
//!
//! Member tags form the closed [`Tag`] enumeration, one variant per node
//! shape. Every tag struct is a small builder:
//!
//! ```rust
//! use arbor_core::meta::{Tag, ElementListTag};
//! use arbor_core::types::TypeRef;
//!
//! let tag: Tag = ElementListTag::new().entry("item").inline(true).into();
//! assert!(matches!(tag, Tag::ElementList(_)));
//! let tag: Tag = Tag::attribute().name("code").required(false).into();
//! assert!(!tag.is_required());
//! let tag: Tag = Tag::element().class(TypeRef::class("Circle")).into();
//! assert_eq!(tag.name(), None);
//! ```

use crate::object::{Heap, ObjectId};
use crate::types::TypeRef;
use std::fmt;
use std::sync::Arc;

macro_rules! tag_setters {
    () => {
        /// Node name, defaults to the member name.
        pub fn name(mut self, name: impl Into<String>) -> Self {
            self.name = Some(name.into());
            self
        }

        pub fn required(mut self, required: bool) -> Self {
            self.required = required;
            self
        }
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeTag {
    pub name: Option<String>,
    pub required: bool,
}

impl AttributeTag {
    pub fn new() -> Self {
        AttributeTag {
            name: None,
            required: true,
        }
    }

    tag_setters!();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementTag {
    pub name: Option<String>,
    pub required: bool,
    /// Concrete type written for the member instead of its declared type.
    pub class: Option<TypeRef>,
}

impl ElementTag {
    pub fn new() -> Self {
        ElementTag {
            name: None,
            required: true,
            class: None,
        }
    }

    tag_setters!();

    pub fn class(mut self, class: TypeRef) -> Self {
        self.class = Some(class);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementListTag {
    pub name: Option<String>,
    pub required: bool,
    pub entry: Option<String>,
    /// Item type for lists declared over `object`.
    pub entry_type: Option<TypeRef>,
    pub inline: bool,
}

impl ElementListTag {
    pub fn new() -> Self {
        ElementListTag {
            name: None,
            required: true,
            entry: None,
            entry_type: None,
            inline: false,
        }
    }

    tag_setters!();

    pub fn entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub fn entry_type(mut self, entry_type: TypeRef) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementArrayTag {
    pub name: Option<String>,
    pub required: bool,
    pub entry: Option<String>,
}

impl ElementArrayTag {
    pub fn new() -> Self {
        ElementArrayTag {
            name: None,
            required: true,
            entry: None,
        }
    }

    tag_setters!();

    pub fn entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementMapTag {
    pub name: Option<String>,
    pub required: bool,
    pub entry: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub key_type: Option<TypeRef>,
    pub value_type: Option<TypeRef>,
    /// Writes the key as an attribute of the entry node.
    pub attribute: bool,
    pub inline: bool,
}

impl ElementMapTag {
    pub fn new() -> Self {
        ElementMapTag {
            name: None,
            required: true,
            entry: None,
            key: None,
            value: None,
            key_type: None,
            value_type: None,
            attribute: false,
            inline: false,
        }
    }

    tag_setters!();

    pub fn entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn key_type(mut self, key_type: TypeRef) -> Self {
        self.key_type = Some(key_type);
        self
    }

    pub fn value_type(mut self, value_type: TypeRef) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn attribute(mut self, attribute: bool) -> Self {
        self.attribute = attribute;
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextTag {
    pub required: bool,
}

impl TextTag {
    pub fn new() -> Self {
        TextTag { required: true }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Candidate table of a union, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionTag {
    pub required: bool,
    pub candidates: Vec<(String, TypeRef)>,
}

impl UnionTag {
    pub fn new() -> Self {
        UnionTag {
            required: true,
            candidates: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn candidate(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.candidates.push((name.into(), ty));
        self
    }
}

/// Union over the items of an inline list, the entry name picks the item type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListUnionTag {
    pub required: bool,
    pub candidates: Vec<(String, TypeRef)>,
}

impl ListUnionTag {
    pub fn new() -> Self {
        ListUnionTag {
            required: true,
            candidates: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn candidate(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.candidates.push((name.into(), ty));
        self
    }
}

/// Member tags. The set is closed, each variant maps to exactly one label shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    Attribute(AttributeTag),
    Element(ElementTag),
    ElementList(ElementListTag),
    ElementArray(ElementArrayTag),
    ElementMap(ElementMapTag),
    ElementUnion(UnionTag),
    ElementListUnion(ListUnionTag),
    Text(TextTag),
}

impl Tag {
    pub fn attribute() -> AttributeTag {
        AttributeTag::new()
    }

    pub fn element() -> ElementTag {
        ElementTag::new()
    }

    pub fn element_list() -> ElementListTag {
        ElementListTag::new()
    }

    pub fn element_array() -> ElementArrayTag {
        ElementArrayTag::new()
    }

    pub fn element_map() -> ElementMapTag {
        ElementMapTag::new()
    }

    pub fn union() -> UnionTag {
        UnionTag::new()
    }

    pub fn list_union() -> ListUnionTag {
        ListUnionTag::new()
    }

    pub fn text() -> TextTag {
        TextTag::new()
    }

    /// Tag used when a default access policy covers an untagged member.
    pub fn for_type(declared: &TypeRef, required: bool) -> Tag {
        match declared {
            TypeRef::Array(_) => ElementArrayTag::new().required(required).into(),
            TypeRef::List(_) => ElementListTag::new().required(required).into(),
            TypeRef::Map(_, _) => ElementMapTag::new().required(required).into(),
            _ => ElementTag::new().required(required).into(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Tag::Attribute(t) => t.name.as_deref(),
            Tag::Element(t) => t.name.as_deref(),
            Tag::ElementList(t) => t.name.as_deref(),
            Tag::ElementArray(t) => t.name.as_deref(),
            Tag::ElementMap(t) => t.name.as_deref(),
            Tag::ElementUnion(_) | Tag::ElementListUnion(_) | Tag::Text(_) => None,
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Tag::Attribute(t) => t.required,
            Tag::Element(t) => t.required,
            Tag::ElementList(t) => t.required,
            Tag::ElementArray(t) => t.required,
            Tag::ElementMap(t) => t.required,
            Tag::ElementUnion(t) => t.required,
            Tag::ElementListUnion(t) => t.required,
            Tag::Text(t) => t.required,
        }
    }
}

macro_rules! impl_into_tag {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Tag {
                fn from(tag: $ty) -> Self {
                    Tag::$variant(tag)
                }
            }

            impl Default for $ty {
                fn default() -> Self {
                    $ty::new()
                }
            }
        )*
    };
}

impl_into_tag!(
    AttributeTag => Attribute,
    ElementTag => Element,
    ElementListTag => ElementList,
    ElementArrayTag => ElementArray,
    ElementMapTag => ElementMap,
    UnionTag => ElementUnion,
    ListUnionTag => ElementListUnion,
    TextTag => Text,
);

/// Root element settings of a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootTag {
    /// Root node name, never inherited.
    pub name: Option<String>,
    /// Whether undeclared nodes fail a read.
    pub strict: bool,
}

impl RootTag {
    pub fn new() -> Self {
        RootTag {
            name: None,
            strict: true,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for RootTag {
    fn default() -> Self {
        RootTag::new()
    }
}

/// Explicit ordering of element and attribute node names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderTag {
    pub elements: Vec<String>,
    pub attributes: Vec<String>,
}

impl OrderTag {
    pub fn new() -> Self {
        OrderTag::default()
    }

    pub fn elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = names.into_iter().map(Into::into).collect();
        self
    }
}

/// How a member is reached on the host type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DefaultAccess {
    #[default]
    Field,
    Property,
}

/// Tags every untagged member of the given access kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultTag {
    pub access: DefaultAccess,
    pub required: bool,
}

impl DefaultTag {
    pub fn new(access: DefaultAccess) -> Self {
        DefaultTag {
            access,
            required: true,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Hook run while an instance is written.
pub type WriteHook = Arc<dyn Fn(&Heap, ObjectId) -> anyhow::Result<()> + Send + Sync>;
/// Hook run once an instance has been read, it may adjust the instance in place.
pub type ReadHook = Arc<dyn Fn(&mut Heap, ObjectId) -> anyhow::Result<()> + Send + Sync>;

/// Lifecycle hooks of a class.
#[derive(Clone, Default)]
pub struct Lifecycle {
    /// Before an instance is written.
    pub persist: Option<WriteHook>,
    /// After an instance is written.
    pub complete: Option<WriteHook>,
    /// After an instance is read.
    pub validate: Option<ReadHook>,
    /// After `validate` succeeded.
    pub commit: Option<ReadHook>,
}

impl Lifecycle {
    pub fn is_empty(&self) -> bool {
        self.persist.is_none()
            && self.complete.is_none()
            && self.validate.is_none()
            && self.commit.is_none()
    }

    /// Fills every hook that is still unset from `parent`.
    pub fn inherit(&mut self, parent: &Lifecycle) {
        if self.persist.is_none() {
            self.persist = parent.persist.clone();
        }
        if self.complete.is_none() {
            self.complete = parent.complete.clone();
        }
        if self.validate.is_none() {
            self.validate = parent.validate.clone();
        }
        if self.commit.is_none() {
            self.commit = parent.commit.clone();
        }
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("persist", &self.persist.is_some())
            .field("complete", &self.complete.is_some())
            .field("validate", &self.validate.is_some())
            .field("commit", &self.commit.is_some())
            .finish()
    }
}
