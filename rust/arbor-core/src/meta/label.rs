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

use crate::types::TypeRef;
use std::ops::Deref;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Attribute,
    Element,
    ElementList,
    ElementArray,
    ElementMap,
    Text,
    Union,
}

/// Node names of one class are unique within each namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Attribute,
    Element,
    Text,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Attribute => "attribute",
            Namespace::Element => "element",
            Namespace::Text => "text",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListLayout {
    pub entry: String,
    pub item: TypeRef,
    pub inline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayLayout {
    pub entry: String,
    pub component: TypeRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapLayout {
    pub entry: String,
    pub key: String,
    pub value: String,
    pub key_type: TypeRef,
    pub value_type: TypeRef,
    /// Key is an attribute of the entry node.
    pub attribute: bool,
    pub inline: bool,
    /// Value is the text of the entry node.
    pub value_text: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionLayout {
    pub candidates: Vec<(String, TypeRef)>,
    /// Items of an inline list rather than a single element.
    pub inline_list: bool,
}

/// Node shape of a label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Attribute,
    Element { class: Option<TypeRef> },
    ElementList(ListLayout),
    ElementArray(ArrayLayout),
    ElementMap(MapLayout),
    Text,
    Union(UnionLayout),
}

/// Maps one member to one node shape. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    member: String,
    node_name: String,
    required: bool,
    declared: TypeRef,
    shape: Shape,
}

impl Label {
    pub fn new(
        member: impl Into<String>,
        node_name: impl Into<String>,
        required: bool,
        declared: TypeRef,
        shape: Shape,
    ) -> Label {
        Label {
            member: member.into(),
            node_name: node_name.into(),
            required,
            declared,
            shape,
        }
    }

    #[inline(always)]
    pub fn member(&self) -> &str {
        &self.member
    }

    #[inline(always)]
    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    #[inline(always)]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline(always)]
    pub fn declared(&self) -> &TypeRef {
        &self.declared
    }

    #[inline(always)]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> LabelKind {
        match self.shape {
            Shape::Attribute => LabelKind::Attribute,
            Shape::Element { .. } => LabelKind::Element,
            Shape::ElementList(_) => LabelKind::ElementList,
            Shape::ElementArray(_) => LabelKind::ElementArray,
            Shape::ElementMap(_) => LabelKind::ElementMap,
            Shape::Text => LabelKind::Text,
            Shape::Union(_) => LabelKind::Union,
        }
    }

    pub fn namespace(&self) -> Namespace {
        match self.shape {
            Shape::Attribute => Namespace::Attribute,
            Shape::Text => Namespace::Text,
            _ => Namespace::Element,
        }
    }

    /// Whether the member's nodes sit directly under the owner without a wrapper.
    pub fn is_inline(&self) -> bool {
        match &self.shape {
            Shape::ElementList(layout) => layout.inline,
            Shape::ElementMap(layout) => layout.inline,
            Shape::Union(layout) => layout.inline_list,
            _ => false,
        }
    }

    fn answered_names(&self) -> Vec<String> {
        match &self.shape {
            Shape::Text => Vec::new(),
            Shape::ElementList(layout) if layout.inline => vec![layout.entry.clone()],
            Shape::ElementMap(layout) if layout.inline => vec![layout.entry.clone()],
            Shape::Union(layout) => layout
                .candidates
                .iter()
                .map(|(name, _)| name.clone())
                .collect(),
            _ => vec![self.node_name.clone()],
        }
    }
}

/// A label together with the node names it answers to, computed once.
#[derive(Debug)]
pub struct CacheLabel {
    label: Label,
    names: OnceLock<Vec<String>>,
}

impl CacheLabel {
    pub fn new(label: Label) -> CacheLabel {
        CacheLabel {
            label,
            names: OnceLock::new(),
        }
    }

    #[inline(always)]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Node names within the label's namespace this label reads and writes.
    pub fn names(&self) -> &[String] {
        self.names.get_or_init(|| self.label.answered_names())
    }

    pub fn answers_to(&self, name: &str) -> bool {
        self.names().iter().any(|n| n == name)
    }
}

impl Deref for CacheLabel {
    type Target = Label;

    fn deref(&self) -> &Label {
        &self.label
    }
}
