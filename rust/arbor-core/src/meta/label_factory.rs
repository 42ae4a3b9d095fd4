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

use crate::error::SchemaError;
use crate::meta::label::{
    ArrayLayout, CacheLabel, Label, LabelKind, ListLayout, MapLayout, Shape, UnionLayout,
};
use crate::meta::tag::Tag;
use crate::resolver::type_resolver::{TypeResolver, DEFAULT_ENTRY_NAME};
use crate::types::TypeRef;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub const DEFAULT_KEY_NAME: &str = "key";
pub const DEFAULT_VALUE_NAME: &str = "value";

/// Builds labels from tags.
pub struct LabelFactory<'a> {
    resolver: &'a TypeResolver,
}

impl<'a> LabelFactory<'a> {
    pub fn new(resolver: &'a TypeResolver) -> Self {
        LabelFactory { resolver }
    }

    /// The label kind a tag produces.
    pub fn kind_of(tag: &Tag) -> LabelKind {
        match tag {
            Tag::Attribute(_) => LabelKind::Attribute,
            Tag::Element(_) => LabelKind::Element,
            Tag::ElementList(_) => LabelKind::ElementList,
            Tag::ElementArray(_) => LabelKind::ElementArray,
            Tag::ElementMap(_) => LabelKind::ElementMap,
            Tag::ElementUnion(_) | Tag::ElementListUnion(_) => LabelKind::Union,
            Tag::Text(_) => LabelKind::Text,
        }
    }

    /// Builds the label of `member`, declared as `declared` in `class`.
    pub fn build(
        &self,
        class: &str,
        member: &str,
        declared: &TypeRef,
        tag: &Tag,
    ) -> Result<Label, SchemaError> {
        self.build_shape(declared, tag)
            .map(|shape| {
                Label::new(
                    member,
                    tag.name().unwrap_or(member),
                    tag.is_required(),
                    declared.clone(),
                    shape,
                )
            })
            .map_err(|reject| reject.into_error(class, member))
    }

    fn build_shape(&self, declared: &TypeRef, tag: &Tag) -> Result<Shape, Reject> {
        self.resolver
            .check_resolved(declared)
            .map_err(Reject::Unresolved)?;
        Ok(match tag {
            Tag::Attribute(_) | Tag::Text(_) => {
                if !declared.is_scalar() {
                    return Err(Reject::Unsupported(format!(
                        "'{}' can not be written as text",
                        declared
                    )));
                }
                if matches!(tag, Tag::Text(_)) {
                    Shape::Text
                } else {
                    Shape::Attribute
                }
            }
            Tag::Element(t) => {
                if let Some(class) = &t.class {
                    self.check_assignable(declared, class, "element class")?;
                }
                Shape::Element {
                    class: t.class.clone(),
                }
            }
            Tag::ElementList(t) => {
                let TypeRef::List(item) = declared else {
                    return Err(Reject::Unsupported(format!("'{}' is not a list", declared)));
                };
                let item = self.entry_type(item, t.entry_type.as_ref(), "list entry")?;
                Shape::ElementList(ListLayout {
                    entry: t
                        .entry
                        .clone()
                        .unwrap_or_else(|| self.resolver.entry_name(&item)),
                    item,
                    inline: t.inline,
                })
            }
            Tag::ElementArray(t) => {
                let TypeRef::Array(component) = declared else {
                    return Err(Reject::Unsupported(format!(
                        "'{}' is not an array",
                        declared
                    )));
                };
                let component = self.entry_type(component, None, "array entry")?;
                Shape::ElementArray(ArrayLayout {
                    entry: t
                        .entry
                        .clone()
                        .unwrap_or_else(|| self.resolver.entry_name(&component)),
                    component,
                })
            }
            Tag::ElementMap(t) => {
                let TypeRef::Map(key, value) = declared else {
                    return Err(Reject::Unsupported(format!("'{}' is not a map", declared)));
                };
                let key_type = self.entry_type(key, t.key_type.as_ref(), "map key")?;
                let value_type = self.entry_type(value, t.value_type.as_ref(), "map value")?;
                if t.attribute && !key_type.is_scalar() {
                    return Err(Reject::Unsupported(format!(
                        "map key '{}' can not be written as an attribute",
                        key_type
                    )));
                }
                Shape::ElementMap(MapLayout {
                    entry: t
                        .entry
                        .clone()
                        .unwrap_or_else(|| DEFAULT_ENTRY_NAME.to_string()),
                    key: t
                        .key
                        .clone()
                        .unwrap_or_else(|| DEFAULT_KEY_NAME.to_string()),
                    value: t
                        .value
                        .clone()
                        .unwrap_or_else(|| DEFAULT_VALUE_NAME.to_string()),
                    value_text: t.attribute && t.value.is_none() && value_type.is_scalar(),
                    key_type,
                    value_type,
                    attribute: t.attribute,
                    inline: t.inline,
                })
            }
            Tag::ElementUnion(t) => {
                self.check_candidates(declared, &t.candidates)?;
                Shape::Union(UnionLayout {
                    candidates: t.candidates.clone(),
                    inline_list: false,
                })
            }
            Tag::ElementListUnion(t) => {
                let TypeRef::List(item) = declared else {
                    return Err(Reject::Unsupported(format!("'{}' is not a list", declared)));
                };
                self.check_candidates(item, &t.candidates)?;
                Shape::Union(UnionLayout {
                    candidates: t.candidates.clone(),
                    inline_list: true,
                })
            }
        })
    }

    fn check_assignable(&self, declared: &TypeRef, ty: &TypeRef, what: &str) -> Result<(), Reject> {
        self.resolver
            .check_resolved(ty)
            .map_err(Reject::Unresolved)?;
        if !self.resolver.is_assignable(declared, ty) {
            return Err(Reject::Unsupported(format!(
                "{} '{}' is not assignable to '{}'",
                what, ty, declared
            )));
        }
        Ok(())
    }

    /// Entry type of a collection, an explicit type must narrow the declared one.
    fn entry_type(
        &self,
        declared: &TypeRef,
        explicit: Option<&TypeRef>,
        what: &str,
    ) -> Result<TypeRef, Reject> {
        let ty = match explicit {
            Some(explicit) => {
                self.check_assignable(declared, explicit, what)?;
                explicit.clone()
            }
            None => declared.clone(),
        };
        if ty == TypeRef::Any {
            return Err(Reject::Unresolved(format!(
                "{} of type object has no entry type",
                what
            )));
        }
        Ok(ty)
    }

    fn check_candidates(
        &self,
        declared: &TypeRef,
        candidates: &[(String, TypeRef)],
    ) -> Result<(), Reject> {
        if candidates.is_empty() {
            return Err(Reject::Unsupported(
                "union declares no candidates".to_string(),
            ));
        }
        for (name, ty) in candidates {
            self.check_assignable(declared, ty, &format!("candidate '{}'", name))?;
        }
        Ok(())
    }
}

enum Reject {
    Unresolved(String),
    Unsupported(String),
}

impl Reject {
    fn into_error(self, class: &str, member: &str) -> SchemaError {
        match self {
            Reject::Unresolved(reason) => SchemaError::UnresolvedType {
                class: class.to_string(),
                member: member.to_string(),
                reason,
            },
            Reject::Unsupported(reason) => SchemaError::UnsupportedTag {
                class: class.to_string(),
                member: member.to_string(),
                reason,
            },
        }
    }
}

/// Shares built labels, keyed by declaring class, member and label kind.
///
/// Inherited members resolve to the same `Arc` in every subclass schema.
#[derive(Debug, Default)]
pub struct LabelExtractor {
    labels: RwLock<HashMap<(String, String, LabelKind), Arc<CacheLabel>>>,
}

impl LabelExtractor {
    pub fn new() -> Self {
        LabelExtractor::default()
    }

    pub fn extract(
        &self,
        factory: &LabelFactory,
        class: &str,
        member: &str,
        declared: &TypeRef,
        tag: &Tag,
    ) -> Result<Arc<CacheLabel>, SchemaError> {
        let key = (
            class.to_string(),
            member.to_string(),
            LabelFactory::kind_of(tag),
        );
        if let Some(label) = self
            .labels
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return Ok(label.clone());
        }
        let label = Arc::new(CacheLabel::new(factory.build(
            class, member, declared, tag,
        )?));
        let mut labels = self.labels.write().unwrap_or_else(|e| e.into_inner());
        Ok(labels.entry(key).or_insert(label).clone())
    }

    pub fn clear(&self) {
        self.labels
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.labels.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
