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

//! Schema derivation.
//!
//! The scanner walks a class and its ancestors, most specialized first. Class
//! level tags are taken from the first class declaring them. Member tags go
//! through the [`LabelFactory`], explicit ones are shared through the
//! [`LabelExtractor`].

use crate::error::SchemaError;
use crate::meta::class_def::MemberDef;
use crate::meta::label::{CacheLabel, Namespace};
use crate::meta::label_factory::{LabelExtractor, LabelFactory};
use crate::meta::schema::{LabelSet, Schema};
use crate::meta::signature::Signatures;
use crate::meta::tag::{DefaultTag, Lifecycle, OrderTag, Tag};
use crate::resolver::TypeResolver;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub struct Scanner<'a> {
    resolver: &'a TypeResolver,
    extractor: &'a LabelExtractor,
}

impl<'a> Scanner<'a> {
    pub fn new(resolver: &'a TypeResolver, extractor: &'a LabelExtractor) -> Self {
        Scanner {
            resolver,
            extractor,
        }
    }

    pub fn scan(&self, class: &str) -> Result<Schema, SchemaError> {
        let chain = self.resolver.hierarchy(class)?;
        let factory = LabelFactory::new(self.resolver);

        let mut strict = None;
        let mut order: Option<&OrderTag> = None;
        let mut default: Option<&DefaultTag> = None;
        let mut lifecycle = Lifecycle::default();
        for def in &chain {
            if strict.is_none() {
                strict = def.root.as_ref().map(|root| root.strict);
            }
            if order.is_none() {
                order = def.order.as_ref();
            }
            if default.is_none() {
                default = def.default.as_ref();
            }
            lifecycle.inherit(&def.lifecycle);
        }

        let mut attributes = Vec::new();
        let mut elements = Vec::new();
        let mut text: Option<Arc<CacheLabel>> = None;
        let mut read_only = Vec::new();
        for def in &chain {
            for member in &def.members {
                let Some(label) = self.label_of(&factory, &def.name, member, default)? else {
                    continue;
                };
                if member.read_only {
                    read_only.push(member.name.clone());
                }
                match label.namespace() {
                    Namespace::Attribute => attributes.push(label),
                    Namespace::Element => elements.push(label),
                    Namespace::Text => {
                        if text.is_some() {
                            return Err(SchemaError::UnsupportedTag {
                                class: class.to_string(),
                                member: member.name.clone(),
                                reason: "class declares more than one text member".to_string(),
                            });
                        }
                        text = Some(label);
                    }
                }
            }
        }

        if let Some(text) = &text {
            if !elements.is_empty() {
                return Err(SchemaError::UnsupportedTag {
                    class: class.to_string(),
                    member: text.member().to_string(),
                    reason: "text can not be combined with element members".to_string(),
                });
            }
        }
        check_unique(class, Namespace::Attribute, &attributes)?;
        check_unique(class, Namespace::Element, &elements)?;
        if let Some(order) = order {
            attributes = apply_order(class, Namespace::Attribute, &order.attributes, attributes)?;
            elements = apply_order(class, Namespace::Element, &order.elements, elements)?;
        }

        let labels = LabelSet {
            attributes,
            elements,
            text,
        };
        let def = &chain[0];
        let signatures = Signatures::resolve(def, &factory, &labels)?;
        if !def.is_abstract {
            if signatures.is_empty() {
                return Err(SchemaError::NoConstructor {
                    class: class.to_string(),
                });
            }
            if let Some(member) = read_only.iter().find(|m| !signatures.accepts(m)) {
                return Err(SchemaError::ReadOnlyMember {
                    class: class.to_string(),
                    member: member.clone(),
                });
            }
        }

        debug!(
            class,
            labels = labels.len(),
            signatures = signatures.parameterized().len(),
            "derived schema"
        );
        Ok(Schema::new(
            class.to_string(),
            self.resolver.root_name(class),
            strict.unwrap_or(true),
            def.is_abstract,
            labels,
            signatures,
            read_only,
            lifecycle,
        ))
    }

    fn label_of(
        &self,
        factory: &LabelFactory,
        class: &str,
        member: &MemberDef,
        default: Option<&DefaultTag>,
    ) -> Result<Option<Arc<CacheLabel>>, SchemaError> {
        if member.transient {
            return Ok(None);
        }
        if let Some(tag) = &member.tag {
            return self
                .extractor
                .extract(factory, class, &member.name, &member.declared, tag)
                .map(Some);
        }
        match default {
            Some(default) if default.access == member.access => {
                let tag = Tag::for_type(&member.declared, default.required);
                let label = factory.build(class, &member.name, &member.declared, &tag)?;
                Ok(Some(Arc::new(CacheLabel::new(label))))
            }
            _ => Ok(None),
        }
    }
}

fn check_unique(
    class: &str,
    namespace: Namespace,
    labels: &[Arc<CacheLabel>],
) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for label in labels {
        for name in label.names() {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateName {
                    class: class.to_string(),
                    name: name.clone(),
                    namespace: namespace.as_str(),
                });
            }
        }
    }
    Ok(())
}

/// Listed names first, in the listed order, then the rest in discovery order.
fn apply_order(
    class: &str,
    namespace: Namespace,
    names: &[String],
    mut labels: Vec<Arc<CacheLabel>>,
) -> Result<Vec<Arc<CacheLabel>>, SchemaError> {
    let mut ordered = Vec::with_capacity(labels.len());
    for name in names {
        let index = labels
            .iter()
            .position(|l| l.node_name() == name || l.answers_to(name))
            .ok_or_else(|| SchemaError::InvalidOrder {
                class: class.to_string(),
                name: name.clone(),
                namespace: namespace.as_str(),
            })?;
        ordered.push(labels.remove(index));
    }
    ordered.extend(labels);
    Ok(ordered)
}
