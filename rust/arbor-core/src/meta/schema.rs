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

use crate::meta::label::{CacheLabel, Namespace};
use crate::meta::signature::Signatures;
use crate::meta::tag::Lifecycle;
use std::sync::Arc;

/// Labels of a class, split by namespace and kept in document order.
#[derive(Debug, Default)]
pub struct LabelSet {
    pub(crate) attributes: Vec<Arc<CacheLabel>>,
    pub(crate) elements: Vec<Arc<CacheLabel>>,
    pub(crate) text: Option<Arc<CacheLabel>>,
}

impl LabelSet {
    #[inline(always)]
    pub fn attributes(&self) -> &[Arc<CacheLabel>] {
        &self.attributes
    }

    #[inline(always)]
    pub fn elements(&self) -> &[Arc<CacheLabel>] {
        &self.elements
    }

    #[inline(always)]
    pub fn text(&self) -> Option<&Arc<CacheLabel>> {
        self.text.as_ref()
    }

    /// The label whose own node name is `node_name` in the given namespace.
    pub fn find(&self, namespace: Namespace, node_name: &str) -> Option<&Arc<CacheLabel>> {
        match namespace {
            Namespace::Attribute => self.attributes.iter().find(|l| l.node_name() == node_name),
            Namespace::Element => self.elements.iter().find(|l| l.node_name() == node_name),
            Namespace::Text => self.text.as_ref().filter(|l| l.node_name() == node_name),
        }
    }

    /// The element label reading child nodes called `name`.
    pub fn element_for(&self, name: &str) -> Option<&Arc<CacheLabel>> {
        self.elements.iter().find(|l| l.answers_to(name))
    }

    pub fn attribute_for(&self, name: &str) -> Option<&Arc<CacheLabel>> {
        self.attributes.iter().find(|l| l.node_name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CacheLabel>> {
        self.attributes
            .iter()
            .chain(self.elements.iter())
            .chain(self.text.iter())
    }

    pub fn len(&self) -> usize {
        self.attributes.len() + self.elements.len() + usize::from(self.text.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derived mapping of one class, built once and shared read-only.
#[derive(Debug)]
pub struct Schema {
    class: String,
    root_name: String,
    strict: bool,
    is_abstract: bool,
    labels: LabelSet,
    signatures: Signatures,
    read_only: Vec<String>,
    lifecycle: Lifecycle,
}

impl Schema {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        class: String,
        root_name: String,
        strict: bool,
        is_abstract: bool,
        labels: LabelSet,
        signatures: Signatures,
        read_only: Vec<String>,
        lifecycle: Lifecycle,
    ) -> Schema {
        Schema {
            class,
            root_name,
            strict,
            is_abstract,
            labels,
            signatures,
            read_only,
            lifecycle,
        }
    }

    #[inline(always)]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[inline(always)]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Strict flag of the class, combined with the driver's at read time.
    #[inline(always)]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    #[inline(always)]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[inline(always)]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    #[inline(always)]
    pub fn signatures(&self) -> &Signatures {
        &self.signatures
    }

    /// Members that only a constructor can populate.
    #[inline(always)]
    pub fn read_only(&self) -> &[String] {
        &self.read_only
    }

    #[inline(always)]
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}
