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
use crate::meta::{LabelExtractor, Scanner, Schema};
use crate::resolver::TypeResolver;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Cache of derived schemas keyed by class name.
///
/// Failures are cached too, so a class with a broken mapping fails the same
/// way on every use. Derivation runs outside the lock; when two threads derive
/// the same class concurrently the first insert wins and the other result is
/// dropped.
///
/// ```rust
/// use arbor_core::meta::{ClassDef, MemberDef, Tag};
/// use arbor_core::resolver::{SchemaCache, TypeResolver};
/// use arbor_core::types::TypeRef;
/// use std::sync::Arc;
///
/// let mut resolver = TypeResolver::default();
/// resolver
///     .register_class(ClassDef::new("Item").member(MemberDef::new("sku", TypeRef::STRING).tag(Tag::attribute())))
///     .unwrap();
/// let cache = SchemaCache::new();
/// let first = cache.get_or_derive("Item", &resolver).unwrap();
/// let again = cache.get_or_derive("Item", &resolver).unwrap();
/// assert!(Arc::ptr_eq(&first, &again));
/// ```
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: RwLock<HashMap<String, Result<Arc<Schema>, SchemaError>>>,
    labels: LabelExtractor,
}

impl SchemaCache {
    pub fn new() -> Self {
        SchemaCache::default()
    }

    pub fn get_or_derive(
        &self,
        class: &str,
        resolver: &TypeResolver,
    ) -> Result<Arc<Schema>, SchemaError> {
        if let Some(cached) = self
            .schemas
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(class)
        {
            debug!(class, "schema cache hit");
            return cached.clone();
        }
        debug!(class, "schema cache miss");
        let derived = Scanner::new(resolver, &self.labels)
            .scan(class)
            .map(Arc::new);
        let mut schemas = self.schemas.write().unwrap_or_else(|e| e.into_inner());
        schemas.entry(class.to_string()).or_insert(derived).clone()
    }

    /// Drops every cached schema and label.
    pub fn clear(&self) {
        self.schemas
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.labels.clear();
    }

    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> &LabelExtractor {
        &self.labels
    }
}
