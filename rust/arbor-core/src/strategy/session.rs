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

use crate::config::ReservedNames;
use crate::error::CycleError;
use crate::object::ObjectId;
use crate::types::TypeRef;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Identity map of one serialize call, from object to token.
///
/// # Examples
///
/// ```rust
/// use arbor_core::config::ReservedNames;
/// use arbor_core::object::Heap;
/// use arbor_core::strategy::WriteSession;
///
/// let mut heap = Heap::new();
/// let x = heap.string("x");
/// let y = heap.string("y");
/// let mut session = WriteSession::new(ReservedNames::default());
///
/// assert_eq!(session.token(x), None);
/// assert_eq!(session.mint(x), "0");
/// assert_eq!(session.mint(y), "1");
/// assert_eq!(session.token(x), Some("0"));
/// ```
#[derive(Debug)]
pub struct WriteSession {
    reserved: ReservedNames,
    tokens: HashMap<ObjectId, String>,
    inline: HashSet<ObjectId>,
}

impl WriteSession {
    pub fn new(reserved: ReservedNames) -> Self {
        WriteSession {
            reserved,
            tokens: HashMap::new(),
            inline: HashSet::new(),
        }
    }

    /// Attribute names this session writes.
    #[inline(always)]
    pub fn reserved(&self) -> &ReservedNames {
        &self.reserved
    }

    pub fn token(&self, id: ObjectId) -> Option<&str> {
        self.tokens.get(&id).map(String::as_str)
    }

    /// Assigns the next token to `id`, the token is the session size before insertion.
    pub fn mint(&mut self, id: ObjectId) -> String {
        let token = self.tokens.len().to_string();
        trace!(object = %id, token = %token, "minted identity");
        self.tokens.insert(id, token.clone());
        token
    }

    /// Records a container written without a node. Returns `false` if it was
    /// already recorded.
    pub fn mark_inline(&mut self, id: ObjectId) -> bool {
        self.inline.insert(id)
    }

    pub fn is_inline(&self, id: ObjectId) -> bool {
        self.inline.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Identity map of one deserialize call, from token to the object built for it.
#[derive(Debug)]
pub struct ReadSession {
    reserved: ReservedNames,
    objects: HashMap<String, (ObjectId, TypeRef)>,
}

impl ReadSession {
    pub fn new(reserved: ReservedNames) -> Self {
        ReadSession {
            reserved,
            objects: HashMap::new(),
        }
    }

    /// Attribute names this session reads.
    #[inline(always)]
    pub fn reserved(&self) -> &ReservedNames {
        &self.reserved
    }

    pub fn contains(&self, token: &str) -> bool {
        self.objects.contains_key(token)
    }

    /// The object registered under `token` and the type it was built as.
    pub fn resolve(&self, token: &str) -> Option<(ObjectId, &TypeRef)> {
        self.objects.get(token).map(|(id, ty)| (*id, ty))
    }

    pub fn register(&mut self, token: String, id: ObjectId, ty: TypeRef) -> Result<(), CycleError> {
        if self.objects.contains_key(&token) {
            return Err(CycleError::DuplicateIdentity { token });
        }
        trace!(object = %id, token = %token, "registered identity");
        self.objects.insert(token, (id, ty));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
