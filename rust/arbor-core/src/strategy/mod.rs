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

//! Type and identity resolution.
//!
//! The driver consults a [`Strategy`] once for every element node it reads or
//! writes. Attributes and text never pass through it.
//!
//! On read the strategy answers with a [`TypeResolution`]:
//!
//! - `Plain`: build the (possibly overridden) declared type, no identity.
//! - `New`: build it and register it under a token. Registration happens
//!   inside [`Allocation::allocate`], before the driver populates the shell, so
//!   members may refer back to the object under construction.
//! - `Reference`: an object registered earlier in the same document.
//!
//! On write it returns `true` when the node was fully handled by a back
//! reference and the driver must not descend into the value. Containers
//! written inline never get a node and are announced through
//! [`Strategy::write_inline`] instead.

mod cycle;
mod session;
mod tree;

pub use cycle::CycleStrategy;
pub use session::{ReadSession, WriteSession};
pub use tree::TreeStrategy;

use crate::document::Node;
use crate::error::Error;
use crate::object::{Heap, Object, ObjectId};
use crate::resolver::TypeResolver;
use crate::types::TypeRef;

/// The value a strategy is asked to write.
#[derive(Clone, Copy, Debug)]
pub struct Target<'a> {
    pub id: ObjectId,
    pub object: &'a Object,
}

/// Deferred construction handle returned by a strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    actual: TypeRef,
    length: Option<usize>,
    token: Option<String>,
}

impl Allocation {
    pub fn new(actual: TypeRef, length: Option<usize>) -> Self {
        Allocation {
            actual,
            length,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The type to instantiate.
    #[inline(always)]
    pub fn actual(&self) -> &TypeRef {
        &self.actual
    }

    /// Slot count, for arrays.
    #[inline(always)]
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    #[inline(always)]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Inserts the empty `shell` and registers it under the token, if any.
    pub fn allocate(
        &self,
        shell: Object,
        heap: &mut Heap,
        session: &mut ReadSession,
    ) -> Result<ObjectId, Error> {
        let id = heap.insert(shell);
        if let Some(token) = &self.token {
            session.register(token.clone(), id, self.actual.clone())?;
        }
        Ok(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeResolution {
    Plain(Allocation),
    New(Allocation),
    Reference(ObjectId),
}

/// Pluggable type and identity resolution.
pub trait Strategy: Send + Sync {
    fn read(
        &self,
        declared: &TypeRef,
        node: &Node,
        resolver: &TypeResolver,
        session: &ReadSession,
    ) -> Result<TypeResolution, Error>;

    fn write(
        &self,
        declared: &TypeRef,
        target: Target<'_>,
        node: &mut Node,
        resolver: &TypeResolver,
        session: &mut WriteSession,
    ) -> Result<bool, Error>;

    /// Called for a list or map written inline, which has no node of its own
    /// to carry identity.
    fn write_inline(&self, _target: Target<'_>, _session: &mut WriteSession) -> Result<(), Error> {
        Ok(())
    }
}
