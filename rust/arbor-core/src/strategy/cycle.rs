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

use super::{ReadSession, Strategy, Target, TreeStrategy, TypeResolution, WriteSession};
use crate::document::Node;
use crate::error::{CycleError, Error};
use crate::resolver::TypeResolver;
use crate::types::TypeRef;

/// Strategy preserving shared and circular references.
///
/// The first occurrence of an object is written in full with an `id`
/// attribute, every later occurrence as an empty node with a `reference`
/// attribute naming that id. Tokens are the session size at the time the
/// object was first met, written in decimal.
///
/// An inline list or map has no node to mark, so a container written inline
/// and met again anywhere else in the graph fails with
/// [`Error::NotAllowed`].
///
/// # Examples
///
/// ```rust
/// use arbor_core::config::ReservedNames;
/// use arbor_core::document::Node;
/// use arbor_core::object::Heap;
/// use arbor_core::resolver::TypeResolver;
/// use arbor_core::strategy::{CycleStrategy, Strategy, Target, WriteSession};
/// use arbor_core::types::TypeRef;
///
/// let mut heap = Heap::new();
/// let x = heap.string("x");
/// let resolver = TypeResolver::default();
/// let mut session = WriteSession::new(ReservedNames::default());
/// let strategy = CycleStrategy::new();
///
/// let target = Target { id: x, object: heap.object(x).unwrap() };
/// let mut first = Node::new("a");
/// assert!(!strategy.write(&TypeRef::STRING, target, &mut first, &resolver, &mut session).unwrap());
/// assert_eq!(first.attribute("id"), Some("0"));
///
/// let mut second = Node::new("b");
/// assert!(strategy.write(&TypeRef::STRING, target, &mut second, &resolver, &mut session).unwrap());
/// assert_eq!(second.attribute("reference"), Some("0"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CycleStrategy {
    tree: TreeStrategy,
}

impl CycleStrategy {
    pub fn new() -> Self {
        CycleStrategy {
            tree: TreeStrategy::new(),
        }
    }
}

impl Strategy for CycleStrategy {
    fn read(
        &self,
        declared: &TypeRef,
        node: &Node,
        resolver: &TypeResolver,
        session: &ReadSession,
    ) -> Result<TypeResolution, Error> {
        let reserved = session.reserved();
        let actual = self.tree.override_type(declared, node, resolver, reserved)?;
        if let Some(token) = node.attribute(&reserved.id) {
            if session.contains(token) {
                return Err(CycleError::DuplicateIdentity {
                    token: token.to_string(),
                }
                .into());
            }
            let allocation = self.tree.allocation(actual, node, reserved)?;
            return Ok(TypeResolution::New(allocation.with_token(token)));
        }
        if let Some(token) = node.attribute(&reserved.reference) {
            let (id, registered) =
                session
                    .resolve(token)
                    .ok_or_else(|| CycleError::UnknownReference {
                        token: token.to_string(),
                    })?;
            if !resolver.is_assignable(&actual, registered) {
                return Err(Error::type_error(format!(
                    "reference '{}' of type '{}' is not assignable to '{}'",
                    token, registered, actual
                )));
            }
            return Ok(TypeResolution::Reference(id));
        }
        Ok(TypeResolution::Plain(
            self.tree.allocation(actual, node, reserved)?,
        ))
    }

    fn write(
        &self,
        declared: &TypeRef,
        target: Target<'_>,
        node: &mut Node,
        resolver: &TypeResolver,
        session: &mut WriteSession,
    ) -> Result<bool, Error> {
        if session.is_inline(target.id) {
            return Err(shared_inline(target));
        }
        if let Some(token) = session.token(target.id) {
            node.set_attribute(&session.reserved().reference, token);
            return Ok(true);
        }
        self.tree.write(declared, target, node, resolver, session)?;
        let id_name = session.reserved().id.clone();
        let token = session.mint(target.id);
        node.set_attribute(id_name, token);
        Ok(false)
    }

    fn write_inline(&self, target: Target<'_>, session: &mut WriteSession) -> Result<(), Error> {
        if session.token(target.id).is_some() || !session.mark_inline(target.id) {
            return Err(shared_inline(target));
        }
        Ok(())
    }
}

fn shared_inline(target: Target<'_>) -> Error {
    Error::not_allowed(format!(
        "{} {} is written inline and referenced elsewhere, inline containers can not be shared",
        target.object.runtime_type(),
        target.id
    ))
}
