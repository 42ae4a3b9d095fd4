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

use super::{Allocation, ReadSession, Strategy, Target, TypeResolution, WriteSession};
use crate::config::ReservedNames;
use crate::document::Node;
use crate::error::Error;
use crate::object::Object;
use crate::resolver::TypeResolver;
use crate::types::TypeRef;

/// Strategy for graphs without shared or circular references.
///
/// Only the `class` and `length` attributes are written. A cycle written with
/// this strategy recurses until the driver's depth limit stops it.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeStrategy;

impl TreeStrategy {
    pub fn new() -> Self {
        TreeStrategy
    }

    /// The declared type narrowed by the node's `class` attribute.
    pub fn override_type(
        &self,
        declared: &TypeRef,
        node: &Node,
        resolver: &TypeResolver,
        reserved: &ReservedNames,
    ) -> Result<TypeRef, Error> {
        let Some(name) = node.attribute(&reserved.class) else {
            return Ok(declared.clone());
        };
        let named = resolver.resolve_name(name).ok_or_else(|| {
            Error::type_error(format!(
                "node '{}' names unknown type '{}'",
                node.name(),
                name
            ))
        })?;
        let actual = if node.attribute(&reserved.length).is_some() || declared.is_array() {
            TypeRef::array_of(named)
        } else {
            named
        };
        if !resolver.is_assignable(declared, &actual) {
            return Err(Error::type_error(format!(
                "type '{}' of node '{}' is not assignable to '{}'",
                actual,
                node.name(),
                declared
            )));
        }
        Ok(actual)
    }

    /// Allocation of `actual`, reading the slot count of arrays.
    pub fn allocation(
        &self,
        actual: TypeRef,
        node: &Node,
        reserved: &ReservedNames,
    ) -> Result<Allocation, Error> {
        if !actual.is_array() {
            return Ok(Allocation::new(actual, None));
        }
        let text = node.attribute(&reserved.length).ok_or_else(|| {
            Error::invalid_data(format!(
                "array node '{}' has no '{}' attribute",
                node.name(),
                reserved.length
            ))
        })?;
        let length = text.trim().parse::<usize>().map_err(|e| {
            Error::invalid_data(format!(
                "invalid length '{}' on node '{}': {}",
                text,
                node.name(),
                e
            ))
        })?;
        Ok(Allocation::new(actual, Some(length)))
    }
}

impl Strategy for TreeStrategy {
    fn read(
        &self,
        declared: &TypeRef,
        node: &Node,
        resolver: &TypeResolver,
        session: &ReadSession,
    ) -> Result<TypeResolution, Error> {
        let reserved = session.reserved();
        let actual = self.override_type(declared, node, resolver, reserved)?;
        Ok(TypeResolution::Plain(self.allocation(actual, node, reserved)?))
    }

    fn write(
        &self,
        declared: &TypeRef,
        target: Target<'_>,
        node: &mut Node,
        _resolver: &TypeResolver,
        session: &mut WriteSession,
    ) -> Result<bool, Error> {
        let reserved = session.reserved();
        match target.object {
            Object::Array(array) => {
                if declared.component() != Some(array.component()) {
                    node.set_attribute(&reserved.class, array.component().to_string());
                }
                node.set_attribute(&reserved.length, array.len().to_string());
            }
            object => {
                let actual = object.runtime_type();
                if !declared.same_shape(&actual) {
                    node.set_attribute(&reserved.class, actual.to_string());
                }
            }
        }
        Ok(false)
    }
}
