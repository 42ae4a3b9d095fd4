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

use super::{read_element, write_element, Form};
use crate::document::Node;
use crate::error::Error;
use crate::meta::UnionLayout;
use crate::object::ObjectId;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::TypeResolver;
use crate::strategy::Target;
use crate::types::TypeRef;

/// The candidate a value is written as: an exact type match first, then
/// the first candidate the runtime type is assignable to.
fn candidate_for<'a>(
    layout: &'a UnionLayout,
    actual: &TypeRef,
    resolver: &TypeResolver,
) -> Result<&'a (String, TypeRef), Error> {
    layout
        .candidates
        .iter()
        .find(|(_, ty)| ty.same_shape(actual))
        .or_else(|| {
            layout
                .candidates
                .iter()
                .find(|(_, ty)| resolver.is_assignable(ty, actual))
        })
        .ok_or_else(|| {
            Error::type_error(format!(
                "no union candidate accepts a value of type '{}'",
                actual
            ))
        })
}

fn write_one(
    layout: &UnionLayout,
    value: ObjectId,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    let actual = context.heap().runtime_type(value)?;
    let (name, ty) = candidate_for(layout, &actual, context.resolver())?;
    node.push_child(write_element(ty, value, name, Form::Plain, context)?);
    Ok(())
}

pub fn write_member(
    layout: &UnionLayout,
    value: ObjectId,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    if !layout.inline_list {
        return write_one(layout, value, node, context);
    }
    let object = context.heap().object(value)?;
    let list = object.as_list().ok_or_else(|| {
        Error::type_error(format!(
            "union list holds a {}, not a list",
            object.runtime_type()
        ))
    })?;
    context
        .strategy()
        .write_inline(Target { id: value, object }, &mut context.session)?;
    for &item in list.items() {
        write_one(layout, item, node, context)?;
    }
    Ok(())
}

fn candidate_named<'a>(layout: &'a UnionLayout, name: &str) -> Option<&'a TypeRef> {
    layout
        .candidates
        .iter()
        .find(|(candidate, _)| candidate == name)
        .map(|(_, ty)| ty)
}

/// Reads the first child naming a candidate, or for a union list every such
/// child in document order. A union list without items reads as null.
pub fn read_member(
    layout: &UnionLayout,
    node: &Node,
    context: &mut ReadContext,
) -> Result<Option<ObjectId>, Error> {
    if !layout.inline_list {
        for child in node.children() {
            if let Some(ty) = candidate_named(layout, child.name()) {
                return read_element(ty, child, Form::Plain, context).map(Some);
            }
        }
        return Ok(None);
    }
    let mut items = Vec::new();
    for child in node.children() {
        if let Some(ty) = candidate_named(layout, child.name()) {
            items.push(read_element(ty, child, Form::Plain, context)?);
        }
    }
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(context.heap.list(items)))
}
