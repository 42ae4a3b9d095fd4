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
use crate::meta::{CacheLabel, ListLayout};
use crate::object::{ListObject, Object, ObjectId};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::strategy::{Allocation, Target};
use crate::types::TypeRef;

fn item_type(declared: &TypeRef) -> TypeRef {
    match declared {
        TypeRef::List(item) => item.as_ref().clone(),
        _ => TypeRef::Any,
    }
}

/// Writes the items of a list as children of its own node.
pub fn write(
    declared: &TypeRef,
    list: &ListObject,
    form: Form<'_>,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    let (item, entry) = match form {
        Form::List(layout) => (layout.item.clone(), layout.entry.clone()),
        _ => {
            let item = item_type(declared);
            let entry = context.resolver().entry_name(&item);
            (item, entry)
        }
    };
    for &value in list.items() {
        node.push_child(write_element(&item, value, &entry, Form::Plain, context)?);
    }
    Ok(())
}

/// Writes a list member, either wrapped in a node named after the member or
/// inline as repeated entries of the enclosing node.
pub fn write_member(
    label: &CacheLabel,
    layout: &ListLayout,
    value: ObjectId,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    if !layout.inline {
        node.push_child(write_element(
            label.declared(),
            value,
            label.node_name(),
            Form::List(layout),
            context,
        )?);
        return Ok(());
    }
    let object = context.heap().object(value)?;
    let list = expect_list(object, label)?;
    context
        .strategy()
        .write_inline(Target { id: value, object }, &mut context.session)?;
    for &item in list.items() {
        node.push_child(write_element(
            &layout.item,
            item,
            &layout.entry,
            Form::Plain,
            context,
        )?);
    }
    Ok(())
}

fn expect_list<'a>(object: &'a Object, label: &CacheLabel) -> Result<&'a ListObject, Error> {
    object.as_list().ok_or_else(|| {
        Error::type_error(format!(
            "member '{}' holds a {}, not a list",
            label.member(),
            object.runtime_type()
        ))
    })
}

/// Reads every child of `node` as an item.
pub fn read(
    allocation: &Allocation,
    item: &TypeRef,
    node: &Node,
    form: Form<'_>,
    context: &mut ReadContext,
) -> Result<ObjectId, Error> {
    let item = match form {
        Form::List(layout) => layout.item.clone(),
        _ => item.clone(),
    };
    let id = allocation.allocate(
        Object::List(ListObject::default()),
        &mut context.heap,
        &mut context.session,
    )?;
    for child in node.children() {
        let value = read_element(&item, child, Form::Plain, context)?;
        if let Object::List(list) = context.heap.object_mut(id)? {
            list.push(value);
        }
    }
    Ok(id)
}

/// Reads a list member. An inline list without entries reads as null.
pub fn read_member(
    label: &CacheLabel,
    layout: &ListLayout,
    node: &Node,
    context: &mut ReadContext,
) -> Result<Option<ObjectId>, Error> {
    if !layout.inline {
        return node
            .child(label.node_name())
            .map(|child| read_element(label.declared(), child, Form::List(layout), context))
            .transpose();
    }
    let mut items = Vec::new();
    for entry in node.children_named(&layout.entry) {
        items.push(read_element(&layout.item, entry, Form::Plain, context)?);
    }
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(context.heap.list(items)))
}
