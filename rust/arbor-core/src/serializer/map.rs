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

//! Maps are written as one entry node per pair.
//!
//! By default an entry holds a key element and a value element:
//!
//! ```text
//! <entry><key>a</key><value>1</value></entry>
//! ```
//!
//! With an attribute key and a scalar value the entry collapses to
//! `<entry key="a">1</entry>`. A null value is an entry without value.

use super::{read_element, read_scalar, scalar_text, write_element, Form};
use crate::document::Node;
use crate::error::Error;
use crate::meta::{CacheLabel, MapLayout, DEFAULT_KEY_NAME, DEFAULT_VALUE_NAME};
use crate::object::{MapObject, Object, ObjectId};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::DEFAULT_ENTRY_NAME;
use crate::strategy::{Allocation, Target};
use crate::types::TypeRef;
use std::borrow::Cow;

fn plain_layout(key_type: TypeRef, value_type: TypeRef) -> MapLayout {
    MapLayout {
        entry: DEFAULT_ENTRY_NAME.to_string(),
        key: DEFAULT_KEY_NAME.to_string(),
        value: DEFAULT_VALUE_NAME.to_string(),
        key_type,
        value_type,
        attribute: false,
        inline: false,
        value_text: false,
    }
}

fn layout_of<'a>(form: Form<'a>, key_type: &TypeRef, value_type: &TypeRef) -> Cow<'a, MapLayout> {
    match form {
        Form::Map(layout) => Cow::Borrowed(layout),
        _ => Cow::Owned(plain_layout(key_type.clone(), value_type.clone())),
    }
}

pub fn write(
    declared: &TypeRef,
    map: &MapObject,
    form: Form<'_>,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    let layout = match declared {
        TypeRef::Map(key, value) => layout_of(form, key, value),
        _ => layout_of(form, &TypeRef::Any, &TypeRef::Any),
    };
    for &(key, value) in map.entries() {
        node.push_child(write_entry(&layout, key, value, context)?);
    }
    Ok(())
}

pub fn write_member(
    label: &CacheLabel,
    layout: &MapLayout,
    value: ObjectId,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    if !layout.inline {
        node.push_child(write_element(
            label.declared(),
            value,
            label.node_name(),
            Form::Map(layout),
            context,
        )?);
        return Ok(());
    }
    let object = context.heap().object(value)?;
    let map = object.as_map().ok_or_else(|| {
        Error::type_error(format!(
            "member '{}' holds a {}, not a map",
            label.member(),
            object.runtime_type()
        ))
    })?;
    context
        .strategy()
        .write_inline(Target { id: value, object }, &mut context.session)?;
    for &(key, value) in map.entries() {
        node.push_child(write_entry(layout, key, value, context)?);
    }
    Ok(())
}

fn write_entry(
    layout: &MapLayout,
    key: ObjectId,
    value: Option<ObjectId>,
    context: &mut WriteContext,
) -> Result<Node, Error> {
    let mut entry = Node::new(layout.entry.as_str());
    if layout.attribute {
        entry.set_attribute(
            layout.key.as_str(),
            scalar_text(context.heap(), key, &layout.key)?,
        );
    } else {
        entry.push_child(write_element(
            &layout.key_type,
            key,
            &layout.key,
            Form::Plain,
            context,
        )?);
    }
    match value {
        Some(value) if layout.value_text => {
            entry.set_text(scalar_text(context.heap(), value, &layout.entry)?);
        }
        Some(value) => entry.push_child(write_element(
            &layout.value_type,
            value,
            &layout.value,
            Form::Plain,
            context,
        )?),
        None => {}
    }
    Ok(entry)
}

pub fn read(
    allocation: &Allocation,
    key_type: &TypeRef,
    value_type: &TypeRef,
    node: &Node,
    form: Form<'_>,
    context: &mut ReadContext,
) -> Result<ObjectId, Error> {
    let layout = layout_of(form, key_type, value_type);
    let id = allocation.allocate(
        Object::Map(MapObject::default()),
        &mut context.heap,
        &mut context.session,
    )?;
    for entry in node.children() {
        let (key, value) = read_entry(&layout, entry, context)?;
        if let Object::Map(map) = context.heap.object_mut(id)? {
            map.insert(key, value);
        }
    }
    Ok(id)
}

/// Reads a map member. An inline map without entries reads as null.
pub fn read_member(
    label: &CacheLabel,
    layout: &MapLayout,
    node: &Node,
    context: &mut ReadContext,
) -> Result<Option<ObjectId>, Error> {
    if !layout.inline {
        return node
            .child(label.node_name())
            .map(|child| read_element(label.declared(), child, Form::Map(layout), context))
            .transpose();
    }
    let mut entries = Vec::new();
    for entry in node.children_named(&layout.entry) {
        entries.push(read_entry(layout, entry, context)?);
    }
    if entries.is_empty() {
        return Ok(None);
    }
    Ok(Some(context.heap.map(entries)))
}

fn read_entry(
    layout: &MapLayout,
    entry: &Node,
    context: &mut ReadContext,
) -> Result<(ObjectId, Option<ObjectId>), Error> {
    let key = if layout.attribute {
        let text = entry.attribute(&layout.key).ok_or_else(|| {
            Error::invalid_data(format!(
                "map entry '{}' has no '{}' attribute",
                entry.name(),
                layout.key
            ))
        })?;
        let object = read_scalar(&layout.key_type, text, context.resolver())?;
        context.heap.insert(object)
    } else {
        let child = entry.child(&layout.key).ok_or_else(|| {
            Error::invalid_data(format!(
                "map entry '{}' has no '{}' element",
                entry.name(),
                layout.key
            ))
        })?;
        read_element(&layout.key_type, child, Form::Plain, context)?
    };
    let value = if layout.value_text {
        match entry.text() {
            Some(text) => {
                let object = read_scalar(&layout.value_type, text, context.resolver())?;
                Some(context.heap.insert(object))
            }
            None => None,
        }
    } else {
        entry
            .child(&layout.value)
            .map(|child| read_element(&layout.value_type, child, Form::Plain, context))
            .transpose()?
    };
    Ok((key, value))
}
