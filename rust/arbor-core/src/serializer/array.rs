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
use crate::ensure;
use crate::error::Error;
use crate::object::{ArrayObject, Object, ObjectId};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::strategy::Allocation;
use crate::types::TypeRef;

/// Writes one entry per slot. Null slots are empty entries.
///
/// Entries are declared as the runtime component; the strategy has already
/// named it on the array node when it differs from the declared one.
pub fn write(
    array: &ArrayObject,
    form: Form<'_>,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    let entry = match form {
        Form::Array(layout) => layout.entry.clone(),
        _ => context.resolver().entry_name(array.component()),
    };
    for slot in array.slots() {
        match slot {
            Some(value) => node.push_child(write_element(
                array.component(),
                *value,
                &entry,
                Form::Plain,
                context,
            )?),
            None => node.push_child(Node::new(entry.as_str())),
        }
    }
    Ok(())
}

pub fn read(
    allocation: &Allocation,
    component: &TypeRef,
    node: &Node,
    context: &mut ReadContext,
) -> Result<ObjectId, Error> {
    let length = allocation.length().ok_or_else(|| {
        Error::invalid_data(format!("array node '{}' has no length", node.name()))
    })?;
    let max_length = context.config().max_array_length();
    ensure!(
        length <= max_length,
        Error::invalid_data(format!(
            "array node '{}' has a length of {}, above the limit of {}",
            node.name(),
            length,
            max_length
        ))
    );
    let entries = node.children();
    ensure!(
        entries.len() <= length,
        Error::invalid_data(format!(
            "array node '{}' has {} entries but a length of {}",
            node.name(),
            entries.len(),
            length
        ))
    );
    let id = allocation.allocate(
        Object::Array(ArrayObject::new(component.clone(), length)),
        &mut context.heap,
        &mut context.session,
    )?;
    for (index, entry) in entries.iter().enumerate() {
        if entry.is_empty() {
            continue;
        }
        let value = read_element(component, entry, Form::Plain, context)?;
        context.heap.set_slot(id, index, Some(value))?;
    }
    Ok(id)
}
