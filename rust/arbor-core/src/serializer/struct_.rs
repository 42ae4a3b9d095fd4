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

use super::{list, map, read_element, read_scalar, scalar_text, union, write_element, Form};
use crate::document::Node;
use crate::error::Error;
use crate::meta::{CacheLabel, Schema, Shape};
use crate::object::{Instance, Object, ObjectId};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::strategy::Allocation;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

fn missing_error(schema: &Schema, label: &CacheLabel) -> Error {
    Error::missing_value(format!(
        "required member '{}' of class '{}' is null",
        label.member(),
        schema.class()
    ))
}

pub fn write(
    id: ObjectId,
    instance: &Instance,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    let schema = context.schema(instance.class())?;
    let heap = context.heap();
    if let Some(persist) = &schema.lifecycle().persist {
        persist(heap, id)?;
    }
    let labels = schema.labels();
    let reserved = context.config().reserved();
    for label in labels.attributes() {
        if reserved.is_reserved(label.node_name()) {
            return Err(Error::not_allowed(format!(
                "attribute '{}' of class '{}' collides with a reserved attribute",
                label.node_name(),
                schema.class()
            )));
        }
        match instance.get(label.member()) {
            Some(value) => {
                node.set_attribute(
                    label.node_name(),
                    scalar_text(heap, value, label.node_name())?,
                );
            }
            None if label.is_required() => return Err(missing_error(&schema, label)),
            None => {}
        }
    }
    for label in labels.elements() {
        match instance.get(label.member()) {
            Some(value) => write_member(label, value, node, context)?,
            None if label.is_required() => return Err(missing_error(&schema, label)),
            None => {}
        }
    }
    if let Some(label) = labels.text() {
        match instance.get(label.member()) {
            Some(value) => node.set_text(scalar_text(heap, value, node.name())?),
            None if label.is_required() => return Err(missing_error(&schema, label)),
            None => {}
        }
    }
    if let Some(complete) = &schema.lifecycle().complete {
        complete(heap, id)?;
    }
    Ok(())
}

fn write_member(
    label: &CacheLabel,
    value: ObjectId,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    match label.shape() {
        Shape::Element { class } => {
            let declared = class.as_ref().unwrap_or(label.declared());
            node.push_child(write_element(
                declared,
                value,
                label.node_name(),
                Form::Plain,
                context,
            )?);
        }
        Shape::ElementList(layout) => list::write_member(label, layout, value, node, context)?,
        Shape::ElementArray(layout) => {
            node.push_child(write_element(
                label.declared(),
                value,
                label.node_name(),
                Form::Array(layout),
                context,
            )?);
        }
        Shape::ElementMap(layout) => map::write_member(label, layout, value, node, context)?,
        Shape::Union(layout) => union::write_member(layout, value, node, context)?,
        Shape::Attribute | Shape::Text => {
            return Err(Error::type_error(format!(
                "member '{}' is not written as an element",
                label.member()
            )))
        }
    }
    Ok(())
}

/// Reads an instance of `class`.
///
/// The shell is allocated, and registered with the strategy's token, before
/// any member is read so that members may refer back to it. Member values
/// are assigned once the constructor signature has been selected: its
/// parameters first, then every other member present.
pub fn read(
    allocation: &Allocation,
    class: &str,
    node: &Node,
    context: &mut ReadContext,
) -> Result<ObjectId, Error> {
    let schema = context.schema(class)?;
    if schema.is_abstract() {
        return Err(Error::type_error(format!(
            "node '{}' resolves to abstract class '{}'",
            node.name(),
            class
        )));
    }
    let id = allocation.allocate(
        Object::Instance(Instance::new(class)),
        &mut context.heap,
        &mut context.session,
    )?;
    if context.config().is_strict() && schema.is_strict() {
        check_known(&schema, node, context)?;
    }

    let labels = schema.labels();
    let mut values: Vec<(&Arc<CacheLabel>, Option<ObjectId>)> = Vec::with_capacity(labels.len());
    for label in labels.attributes() {
        let value = match node.attribute(label.node_name()) {
            Some(text) => {
                let object = read_scalar(label.declared(), text, context.resolver())?;
                Some(context.heap.insert(object))
            }
            None => None,
        };
        values.push((label, value));
    }
    for label in labels.elements() {
        let value = read_member(label, node, context)?;
        values.push((label, value));
    }
    if let Some(label) = labels.text() {
        let value = match node.text() {
            Some(text) => {
                let object = read_scalar(label.declared(), text, context.resolver())?;
                Some(context.heap.insert(object))
            }
            None => None,
        };
        values.push((label, value));
    }

    if let Some((label, _)) = values
        .iter()
        .find(|(label, value)| label.is_required() && value.is_none())
    {
        return Err(Error::missing_value(format!(
            "required member '{}' of class '{}' is missing from node '{}'",
            label.member(),
            class,
            node.name()
        )));
    }
    let present: HashSet<&str> = values
        .iter()
        .filter(|(_, value)| value.is_some())
        .map(|(label, _)| label.member())
        .collect();
    let signature = schema
        .signatures()
        .select(class, &present, schema.read_only())?;
    trace!(
        class,
        parameters = signature.parameters().len(),
        "selected constructor"
    );

    // Constructor arguments first, in parameter order, then the setters.
    for parameter in signature.parameters() {
        let member = parameter.label().member();
        if let Some((_, Some(value))) = values.iter().find(|(label, _)| label.member() == member) {
            context.heap.set_field(id, member, Some(*value))?;
        }
    }
    for (label, value) in &values {
        if value.is_some() && !signature.accepts(label.member()) {
            context.heap.set_field(id, label.member(), *value)?;
        }
    }
    if let Some(validate) = &schema.lifecycle().validate {
        validate(&mut context.heap, id)?;
    }
    if let Some(commit) = &schema.lifecycle().commit {
        commit(&mut context.heap, id)?;
    }
    Ok(id)
}

/// Rejects attributes and child elements no label answers to.
fn check_known(schema: &Schema, node: &Node, context: &ReadContext) -> Result<(), Error> {
    let labels = schema.labels();
    let reserved = context.config().reserved();
    for (name, _) in node.attributes() {
        if !reserved.is_reserved(name) && labels.attribute_for(name).is_none() {
            return Err(Error::unknown_node(format!(
                "attribute '{}' does not match any member of class '{}'",
                name,
                schema.class()
            )));
        }
    }
    for child in node.children() {
        if labels.element_for(child.name()).is_none() {
            return Err(Error::unknown_node(format!(
                "element '{}' does not match any member of class '{}'",
                child.name(),
                schema.class()
            )));
        }
    }
    Ok(())
}

fn read_member(
    label: &CacheLabel,
    node: &Node,
    context: &mut ReadContext,
) -> Result<Option<ObjectId>, Error> {
    match label.shape() {
        Shape::Element { class } => {
            let declared = class.as_ref().unwrap_or(label.declared());
            node.child(label.node_name())
                .map(|child| read_element(declared, child, Form::Plain, context))
                .transpose()
        }
        Shape::ElementList(layout) => list::read_member(label, layout, node, context),
        Shape::ElementArray(layout) => node
            .child(label.node_name())
            .map(|child| read_element(label.declared(), child, Form::Array(layout), context))
            .transpose(),
        Shape::ElementMap(layout) => map::read_member(label, layout, node, context),
        Shape::Union(layout) => union::read_member(layout, node, context),
        Shape::Attribute | Shape::Text => Ok(None),
    }
}
