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

//! Moves values between the heap and document nodes.
//!
//! [`write_element`] and [`read_element`] are the only entry points that
//! consult the strategy. Everything below them dispatches on the content type
//! and recurses back through them for nested element values.

use crate::document::Node;
use crate::error::Error;
use crate::meta::{ArrayLayout, ListLayout, MapLayout};
use crate::object::{Heap, Object, ObjectId};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::TypeResolver;
use crate::strategy::{Allocation, Target, TypeResolution};
use crate::types::TypeRef;

pub mod array;
pub mod enum_;
pub mod list;
pub mod map;
pub mod primitive;
pub mod struct_;
pub mod union;

/// Entry layout of the value written under one node.
///
/// Labels carry explicit entry names; values met without a label, such as
/// the document root or a list item, use `Plain` and the resolver defaults.
#[derive(Clone, Copy, Debug)]
pub enum Form<'a> {
    Plain,
    List(&'a ListLayout),
    Array(&'a ArrayLayout),
    Map(&'a MapLayout),
}

/// Writes `id` as an element named `name`.
pub fn write_element(
    declared: &TypeRef,
    id: ObjectId,
    name: &str,
    form: Form<'_>,
    context: &mut WriteContext,
) -> Result<Node, Error> {
    context.inc_depth(name)?;
    let object = context.heap().object(id)?;
    let mut node = Node::new(name);
    let handled = context.strategy().write(
        declared,
        Target { id, object },
        &mut node,
        context.resolver(),
        &mut context.session,
    )?;
    if !handled {
        write_content(declared, id, object, form, &mut node, context)?;
    }
    context.dec_depth();
    Ok(node)
}

fn write_content(
    declared: &TypeRef,
    id: ObjectId,
    object: &Object,
    form: Form<'_>,
    node: &mut Node,
    context: &mut WriteContext,
) -> Result<(), Error> {
    match object {
        Object::Primitive(value) => primitive::write(value, node),
        Object::Enum(constant) => enum_::write(constant, node),
        Object::Instance(instance) => struct_::write(id, instance, node, context)?,
        Object::Array(array) => array::write(array, form, node, context)?,
        Object::List(list) => list::write(declared, list, form, node, context)?,
        Object::Map(map) => map::write(declared, map, form, node, context)?,
    }
    Ok(())
}

/// Reads the element `node` as a value of the `declared` type.
pub fn read_element(
    declared: &TypeRef,
    node: &Node,
    form: Form<'_>,
    context: &mut ReadContext,
) -> Result<ObjectId, Error> {
    context.inc_depth(node.name())?;
    let resolution =
        context
            .strategy()
            .read(declared, node, context.resolver(), &context.session)?;
    let id = match resolution {
        TypeResolution::Reference(id) => id,
        TypeResolution::Plain(allocation) | TypeResolution::New(allocation) => {
            read_content(&allocation, node, form, context)?
        }
    };
    context.dec_depth();
    Ok(id)
}

fn read_content(
    allocation: &Allocation,
    node: &Node,
    form: Form<'_>,
    context: &mut ReadContext,
) -> Result<ObjectId, Error> {
    match allocation.actual() {
        TypeRef::Any => Err(Error::type_error(format!(
            "node '{}' does not name its type, add a '{}' attribute",
            node.name(),
            context.config().reserved().class
        ))),
        TypeRef::Primitive(kind) => {
            let value = primitive::read(*kind, node)?;
            allocation.allocate(
                Object::Primitive(value),
                &mut context.heap,
                &mut context.session,
            )
        }
        TypeRef::Enum(name) => {
            let constant = enum_::read(context.resolver(), name, node.text().unwrap_or(""))?;
            allocation.allocate(constant, &mut context.heap, &mut context.session)
        }
        TypeRef::Class(name) => struct_::read(allocation, name, node, context),
        TypeRef::Array(component) => array::read(allocation, component, node, context),
        TypeRef::List(item) => list::read(allocation, item, node, form, context),
        TypeRef::Map(key, value) => map::read(allocation, key, value, node, form, context),
    }
}

/// Text of a scalar value written into an attribute or node text.
pub fn scalar_text(heap: &Heap, id: ObjectId, node: &str) -> Result<String, Error> {
    let object = heap.object(id)?;
    object.scalar_text().ok_or_else(|| {
        Error::type_error(format!(
            "value of type '{}' can not be written as text of '{}'",
            object.runtime_type(),
            node
        ))
    })
}

/// Builds the scalar object of type `ty` from attribute or node text.
pub fn read_scalar(ty: &TypeRef, text: &str, resolver: &TypeResolver) -> Result<Object, Error> {
    match ty {
        TypeRef::Primitive(kind) => Ok(Object::Primitive(primitive::parse(*kind, text)?)),
        TypeRef::Enum(name) => enum_::read(resolver, name, text),
        other => Err(Error::type_error(format!(
            "type '{}' can not be read from text",
            other
        ))),
    }
}
