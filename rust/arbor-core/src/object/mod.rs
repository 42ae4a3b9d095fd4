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

//! Arena backed object graphs.
//!
//! Every non-null value lives in a [`Heap`] and is addressed by the
//! [`ObjectId`] it received on insertion. Identity is `ObjectId` equality, so
//! two members holding the same id share one instance, and a member may hold
//! the id of an object that (transitively) contains it.
//!
//! ```rust
//! use arbor_core::object::Heap;
//! use arbor_core::types::TypeRef;
//!
//! let mut heap = Heap::new();
//! let name = heap.string("x");
//! let node = heap.instance("Node");
//! heap.set_field(node, "name", Some(name)).unwrap();
//! heap.set_field(node, "next", Some(node)).unwrap();
//! assert_eq!(heap.field(node, "next"), Some(node));
//! assert_eq!(heap.runtime_type(node).unwrap(), TypeRef::class("Node"));
//! ```

mod primitive;

pub use primitive::{Primitive, DATETIME_FORMAT, DATE_FORMAT};

use crate::error::Error;
use crate::types::TypeRef;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Stable index of an object inside its [`Heap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A constant of a registered enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumConstant {
    pub enum_name: String,
    pub variant: String,
}

/// An instance of a registered class. Absent members are null.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instance {
    class: String,
    fields: BTreeMap<String, ObjectId>,
}

impl Instance {
    pub fn new(class: impl Into<String>) -> Instance {
        Instance {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    #[inline(always)]
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn get(&self, member: &str) -> Option<ObjectId> {
        self.fields.get(member).copied()
    }

    pub fn set(&mut self, member: impl Into<String>, value: Option<ObjectId>) {
        let member = member.into();
        match value {
            Some(id) => {
                self.fields.insert(member, id);
            }
            None => {
                self.fields.remove(&member);
            }
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, ObjectId)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Fixed length array, slots may be null.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayObject {
    component: TypeRef,
    slots: Vec<Option<ObjectId>>,
}

impl ArrayObject {
    /// Array of `length` null slots.
    pub fn new(component: TypeRef, length: usize) -> ArrayObject {
        ArrayObject {
            component,
            slots: vec![None; length],
        }
    }

    pub fn from_slots(component: TypeRef, slots: Vec<Option<ObjectId>>) -> ArrayObject {
        ArrayObject { component, slots }
    }

    #[inline(always)]
    pub fn component(&self) -> &TypeRef {
        &self.component
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ObjectId> {
        self.slots.get(index).copied().flatten()
    }

    pub fn set(&mut self, index: usize, value: Option<ObjectId>) -> Result<(), Error> {
        let length = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            Error::invalid_data(format!(
                "index {} is out of bounds for array of length {}",
                index, length
            ))
        })?;
        *slot = value;
        Ok(())
    }

    pub fn slots(&self) -> &[Option<ObjectId>] {
        &self.slots
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListObject {
    items: Vec<ObjectId>,
}

impl ListObject {
    pub fn new(items: Vec<ObjectId>) -> ListObject {
        ListObject { items }
    }

    pub fn push(&mut self, item: ObjectId) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ObjectId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ordered map entries, values may be null.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapObject {
    entries: Vec<(ObjectId, Option<ObjectId>)>,
}

impl MapObject {
    pub fn new(entries: Vec<(ObjectId, Option<ObjectId>)>) -> MapObject {
        MapObject { entries }
    }

    pub fn insert(&mut self, key: ObjectId, value: Option<ObjectId>) {
        self.entries.push((key, value));
    }

    pub fn entries(&self) -> &[(ObjectId, Option<ObjectId>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Primitive(Primitive),
    Enum(EnumConstant),
    Instance(Instance),
    Array(ArrayObject),
    List(ListObject),
    Map(MapObject),
}

impl Object {
    /// The type this object was constructed as.
    pub fn runtime_type(&self) -> TypeRef {
        match self {
            Object::Primitive(p) => TypeRef::Primitive(p.kind()),
            Object::Enum(e) => TypeRef::Enum(e.enum_name.clone()),
            Object::Instance(i) => TypeRef::Class(i.class.clone()),
            Object::Array(a) => TypeRef::Array(Box::new(a.component.clone())),
            Object::List(_) => TypeRef::List(Box::new(TypeRef::Any)),
            Object::Map(_) => TypeRef::Map(Box::new(TypeRef::Any), Box::new(TypeRef::Any)),
        }
    }

    /// Text form of scalar objects.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Object::Primitive(p) => Some(p.to_text()),
            Object::Enum(e) => Some(e.variant.clone()),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Object::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Object::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayObject> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListObject> {
        match self {
            Object::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapObject> {
        match self {
            Object::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Arena owning every object of one graph.
#[derive(Clone, Debug, Default)]
pub struct Heap {
    objects: Vec<Object>,
}

impl Heap {
    pub fn new() -> Heap {
        Heap::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Inserts an object and returns its id, ids are assigned in insertion order.
    pub fn insert(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    #[inline(always)]
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.index())
    }

    #[inline(always)]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.index())
    }

    /// Like [`Heap::get`], failing for ids that do not belong to this heap.
    pub fn object(&self, id: ObjectId) -> Result<&Object, Error> {
        self.get(id)
            .ok_or_else(|| Error::invalid_data(format!("object {} does not exist", id)))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut Object, Error> {
        self.get_mut(id)
            .ok_or_else(|| Error::invalid_data(format!("object {} does not exist", id)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }

    pub fn runtime_type(&self, id: ObjectId) -> Result<TypeRef, Error> {
        Ok(self.object(id)?.runtime_type())
    }

    pub fn primitive(&mut self, value: impl Into<Primitive>) -> ObjectId {
        self.insert(Object::Primitive(value.into()))
    }

    pub fn string(&mut self, value: impl Into<String>) -> ObjectId {
        self.insert(Object::Primitive(Primitive::String(value.into())))
    }

    pub fn enum_constant(
        &mut self,
        enum_name: impl Into<String>,
        variant: impl Into<String>,
    ) -> ObjectId {
        self.insert(Object::Enum(EnumConstant {
            enum_name: enum_name.into(),
            variant: variant.into(),
        }))
    }

    /// New instance of `class` with every member null.
    pub fn instance(&mut self, class: impl Into<String>) -> ObjectId {
        self.insert(Object::Instance(Instance::new(class)))
    }

    pub fn array(&mut self, component: TypeRef, slots: Vec<Option<ObjectId>>) -> ObjectId {
        self.insert(Object::Array(ArrayObject::from_slots(component, slots)))
    }

    pub fn list(&mut self, items: Vec<ObjectId>) -> ObjectId {
        self.insert(Object::List(ListObject::new(items)))
    }

    pub fn map(&mut self, entries: Vec<(ObjectId, Option<ObjectId>)>) -> ObjectId {
        self.insert(Object::Map(MapObject::new(entries)))
    }

    pub fn set_field(
        &mut self,
        target: ObjectId,
        member: impl Into<String>,
        value: Option<ObjectId>,
    ) -> Result<(), Error> {
        match self.object_mut(target)? {
            Object::Instance(instance) => {
                instance.set(member, value);
                Ok(())
            }
            other => Err(Error::type_error(format!(
                "can not set member of {} {}, it is not a class instance",
                other.runtime_type(),
                target
            ))),
        }
    }

    pub fn set_slot(
        &mut self,
        target: ObjectId,
        index: usize,
        value: Option<ObjectId>,
    ) -> Result<(), Error> {
        match self.object_mut(target)? {
            Object::Array(array) => array.set(index, value),
            other => Err(Error::type_error(format!(
                "can not set slot of {} {}, it is not an array",
                other.runtime_type(),
                target
            ))),
        }
    }

    /// Member value of an instance, `None` for null members and non-instances.
    pub fn field(&self, target: ObjectId, member: &str) -> Option<ObjectId> {
        self.get(target)?.as_instance()?.get(member)
    }

    pub fn as_primitive(&self, id: ObjectId) -> Option<&Primitive> {
        self.get(id)?.as_primitive()
    }

    pub fn as_str(&self, id: ObjectId) -> Option<&str> {
        self.as_primitive(id)?.as_str()
    }

    /// Compares the graph reachable from `a` with the one reachable from `b` in
    /// `other`, following references in lock step so cycles terminate.
    ///
    /// Two graphs are equivalent when they have the same shape and scalar
    /// values, and when sharing in one is mirrored by sharing in the other.
    pub fn equivalent(&self, a: ObjectId, other: &Heap, b: ObjectId) -> bool {
        let mut pairs: HashSet<(ObjectId, ObjectId)> = HashSet::new();
        let mut forward: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
        let mut backward: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
        let mut pending = vec![(Some(a), Some(b))];
        while let Some(pair) = pending.pop() {
            let (a, b) = match pair {
                (None, None) => continue,
                (Some(a), Some(b)) => (a, b),
                _ => return false,
            };
            if *forward.entry(a).or_insert(b) != b || *backward.entry(b).or_insert(a) != a {
                return false;
            }
            if !pairs.insert((a, b)) {
                continue;
            }
            let (Some(left), Some(right)) = (self.get(a), other.get(b)) else {
                return false;
            };
            match (left, right) {
                (Object::Primitive(x), Object::Primitive(y)) if x == y => {}
                (Object::Enum(x), Object::Enum(y)) if x == y => {}
                (Object::Instance(x), Object::Instance(y)) if x.class == y.class => {
                    let keys: HashSet<&String> = x.fields.keys().chain(y.fields.keys()).collect();
                    for key in keys {
                        pending.push((x.get(key), y.get(key)));
                    }
                }
                (Object::Array(x), Object::Array(y))
                    if x.component == y.component && x.len() == y.len() =>
                {
                    pending.extend(x.slots.iter().copied().zip(y.slots.iter().copied()));
                }
                (Object::List(x), Object::List(y)) if x.len() == y.len() => {
                    pending.extend(
                        x.items
                            .iter()
                            .zip(y.items.iter())
                            .map(|(l, r)| (Some(*l), Some(*r))),
                    );
                }
                (Object::Map(x), Object::Map(y)) if x.len() == y.len() => {
                    for ((lk, lv), (rk, rv)) in x.entries.iter().zip(y.entries.iter()) {
                        pending.push((Some(*lk), Some(*rk)));
                        pending.push((*lv, *rv));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

/// Result of a deserialization: the heap that was built and its root object.
#[derive(Clone, Debug)]
pub struct Graph {
    heap: Heap,
    root: ObjectId,
}

impl Graph {
    pub fn new(heap: Heap, root: ObjectId) -> Graph {
        Graph { heap, root }
    }

    #[inline(always)]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    #[inline(always)]
    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn root_object(&self) -> Option<&Object> {
        self.heap.get(self.root)
    }

    /// Member value of the root instance.
    pub fn field(&self, member: &str) -> Option<ObjectId> {
        self.heap.field(self.root, member)
    }

    pub fn into_parts(self) -> (Heap, ObjectId) {
        (self.heap, self.root)
    }
}
