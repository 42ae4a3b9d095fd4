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

#![allow(dead_code)]

use arbor::meta::{LabelKind, MapLayout, Shape as NodeShape, TypeDef};
use arbor::{Arbor, Describe, Error, Heap, ObjectId, SchemaError, TypeOf, TypeRef};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Describe)]
#[arbor(root = "person", order(elements("address", "hobbies")))]
struct Person {
    #[arbor(attribute)]
    name: String,
    #[arbor(attribute)]
    age: Option<i32>,
    #[arbor(element_list, entry = "hobby")]
    hobbies: Vec<String>,
    #[arbor(element)]
    address: Option<Address>,
    #[arbor(skip)]
    cache: Vec<String>,
}

#[derive(Describe)]
struct Address {
    #[arbor(text)]
    street: String,
}

#[derive(Describe)]
enum Status {
    Active,
    #[arbor(name = "on-hold")]
    OnHold,
}

#[derive(Describe)]
#[arbor(name = "Ticket", strict = false)]
struct TicketRecord {
    #[arbor(attribute, name = "state")]
    status: Status,
    #[arbor(element_map, entry = "field", key = "name", attribute_key, inline)]
    fields: HashMap<String, String>,
    #[arbor(element_array, entry = "score", required = false)]
    scores: [i32; 3],
}

#[derive(Describe)]
#[arbor(abstract_class)]
struct Shape {}

#[derive(Describe)]
#[arbor(extends = Shape, constructor(radius))]
struct Circle {
    #[arbor(attribute, read_only)]
    radius: f64,
}

#[derive(Describe)]
#[arbor(extends = Shape)]
struct Square {
    #[arbor(attribute)]
    side: f64,
}

#[derive(Describe)]
struct Canvas {
    #[arbor(union, candidates(circle = Circle, square = Square))]
    main: Shape,
    #[arbor(list_union, candidates(disc = Circle, tile = Square), required = false)]
    layers: Vec<Shape>,
}

#[derive(Describe)]
#[arbor(default = "field", default_required = false)]
struct Settings {
    theme: String,
    #[arbor(skip)]
    session: String,
    #[arbor(attribute)]
    version: i32,
}

#[derive(Describe)]
#[arbor(constructor(label))]
struct Labelled {
    #[arbor(attribute, read_only)]
    label: String,
    #[arbor(attribute)]
    other: String,
}

#[derive(Describe)]
#[arbor(constructor(count))]
struct Counted {
    #[arbor(attribute, required = false)]
    count: i32,
}

static WRITES: AtomicUsize = AtomicUsize::new(0);

fn count_write(_: &Heap, _: ObjectId) -> anyhow::Result<()> {
    WRITES.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[derive(Describe)]
#[arbor(persist = count_write)]
struct Audited {
    #[arbor(attribute)]
    who: String,
}

#[test]
fn test_type_of() {
    assert_eq!(Person::type_ref(), TypeRef::class("Person"));
    assert_eq!(TicketRecord::type_ref(), TypeRef::class("Ticket"));
    assert_eq!(Status::type_ref(), TypeRef::enumeration("Status"));
    assert_eq!(
        <Vec<Option<Address>>>::type_ref(),
        TypeRef::list_of(TypeRef::class("Address"))
    );
    assert_eq!(<[Circle; 2]>::type_ref(), TypeRef::array_of(TypeRef::class("Circle")));
}

#[test]
fn test_describe_enum() {
    let TypeDef::Enum(def) = Status::describe() else {
        panic!("Status should describe an enum");
    };
    assert_eq!(def.name, "Status");
    assert!(def.has_variant("Active"));
    assert!(def.has_variant("on-hold"));
    assert!(!def.has_variant("OnHold"));
}

#[test]
fn test_describe_class() {
    let TypeDef::Class(def) = Person::describe() else {
        panic!("Person should describe a class");
    };
    assert_eq!(def.name, "Person");
    assert_eq!(def.members.len(), 5);
    let cache = def.find_member("cache").unwrap();
    assert!(cache.transient);
    assert!(cache.tag.is_none());
    let age = def.find_member("age").unwrap();
    assert_eq!(age.declared, TypeRef::INT);
    assert!(!age.tag.as_ref().unwrap().is_required());
    assert!(def.find_member("name").unwrap().tag.as_ref().unwrap().is_required());
}

#[test]
fn test_derived_schema() {
    let mut arbor = Arbor::default();
    arbor.register::<Address>().unwrap();
    arbor.register::<Person>().unwrap();
    let schema = arbor.schema("Person").unwrap();
    assert_eq!(schema.root_name(), "person");
    let elements: Vec<&str> = schema.labels().elements().iter().map(|l| l.member()).collect();
    assert_eq!(elements, ["address", "hobbies"]);
    assert_eq!(
        schema.labels().element_for("hobbies").unwrap().kind(),
        LabelKind::ElementList
    );
    assert!(schema.labels().element_for("cache").is_none());
    assert_eq!(arbor.schema("Address").unwrap().labels().text().unwrap().member(), "street");
}

#[test]
fn test_derived_round_trip() {
    let mut arbor = Arbor::default();
    arbor.register::<Address>().unwrap();
    arbor.register::<Person>().unwrap();

    let mut heap = Heap::new();
    let person = heap.instance("Person");
    let name = heap.string("Ada");
    let street = heap.string("1 Analytical Way");
    let address = heap.instance("Address");
    heap.set_field(address, "street", Some(street)).unwrap();
    let chess = heap.string("chess");
    let hobbies = heap.list(vec![chess]);
    heap.set_field(person, "name", Some(name)).unwrap();
    heap.set_field(person, "address", Some(address)).unwrap();
    heap.set_field(person, "hobbies", Some(hobbies)).unwrap();

    let node = arbor.serialize(&heap, person).unwrap();
    assert_eq!(node.name(), "person");
    assert!(node.attribute("age").is_none());
    assert_eq!(node.children()[0].name(), "address");
    assert_eq!(node.children()[0].text(), Some("1 Analytical Way"));
    assert_eq!(node.child("hobbies").unwrap().children()[0].name(), "hobby");

    let graph = arbor.deserialize(&node, &Person::type_ref()).unwrap();
    assert!(heap.equivalent(person, graph.heap(), graph.root()));
}

#[test]
fn test_derived_collections() {
    let mut arbor = Arbor::default();
    arbor.register::<Status>().unwrap();
    arbor.register::<TicketRecord>().unwrap();
    let schema = arbor.schema("Ticket").unwrap();
    assert!(!schema.is_strict());
    assert_eq!(schema.root_name(), "ticket");
    let state = schema.labels().attribute_for("state").unwrap();
    assert_eq!(state.declared(), &TypeRef::enumeration("Status"));
    let NodeShape::ElementMap(MapLayout {
        entry,
        key,
        attribute,
        inline,
        value_text,
        ..
    }) = schema.labels().element_for("field").unwrap().shape()
    else {
        panic!("fields should be an element map");
    };
    assert_eq!((entry.as_str(), key.as_str()), ("field", "name"));
    assert!(*attribute && *inline && *value_text);
    assert!(!schema.labels().element_for("scores").unwrap().is_required());

    let mut heap = Heap::new();
    let ticket = heap.instance("Ticket");
    let status = heap.enum_constant("Status", "on-hold");
    let key = heap.string("priority");
    let value = heap.string("high");
    let fields = heap.map(vec![(key, Some(value))]);
    let seven = heap.primitive(7i32);
    let scores = heap.array(TypeRef::INT, vec![Some(seven), None, None]);
    heap.set_field(ticket, "status", Some(status)).unwrap();
    heap.set_field(ticket, "fields", Some(fields)).unwrap();
    heap.set_field(ticket, "scores", Some(scores)).unwrap();

    let node = arbor.serialize(&heap, ticket).unwrap();
    assert_eq!(node.attribute("state"), Some("on-hold"));
    let field = node.child("field").unwrap();
    assert_eq!(field.attribute("name"), Some("priority"));
    assert_eq!(field.text(), Some("high"));
    assert_eq!(node.child("scores").unwrap().attribute("length"), Some("3"));

    let graph = arbor.deserialize(&node, &TicketRecord::type_ref()).unwrap();
    assert!(heap.equivalent(ticket, graph.heap(), graph.root()));
}

#[test]
fn test_derived_unions_and_constructors() {
    let mut arbor = Arbor::default();
    arbor.register::<Shape>().unwrap();
    arbor.register::<Circle>().unwrap();
    arbor.register::<Square>().unwrap();
    arbor.register::<Canvas>().unwrap();

    let circle = arbor.schema("Circle").unwrap();
    assert_eq!(circle.read_only(), ["radius".to_string()]);
    assert!(circle.signatures().default_signature().is_none());
    assert!(arbor.schema("Shape").unwrap().is_abstract());

    let mut heap = Heap::new();
    let canvas = heap.instance("Canvas");
    let main = heap.instance("Circle");
    let radius = heap.primitive(2.5f64);
    heap.set_field(main, "radius", Some(radius)).unwrap();
    let layer = heap.instance("Square");
    let side = heap.primitive(1.0f64);
    heap.set_field(layer, "side", Some(side)).unwrap();
    let layers = heap.list(vec![layer]);
    heap.set_field(canvas, "main", Some(main)).unwrap();
    heap.set_field(canvas, "layers", Some(layers)).unwrap();

    let node = arbor.serialize(&heap, canvas).unwrap();
    let names: Vec<&str> = node.children().iter().map(|n| n.name()).collect();
    assert_eq!(names, ["circle", "tile"]);
    let graph = arbor.deserialize(&node, &Canvas::type_ref()).unwrap();
    assert!(heap.equivalent(canvas, graph.heap(), graph.root()));
}

#[test]
fn test_derived_default_access() {
    let mut arbor = Arbor::default();
    arbor.register::<Settings>().unwrap();
    let schema = arbor.schema("Settings").unwrap();
    let theme = schema.labels().element_for("theme").unwrap();
    assert_eq!(theme.kind(), LabelKind::Element);
    assert!(!theme.is_required());
    assert!(schema.labels().element_for("session").is_none());
    assert!(schema.labels().attribute_for("version").unwrap().is_required());
}

#[test]
fn test_derived_constructors() {
    let mut arbor = Arbor::default();
    arbor.register::<Labelled>().unwrap();
    arbor.register::<Counted>().unwrap();
    // Only read-only members need a constructor parameter.
    assert!(arbor.schema("Labelled").is_ok());
    // Parameters reuse the field's tag, optional included.
    assert!(arbor.schema("Counted").is_ok());

    let mut arbor = Arbor::default();
    arbor.register::<Circle>().unwrap();
    assert!(matches!(
        arbor.schema("Circle"),
        Err(Error::Schema(SchemaError::UnresolvedType { .. }))
    ));
}

#[test]
fn test_derived_hooks() {
    let mut arbor = Arbor::default();
    arbor.register::<Audited>().unwrap();
    let mut heap = Heap::new();
    let audited = heap.instance("Audited");
    let who = heap.string("me");
    heap.set_field(audited, "who", Some(who)).unwrap();
    let before = WRITES.load(Ordering::SeqCst);
    arbor.serialize(&heap, audited).unwrap();
    assert_eq!(WRITES.load(Ordering::SeqCst), before + 1);
}
