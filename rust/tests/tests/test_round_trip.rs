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

use arbor_core::document::Node;
use arbor_core::error::Error;
use arbor_core::meta::{ClassDef, EnumDef, MemberDef, RootTag, Tag};
use arbor_core::object::{Heap, Object, ObjectId, Primitive};
use arbor_core::types::TypeRef;
use arbor_core::Arbor;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn zoo() -> Vec<ClassDef> {
    vec![
        ClassDef::new("Animal")
            .abstract_class(true)
            .member(MemberDef::new("name", TypeRef::STRING).tag(Tag::attribute())),
        ClassDef::new("Dog")
            .extends("Animal")
            .member(MemberDef::new("breed", TypeRef::STRING).tag(Tag::attribute())),
        ClassDef::new("Cat").extends("Animal"),
        ClassDef::new("Owner")
            .member(MemberDef::new("pet", TypeRef::class("Animal")).tag(Tag::element()))
            .member(
                MemberDef::new("others", TypeRef::list_of(TypeRef::class("Animal")))
                    .tag(Tag::element_list().entry("animal").required(false)),
            ),
    ]
}

fn arbor_with(defs: Vec<ClassDef>) -> Arbor {
    let mut arbor = Arbor::default();
    for def in defs {
        arbor.register_class(def).unwrap();
    }
    arbor
}

fn cycle_arbor_with(defs: Vec<ClassDef>) -> Arbor {
    let mut arbor = Arbor::default().track_ref(true);
    for def in defs {
        arbor.register_class(def).unwrap();
    }
    arbor
}

fn animal(heap: &mut Heap, class: &str, name: &str) -> ObjectId {
    let animal = heap.instance(class);
    let name = heap.string(name);
    heap.set_field(animal, "name", Some(name)).unwrap();
    animal
}

fn dog(heap: &mut Heap, name: &str, breed: &str) -> ObjectId {
    let dog = animal(heap, "Dog", name);
    let breed = heap.string(breed);
    heap.set_field(dog, "breed", Some(breed)).unwrap();
    dog
}

fn round_trip(arbor: &Arbor, heap: &Heap, root: ObjectId) -> Node {
    let node = arbor.serialize(heap, root).unwrap();
    let declared = heap.runtime_type(root).unwrap();
    let graph = arbor.deserialize(&node, &declared).unwrap();
    assert!(
        heap.equivalent(root, graph.heap(), graph.root()),
        "graph changed across a round trip: {:?}",
        node
    );
    node
}

#[test]
fn test_scalars() {
    let arbor = arbor_with(vec![ClassDef::new("Sample")
        .member(MemberDef::new("flag", TypeRef::BOOL).tag(Tag::attribute()))
        .member(MemberDef::new("letter", TypeRef::CHAR).tag(Tag::attribute()))
        .member(MemberDef::new("tiny", TypeRef::BYTE).tag(Tag::attribute()))
        .member(MemberDef::new("small", TypeRef::SHORT).tag(Tag::attribute()))
        .member(MemberDef::new("count", TypeRef::INT).tag(Tag::attribute()))
        .member(MemberDef::new("total", TypeRef::LONG).tag(Tag::attribute()))
        .member(MemberDef::new("ratio", TypeRef::FLOAT).tag(Tag::attribute()))
        .member(MemberDef::new("weight", TypeRef::DOUBLE).tag(Tag::element()))
        .member(MemberDef::new("born", TypeRef::DATE).tag(Tag::attribute()))
        .member(MemberDef::new("seen", TypeRef::DATETIME).tag(Tag::element()))]);
    let mut heap = Heap::new();
    let sample = heap.instance("Sample");
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let values: Vec<(&str, Primitive)> = vec![
        ("flag", true.into()),
        ("letter", 'z'.into()),
        ("tiny", (-8i8).into()),
        ("small", 300i16.into()),
        ("count", 42i32.into()),
        ("total", 9_000_000_000i64.into()),
        ("ratio", 1.5f32.into()),
        ("weight", 72.25f64.into()),
        ("born", date.into()),
        ("seen", date.and_hms_opt(10, 20, 30).unwrap().into()),
    ];
    for (member, value) in values {
        let value = heap.primitive(value);
        heap.set_field(sample, member, Some(value)).unwrap();
    }

    let node = round_trip(&arbor, &heap, sample);
    assert_eq!(node.attribute("flag"), Some("true"));
    assert_eq!(node.attribute("total"), Some("9000000000"));
    assert_eq!(node.attribute("born"), Some("2024-03-01"));
    assert_eq!(node.child("weight").unwrap().text(), Some("72.25"));
}

#[test]
fn test_malformed_scalar() {
    let arbor = arbor_with(vec![ClassDef::new("Counter")
        .member(MemberDef::new("count", TypeRef::INT).tag(Tag::attribute()))]);
    let node = Node::new("counter").with_attribute("count", "many");
    assert!(matches!(
        arbor.deserialize(&node, &TypeRef::class("Counter")),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_text_member() {
    let arbor = arbor_with(vec![ClassDef::new("Quote")
        .member(MemberDef::new("author", TypeRef::STRING).tag(Tag::attribute()))
        .member(MemberDef::new("body", TypeRef::STRING).tag(Tag::text()))]);
    let mut heap = Heap::new();
    let quote = heap.instance("Quote");
    let author = heap.string("Ada");
    let body = heap.string("  keep the spaces  ");
    heap.set_field(quote, "author", Some(author)).unwrap();
    heap.set_field(quote, "body", Some(body)).unwrap();

    let node = round_trip(&arbor, &heap, quote);
    assert_eq!(node.text(), Some("  keep the spaces  "));
    assert!(node.children().is_empty());
}

#[test]
fn test_shared_strings() {
    let arbor = cycle_arbor_with(vec![ClassDef::new("Triple")
        .member(MemberDef::new("a", TypeRef::STRING).tag(Tag::element()))
        .member(MemberDef::new("b", TypeRef::STRING).tag(Tag::element()))
        .member(MemberDef::new("c", TypeRef::STRING).tag(Tag::element()))]);
    let mut heap = Heap::new();
    let triple = heap.instance("Triple");
    let x = heap.string("x");
    let y = heap.string("y");
    heap.set_field(triple, "a", Some(x)).unwrap();
    heap.set_field(triple, "b", Some(x)).unwrap();
    heap.set_field(triple, "c", Some(y)).unwrap();

    let node = arbor.serialize(&heap, triple).unwrap();
    let a = node.child("a").unwrap();
    let b = node.child("b").unwrap();
    let c = node.child("c").unwrap();
    assert_eq!(a.text(), Some("x"));
    let token = a.attribute("id").unwrap();
    assert_eq!(b.attribute("reference"), Some(token));
    assert!(b.text().is_none());
    assert_eq!(c.text(), Some("y"));
    assert!(c.attribute("id").is_some());
    assert_ne!(c.attribute("id"), Some(token));
    let identities = node
        .descendants()
        .iter()
        .filter(|n| n.attribute("id").is_some())
        .count();
    assert_eq!(identities, 3);

    let graph = arbor.deserialize(&node, &TypeRef::class("Triple")).unwrap();
    assert_eq!(graph.field("a"), graph.field("b"));
    assert_ne!(graph.field("a"), graph.field("c"));
    assert_eq!(graph.heap().as_str(graph.field("c").unwrap()), Some("y"));
}

#[test]
fn test_sharing_and_cycles() {
    let arbor = cycle_arbor_with(vec![
        ClassDef::new("Task")
            .member(MemberDef::new("title", TypeRef::STRING).tag(Tag::attribute()))
            .member(
                MemberDef::new("blocks", TypeRef::list_of(TypeRef::class("Task")))
                    .tag(Tag::element_list().entry("task").required(false)),
            )
            .member(
                MemberDef::new("project", TypeRef::class("Project"))
                    .tag(Tag::element().required(false)),
            ),
        ClassDef::new("Project")
            .member(MemberDef::new("code", TypeRef::STRING).tag(Tag::attribute()))
            .member(
                MemberDef::new("tasks", TypeRef::list_of(TypeRef::class("Task")))
                    .tag(Tag::element_list().entry("task")),
            ),
    ]);
    let mut heap = Heap::new();
    let project = heap.instance("Project");
    let code = heap.string("P-1");
    heap.set_field(project, "code", Some(code)).unwrap();
    let mut tasks = Vec::new();
    for title in ["design", "build", "ship"] {
        let task = heap.instance("Task");
        let title = heap.string(title);
        heap.set_field(task, "title", Some(title)).unwrap();
        heap.set_field(task, "project", Some(project)).unwrap();
        tasks.push(task);
    }
    let design_blocks = heap.list(vec![tasks[1], tasks[2]]);
    heap.set_field(tasks[0], "blocks", Some(design_blocks)).unwrap();
    let build_blocks = heap.list(vec![tasks[2]]);
    heap.set_field(tasks[1], "blocks", Some(build_blocks)).unwrap();
    let all = heap.list(tasks.clone());
    heap.set_field(project, "tasks", Some(all)).unwrap();

    round_trip(&arbor, &heap, project);

    let node = arbor.serialize(&heap, project).unwrap();
    let graph = arbor.deserialize(&node, &TypeRef::class("Project")).unwrap();
    let read = graph.heap();
    let all = read.object(graph.field("tasks").unwrap()).unwrap();
    let items = all.as_list().unwrap().items().to_vec();
    for task in &items {
        assert_eq!(read.field(*task, "project"), Some(graph.root()));
    }
    let blocks = read.field(items[0], "blocks").unwrap();
    assert_eq!(read.object(blocks).unwrap().as_list().unwrap().items()[1], items[2]);
}

#[test]
fn test_polymorphic_members() {
    let arbor = arbor_with(zoo());
    let mut heap = Heap::new();
    let owner = heap.instance("Owner");
    let pet = dog(&mut heap, "Rex", "collie");
    let cat = animal(&mut heap, "Cat", "Tom");
    let stray = dog(&mut heap, "Max", "pug");
    let others = heap.list(vec![cat, stray]);
    heap.set_field(owner, "pet", Some(pet)).unwrap();
    heap.set_field(owner, "others", Some(others)).unwrap();

    let node = round_trip(&arbor, &heap, owner);
    let pet_node = node.child("pet").unwrap();
    assert_eq!(pet_node.attribute("class"), Some("Dog"));
    assert_eq!(pet_node.attribute("breed"), Some("collie"));
    let entries = node.child("others").unwrap().children();
    assert_eq!(entries[0].name(), "animal");
    assert_eq!(entries[0].attribute("class"), Some("Cat"));

    let graph = arbor.deserialize(&node, &TypeRef::class("Owner")).unwrap();
    let pet = graph.field("pet").unwrap();
    let Some(Object::Instance(instance)) = graph.heap().get(pet) else {
        panic!("pet should be an instance");
    };
    assert_eq!(instance.class(), "Dog");
}

#[test]
fn test_type_attribute_errors() {
    let arbor = arbor_with(zoo());
    let declared = TypeRef::class("Owner");

    // Animal is abstract, the document has to name the concrete class.
    let node = Node::new("owner").with_child(Node::new("pet").with_attribute("name", "x"));
    assert!(matches!(
        arbor.deserialize(&node, &declared),
        Err(Error::TypeError(_))
    ));

    let node = Node::new("owner").with_child(
        Node::new("pet")
            .with_attribute("class", "Unicorn")
            .with_attribute("name", "x"),
    );
    assert!(matches!(
        arbor.deserialize(&node, &declared),
        Err(Error::TypeError(_))
    ));

    let node = Node::new("owner").with_child(Node::new("pet").with_attribute("class", "Owner"));
    assert!(matches!(
        arbor.deserialize(&node, &declared),
        Err(Error::TypeError(_))
    ));
}

#[test]
fn test_element_class_override() {
    let mut defs = zoo();
    defs.push(
        ClassDef::new("Kennel").member(
            MemberDef::new("resident", TypeRef::class("Animal"))
                .tag(Tag::element().class(TypeRef::class("Dog"))),
        ),
    );
    let arbor = arbor_with(defs);
    let mut heap = Heap::new();
    let kennel = heap.instance("Kennel");
    let resident = dog(&mut heap, "Fido", "beagle");
    heap.set_field(kennel, "resident", Some(resident)).unwrap();

    let node = round_trip(&arbor, &heap, kennel);
    assert!(node.child("resident").unwrap().attribute("class").is_none());
}

#[test]
fn test_lists() {
    let arbor = arbor_with(vec![
        ClassDef::new("Book").member(MemberDef::new("title", TypeRef::STRING).tag(Tag::attribute())),
        ClassDef::new("Library")
            .member(
                MemberDef::new("books", TypeRef::list_of(TypeRef::class("Book")))
                    .tag(Tag::element_list()),
            )
            .member(
                MemberDef::new("authors", TypeRef::list_of(TypeRef::STRING))
                    .tag(Tag::element_list().entry("author").inline(true)),
            ),
    ]);
    let mut heap = Heap::new();
    let library = heap.instance("Library");
    let mut books = Vec::new();
    for title in ["Dune", "Emma"] {
        let book = heap.instance("Book");
        let title = heap.string(title);
        heap.set_field(book, "title", Some(title)).unwrap();
        books.push(book);
    }
    let books = heap.list(books);
    let first = heap.string("Herbert");
    let second = heap.string("Austen");
    let authors = heap.list(vec![first, second]);
    heap.set_field(library, "books", Some(books)).unwrap();
    heap.set_field(library, "authors", Some(authors)).unwrap();

    let node = round_trip(&arbor, &heap, library);
    let books = node.child("books").unwrap();
    assert_eq!(books.children().len(), 2);
    assert_eq!(books.children()[0].name(), "book");
    assert_eq!(books.children()[1].attribute("title"), Some("Emma"));
    let authors: Vec<&str> = node
        .children_named("author")
        .map(|n| n.text().unwrap())
        .collect();
    assert_eq!(authors, ["Herbert", "Austen"]);
    assert!(node.child("authors").is_none());
}

#[test]
fn test_empty_lists() {
    let arbor = arbor_with(vec![ClassDef::new("Bag")
        .member(
            MemberDef::new("wrapped", TypeRef::list_of(TypeRef::STRING))
                .tag(Tag::element_list()),
        )
        .member(
            MemberDef::new("inline", TypeRef::list_of(TypeRef::STRING))
                .tag(Tag::element_list().inline(true).required(false)),
        )]);
    let mut heap = Heap::new();
    let bag = heap.instance("Bag");
    let wrapped = heap.list(vec![]);
    let inline = heap.list(vec![]);
    heap.set_field(bag, "wrapped", Some(wrapped)).unwrap();
    heap.set_field(bag, "inline", Some(inline)).unwrap();

    let node = arbor.serialize(&heap, bag).unwrap();
    assert_eq!(node.children().len(), 1);
    let graph = arbor.deserialize(&node, &TypeRef::class("Bag")).unwrap();
    let wrapped = graph.field("wrapped").unwrap();
    assert!(graph.heap().object(wrapped).unwrap().as_list().unwrap().is_empty());
    // Without entries an inline list leaves nothing to read.
    assert!(graph.field("inline").is_none());
}

#[test]
fn test_arrays() {
    let mut defs = zoo();
    defs.push(
        ClassDef::new("Scores")
            .member(
                MemberDef::new("points", TypeRef::array_of(TypeRef::INT))
                    .tag(Tag::element_array().entry("point")),
            )
            .member(
                MemberDef::new("pack", TypeRef::array_of(TypeRef::class("Animal")))
                    .tag(Tag::element_array().required(false)),
            ),
    );
    let arbor = arbor_with(defs);
    let mut heap = Heap::new();
    let scores = heap.instance("Scores");
    let one = heap.primitive(1i32);
    let three = heap.primitive(3i32);
    let points = heap.array(TypeRef::INT, vec![Some(one), None, Some(three)]);
    let rex = dog(&mut heap, "Rex", "collie");
    let ace = dog(&mut heap, "Ace", "boxer");
    let pack = heap.array(TypeRef::class("Dog"), vec![Some(rex), Some(ace)]);
    heap.set_field(scores, "points", Some(points)).unwrap();
    heap.set_field(scores, "pack", Some(pack)).unwrap();

    let node = round_trip(&arbor, &heap, scores);
    let points = node.child("points").unwrap();
    assert_eq!(points.attribute("length"), Some("3"));
    assert!(points.attribute("class").is_none());
    assert_eq!(points.children()[0].name(), "point");
    assert!(points.children()[1].is_empty());
    let pack = node.child("pack").unwrap();
    assert_eq!(pack.attribute("class"), Some("Dog"));
    assert_eq!(pack.children()[0].name(), "animal");
    assert!(pack.children()[0].attribute("class").is_none());
}

#[test]
fn test_array_length_errors() {
    let arbor = arbor_with(vec![ClassDef::new("Scores").member(
        MemberDef::new("points", TypeRef::array_of(TypeRef::INT)).tag(Tag::element_array()),
    )]);
    let declared = TypeRef::class("Scores");

    let node = Node::new("scores")
        .with_child(Node::new("points").with_child(Node::new("int").with_text("1")));
    assert!(matches!(
        arbor.deserialize(&node, &declared),
        Err(Error::InvalidData(_))
    ));

    let node = Node::new("scores").with_child(
        Node::new("points")
            .with_attribute("length", "1")
            .with_child(Node::new("int").with_text("1"))
            .with_child(Node::new("int").with_text("2")),
    );
    assert!(matches!(
        arbor.deserialize(&node, &declared),
        Err(Error::InvalidData(_))
    ));

    let node = Node::new("scores").with_child(
        Node::new("points")
            .with_attribute("length", "4")
            .with_child(Node::new("int").with_text("7")),
    );
    let graph = arbor.deserialize(&node, &declared).unwrap();
    let points = graph.heap().object(graph.field("points").unwrap()).unwrap();
    let points = points.as_array().unwrap();
    assert_eq!(points.len(), 4);
    assert!(points.get(0).is_some());
    assert!(points.get(3).is_none());
}

#[test]
fn test_array_length_limit() {
    let declared = TypeRef::array_of(TypeRef::STRING);
    let node = Node::new("string[]")
        .with_attribute("length", usize::MAX.to_string())
        .with_attribute("id", "0");
    let arbor = Arbor::default().track_ref(true);
    assert!(matches!(
        arbor.deserialize(&node, &declared),
        Err(Error::InvalidData(_))
    ));

    let arbor = Arbor::default().max_array_length(2);
    let node = Node::new("string[]")
        .with_attribute("length", "3")
        .with_child(Node::new("string").with_text("a"));
    assert!(matches!(
        arbor.deserialize(&node, &declared),
        Err(Error::InvalidData(_))
    ));
    let node = Node::new("string[]")
        .with_attribute("length", "2")
        .with_child(Node::new("string").with_text("a"));
    let graph = arbor.deserialize(&node, &declared).unwrap();
    assert_eq!(graph.root_object().unwrap().as_array().unwrap().len(), 2);
}

#[test]
fn test_maps() {
    let arbor = arbor_with(vec![ClassDef::new("Inventory")
        .member(
            MemberDef::new("stock", TypeRef::map_of(TypeRef::STRING, TypeRef::INT))
                .tag(Tag::element_map()),
        )
        .member(
            MemberDef::new("prices", TypeRef::map_of(TypeRef::STRING, TypeRef::DOUBLE))
                .tag(Tag::element_map().attribute(true).key("sku").entry("price")),
        )
        .member(
            MemberDef::new("labels", TypeRef::map_of(TypeRef::STRING, TypeRef::STRING))
                .tag(
                    Tag::element_map()
                        .entry("label")
                        .key("lang")
                        .attribute(true)
                        .inline(true)
                        .required(false),
                ),
        )]);
    let mut heap = Heap::new();
    let inventory = heap.instance("Inventory");
    let apples = heap.string("apples");
    let three = heap.primitive(3i32);
    let pears = heap.string("pears");
    let stock = heap.map(vec![(apples, Some(three)), (pears, None)]);
    let sku = heap.string("A-1");
    let price = heap.primitive(1.5f64);
    let prices = heap.map(vec![(sku, Some(price))]);
    let en = heap.string("en");
    let hello = heap.string("hello");
    let fr = heap.string("fr");
    let bonjour = heap.string("bonjour");
    let labels = heap.map(vec![(en, Some(hello)), (fr, Some(bonjour))]);
    heap.set_field(inventory, "stock", Some(stock)).unwrap();
    heap.set_field(inventory, "prices", Some(prices)).unwrap();
    heap.set_field(inventory, "labels", Some(labels)).unwrap();

    let node = round_trip(&arbor, &heap, inventory);

    let stock = node.child("stock").unwrap();
    let entry = &stock.children()[0];
    assert_eq!(entry.name(), "entry");
    assert_eq!(entry.child("key").unwrap().text(), Some("apples"));
    assert_eq!(entry.child("value").unwrap().text(), Some("3"));
    assert!(stock.children()[1].child("value").is_none());

    let price = &node.child("prices").unwrap().children()[0];
    assert_eq!(price.name(), "price");
    assert_eq!(price.attribute("sku"), Some("A-1"));
    assert_eq!(price.text(), Some("1.5"));

    let labels: Vec<(&str, &str)> = node
        .children_named("label")
        .map(|n| (n.attribute("lang").unwrap(), n.text().unwrap()))
        .collect();
    assert_eq!(labels, [("en", "hello"), ("fr", "bonjour")]);
}

#[test]
fn test_unions() {
    let arbor = arbor_with(vec![
        ClassDef::new("Shape").abstract_class(true),
        ClassDef::new("Circle")
            .extends("Shape")
            .member(MemberDef::new("radius", TypeRef::DOUBLE).tag(Tag::attribute())),
        ClassDef::new("Square")
            .extends("Shape")
            .member(MemberDef::new("side", TypeRef::DOUBLE).tag(Tag::attribute())),
        ClassDef::new("Drawing")
            .member(
                MemberDef::new("main", TypeRef::class("Shape")).tag(
                    Tag::union()
                        .candidate("circle", TypeRef::class("Circle"))
                        .candidate("square", TypeRef::class("Square")),
                ),
            )
            .member(
                MemberDef::new("extras", TypeRef::list_of(TypeRef::class("Shape"))).tag(
                    Tag::list_union()
                        .candidate("round", TypeRef::class("Circle"))
                        .candidate("box", TypeRef::class("Square"))
                        .required(false),
                ),
            ),
    ]);
    let mut heap = Heap::new();
    let shape = |heap: &mut Heap, class: &str, member: &str, size: f64| {
        let shape = heap.instance(class);
        let size = heap.primitive(size);
        heap.set_field(shape, member, Some(size)).unwrap();
        shape
    };
    let drawing = heap.instance("Drawing");
    let main = shape(&mut heap, "Square", "side", 2.0);
    let a = shape(&mut heap, "Circle", "radius", 1.0);
    let b = shape(&mut heap, "Square", "side", 4.0);
    let c = shape(&mut heap, "Circle", "radius", 0.5);
    let extras = heap.list(vec![a, b, c]);
    heap.set_field(drawing, "main", Some(main)).unwrap();
    heap.set_field(drawing, "extras", Some(extras)).unwrap();

    let node = round_trip(&arbor, &heap, drawing);
    let names: Vec<&str> = node.children().iter().map(|n| n.name()).collect();
    assert_eq!(names, ["square", "round", "box", "round"]);
    assert!(node.children().iter().all(|n| n.attribute("class").is_none()));
}

#[test]
fn test_enums() {
    let mut arbor = arbor_with(vec![ClassDef::new("Light")
        .member(MemberDef::new("color", TypeRef::enumeration("Color")).tag(Tag::attribute()))
        .member(
            MemberDef::new("history", TypeRef::list_of(TypeRef::enumeration("Color")))
                .tag(Tag::element_list().required(false)),
        )]);
    arbor
        .register_enum(EnumDef::new("Color").variant("RED").variant("AMBER").variant("GREEN"))
        .unwrap();
    let mut heap = Heap::new();
    let light = heap.instance("Light");
    let green = heap.enum_constant("Color", "GREEN");
    let red = heap.enum_constant("Color", "RED");
    let amber = heap.enum_constant("Color", "AMBER");
    let history = heap.list(vec![red, amber]);
    heap.set_field(light, "color", Some(green)).unwrap();
    heap.set_field(light, "history", Some(history)).unwrap();

    let node = round_trip(&arbor, &heap, light);
    assert_eq!(node.attribute("color"), Some("GREEN"));
    let history = node.child("history").unwrap();
    assert_eq!(history.children()[0].name(), "entry");
    assert_eq!(history.children()[1].text(), Some("AMBER"));

    let node = Node::new("light").with_attribute("color", "BLUE");
    assert!(matches!(
        arbor.deserialize(&node, &TypeRef::class("Light")),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_untyped_member() {
    let arbor = arbor_with(vec![ClassDef::new("Cell")
        .member(MemberDef::new("content", TypeRef::Any).tag(Tag::element()))]);
    let mut heap = Heap::new();
    let cell = heap.instance("Cell");
    let content = heap.primitive(12i64);
    heap.set_field(cell, "content", Some(content)).unwrap();

    let node = round_trip(&arbor, &heap, cell);
    assert_eq!(node.child("content").unwrap().attribute("class"), Some("long"));

    let node = Node::new("cell").with_child(Node::new("content").with_text("12"));
    assert!(matches!(
        arbor.deserialize(&node, &TypeRef::class("Cell")),
        Err(Error::TypeError(_))
    ));
}

#[test]
fn test_strict_reading() {
    let defs = || {
        vec![
            ClassDef::new("Point")
                .member(MemberDef::new("x", TypeRef::INT).tag(Tag::attribute()))
                .member(MemberDef::new("label", TypeRef::STRING).tag(Tag::element().required(false))),
            ClassDef::new("Loose")
                .root(RootTag::new().strict(false))
                .member(MemberDef::new("x", TypeRef::INT).tag(Tag::attribute())),
        ]
    };
    let extra_attribute = Node::new("point")
        .with_attribute("x", "1")
        .with_attribute("color", "red");
    let extra_element = Node::new("point")
        .with_attribute("x", "1")
        .with_child(Node::new("comment").with_text("hi"));

    let strict = arbor_with(defs());
    for node in [&extra_attribute, &extra_element] {
        assert!(matches!(
            strict.deserialize(node, &TypeRef::class("Point")),
            Err(Error::UnknownNode(_))
        ));
    }
    let loose_node = Node::new("loose")
        .with_attribute("x", "1")
        .with_attribute("color", "red");
    assert!(strict.deserialize(&loose_node, &TypeRef::class("Loose")).is_ok());

    let mut lenient = Arbor::default().strict(false);
    for def in defs() {
        lenient.register_class(def).unwrap();
    }
    for node in [&extra_attribute, &extra_element] {
        let graph = lenient.deserialize(node, &TypeRef::class("Point")).unwrap();
        assert_eq!(
            graph.heap().as_primitive(graph.field("x").unwrap()),
            Some(&Primitive::Int(1))
        );
    }
}

#[test]
fn test_missing_required_value() {
    let arbor = arbor_with(vec![ClassDef::new("Point")
        .member(MemberDef::new("x", TypeRef::INT).tag(Tag::attribute()))
        .member(MemberDef::new("label", TypeRef::STRING).tag(Tag::element()))]);
    let mut heap = Heap::new();
    let point = heap.instance("Point");
    let x = heap.primitive(1i32);
    heap.set_field(point, "x", Some(x)).unwrap();
    assert!(matches!(
        arbor.serialize(&heap, point),
        Err(Error::MissingValue(_))
    ));

    let node = Node::new("point").with_attribute("x", "1");
    assert!(matches!(
        arbor.deserialize(&node, &TypeRef::class("Point")),
        Err(Error::MissingValue(_))
    ));
}

#[test]
fn test_depth_limit() {
    let def = ClassDef::new("Link")
        .member(MemberDef::new("next", TypeRef::class("Link")).tag(Tag::element().required(false)));
    let mut heap = Heap::new();
    let head = heap.instance("Link");
    let mut tail = head;
    for _ in 0..10 {
        let next = heap.instance("Link");
        heap.set_field(tail, "next", Some(next)).unwrap();
        tail = next;
    }

    let mut deep = Arbor::default();
    deep.register_class(def.clone()).unwrap();
    let node = deep.serialize(&heap, head).unwrap();

    let mut shallow = Arbor::default().max_depth(5);
    shallow.register_class(def).unwrap();
    assert!(matches!(
        shallow.serialize(&heap, head),
        Err(Error::DepthExceed(_))
    ));
    assert!(matches!(
        shallow.deserialize(&node, &TypeRef::class("Link")),
        Err(Error::DepthExceed(_))
    ));
}

#[test]
fn test_lifecycle_hooks() {
    let persisted = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));
    let committed = Arc::new(AtomicUsize::new(0));
    let (p, c, k) = (persisted.clone(), completed.clone(), committed.clone());
    let def = ClassDef::new("Account")
        .member(MemberDef::new("owner", TypeRef::STRING).tag(Tag::attribute().required(false)))
        .persist(move |_, _| {
            p.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .complete(move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .validate(|heap, id| {
            if heap.field(id, "owner").is_none() {
                let owner = heap.string("nobody");
                heap.set_field(id, "owner", Some(owner))?;
            }
            if heap.field(id, "owner").and_then(|o| heap.as_str(o)) == Some("mallory") {
                anyhow::bail!("owner is not allowed");
            }
            Ok(())
        })
        .commit(move |_, _| {
            k.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
    let arbor = arbor_with(vec![def]);

    let mut heap = Heap::new();
    let account = heap.instance("Account");
    let node = arbor.serialize(&heap, account).unwrap();
    assert_eq!(persisted.load(Ordering::SeqCst), 1);
    assert_eq!(completed.load(Ordering::SeqCst), 1);

    let graph = arbor.deserialize(&node, &TypeRef::class("Account")).unwrap();
    assert_eq!(graph.heap().as_str(graph.field("owner").unwrap()), Some("nobody"));
    assert_eq!(committed.load(Ordering::SeqCst), 1);

    let node = Node::new("account").with_attribute("owner", "mallory");
    let err = arbor
        .deserialize(&node, &TypeRef::class("Account"))
        .unwrap_err();
    assert!(matches!(err, Error::Other(_)));
    assert!(err.to_string().contains("not allowed"));
    assert_eq!(committed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failing_persist_hook() {
    let arbor = arbor_with(vec![
        ClassDef::new("Sealed").persist(|_, _| anyhow::bail!("sealed objects are not written"))
    ]);
    let mut heap = Heap::new();
    let sealed = heap.instance("Sealed");
    assert!(matches!(arbor.serialize(&heap, sealed), Err(Error::Other(_))));
}

#[test]
fn test_collection_roots() {
    let arbor = Arbor::default();
    let mut heap = Heap::new();
    let items: Vec<ObjectId> = ["a", "b"].iter().map(|s| heap.string(*s)).collect();
    let list = heap.list(items);
    let node = arbor.serialize(&heap, list).unwrap();
    assert_eq!(node.name(), "list");
    let graph = arbor
        .deserialize(&node, &TypeRef::list_of(TypeRef::Any))
        .unwrap();
    assert!(heap.equivalent(list, graph.heap(), graph.root()));

    let one = heap.primitive(1i32);
    let array = heap.array(TypeRef::INT, vec![Some(one)]);
    let node = arbor.serialize(&heap, array).unwrap();
    assert_eq!(node.name(), "int[]");
    assert_eq!(node.children()[0].name(), "int");
    let graph = arbor
        .deserialize(&node, &TypeRef::array_of(TypeRef::INT))
        .unwrap();
    assert!(heap.equivalent(array, graph.heap(), graph.root()));
}
