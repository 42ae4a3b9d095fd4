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

use arbor_core::error::{Error, SchemaError};
use arbor_core::meta::{
    ClassDef, DefaultAccess, DefaultTag, EnumDef, LabelKind, ListLayout, MemberDef, OrderTag,
    RootTag, Shape, Tag,
};
use arbor_core::types::TypeRef;
use arbor_core::Arbor;
use std::sync::Arc;

fn address() -> ClassDef {
    ClassDef::new("Address").member(MemberDef::new("street", TypeRef::STRING).tag(Tag::text()))
}

fn person() -> ClassDef {
    ClassDef::new("Person")
        .member(MemberDef::new("name", TypeRef::STRING).tag(Tag::attribute()))
        .member(MemberDef::new("age", TypeRef::INT).tag(Tag::attribute().required(false)))
        .member(MemberDef::new("address", TypeRef::class("Address")).tag(Tag::element()))
        .member(
            MemberDef::new("nicknames", TypeRef::list_of(TypeRef::STRING))
                .tag(Tag::element_list().entry("nick")),
        )
}

fn arbor_with(defs: Vec<ClassDef>) -> Arbor {
    let mut arbor = Arbor::default();
    for def in defs {
        arbor.register_class(def).unwrap();
    }
    arbor
}

fn schema_error(arbor: &Arbor, class: &str) -> SchemaError {
    match arbor.schema(class) {
        Err(Error::Schema(err)) => err,
        other => panic!("expected a schema error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_label_shapes() {
    let arbor = arbor_with(vec![address(), person()]);
    let schema = arbor.schema("Person").unwrap();
    assert_eq!(schema.class(), "Person");
    assert_eq!(schema.root_name(), "person");
    assert!(schema.is_strict());
    assert!(!schema.is_abstract());

    let labels = schema.labels();
    let attributes: Vec<&str> = labels.attributes().iter().map(|l| l.node_name()).collect();
    assert_eq!(attributes, ["name", "age"]);
    let elements: Vec<&str> = labels.elements().iter().map(|l| l.node_name()).collect();
    assert_eq!(elements, ["address", "nicknames"]);
    assert!(labels.text().is_none());

    let age = labels.attribute_for("age").unwrap();
    assert!(!age.is_required());
    assert_eq!(age.kind(), LabelKind::Attribute);
    let nicknames = labels.element_for("nicknames").unwrap();
    assert_eq!(
        nicknames.shape(),
        &Shape::ElementList(ListLayout {
            entry: "nick".to_string(),
            item: TypeRef::STRING,
            inline: false,
        })
    );

    let address = arbor.schema("Address").unwrap();
    assert_eq!(address.labels().text().unwrap().member(), "street");
}

#[test]
fn test_root_tag_names_root() {
    let arbor = arbor_with(vec![ClassDef::new("PurchaseOrder")
        .root(RootTag::new().name("po").strict(false))]);
    let schema = arbor.schema("PurchaseOrder").unwrap();
    assert_eq!(schema.root_name(), "po");
    assert!(!schema.is_strict());

    let arbor = arbor_with(vec![ClassDef::new("PurchaseOrder")]);
    assert_eq!(arbor.schema("PurchaseOrder").unwrap().root_name(), "purchaseOrder");
}

#[test]
fn test_duplicate_attribute_name() {
    let arbor = arbor_with(vec![ClassDef::new("Item")
        .member(MemberDef::new("sku", TypeRef::STRING).tag(Tag::attribute().name("code")))
        .member(MemberDef::new("ean", TypeRef::STRING).tag(Tag::attribute().name("code")))]);
    let err = schema_error(&arbor, "Item");
    assert!(matches!(
        err,
        SchemaError::DuplicateName { ref name, namespace, .. }
            if name == "code" && namespace == "attribute"
    ));
}

#[test]
fn test_inline_entry_collides_with_element() {
    let arbor = arbor_with(vec![ClassDef::new("Basket")
        .member(MemberDef::new("first", TypeRef::STRING).tag(Tag::element().name("item")))
        .member(
            MemberDef::new("rest", TypeRef::list_of(TypeRef::STRING))
                .tag(Tag::element_list().entry("item").inline(true)),
        )]);
    let err = schema_error(&arbor, "Basket");
    assert!(matches!(
        err,
        SchemaError::DuplicateName { ref name, namespace, .. }
            if name == "item" && namespace == "element"
    ));
}

#[test]
fn test_same_name_in_both_namespaces() {
    let arbor = arbor_with(vec![ClassDef::new("Note")
        .member(MemberDef::new("lang", TypeRef::STRING).tag(Tag::attribute().name("title")))
        .member(MemberDef::new("heading", TypeRef::STRING).tag(Tag::element().name("title")))]);
    let schema = arbor.schema("Note").unwrap();
    assert_eq!(schema.labels().attribute_for("title").unwrap().member(), "lang");
    assert_eq!(schema.labels().element_for("title").unwrap().member(), "heading");
}

#[test]
fn test_order() {
    let def = || {
        ClassDef::new("Letter")
            .member(MemberDef::new("a", TypeRef::STRING).tag(Tag::element()))
            .member(MemberDef::new("b", TypeRef::STRING).tag(Tag::element()))
            .member(MemberDef::new("c", TypeRef::STRING).tag(Tag::element()))
            .member(MemberDef::new("x", TypeRef::STRING).tag(Tag::attribute()))
            .member(MemberDef::new("y", TypeRef::STRING).tag(Tag::attribute()))
    };
    let arbor = arbor_with(vec![def().order(
        OrderTag::new().elements(["c", "a"]).attributes(["y"]),
    )]);
    let schema = arbor.schema("Letter").unwrap();
    let elements: Vec<&str> = schema.labels().elements().iter().map(|l| l.member()).collect();
    assert_eq!(elements, ["c", "a", "b"]);
    let attributes: Vec<&str> = schema.labels().attributes().iter().map(|l| l.member()).collect();
    assert_eq!(attributes, ["y", "x"]);

    let arbor = arbor_with(vec![def().order(OrderTag::new().elements(["z"]))]);
    let err = schema_error(&arbor, "Letter");
    assert!(matches!(
        err,
        SchemaError::InvalidOrder { ref name, namespace, .. } if name == "z" && namespace == "element"
    ));
}

#[test]
fn test_unresolved_type() {
    let arbor = arbor_with(vec![ClassDef::new("Holder")
        .member(MemberDef::new("thing", TypeRef::class("Missing")).tag(Tag::element()))]);
    let err = schema_error(&arbor, "Holder");
    assert!(matches!(err, SchemaError::UnresolvedType { ref member, .. } if member == "thing"));

    let arbor = arbor_with(vec![ClassDef::new("Holder").member(
        MemberDef::new("colors", TypeRef::list_of(TypeRef::enumeration("Color")))
            .tag(Tag::element_list()),
    )]);
    let err = schema_error(&arbor, "Holder");
    assert!(matches!(err, SchemaError::UnresolvedType { ref member, .. } if member == "colors"));

    // An untyped list can not be tagged without naming its entry type.
    let arbor = arbor_with(vec![ClassDef::new("Holder").member(
        MemberDef::new("things", TypeRef::list_of(TypeRef::Any)).tag(Tag::element_list()),
    )]);
    let err = schema_error(&arbor, "Holder");
    assert!(matches!(err, SchemaError::UnresolvedType { ref member, .. } if member == "things"));

    assert!(matches!(
        schema_error(&arbor_with(vec![]), "Nowhere"),
        SchemaError::UnresolvedType { .. }
    ));
}

#[test]
fn test_explicit_entry_type_narrows_list() {
    let arbor = arbor_with(vec![
        address(),
        ClassDef::new("Holder").member(
            MemberDef::new("things", TypeRef::list_of(TypeRef::Any))
                .tag(Tag::element_list().entry_type(TypeRef::class("Address"))),
        ),
    ]);
    let schema = arbor.schema("Holder").unwrap();
    let Shape::ElementList(layout) = schema.labels().element_for("things").unwrap().shape() else {
        panic!("things should be an element list");
    };
    assert_eq!(layout.item, TypeRef::class("Address"));
    assert_eq!(layout.entry, "address");
}

#[test]
fn test_unsupported_tags() {
    let arbor = arbor_with(vec![ClassDef::new("Mixed")
        .member(MemberDef::new("body", TypeRef::STRING).tag(Tag::text()))
        .member(MemberDef::new("title", TypeRef::STRING).tag(Tag::element()))]);
    assert!(matches!(
        schema_error(&arbor, "Mixed"),
        SchemaError::UnsupportedTag { ref member, .. } if member == "body"
    ));

    let arbor = arbor_with(vec![ClassDef::new("TwoTexts")
        .member(MemberDef::new("first", TypeRef::STRING).tag(Tag::text()))
        .member(MemberDef::new("second", TypeRef::STRING).tag(Tag::text()))]);
    assert!(matches!(
        schema_error(&arbor, "TwoTexts"),
        SchemaError::UnsupportedTag { ref member, .. } if member == "second"
    ));

    let arbor = arbor_with(vec![
        address(),
        ClassDef::new("Flat").member(
            MemberDef::new("home", TypeRef::class("Address")).tag(Tag::attribute()),
        ),
    ]);
    assert!(matches!(
        schema_error(&arbor, "Flat"),
        SchemaError::UnsupportedTag { ref member, .. } if member == "home"
    ));

    let arbor = arbor_with(vec![ClassDef::new("Bad").member(
        MemberDef::new("names", TypeRef::STRING).tag(Tag::element_list()),
    )]);
    assert!(matches!(schema_error(&arbor, "Bad"), SchemaError::UnsupportedTag { .. }));

    let arbor = arbor_with(vec![ClassDef::new("NoCandidates")
        .member(MemberDef::new("shape", TypeRef::Any).tag(Tag::union()))]);
    assert!(matches!(
        schema_error(&arbor, "NoCandidates"),
        SchemaError::UnsupportedTag { .. }
    ));
}

#[test]
fn test_inheritance_shares_labels() {
    let arbor = arbor_with(vec![
        ClassDef::new("Base")
            .root(RootTag::new().name("base-root").strict(false))
            .member(MemberDef::new("name", TypeRef::STRING).tag(Tag::attribute())),
        ClassDef::new("Sub")
            .extends("Base")
            .member(MemberDef::new("extra", TypeRef::INT).tag(Tag::attribute())),
    ]);
    let base = arbor.schema("Base").unwrap();
    let sub = arbor.schema("Sub").unwrap();

    let members: Vec<&str> = sub.labels().attributes().iter().map(|l| l.member()).collect();
    assert_eq!(members, ["extra", "name"]);
    assert!(Arc::ptr_eq(
        base.labels().attribute_for("name").unwrap(),
        sub.labels().attribute_for("name").unwrap()
    ));

    // Strictness is inherited, the root name is not.
    assert!(!sub.is_strict());
    assert_eq!(base.root_name(), "base-root");
    assert_eq!(sub.root_name(), "sub");
}

#[test]
fn test_broken_hierarchy() {
    let arbor = arbor_with(vec![ClassDef::new("Orphan").extends("Nobody")]);
    assert!(matches!(
        schema_error(&arbor, "Orphan"),
        SchemaError::UnresolvedType { ref reason, .. } if reason.contains("parent")
    ));

    let arbor = arbor_with(vec![
        ClassDef::new("Chicken").extends("Egg"),
        ClassDef::new("Egg").extends("Chicken"),
    ]);
    assert!(matches!(
        schema_error(&arbor, "Egg"),
        SchemaError::UnresolvedType { ref reason, .. } if reason.contains("cyclic")
    ));
}

#[test]
fn test_default_access() {
    let arbor = arbor_with(vec![
        address(),
        ClassDef::new("Contact")
            .default_access(DefaultTag::new(DefaultAccess::Field).required(false))
            .member(MemberDef::new("email", TypeRef::STRING))
            .member(MemberDef::new("home", TypeRef::class("Address")))
            .member(MemberDef::new("phones", TypeRef::list_of(TypeRef::STRING)))
            .member(MemberDef::new("cached", TypeRef::STRING).transient(true))
            .member(MemberDef::new("display", TypeRef::STRING).access(DefaultAccess::Property))
            .member(MemberDef::new("kind", TypeRef::STRING).tag(Tag::attribute())),
    ]);
    let schema = arbor.schema("Contact").unwrap();
    let labels = schema.labels();
    assert_eq!(labels.len(), 4);
    assert_eq!(labels.attribute_for("kind").unwrap().member(), "kind");

    let email = labels.element_for("email").unwrap();
    assert_eq!(email.kind(), LabelKind::Element);
    assert!(!email.is_required());
    assert_eq!(labels.element_for("phones").unwrap().kind(), LabelKind::ElementList);
    assert!(labels.element_for("cached").is_none());
    assert!(labels.element_for("display").is_none());
}

#[test]
fn test_enum_must_be_registered_once() {
    let mut arbor = Arbor::default();
    arbor
        .register_enum(EnumDef::new("Color").variant("RED").variant("GREEN"))
        .unwrap();
    assert!(matches!(
        arbor.register_enum(EnumDef::new("Color")),
        Err(Error::NotAllowed(_))
    ));
    assert!(matches!(
        arbor.register_class(ClassDef::new("Color")),
        Err(Error::NotAllowed(_))
    ));
    assert!(matches!(
        arbor.register_class(ClassDef::new("string")),
        Err(Error::NotAllowed(_))
    ));
}

#[test]
fn test_schema_cache() {
    let mut arbor = arbor_with(vec![address(), person()]);
    let first = arbor.schema("Person").unwrap();
    let again = arbor.schema("Person").unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(arbor.get_schema_cache().len(), 1);

    arbor
        .register_class(ClassDef::new("Unrelated"))
        .unwrap();
    assert!(arbor.get_schema_cache().is_empty());
    let derived = arbor.schema("Person").unwrap();
    assert!(!Arc::ptr_eq(&first, &derived));
    assert_eq!(first.labels().len(), derived.labels().len());
}

#[test]
fn test_schema_errors_are_cached() {
    let arbor = arbor_with(vec![ClassDef::new("Holder")
        .member(MemberDef::new("thing", TypeRef::class("Missing")).tag(Tag::element()))]);
    let first = schema_error(&arbor, "Holder");
    let second = schema_error(&arbor, "Holder");
    assert_eq!(first, second);
    assert_eq!(arbor.get_schema_cache().len(), 1);
}
