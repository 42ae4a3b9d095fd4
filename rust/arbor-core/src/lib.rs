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

//! # Arbor Core
//!
//! This is the core implementation of the Arbor codec, which maps object
//! graphs to tree documents and back.
//!
//! ## Architecture
//!
//! The core library is organized into several key modules:
//!
//! - **`arbor`**: The codec and its public API
//! - **`meta`**: Class definitions, tags, labels and derived schemas
//! - **`resolver`**: Type registration, the schema cache and per-call contexts
//! - **`strategy`**: Type and identity resolution for element nodes
//! - **`serializer`**: Moves values between the heap and document nodes
//! - **`object`**: The arena holding object graphs
//! - **`document`**: The tree document model
//! - **`types`**: Declared types and primitive kinds
//! - **`reflect`**: Declared types of Rust types, used by the derive macro
//! - **`error`**: Error handling and result types
//!
//! ## Key Concepts
//!
//! ### Schemas
//!
//! Every registered class is scanned once into a schema: one label per
//! serialized member, saying whether it becomes an attribute, an element,
//! a list, array or map of entries, a union of named candidates, or the
//! node text. Constructor signatures are checked against those labels at
//! the same time, so an inconsistent class fails before any document is
//! read.
//!
//! ### Strategies
//!
//! - **TreeStrategy**: writes `class` when a value's type differs from the
//!   declared one and `length` on arrays
//! - **CycleStrategy**: also writes `id` on the first occurrence of every
//!   value and `reference` on later ones, so shared and circular graphs
//!   survive a round trip
//!
//! ## Usage
//!
//! This crate is typically used through the higher-level `arbor` crate,
//! which adds the `Describe` derive macro.
//!
//! ```rust
//! use arbor_core::meta::{ClassDef, MemberDef, Tag};
//! use arbor_core::object::Heap;
//! use arbor_core::types::TypeRef;
//! use arbor_core::Arbor;
//!
//! let mut arbor = Arbor::default().track_ref(true);
//! arbor
//!     .register_class(
//!         ClassDef::new("Person")
//!             .member(MemberDef::new("name", TypeRef::STRING).tag(Tag::attribute()))
//!             .member(MemberDef::new("friend", TypeRef::class("Person")).tag(Tag::element())),
//!     )
//!     .unwrap();
//!
//! let mut heap = Heap::new();
//! let alice = heap.instance("Person");
//! let name = heap.string("alice");
//! heap.set_field(alice, "name", Some(name)).unwrap();
//! heap.set_field(alice, "friend", Some(alice)).unwrap();
//!
//! let node = arbor.serialize(&heap, alice).unwrap();
//! assert_eq!(node.attribute("id"), Some("0"));
//! assert_eq!(node.child("friend").unwrap().attribute("reference"), Some("0"));
//!
//! let graph = arbor.deserialize(&node, &TypeRef::class("Person")).unwrap();
//! assert_eq!(graph.field("friend"), Some(graph.root()));
//! ```

pub mod arbor;
pub mod config;
pub mod document;
pub mod error;
pub mod meta;
pub mod object;
pub mod reflect;
pub mod resolver;
pub mod serializer;
pub mod strategy;
pub mod types;

pub use arbor::Arbor;
pub use config::{Config, ReservedNames};
pub use document::Node;
pub use error::{CycleError, Error, SchemaError};
pub use object::{Graph, Heap, Object, ObjectId, Primitive};
pub use reflect::{Describe, TypeOf};
pub use types::{PrimitiveKind, TypeRef};
