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

//! # Arbor
//!
//! A schema driven codec between in-memory object graphs and tree shaped
//! documents of named nodes with attributes, child elements and text.
//!
//! Classes are described once, either by hand with
//! [`ClassDef`](arbor_core::meta::ClassDef) or with `#[derive(Describe)]`,
//! and registered with an [`Arbor`] instance. Each class is scanned into a
//! schema on first use; constructor signatures are checked against the
//! tagged members at that point, so inconsistent definitions are reported
//! before any document is read.
//!
//! ## Quick Start
//!
//! ```rust
//! use arbor::{Arbor, Describe, Heap, TypeOf, TypeRef};
//!
//! #[derive(Describe)]
//! #[arbor(root = "order")]
//! struct Order {
//!     #[arbor(attribute)]
//!     number: i64,
//!     #[arbor(element_list, entry = "line")]
//!     lines: Vec<String>,
//! }
//!
//! let mut arbor = Arbor::default();
//! arbor.register::<Order>().unwrap();
//!
//! let mut heap = Heap::new();
//! let order = heap.instance("Order");
//! let number = heap.primitive(7i64);
//! let first = heap.string("apples");
//! let lines = heap.list(vec![first]);
//! heap.set_field(order, "number", Some(number)).unwrap();
//! heap.set_field(order, "lines", Some(lines)).unwrap();
//!
//! let node = arbor.serialize(&heap, order).unwrap();
//! assert_eq!(node.name(), "order");
//! assert_eq!(node.attribute("number"), Some("7"));
//! let lines_node = node.child("lines").unwrap();
//! assert_eq!(lines_node.children()[0].text(), Some("apples"));
//!
//! let graph = arbor.deserialize(&node, &Order::type_ref()).unwrap();
//! assert!(heap.equivalent(order, graph.heap(), graph.root()));
//! ```
//!
//! ## Shared and Circular References
//!
//! The default strategy writes plain trees. `Arbor::default().track_ref(true)`
//! installs the cycle strategy, which marks the first occurrence of every
//! value with an `id` attribute and writes later occurrences as empty nodes
//! with a `reference` attribute, so sharing and cycles survive a round trip.
//!
//! Generated code refers to `arbor_core`, which must be a dependency of the
//! crate deriving `Describe`.

pub use arbor_core::{
    config::{Config, ReservedNames},
    document::Node,
    error::{CycleError, Error, SchemaError},
    meta,
    object::{Graph, Heap, Object, ObjectId, Primitive},
    reflect::{Describe, TypeOf},
    strategy::{CycleStrategy, Strategy, TreeStrategy},
    types::{PrimitiveKind, TypeRef},
    Arbor,
};
pub use arbor_derive::Describe;
