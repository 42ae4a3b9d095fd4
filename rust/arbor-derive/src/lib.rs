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

//! # Arbor Derive Macros
//!
//! This crate provides the procedural macro attaching Arbor schema metadata
//! to Rust types.
//!
//! ## Available Macros
//!
//! ### `#[derive(Describe)]`
//!
//! Implements `TypeOf` and `Describe` for the annotated type. The generated
//! `describe()` returns the class or enum definition the codec registers
//! through `Arbor::register::<T>()`.
//!
//! **Supported Types:**
//! - Structs with named fields, becoming classes
//! - Unit structs, becoming classes without members
//! - Enums with unit variants, becoming enums written as their variant name
//!
//! **Example:**
//! ```rust
//! use arbor_derive::Describe;
//!
//! #[derive(Describe)]
//! #[arbor(root = "person", order(elements("address")))]
//! struct Person {
//!     #[arbor(attribute)]
//!     name: String,
//!     #[arbor(attribute)]
//!     age: Option<i32>,
//!     #[arbor(element)]
//!     address: Address,
//!     #[arbor(element_list, entry = "hobby")]
//!     hobbies: Vec<String>,
//!     #[arbor(skip)]
//!     cache: Vec<String>,
//! }
//!
//! #[derive(Describe)]
//! struct Address {
//!     #[arbor(text)]
//!     street: String,
//! }
//!
//! #[derive(Describe)]
//! enum Status {
//!     Active,
//!     #[arbor(name = "inactive")]
//!     Inactive,
//! }
//! ```
//!
//! The Rust values themselves are not read or written; object graphs live in
//! an `arbor_core::object::Heap`. Each field contributes a member declared as
//! its Rust type, so field types must implement `TypeOf`.
//!
//! ## Field Attributes
//!
//! See `#[arbor(...)]` options on fields: one tag kind (`attribute`,
//! `element`, `element_list`, `element_array`, `element_map`, `text`,
//! `union`, `list_union`) plus naming, requiredness and collection options.
//! `Option` fields default to not required.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

/// Derive macro describing a class or enum.
///
/// # Example
///
/// ```rust
/// use arbor_derive::Describe;
///
/// #[derive(Describe)]
/// #[arbor(extends = Shape, constructor(radius))]
/// struct Circle {
///     #[arbor(attribute)]
///     radius: f64,
/// }
///
/// #[derive(Describe)]
/// #[arbor(abstract_class)]
/// struct Shape {}
/// ```
#[proc_macro_derive(Describe, attributes(arbor))]
pub fn proc_macro_derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_describe(&input).into()
}
