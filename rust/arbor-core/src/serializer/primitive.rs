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

use crate::document::Node;
use crate::error::Error;
use crate::object::Primitive;
use crate::types::PrimitiveKind;

pub fn write(value: &Primitive, node: &mut Node) {
    node.set_text(value.to_text());
}

/// Reads the node text. A node without text is the empty string for strings
/// and malformed for every other kind.
pub fn read(kind: PrimitiveKind, node: &Node) -> Result<Primitive, Error> {
    match node.text() {
        Some(text) => parse(kind, text),
        None if kind == PrimitiveKind::String => Ok(Primitive::String(String::new())),
        None => Err(Error::invalid_data(format!(
            "node '{}' has no text to read as {}",
            node.name(),
            kind.name()
        ))),
    }
}

#[inline(always)]
pub fn parse(kind: PrimitiveKind, text: &str) -> Result<Primitive, Error> {
    Primitive::parse(kind, text)
}
