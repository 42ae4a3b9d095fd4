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

/// Attribute names the strategies reserve on every element node.
///
/// A document only round-trips when it is read with the same names it was
/// written with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservedNames {
    /// Names the runtime type when it differs from the declared one.
    pub class: String,
    /// Number of slots of an array value.
    pub length: String,
    /// Marks the first occurrence of an instance.
    pub id: String,
    /// Points back at a previously marked instance.
    pub reference: String,
}

impl Default for ReservedNames {
    fn default() -> Self {
        ReservedNames {
            class: "class".to_string(),
            length: "length".to_string(),
            id: "id".to_string(),
            reference: "reference".to_string(),
        }
    }
}

impl ReservedNames {
    pub fn is_reserved(&self, name: &str) -> bool {
        name == self.class || name == self.length || name == self.id || name == self.reference
    }
}

/// Configuration for Arbor serialization.
///
/// Shared between the [`Arbor`](crate::Arbor) driver and the per-call
/// `WriteContext`/`ReadContext`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether undeclared attributes and elements fail a read.
    /// A class can still relax this through its root tag.
    pub strict: bool,
    /// Whether shared and circular references are tracked with identity tokens.
    pub track_ref: bool,
    /// Maximum nesting depth of element nodes.
    pub max_depth: u32,
    /// Largest `length` accepted on an array node when reading.
    pub max_array_length: usize,
    /// Reserved attribute names.
    pub reserved: ReservedNames,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strict: true,
            track_ref: false,
            max_depth: 256,
            max_array_length: 1 << 20,
            reserved: ReservedNames::default(),
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    #[inline(always)]
    pub fn is_track_ref(&self) -> bool {
        self.track_ref
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline(always)]
    pub fn max_array_length(&self) -> usize {
        self.max_array_length
    }

    #[inline(always)]
    pub fn reserved(&self) -> &ReservedNames {
        &self.reserved
    }
}
