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

use crate::config::{Config, ReservedNames};
use crate::document::Node;
use crate::error::Error;
use crate::meta::{ClassDef, EnumDef, Schema, TypeDef};
use crate::object::{Graph, Heap, ObjectId};
use crate::reflect::Describe;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::{SchemaCache, TypeResolver};
use crate::serializer::{read_element, write_element, Form};
use crate::strategy::{CycleStrategy, Strategy, TreeStrategy};
use crate::types::TypeRef;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The object graph to tree document codec.
///
/// `Arbor` owns the registered classes and enums, the schema cache derived
/// from them and the strategy consulted for every element node. A configured
/// instance is immutable during use and may be shared between threads;
/// every call keeps its per-document state in a fresh context.
///
/// # Features
///
/// - **Schema driven**: member to node mapping derived once per class and cached
/// - **Pluggable strategies**: plain trees, or shared and circular references
/// - **Polymorphism**: subclass values carry a `class` attribute naming their type
/// - **Strict mode**: undeclared attributes and elements are rejected on read
/// - **Depth limiting**: configurable nesting limit for reads and writes
///
/// # Examples
///
/// ```rust
/// use arbor_core::meta::{ClassDef, MemberDef, Tag};
/// use arbor_core::object::Heap;
/// use arbor_core::types::TypeRef;
/// use arbor_core::Arbor;
///
/// let mut arbor = Arbor::default();
/// arbor
///     .register_class(
///         ClassDef::new("Point")
///             .member(MemberDef::new("x", TypeRef::INT).tag(Tag::attribute()))
///             .member(MemberDef::new("y", TypeRef::INT).tag(Tag::attribute())),
///     )
///     .unwrap();
///
/// let mut heap = Heap::new();
/// let point = heap.instance("Point");
/// let x = heap.primitive(3);
/// let y = heap.primitive(4);
/// heap.set_field(point, "x", Some(x)).unwrap();
/// heap.set_field(point, "y", Some(y)).unwrap();
///
/// let node = arbor.serialize(&heap, point).unwrap();
/// assert_eq!(node.name(), "point");
/// assert_eq!(node.attribute("x"), Some("3"));
///
/// let graph = arbor.deserialize(&node, &TypeRef::class("Point")).unwrap();
/// assert!(heap.equivalent(point, graph.heap(), graph.root()));
/// ```
///
/// Custom configuration:
///
/// ```rust
/// use arbor_core::Arbor;
///
/// let arbor = Arbor::default()
///     .strict(false)
///     .track_ref(true)
///     .max_depth(64);
/// ```
pub struct Arbor {
    config: Config,
    type_resolver: TypeResolver,
    schemas: Arc<SchemaCache>,
    strategy: Box<dyn Strategy>,
}

impl Default for Arbor {
    fn default() -> Self {
        Arbor {
            config: Config::default(),
            type_resolver: TypeResolver::default(),
            schemas: Arc::new(SchemaCache::new()),
            strategy: Box::new(TreeStrategy::new()),
        }
    }
}

impl fmt::Debug for Arbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arbor")
            .field("config", &self.config)
            .field("type_resolver", &self.type_resolver)
            .field("schemas", &self.schemas.len())
            .finish_non_exhaustive()
    }
}

impl Arbor {
    /// Enables or disables strict reading.
    ///
    /// In strict mode an attribute or element that matches no member of the
    /// class being read fails with [`Error::UnknownNode`]. A class may opt out
    /// individually through its root tag; it can never opt in when the codec
    /// is lenient.
    ///
    /// # Default
    ///
    /// The default value is `true`.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Selects the strategy matching the reference tracking mode.
    ///
    /// * `track_ref` - If `true`, installs a [`CycleStrategy`] so shared and
    ///   circular references survive a round trip. If `false`, installs a
    ///   [`TreeStrategy`], which writes a shared value once per occurrence.
    ///
    /// # Default
    ///
    /// The default value is `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor_core::Arbor;
    ///
    /// let arbor = Arbor::default().track_ref(true);
    /// assert!(arbor.config().is_track_ref());
    /// ```
    pub fn track_ref(mut self, track_ref: bool) -> Self {
        self.config.track_ref = track_ref;
        self.strategy = if track_ref {
            Box::new(CycleStrategy::new())
        } else {
            Box::new(TreeStrategy::new())
        };
        self
    }

    /// Sets the maximum element nesting depth.
    ///
    /// Exceeding it fails with [`Error::DepthExceed`]. With a [`TreeStrategy`]
    /// this is also what stops a circular graph from recursing forever.
    ///
    /// # Default
    ///
    /// The default value is `256`.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Sets the largest array `length` accepted on read.
    ///
    /// A larger length fails with [`Error::InvalidData`] before any slot is
    /// allocated.
    ///
    /// # Default
    ///
    /// The default value is `1048576`.
    pub fn max_array_length(mut self, max_array_length: usize) -> Self {
        self.config.max_array_length = max_array_length;
        self
    }

    /// Renames the attributes written by the strategies.
    pub fn reserved(mut self, reserved: ReservedNames) -> Self {
        self.config.reserved = reserved;
        self
    }

    /// Installs a custom strategy.
    pub fn strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Shares a schema cache with other codecs.
    ///
    /// Schemas are keyed by class name only, so codecs sharing a cache must
    /// register the same definitions.
    pub fn schema_cache(mut self, schemas: Arc<SchemaCache>) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a reference to the type resolver.
    pub fn resolver(&self) -> &TypeResolver {
        &self.type_resolver
    }

    pub fn get_strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    pub fn get_schema_cache(&self) -> &Arc<SchemaCache> {
        &self.schemas
    }

    /// Registers a class definition.
    ///
    /// Registration clears the schema cache.
    ///
    /// # Errors
    ///
    /// [`Error::NotAllowed`] when the name is empty, builtin or already taken.
    pub fn register_class(&mut self, def: ClassDef) -> Result<(), Error> {
        self.register_type(TypeDef::Class(def))
    }

    pub fn register_enum(&mut self, def: EnumDef) -> Result<(), Error> {
        self.register_type(TypeDef::Enum(def))
    }

    /// Registers the definition a Rust type describes of itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor_core::meta::{ClassDef, MemberDef, Tag, TypeDef};
    /// use arbor_core::reflect::{Describe, TypeOf};
    /// use arbor_core::types::TypeRef;
    /// use arbor_core::Arbor;
    ///
    /// struct Tagged;
    ///
    /// impl TypeOf for Tagged {
    ///     fn type_ref() -> TypeRef {
    ///         TypeRef::class("Tagged")
    ///     }
    /// }
    ///
    /// impl Describe for Tagged {
    ///     fn describe() -> TypeDef {
    ///         ClassDef::new("Tagged")
    ///             .member(MemberDef::new("label", TypeRef::STRING).tag(Tag::attribute()))
    ///             .into()
    ///     }
    /// }
    ///
    /// let mut arbor = Arbor::default();
    /// arbor.register::<Tagged>().unwrap();
    /// assert!(arbor.resolver().get_class("Tagged").is_some());
    /// ```
    pub fn register<T: Describe>(&mut self) -> Result<(), Error> {
        self.register_type(T::describe())
    }

    pub fn register_type(&mut self, def: TypeDef) -> Result<(), Error> {
        let name = def.name().to_string();
        self.type_resolver.register(def)?;
        self.schemas.clear();
        debug!(name = %name, "registered type");
        Ok(())
    }

    /// Derived schema of a registered class, cached after the first call.
    pub fn schema(&self, class: &str) -> Result<Arc<Schema>, Error> {
        Ok(self.schemas.get_or_derive(class, &self.type_resolver)?)
    }

    /// Writes the graph reachable from `root` as a document.
    ///
    /// The root node is named after the class's root name, or after the type
    /// for non-class roots, and is declared as its own runtime type.
    ///
    /// # Errors
    ///
    /// - [`Error::Schema`] when a reachable class has an invalid schema.
    /// - [`Error::MissingValue`] when a required member is null.
    /// - [`Error::DepthExceed`] when nesting exceeds the configured limit.
    /// - [`Error::Other`] when a persist or complete hook fails.
    pub fn serialize(&self, heap: &Heap, root: ObjectId) -> Result<Node, Error> {
        let declared = heap.runtime_type(root)?;
        let name = self.type_resolver.node_name(&declared);
        debug!(root = %root, node = %name, "serializing graph");
        let mut context = WriteContext::new(self, heap);
        let node = write_element(&declared, root, &name, Form::Plain, &mut context)?;
        debug!(tokens = context.session.len(), "serialized graph");
        Ok(node)
    }

    /// Reads a document into a new graph rooted at a value of `declared`.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeError`] when a node names a type that is unknown or not
    ///   assignable where it appears.
    /// - [`Error::Cycle`] for duplicate identities and dangling references.
    /// - [`Error::UnknownNode`] for undeclared nodes in strict mode.
    /// - [`Error::InvalidData`] for malformed text.
    /// - [`Error::Other`] when a validate or commit hook fails.
    pub fn deserialize(&self, node: &Node, declared: &TypeRef) -> Result<Graph, Error> {
        debug!(node = %node.name(), declared = %declared, "deserializing document");
        let mut context = ReadContext::new(self);
        let root = read_element(declared, node, Form::Plain, &mut context)?;
        debug!(
            objects = context.heap.len(),
            tokens = context.session.len(),
            "deserialized document"
        );
        Ok(Graph::new(context.into_heap(), root))
    }
}
