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

use crate::arbor::Arbor;
use crate::config::Config;
use crate::error::Error;
use crate::meta::Schema;
use crate::object::Heap;
use crate::resolver::TypeResolver;
use crate::strategy::{ReadSession, Strategy, WriteSession};
use std::sync::Arc;

fn depth_error(max_depth: u32, node: &str) -> Error {
    Error::depth_exceed(format!(
        "maximum nesting depth ({}) exceeded at node '{}'. \
        This may indicate a circular reference written without reference tracking.",
        max_depth, node
    ))
}

/// State of one serialize call. Dropped when the call returns.
pub struct WriteContext<'a> {
    arbor: &'a Arbor,
    heap: &'a Heap,
    pub session: WriteSession,
    depth: u32,
}

impl<'a> WriteContext<'a> {
    pub fn new(arbor: &'a Arbor, heap: &'a Heap) -> WriteContext<'a> {
        WriteContext {
            arbor,
            heap,
            session: WriteSession::new(arbor.config().reserved().clone()),
            depth: 0,
        }
    }

    #[inline(always)]
    pub fn heap(&self) -> &'a Heap {
        self.heap
    }

    #[inline(always)]
    pub fn config(&self) -> &'a Config {
        self.arbor.config()
    }

    #[inline(always)]
    pub fn resolver(&self) -> &'a TypeResolver {
        self.arbor.resolver()
    }

    #[inline(always)]
    pub fn strategy(&self) -> &'a dyn Strategy {
        self.arbor.get_strategy()
    }

    pub fn schema(&self, class: &str) -> Result<Arc<Schema>, Error> {
        self.arbor.schema(class)
    }

    pub fn inc_depth(&mut self, node: &str) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.config().max_depth() {
            return Err(depth_error(self.config().max_depth(), node));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// State of one deserialize call, owning the heap under construction.
pub struct ReadContext<'a> {
    arbor: &'a Arbor,
    pub heap: Heap,
    pub session: ReadSession,
    depth: u32,
}

impl<'a> ReadContext<'a> {
    pub fn new(arbor: &'a Arbor) -> ReadContext<'a> {
        ReadContext {
            arbor,
            heap: Heap::new(),
            session: ReadSession::new(arbor.config().reserved().clone()),
            depth: 0,
        }
    }

    #[inline(always)]
    pub fn config(&self) -> &'a Config {
        self.arbor.config()
    }

    #[inline(always)]
    pub fn resolver(&self) -> &'a TypeResolver {
        self.arbor.resolver()
    }

    #[inline(always)]
    pub fn strategy(&self) -> &'a dyn Strategy {
        self.arbor.get_strategy()
    }

    pub fn schema(&self, class: &str) -> Result<Arc<Schema>, Error> {
        self.arbor.schema(class)
    }

    pub fn inc_depth(&mut self, node: &str) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.config().max_depth() {
            return Err(depth_error(self.config().max_depth(), node));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn into_heap(self) -> Heap {
        self.heap
    }
}
