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

mod class_def;
mod label;
mod label_factory;
mod scanner;
mod schema;
mod signature;
mod tag;

pub use class_def::{ClassDef, ConstructorDef, EnumDef, MemberDef, ParamDef, TypeDef};
pub use label::{
    ArrayLayout, CacheLabel, Label, LabelKind, ListLayout, MapLayout, Namespace, Shape,
    UnionLayout,
};
pub use label_factory::{LabelExtractor, LabelFactory, DEFAULT_KEY_NAME, DEFAULT_VALUE_NAME};
pub use scanner::Scanner;
pub use schema::{LabelSet, Schema};
pub use signature::{Parameter, Signature, Signatures};
pub use tag::{
    AttributeTag, DefaultAccess, DefaultTag, ElementArrayTag, ElementListTag, ElementMapTag,
    ElementTag, Lifecycle, ListUnionTag, OrderTag, ReadHook, RootTag, Tag, TextTag, UnionTag,
    WriteHook,
};
