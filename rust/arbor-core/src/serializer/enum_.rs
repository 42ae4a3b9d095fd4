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
use crate::object::{EnumConstant, Object};
use crate::resolver::TypeResolver;

pub fn write(constant: &EnumConstant, node: &mut Node) {
    node.set_text(constant.variant.clone());
}

pub fn read(resolver: &TypeResolver, enum_name: &str, text: &str) -> Result<Object, Error> {
    let def = resolver
        .get_enum(enum_name)
        .ok_or_else(|| Error::type_error(format!("enum '{}' is not registered", enum_name)))?;
    let variant = text.trim();
    if !def.has_variant(variant) {
        return Err(Error::invalid_data(format!(
            "'{}' is not a variant of enum '{}'",
            variant, enum_name
        )));
    }
    Ok(Object::Enum(EnumConstant {
        enum_name: enum_name.to_string(),
        variant: variant.to_string(),
    }))
}
