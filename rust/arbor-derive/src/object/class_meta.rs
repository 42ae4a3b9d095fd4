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

//! Type-level metadata parsing for `#[arbor(...)]` attributes.
//!
//! - `name = "..."`: registered class or enum name, defaults to the type name
//! - `root = "..."`, `strict = bool`: root tag of the class
//! - `extends = Type`: parent class
//! - `abstract_class`: the class can not be instantiated by a read
//! - `default = "field" | "property"`, `default_required = bool`: default access policy
//! - `order(elements("a", ...), attributes("b", ...))`: node order
//! - `constructor(a, b, ...)`: a constructor taking the named fields, repeatable
//! - `persist = path`, `complete = path`, `validate = path`, `commit = path`: lifecycle hooks

use crate::util::{parse_bool_or_flag, parse_ident_list, parse_lit_list};
use syn::{Attribute, Ident, LitStr, Path, Type};

#[derive(Clone, Default)]
pub struct ArborClassMeta {
    pub name: Option<LitStr>,
    pub root: Option<LitStr>,
    pub strict: Option<bool>,
    pub extends: Option<Type>,
    pub is_abstract: bool,
    /// `Some(true)` for property access.
    pub default_property: Option<bool>,
    pub default_required: Option<bool>,
    pub order_elements: Vec<LitStr>,
    pub order_attributes: Vec<LitStr>,
    pub constructors: Vec<Vec<Ident>>,
    pub persist: Option<Path>,
    pub complete: Option<Path>,
    pub validate: Option<Path>,
    pub commit: Option<Path>,
}

pub fn parse_class_meta(attrs: &[Attribute]) -> syn::Result<ArborClassMeta> {
    let mut meta = ArborClassMeta::default();

    for attr in attrs {
        if !attr.path().is_ident("arbor") {
            continue;
        }

        attr.parse_nested_meta(|nested| {
            let Some(ident) = nested.path.get_ident().map(|i| i.to_string()) else {
                return Err(nested.error("expected an identifier"));
            };
            match ident.as_str() {
                "name" => meta.name = Some(nested.value()?.parse()?),
                "root" => meta.root = Some(nested.value()?.parse()?),
                "strict" => meta.strict = Some(parse_bool_or_flag(&nested)?),
                "extends" => meta.extends = Some(nested.value()?.parse()?),
                "abstract_class" => meta.is_abstract = parse_bool_or_flag(&nested)?,
                "default" => {
                    let access: LitStr = nested.value()?.parse()?;
                    meta.default_property = Some(match access.value().as_str() {
                        "field" => false,
                        "property" => true,
                        _ => {
                            return Err(syn::Error::new(
                                access.span(),
                                "default must be \"field\" or \"property\"",
                            ))
                        }
                    });
                }
                "default_required" => {
                    meta.default_required = Some(parse_bool_or_flag(&nested)?)
                }
                "order" => {
                    nested.parse_nested_meta(|order| {
                        if order.path.is_ident("elements") {
                            meta.order_elements = parse_lit_list(&order)?;
                        } else if order.path.is_ident("attributes") {
                            meta.order_attributes = parse_lit_list(&order)?;
                        } else {
                            return Err(order.error("expected `elements` or `attributes`"));
                        }
                        Ok(())
                    })?;
                }
                "constructor" => meta.constructors.push(parse_ident_list(&nested)?),
                "persist" => meta.persist = Some(nested.value()?.parse()?),
                "complete" => meta.complete = Some(nested.value()?.parse()?),
                "validate" => meta.validate = Some(nested.value()?.parse()?),
                "commit" => meta.commit = Some(nested.value()?.parse()?),
                _ => return Err(nested.error(format!("unknown arbor type option `{}`", ident))),
            }
            Ok(())
        })?;
    }

    if meta.default_required.is_some() && meta.default_property.is_none() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "`default_required` needs a `default` access policy",
        ));
    }
    Ok(meta)
}
