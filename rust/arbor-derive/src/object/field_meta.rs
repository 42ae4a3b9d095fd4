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

//! Field-level metadata parsing for `#[arbor(...)]` attributes.
//!
//! A field carries at most one tag kind:
//! `attribute`, `element`, `element_list`, `element_array`, `element_map`,
//! `text`, `union` or `list_union`. A field without one is left to the
//! class's default access policy.
//!
//! Tag options:
//! - `name = "..."`: node name, defaults to the field name
//! - `required` / `required = bool`: defaults to false for `Option` fields, true otherwise
//! - `entry = "..."`, `key = "..."`, `value = "..."`: entry node names of collections
//! - `class = Type`, `entry_type = Type`, `key_type = Type`, `value_type = Type`: narrowed types
//! - `attribute_key`: map keys are written as attributes of the entry
//! - `inline`: list or map entries are written directly under the enclosing node
//! - `candidates(name = Type, ...)`: union candidates, in order
//!
//! Member options: `read_only`, `skip` (transient) and `access = "property"`.

use crate::util::{arbor_core, parse_bool_or_flag, type_ref_of};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Field, LitStr, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Attribute,
    Element,
    ElementList,
    ElementArray,
    ElementMap,
    Text,
    Union,
    ListUnion,
}

impl TagKind {
    fn from_ident(ident: &str) -> Option<TagKind> {
        Some(match ident {
            "attribute" => TagKind::Attribute,
            "element" => TagKind::Element,
            "element_list" => TagKind::ElementList,
            "element_array" => TagKind::ElementArray,
            "element_map" => TagKind::ElementMap,
            "text" => TagKind::Text,
            "union" => TagKind::Union,
            "list_union" => TagKind::ListUnion,
            _ => return None,
        })
    }

    fn is_union(self) -> bool {
        matches!(self, TagKind::Union | TagKind::ListUnion)
    }
}

/// Represents parsed `#[arbor(...)]` field attributes
#[derive(Clone, Default)]
pub struct ArborFieldMeta {
    pub kind: Option<TagKind>,
    pub name: Option<LitStr>,
    /// None = use the type based default
    pub required: Option<bool>,
    pub entry: Option<LitStr>,
    pub key: Option<LitStr>,
    pub value: Option<LitStr>,
    pub class: Option<Type>,
    pub entry_type: Option<Type>,
    pub key_type: Option<Type>,
    pub value_type: Option<Type>,
    pub attribute_key: bool,
    pub inline: bool,
    pub candidates: Vec<(LitStr, Type)>,
    pub read_only: bool,
    pub skip: bool,
    pub property: bool,
}

/// Parse `#[arbor(...)]` attributes from a field
pub fn parse_field_meta(field: &Field) -> syn::Result<ArborFieldMeta> {
    let mut meta = ArborFieldMeta::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("arbor") {
            continue;
        }

        attr.parse_nested_meta(|nested| {
            let Some(ident) = nested.path.get_ident().map(|i| i.to_string()) else {
                return Err(nested.error("expected an identifier"));
            };
            if let Some(kind) = TagKind::from_ident(&ident) {
                if meta.kind.is_some() {
                    return Err(nested.error("a field can carry only one tag kind"));
                }
                meta.kind = Some(kind);
                return Ok(());
            }
            match ident.as_str() {
                "name" => meta.name = Some(nested.value()?.parse()?),
                "required" => meta.required = Some(parse_bool_or_flag(&nested)?),
                "entry" => meta.entry = Some(nested.value()?.parse()?),
                "key" => meta.key = Some(nested.value()?.parse()?),
                "value" => meta.value = Some(nested.value()?.parse()?),
                "class" => meta.class = Some(nested.value()?.parse()?),
                "entry_type" => meta.entry_type = Some(nested.value()?.parse()?),
                "key_type" => meta.key_type = Some(nested.value()?.parse()?),
                "value_type" => meta.value_type = Some(nested.value()?.parse()?),
                "attribute_key" => meta.attribute_key = parse_bool_or_flag(&nested)?,
                "inline" => meta.inline = parse_bool_or_flag(&nested)?,
                "read_only" => meta.read_only = parse_bool_or_flag(&nested)?,
                "skip" => meta.skip = true,
                "access" => {
                    let access: LitStr = nested.value()?.parse()?;
                    meta.property = match access.value().as_str() {
                        "field" => false,
                        "property" => true,
                        _ => {
                            return Err(syn::Error::new(
                                access.span(),
                                "access must be \"field\" or \"property\"",
                            ))
                        }
                    };
                }
                "candidates" => {
                    nested.parse_nested_meta(|candidate| {
                        let name = candidate
                            .path
                            .get_ident()
                            .ok_or_else(|| candidate.error("expected a candidate name"))?;
                        let ty: Type = candidate.value()?.parse()?;
                        meta.candidates
                            .push((LitStr::new(&name.to_string(), name.span()), ty));
                        Ok(())
                    })?;
                }
                _ => return Err(nested.error(format!("unknown arbor field option `{}`", ident))),
            }
            Ok(())
        })?;
    }

    validate(field, &meta)?;
    Ok(meta)
}

fn validate(field: &Field, meta: &ArborFieldMeta) -> syn::Result<()> {
    let union = meta.kind.is_some_and(TagKind::is_union);
    if union && meta.candidates.is_empty() {
        return Err(syn::Error::new_spanned(
            field,
            "union fields need at least one candidate",
        ));
    }
    if !union && !meta.candidates.is_empty() {
        return Err(syn::Error::new_spanned(
            field,
            "candidates are only allowed on union fields",
        ));
    }
    if meta.skip && meta.kind.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "a skipped field can not carry a tag",
        ));
    }
    Ok(())
}

fn lit_setter(method: &str, value: &Option<LitStr>) -> TokenStream {
    let method = syn::Ident::new(method, proc_macro2::Span::call_site());
    match value {
        Some(value) => quote!(.#method(#value)),
        None => quote!(),
    }
}

fn type_setter(method: &str, value: &Option<Type>) -> TokenStream {
    let method = syn::Ident::new(method, proc_macro2::Span::call_site());
    match value {
        Some(ty) => {
            let type_ref = type_ref_of(ty);
            quote!(.#method(#type_ref))
        }
        None => quote!(),
    }
}

/// Tokens building the field's tag, `None` for untagged fields.
pub fn tag_tokens(meta: &ArborFieldMeta, ty: &Type) -> Option<TokenStream> {
    let kind = meta.kind?;
    let core = arbor_core();
    let required = match meta.required {
        Some(required) => quote!(#required),
        None => quote!(!<#ty as #core::reflect::TypeOf>::is_option()),
    };
    let name = lit_setter("name", &meta.name);
    let candidates: Vec<TokenStream> = meta
        .candidates
        .iter()
        .map(|(name, ty)| {
            let type_ref = type_ref_of(ty);
            quote!(.candidate(#name, #type_ref))
        })
        .collect();
    let inline = meta.inline;
    Some(match kind {
        TagKind::Attribute => quote! {
            #core::meta::Tag::attribute() #name .required(#required)
        },
        TagKind::Element => {
            let class = type_setter("class", &meta.class);
            quote!(#core::meta::Tag::element() #name .required(#required) #class)
        }
        TagKind::ElementList => {
            let entry = lit_setter("entry", &meta.entry);
            let entry_type = type_setter("entry_type", &meta.entry_type);
            quote! {
                #core::meta::Tag::element_list() #name .required(#required)
                    #entry #entry_type .inline(#inline)
            }
        }
        TagKind::ElementArray => {
            let entry = lit_setter("entry", &meta.entry);
            quote!(#core::meta::Tag::element_array() #name .required(#required) #entry)
        }
        TagKind::ElementMap => {
            let entry = lit_setter("entry", &meta.entry);
            let key = lit_setter("key", &meta.key);
            let value = lit_setter("value", &meta.value);
            let key_type = type_setter("key_type", &meta.key_type);
            let value_type = type_setter("value_type", &meta.value_type);
            let attribute_key = meta.attribute_key;
            quote! {
                #core::meta::Tag::element_map() #name .required(#required)
                    #entry #key #value #key_type #value_type
                    .attribute(#attribute_key) .inline(#inline)
            }
        }
        TagKind::Text => quote!(#core::meta::Tag::text().required(#required)),
        TagKind::Union => quote! {
            #core::meta::Tag::union().required(#required) #(#candidates)*
        },
        TagKind::ListUnion => quote! {
            #core::meta::Tag::list_union().required(#required) #(#candidates)*
        },
    })
}
