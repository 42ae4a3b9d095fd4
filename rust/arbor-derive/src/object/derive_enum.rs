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

use super::type_name;
use crate::util::arbor_core;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields, LitStr};

/// Variant name, from `#[arbor(name = "...")]` or the variant identifier.
fn variant_name(variant: &syn::Variant) -> syn::Result<LitStr> {
    let mut name = None;
    for attr in &variant.attrs {
        if !attr.path().is_ident("arbor") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("name") {
                name = Some(nested.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(nested.error("only `name` is supported on enum variants"))
            }
        })?;
    }
    Ok(name.unwrap_or_else(|| LitStr::new(&variant.ident.to_string(), variant.ident.span())))
}

pub fn derive_enum(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream> {
    let core = arbor_core();
    let mut enum_name = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("arbor") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("name") {
                enum_name = Some(nested.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(nested.error("only `name` is supported on enums"))
            }
        })?;
    }
    let name = type_name(input, &enum_name);

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "only unit variants can be written as text",
            ));
        }
        variants.push(variant_name(variant)?);
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #core::reflect::TypeOf for #ident #ty_generics #where_clause {
            fn type_ref() -> #core::types::TypeRef {
                #core::types::TypeRef::enumeration(#name)
            }
        }

        impl #impl_generics #core::reflect::Describe for #ident #ty_generics #where_clause {
            fn describe() -> #core::meta::TypeDef {
                #core::meta::EnumDef::new(#name)
                    #(.variant(#variants))*
                    .into()
            }
        }
    })
}
