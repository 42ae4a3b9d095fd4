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

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Ident, LitStr, Token, Type};

/// Path of the core crate in generated code.
pub fn arbor_core() -> TokenStream {
    quote!(::arbor_core)
}

/// Tokens evaluating to the declared type of `ty`.
pub fn type_ref_of(ty: &Type) -> TokenStream {
    let core = arbor_core();
    quote!(<#ty as #core::reflect::TypeOf>::type_ref())
}

/// Parse a boolean value or treat standalone flag as true
pub fn parse_bool_or_flag(meta: &syn::meta::ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.is_empty() || meta.input.peek(Token![,]) {
        Ok(true)
    } else {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    }
}

/// Parse a parenthesized list of string literals, as in `elements("a", "b")`.
pub fn parse_lit_list(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Vec<LitStr>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let list: Punctuated<LitStr, Token![,]> = Punctuated::parse_terminated(&content)?;
    Ok(list.into_iter().collect())
}

/// Parse a parenthesized list of identifiers, as in `constructor(a, b)`.
pub fn parse_ident_list(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Vec<Ident>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let list: Punctuated<Ident, Token![,]> = Punctuated::parse_terminated(&content)?;
    Ok(list.into_iter().collect())
}
