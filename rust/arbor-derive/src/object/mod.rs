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

mod class_meta;
mod derive_enum;
mod field_meta;

use crate::util::{arbor_core, type_ref_of};
use class_meta::{parse_class_meta, ArborClassMeta};
use field_meta::{parse_field_meta, tag_tokens, ArborFieldMeta};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr};

pub fn derive_describe(input: &DeriveInput) -> TokenStream {
    let result = match &input.data {
        Data::Struct(data) => derive_class(input, &data.fields),
        Data::Enum(data) => derive_enum::derive_enum(input, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "`Describe` can not be derived for unions",
        )),
    };
    result.unwrap_or_else(syn::Error::into_compile_error)
}

/// Registered name of the type, from `name = "..."` or the type name.
fn type_name(input: &DeriveInput, meta_name: &Option<LitStr>) -> LitStr {
    meta_name
        .clone()
        .unwrap_or_else(|| LitStr::new(&input.ident.to_string(), input.ident.span()))
}

fn derive_class(input: &DeriveInput, fields: &Fields) -> syn::Result<TokenStream> {
    let Fields::Named(named) = fields else {
        if matches!(fields, Fields::Unit) {
            return derive_class_with(input, &[]);
        }
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`Describe` needs named fields, members are addressed by name",
        ));
    };
    let fields: Vec<&Field> = named.named.iter().collect();
    derive_class_with(input, &fields)
}

fn derive_class_with(input: &DeriveInput, fields: &[&Field]) -> syn::Result<TokenStream> {
    let core = arbor_core();
    let meta = parse_class_meta(&input.attrs)?;
    let name = type_name(input, &meta.name);

    let mut members = Vec::with_capacity(fields.len());
    let mut field_metas: Vec<(&Field, ArborFieldMeta)> = Vec::with_capacity(fields.len());
    for field in fields {
        let field_meta = parse_field_meta(field)?;
        members.push(member_tokens(field, &field_meta));
        field_metas.push((field, field_meta));
    }
    let constructors = constructor_tokens(&meta, &field_metas)?;
    let class_options = class_tokens(&meta);

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #core::reflect::TypeOf for #ident #ty_generics #where_clause {
            fn type_ref() -> #core::types::TypeRef {
                #core::types::TypeRef::class(#name)
            }
        }

        impl #impl_generics #core::reflect::Describe for #ident #ty_generics #where_clause {
            fn describe() -> #core::meta::TypeDef {
                #core::meta::ClassDef::new(#name)
                    #class_options
                    #(.member(#members))*
                    #(.constructor(#constructors))*
                    .into()
            }
        }
    })
}

fn field_name(field: &Field) -> LitStr {
    match &field.ident {
        Some(ident) => LitStr::new(&ident.to_string(), ident.span()),
        None => LitStr::new("", proc_macro2::Span::call_site()),
    }
}

fn member_tokens(field: &Field, meta: &ArborFieldMeta) -> TokenStream {
    let core = arbor_core();
    let name = field_name(field);
    let ty = &field.ty;
    let declared = type_ref_of(ty);
    let tag = tag_tokens(meta, ty).map(|tag| quote!(.tag(#tag)));
    let read_only = meta.read_only.then(|| quote!(.read_only(true)));
    let transient = meta.skip.then(|| quote!(.transient(true)));
    let access = meta
        .property
        .then(|| quote!(.access(#core::meta::DefaultAccess::Property)));
    quote! {
        #core::meta::MemberDef::new(#name, #declared) #tag #read_only #transient #access
    }
}

/// One `ConstructorDef` per `constructor(...)` option, parameters reusing
/// the type and tag of the field they are named after.
fn constructor_tokens(
    meta: &ArborClassMeta,
    fields: &[(&Field, ArborFieldMeta)],
) -> syn::Result<Vec<TokenStream>> {
    let core = arbor_core();
    let mut constructors = Vec::with_capacity(meta.constructors.len());
    for params in &meta.constructors {
        let mut param_tokens = Vec::with_capacity(params.len());
        for param in params {
            let Some((field, field_meta)) = fields
                .iter()
                .find(|(field, _)| field.ident.as_ref() == Some(param))
            else {
                return Err(syn::Error::new(
                    param.span(),
                    format!("constructor parameter `{}` names no field", param),
                ));
            };
            let name = field_name(field);
            let declared = type_ref_of(&field.ty);
            let tag = tag_tokens(field_meta, &field.ty).map(|tag| quote!(.tag(#tag)));
            param_tokens.push(quote!(#core::meta::ParamDef::new(#name, #declared) #tag));
        }
        constructors.push(quote! {
            #core::meta::ConstructorDef::new() #(.param(#param_tokens))*
        });
    }
    Ok(constructors)
}

fn class_tokens(meta: &ArborClassMeta) -> TokenStream {
    let core = arbor_core();
    let mut tokens = TokenStream::new();
    if let Some(parent) = &meta.extends {
        let parent = type_ref_of(parent);
        tokens.extend(quote!(.extends(#parent.to_string())));
    }
    if meta.is_abstract {
        tokens.extend(quote!(.abstract_class(true)));
    }
    if meta.root.is_some() || meta.strict.is_some() {
        let name = meta.root.as_ref().map(|root| quote!(.name(#root)));
        let strict = meta.strict.map(|strict| quote!(.strict(#strict)));
        tokens.extend(quote!(.root(#core::meta::RootTag::new() #name #strict)));
    }
    if !meta.order_elements.is_empty() || !meta.order_attributes.is_empty() {
        let elements = &meta.order_elements;
        let attributes = &meta.order_attributes;
        let elements = (!elements.is_empty()).then(|| quote!(.elements([#(#elements),*])));
        let attributes =
            (!attributes.is_empty()).then(|| quote!(.attributes([#(#attributes),*])));
        tokens.extend(quote!(.order(#core::meta::OrderTag::new() #elements #attributes)));
    }
    if let Some(property) = meta.default_property {
        let access = if property {
            quote!(#core::meta::DefaultAccess::Property)
        } else {
            quote!(#core::meta::DefaultAccess::Field)
        };
        let required = meta.default_required.map(|r| quote!(.required(#r)));
        tokens.extend(quote!(.default_access(#core::meta::DefaultTag::new(#access) #required)));
    }
    for (method, hook) in [
        ("persist", &meta.persist),
        ("complete", &meta.complete),
        ("validate", &meta.validate),
        ("commit", &meta.commit),
    ] {
        if let Some(hook) = hook {
            let method = syn::Ident::new(method, proc_macro2::Span::call_site());
            tokens.extend(quote!(.#method(#hook)));
        }
    }
    tokens
}
