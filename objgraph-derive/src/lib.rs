//! Derive macro for `objgraph`.
//!
//! This crate generates the reflection code behind `#[derive(Object)]`. It:
//! - reads `#[object(...)]` container and field attributes
//! - emits an `Object` implementation that hands fields to the walker, the
//!   copier and the zero constructor
//!
//! It does **not** interpret tags. Whether `secret` means anything is decided
//! by the runtime in the main `objgraph` crate.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else,
    clippy::too_many_lines
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::{Ident, TokenStream};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{ext::IdentExt, parse_macro_input, Data, DeriveInput, Result};

mod container;
mod derive_enum;
mod derive_struct;
mod generics;
mod strategy;
mod transform;
mod types;
use container::{parse_container_options, ContainerOptions};
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::{add_debug_bounds, add_object_bounds, add_skip_bounds, add_static_bounds};
use transform::DeriveOutput;

/// Derives `objgraph::Object` for structs and enums.
///
/// # Container Attributes
///
/// - `#[object(redacted_debug)]` - Also generate a `Debug` impl that prints
///   fields tagged `secret` as `"[REDACTED]"`. Do not combine with
///   `#[derive(Debug)]`.
///
/// # Field Attributes
///
/// - **No annotation**: The field is walked, copied and hashed. Its type must
///   implement `Object`.
///
/// - `#[object(tag)]`, `#[object(key = "value")]`: Attach tags to the field's
///   descriptor. `#[object(secret)]` marks the field for redaction. Any other
///   key is carried along for custom visitors and hooks.
///
/// - `#[object(skip)]`: The engine never sees the field. Copies clone it and
///   zero values use `Default`, so its type needs `Clone + Default` instead of
///   `Object`.
///
/// Only `pub` struct fields are public to the engine; enum variant fields
/// always are. Structs report `Kind::Record`, enums `Kind::Any` with the
/// active variant's fields.
///
/// Unions, empty enums and types with lifetime parameters are rejected at
/// compile time.
#[proc_macro_derive(Object, attributes(object))]
pub fn derive_object(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the objgraph crate root.
///
/// Handles crate renaming (e.g., `my_graph = { package = "objgraph", ... }`)
/// and internal usage (when derive is used inside the objgraph crate itself).
fn crate_root() -> TokenStream {
    match crate_name("objgraph") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::objgraph },
    }
}

/// Body of `Object::stable_name`: the module path and identifier, followed by
/// the stable names of the type parameters that reach walked fields.
fn stable_name(
    ident: &Ident,
    generics: &syn::Generics,
    walked_generics: &[Ident],
    root: &TokenStream,
) -> TokenStream {
    let label = ident.unraw().to_string();
    let path = quote! { ::core::concat!(::core::module_path!(), "::", #label) };
    let params: Vec<_> = generics
        .type_params()
        .map(|param| &param.ident)
        .filter(|param| walked_generics.contains(param))
        .collect();
    if params.is_empty() {
        return quote! { ::std::borrow::Cow::Borrowed(#path) };
    }
    quote! {
        let params: &[::std::borrow::Cow<'static, str>] =
            &[#(<#params as #root::Object>::stable_name()),*];
        ::std::borrow::Cow::Owned(::std::format!("{}<{}>", #path, params.join(", ")))
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let ContainerOptions { redacted_debug } = parse_container_options(&attrs)?;

    if let Some(lifetime) = generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "`Object` cannot be derived for types with lifetime parameters",
        ));
    }

    let root = crate_root();
    let output = match data {
        Data::Struct(data) => derive_struct(&ident, data, &generics, &root)?,
        Data::Enum(data) => derive_enum(&ident, data, &generics, &root)?,
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span,
                "`Object` cannot be derived for unions",
            ));
        }
    };

    let DeriveOutput {
        kind,
        variant_body,
        fields_body,
        walk_body,
        walk_mut_body,
        zeroed_body,
        copy_body,
        debug_body,
        walked_generics,
        skipped_generics,
        debug_generics,
    } = output;

    let object_generics = add_static_bounds(generics.clone());
    let object_generics = add_object_bounds(object_generics, &walked_generics, &root);
    let object_generics = add_skip_bounds(object_generics, &skipped_generics);
    let (impl_generics, ty_generics, where_clause) = object_generics.split_for_impl();

    let stable_name = stable_name(&ident, &generics, &walked_generics, &root);

    let variant_impl = variant_body.map(|body| {
        quote! {
            fn variant(&self) -> ::core::option::Option<&'static str> {
                #body
            }
        }
    });

    let debug_impl = if redacted_debug {
        let debug_generics = add_debug_bounds(generics.clone(), &debug_generics);
        let (impl_generics, ty_generics, where_clause) = debug_generics.split_for_impl();
        quote! {
            #[automatically_derived]
            impl #impl_generics ::core::fmt::Debug for #ident #ty_generics #where_clause {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    #debug_body
                }
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        #[automatically_derived]
        #[allow(unused_variables, clippy::used_underscore_binding)]
        impl #impl_generics #root::Object for #ident #ty_generics #where_clause {
            fn kind(&self) -> #root::Kind {
                #kind
            }

            fn stable_name() -> ::std::borrow::Cow<'static, str> {
                #stable_name
            }

            #variant_impl

            fn fields(&self) -> &'static [#root::Field] {
                #fields_body
            }

            fn walk(
                &self,
                inspection: &mut #root::Inspection<'_>,
                ctx: &#root::ProcContext<'_>,
            ) -> ::core::result::Result<(), #root::Error> {
                #walk_body
                ::core::result::Result::Ok(())
            }

            fn walk_mut(
                &mut self,
                traverser: &mut #root::Traverser<'_>,
                ctx: &#root::ProcContext<'_>,
            ) -> ::core::result::Result<(), #root::Error> {
                #walk_mut_body
                ::core::result::Result::Ok(())
            }

            fn zeroed() -> Self {
                #zeroed_body
            }

            fn build_copy(
                &self,
                copier: &mut #root::Copier<'_>,
                ctx: &#root::ProcContext<'_>,
            ) -> ::core::result::Result<Self, #root::Error> {
                #copy_body
            }
        }

        #debug_impl
    })
}
