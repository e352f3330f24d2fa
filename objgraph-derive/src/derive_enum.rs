//! Enum-specific `Object` derivation.
//!
//! Enums are sum types (`Kind::Any`). Each method matches on the active
//! variant; `fields` reports that variant's descriptors and `variant` its
//! name. Variant fields are public, like the variants themselves.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{ext::IdentExt, DataEnum, Result};

use crate::transform::{generate_fields, DeriveContext, DeriveOutput, FieldSet};

pub(crate) fn derive_enum(
    name: &Ident,
    data: DataEnum,
    generics: &syn::Generics,
    root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut walked_generics = Vec::new();
    let mut skipped_generics = Vec::new();
    let mut debug_generics = Vec::new();
    let mut variants: Vec<(Ident, FieldSet)> = Vec::new();

    for variant in data.variants {
        let mut ctx = DeriveContext {
            generics,
            root,
            walked_generics: &mut walked_generics,
            skipped_generics: &mut skipped_generics,
            debug_generics: &mut debug_generics,
        };
        let fields = generate_fields(&mut ctx, variant.fields, true)?;
        variants.push((variant.ident, fields));
    }

    let mut name_arms = Vec::new();
    let mut fields_arms = Vec::new();
    let mut walk_arms = Vec::new();
    let mut walk_mut_arms = Vec::new();
    let mut copy_arms = Vec::new();
    let mut debug_arms = Vec::new();

    for (variant_ident, fields) in &variants {
        let path = quote! { Self::#variant_ident };
        let label = variant_ident.unraw().to_string();
        let descriptors = fields.descriptors(root);
        let walk_pattern = fields.walk_pattern(&path);
        let walks = fields.walks();
        let walk_muts = fields.walk_muts();
        let copy_pattern = fields.copy_pattern(&path);
        let copy_expr = fields.copy_expr(&path);
        let debug_pattern = fields.debug_pattern(&path);
        let debug_expr = fields.debug_expr(&label);

        name_arms.push(quote! { #path { .. } => #label });
        fields_arms.push(quote! { #path { .. } => #descriptors });
        walk_arms.push(quote! { #walk_pattern => { #walks } });
        walk_mut_arms.push(quote! { #walk_pattern => { #walk_muts } });
        copy_arms.push(quote! { #copy_pattern => #copy_expr });
        debug_arms.push(quote! { #debug_pattern => #debug_expr });
    }

    // The zero value is the first variant with zeroed fields
    let Some((first, first_fields)) = variants.first() else {
        return Err(syn::Error::new(
            name.span(),
            "`Object` cannot be derived for enums without variants",
        ));
    };
    let zeroed_body = first_fields.zero_expr(&quote! { Self::#first });

    Ok(DeriveOutput {
        kind: quote! { #root::Kind::Any },
        variant_body: Some(quote! {
            ::core::option::Option::Some(match self {
                #(#name_arms),*
            })
        }),
        fields_body: quote! {
            match self {
                #(#fields_arms),*
            }
        },
        walk_body: quote! {
            let fields = <Self as #root::Object>::fields(self);
            match self {
                #(#walk_arms)*
            }
        },
        walk_mut_body: quote! {
            let fields = <Self as #root::Object>::fields(self);
            match self {
                #(#walk_mut_arms)*
            }
        },
        zeroed_body,
        copy_body: quote! {
            let fields = <Self as #root::Object>::fields(self);
            ::core::result::Result::Ok(match self {
                #(#copy_arms),*
            })
        },
        debug_body: quote! {
            match self {
                #(#debug_arms),*
            }
        },
        walked_generics,
        skipped_generics,
        debug_generics,
    })
}
