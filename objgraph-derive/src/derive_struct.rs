//! Struct-specific `Object` derivation.
//!
//! Structs are records: every non-skipped field becomes a `Field` descriptor
//! and a child visited through `Segment::Field`.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{ext::IdentExt, DataStruct, Result};

use crate::transform::{generate_fields, DeriveContext, DeriveOutput};

pub(crate) fn derive_struct(
    name: &Ident,
    data: DataStruct,
    generics: &syn::Generics,
    root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut walked_generics = Vec::new();
    let mut skipped_generics = Vec::new();
    let mut debug_generics = Vec::new();

    let mut ctx = DeriveContext {
        generics,
        root,
        walked_generics: &mut walked_generics,
        skipped_generics: &mut skipped_generics,
        debug_generics: &mut debug_generics,
    };
    let fields = generate_fields(&mut ctx, data.fields, false)?;

    let path = quote! { Self };
    let walk_pattern = fields.walk_pattern(&path);
    let walks = fields.walks();
    let walk_muts = fields.walk_muts();
    let copy_pattern = fields.copy_pattern(&path);
    let copy_expr = fields.copy_expr(&path);
    let debug_pattern = fields.debug_pattern(&path);
    let debug_expr = fields.debug_expr(&name.unraw().to_string());

    Ok(DeriveOutput {
        kind: quote! { #root::Kind::Record },
        variant_body: None,
        fields_body: fields.descriptors(root),
        walk_body: quote! {
            let fields = <Self as #root::Object>::fields(self);
            let #walk_pattern = self;
            #walks
        },
        walk_mut_body: quote! {
            let fields = <Self as #root::Object>::fields(self);
            let #walk_pattern = self;
            #walk_muts
        },
        zeroed_body: fields.zero_expr(&path),
        copy_body: quote! {
            let fields = <Self as #root::Object>::fields(self);
            let #copy_pattern = self;
            ::core::result::Result::Ok(#copy_expr)
        },
        debug_body: quote! {
            let #debug_pattern = self;
            #debug_expr
        },
        walked_generics,
        skipped_generics,
        debug_generics,
    })
}
