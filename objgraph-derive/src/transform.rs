//! Shared field code generation for struct and enum derivation.
//!
//! A struct and an enum variant are the same thing to the generated code: a
//! set of fields reached through a path (`Self` or `Self::Variant`). Members
//! are always written in braced form (`Self { 0: field_0, .. }`), which is
//! valid for named, positional and unit shapes alike.

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{ext::IdentExt, spanned::Spanned, Fields, Index, Member, Result, Visibility};

use crate::{
    generics::collect_generics_from_type,
    strategy::{parse_field_strategy, Strategy},
    types::type_label,
};

/// Accumulated state during field processing.
///
/// Groups the generic parameter lists that decide which bounds end up on the
/// generated impls.
pub(crate) struct DeriveContext<'a> {
    pub(crate) generics: &'a syn::Generics,
    pub(crate) root: &'a TokenStream,
    pub(crate) walked_generics: &'a mut Vec<Ident>,
    pub(crate) skipped_generics: &'a mut Vec<Ident>,
    pub(crate) debug_generics: &'a mut Vec<Ident>,
}

/// Everything the derive produces, before it is assembled into impls.
pub(crate) struct DeriveOutput {
    pub(crate) kind: TokenStream,
    pub(crate) variant_body: Option<TokenStream>,
    pub(crate) fields_body: TokenStream,
    pub(crate) walk_body: TokenStream,
    pub(crate) walk_mut_body: TokenStream,
    pub(crate) zeroed_body: TokenStream,
    pub(crate) copy_body: TokenStream,
    pub(crate) debug_body: TokenStream,
    pub(crate) walked_generics: Vec<Ident>,
    pub(crate) skipped_generics: Vec<Ident>,
    pub(crate) debug_generics: Vec<Ident>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Named,
    Unnamed,
    Unit,
}

/// Generated fragments for one field.
struct FieldTokens {
    member: Member,
    binding: Ident,
    label: String,
    span: Span,
    secret: bool,
    /// `Field` descriptor; `None` for skipped fields.
    descriptor: Option<TokenStream>,
    walk: TokenStream,
    walk_mut: TokenStream,
    copy: TokenStream,
    zero: TokenStream,
}

impl FieldTokens {
    fn is_walked(&self) -> bool {
        self.descriptor.is_some()
    }
}

/// The fields of a struct or of one enum variant.
pub(crate) struct FieldSet {
    style: Style,
    fields: Vec<FieldTokens>,
}

/// Generates the code fragments for every field of a struct or variant.
///
/// ## Field Rules
///
/// | Annotation | Walk | Copy | Zero |
/// |------------|------|------|------|
/// | None / tags | `field` on the walker | `Copier::field` | `Object::zeroed` |
/// | `#[object(skip)]` | not visited | `Clone::clone` | `Default::default` |
///
/// Enum variant fields are always public; struct fields are public when
/// declared `pub`.
pub(crate) fn generate_fields(
    ctx: &mut DeriveContext<'_>,
    fields: Fields,
    in_enum: bool,
) -> Result<FieldSet> {
    let style = match &fields {
        Fields::Named(_) => Style::Named,
        Fields::Unnamed(_) => Style::Unnamed,
        Fields::Unit => Style::Unit,
    };
    let root = ctx.root;
    let mut generated = Vec::new();
    let mut index = 0usize;

    for (position, field) in fields.into_iter().enumerate() {
        let span = field.span();
        let strategy = parse_field_strategy(&field.attrs)?;
        let (member, label) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.unraw().to_string()),
            None => (Member::Unnamed(Index::from(position)), position.to_string()),
        };
        let binding = format_ident!("field_{}", label);
        let ty = &field.ty;

        let secret = strategy.is_secret();
        if !secret {
            collect_generics_from_type(ty, ctx.generics, ctx.debug_generics);
        }

        let tokens = match &strategy {
            Strategy::Skip => {
                collect_generics_from_type(ty, ctx.generics, ctx.skipped_generics);
                FieldTokens {
                    member,
                    binding: binding.clone(),
                    label,
                    span,
                    secret,
                    descriptor: None,
                    walk: TokenStream::new(),
                    walk_mut: TokenStream::new(),
                    copy: quote_spanned! { span => ::core::clone::Clone::clone(#binding) },
                    zero: quote_spanned! { span => ::core::default::Default::default() },
                }
            }
            Strategy::Walk(tags) => {
                collect_generics_from_type(ty, ctx.generics, ctx.walked_generics);
                let public = in_enum || matches!(field.vis, Visibility::Public(_));
                let type_name = type_label(ty);
                let tags = tags.iter().map(|tag| {
                    let (key, value) = (&tag.key, &tag.value);
                    quote! { #root::Tag::new(#key, #value) }
                });
                let descriptor = quote! {
                    #root::Field::new(#label, #type_name, #public, &[#(#tags),*])
                };
                let slot = index;
                index += 1;
                FieldTokens {
                    member,
                    binding: binding.clone(),
                    label,
                    span,
                    secret,
                    descriptor: Some(descriptor),
                    walk: quote_spanned! { span =>
                        inspection.field(#binding, ctx, &fields[#slot])?;
                    },
                    walk_mut: quote_spanned! { span =>
                        traverser.field(#binding, ctx, &fields[#slot])?;
                    },
                    copy: quote_spanned! { span =>
                        copier.field(#binding, ctx, &fields[#slot])?
                    },
                    zero: quote_spanned! { span => <#ty as #root::Object>::zeroed() },
                }
            }
        };
        generated.push(tokens);
    }

    Ok(FieldSet {
        style,
        fields: generated,
    })
}

impl FieldSet {
    /// Block evaluating to the `&'static [Field]` of the walked fields.
    pub(crate) fn descriptors(&self, root: &TokenStream) -> TokenStream {
        let descriptors = self.fields.iter().filter_map(|f| f.descriptor.as_ref());
        quote! {{
            const FIELDS: &[#root::Field] = &[#(#descriptors),*];
            FIELDS
        }}
    }

    fn pattern(&self, path: &TokenStream, include: impl Fn(&FieldTokens) -> bool) -> TokenStream {
        let entries = self.fields.iter().filter(|f| include(f)).map(|f| {
            let (member, binding) = (&f.member, &f.binding);
            quote! { #member: #binding }
        });
        quote! { #path { #(#entries,)* .. } }
    }

    /// Pattern binding the walked fields.
    pub(crate) fn walk_pattern(&self, path: &TokenStream) -> TokenStream {
        self.pattern(path, FieldTokens::is_walked)
    }

    pub(crate) fn walks(&self) -> TokenStream {
        let walks = self.fields.iter().map(|f| &f.walk);
        quote! { #(#walks)* }
    }

    pub(crate) fn walk_muts(&self) -> TokenStream {
        let walks = self.fields.iter().map(|f| &f.walk_mut);
        quote! { #(#walks)* }
    }

    /// Pattern binding every field.
    pub(crate) fn copy_pattern(&self, path: &TokenStream) -> TokenStream {
        self.pattern(path, |_| true)
    }

    /// Expression building the copy from the bindings of `copy_pattern`.
    pub(crate) fn copy_expr(&self, path: &TokenStream) -> TokenStream {
        let inits = self.fields.iter().map(|f| {
            let (member, copy) = (&f.member, &f.copy);
            quote! { #member: #copy }
        });
        quote! { #path { #(#inits),* } }
    }

    pub(crate) fn zero_expr(&self, path: &TokenStream) -> TokenStream {
        let inits = self.fields.iter().map(|f| {
            let (member, zero) = (&f.member, &f.zero);
            quote! { #member: #zero }
        });
        quote! { #path { #(#inits),* } }
    }

    /// Pattern binding the fields `Debug` prints as is.
    pub(crate) fn debug_pattern(&self, path: &TokenStream) -> TokenStream {
        self.pattern(path, |f| !f.secret)
    }

    /// `Debug` body printing secret fields as `[REDACTED]`.
    pub(crate) fn debug_expr(&self, label: &str) -> TokenStream {
        let fields = self.fields.iter().map(|f| {
            let span = f.span;
            let binding = &f.binding;
            let value = if f.secret {
                quote_spanned! { span => &"[REDACTED]" }
            } else {
                quote_spanned! { span => #binding }
            };
            match self.style {
                Style::Named => {
                    let name = &f.label;
                    quote_spanned! { span => debug.field(#name, #value); }
                }
                _ => quote_spanned! { span => debug.field(#value); },
            }
        });

        match self.style {
            Style::Named => quote! {{
                let mut debug = f.debug_struct(#label);
                #(#fields)*
                debug.finish()
            }},
            Style::Unnamed => quote! {{
                let mut debug = f.debug_tuple(#label);
                #(#fields)*
                debug.finish()
            }},
            Style::Unit => quote! { f.write_str(#label) },
        }
    }
}
