//! `#[object(...)]` on the deriving type itself.
//!
//! The only container option is `redacted_debug`. Field attributes are
//! parsed by the `strategy` module.

use syn::{Attribute, Meta, Result, Token};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ContainerOptions {
    /// Emit a `Debug` impl that masks `secret` fields.
    pub(crate) redacted_debug: bool,
}

pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("object")) {
        let list = match &attr.meta {
            // `#[object]` alone says nothing about the container
            Meta::Path(_) => continue,
            Meta::List(list) => list,
            Meta::NameValue(_) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "expected `#[object(redacted_debug)]` on a type",
                ));
            }
        };
        list.parse_nested_meta(|option| {
            if !option.path.is_ident("redacted_debug") {
                let name = option
                    .path
                    .get_ident()
                    .map_or_else(|| "?".to_owned(), ToString::to_string);
                return Err(option.error(format!(
                    "unknown container option `{name}`; expected `redacted_debug`"
                )));
            }
            if !option.input.is_empty() && !option.input.peek(Token![,]) {
                return Err(option.error("`redacted_debug` does not take a value"));
            }
            options.redacted_debug = true;
            Ok(())
        })?;
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn options_of(attrs: proc_macro2::TokenStream) -> Result<ContainerOptions> {
        let input: DeriveInput = syn::parse2(quote! {
            #attrs
            struct Login;
        })
        .unwrap();
        parse_container_options(&input.attrs)
    }

    #[test]
    fn plain_types_get_no_debug() {
        assert_eq!(options_of(quote! {}).unwrap(), ContainerOptions::default());
        assert_eq!(
            options_of(quote! { #[derive(Clone)] #[object] }).unwrap(),
            ContainerOptions::default()
        );
    }

    #[test]
    fn redacted_debug_turns_on_the_debug_impl() {
        let options = options_of(quote! { #[object(redacted_debug)] }).unwrap();
        assert!(options.redacted_debug);
    }

    #[test]
    fn field_tags_are_not_container_options() {
        let err = options_of(quote! { #[object(secret)] }).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown container option `secret`; expected `redacted_debug`"
        );
    }

    #[test]
    fn repeated_option_is_accepted() {
        let options =
            options_of(quote! { #[object(redacted_debug, redacted_debug)] }).unwrap();
        assert!(options.redacted_debug);
    }

    #[test]
    fn values_are_rejected() {
        assert!(options_of(quote! { #[object = "x"] }).is_err());
        let err = options_of(quote! { #[object(redacted_debug = true)] }).unwrap_err();
        assert_eq!(err.to_string(), "`redacted_debug` does not take a value");
    }
}
