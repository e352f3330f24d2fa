//! Parsing of `#[object(...)]` field attributes.
//!
//! Every entry in the list is either `skip` or a tag. Tags are free-form:
//! `#[object(secret)]` and `#[object(role = "admin")]` both end up in the
//! field's tag set, and the runtime decides what they mean.

use proc_macro2::Span;
use syn::{ext::IdentExt, spanned::Spanned, Attribute, LitStr, Meta, Result, Token};

/// Tag key the runtime treats as "secret".
const SECRET: &str = "secret";

/// One `key` or `key = "value"` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Tag {
    pub(crate) key: String,
    pub(crate) value: String,
}

/// How the generated code treats a field.
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `Walk([])` | Walked, copied, hashed |
/// | `#[object(secret, k = "v")]` | `Walk(tags)` | Same, with tags on the descriptor |
/// | `#[object(skip)]` | `Skip` | Invisible: cloned on copy, `Default` on zero |
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Strategy {
    Walk(Vec<Tag>),
    Skip,
}

impl Strategy {
    pub(crate) fn is_secret(&self) -> bool {
        match self {
            Self::Walk(tags) => tags.iter().any(|tag| tag.key == SECRET),
            Self::Skip => false,
        }
    }
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut tags: Vec<Tag> = Vec::new();
    let mut skip: Option<Span> = None;

    for attr in attrs {
        if !attr.path().is_ident("object") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "expected a list of tags (e.g., #[object(secret)])",
                ));
            }
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    let Some(key) = meta.path.get_ident().map(|ident| ident.unraw().to_string())
                    else {
                        return Err(meta.error("expected a tag name"));
                    };

                    if key == "skip" {
                        if meta.input.peek(Token![=]) {
                            return Err(meta.error("`skip` does not take a value"));
                        }
                        if skip.is_some() {
                            return Err(meta.error("duplicate `skip`"));
                        }
                        skip = Some(meta.path.span());
                        return Ok(());
                    }

                    let value = if meta.input.peek(Token![=]) {
                        meta.value()?.parse::<LitStr>()?.value()
                    } else {
                        String::new()
                    };
                    if tags.iter().any(|tag| tag.key == key) {
                        return Err(meta.error(format!("duplicate tag `{key}`")));
                    }
                    tags.push(Tag { key, value });
                    Ok(())
                })?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[object]; use #[object(key = \"value\")]",
                ));
            }
        }
    }

    match skip {
        Some(span) if !tags.is_empty() => Err(syn::Error::new(
            span,
            "`skip` cannot be combined with tags",
        )),
        Some(_) => Ok(Strategy::Skip),
        None => Ok(Strategy::Walk(tags)),
    }
}
