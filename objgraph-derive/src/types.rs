//! Type utilities for the derive macro.

use quote::ToTokens;

/// Renders a field type the way it is written in source, e.g. `Vec<u8>`,
/// `HashMap<String, u8>` or `&'static str`.
///
/// `TokenStream`'s `Display` puts a space between every token; only the
/// spaces separating two words, or following `,` and `;`, are kept.
pub(crate) fn type_label(ty: &syn::Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let mut label = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ' ' {
            label.push(c);
            continue;
        }
        let keep = match (label.chars().last(), chars.peek()) {
            (Some(prev), Some(&next)) => {
                (is_word(prev) && is_word(next)) || prev == ',' || prev == ';'
            }
            _ => false,
        };
        if keep {
            label.push(' ');
        }
    }
    label
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}
