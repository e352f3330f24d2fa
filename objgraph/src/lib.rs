//! Cycle-safe walking, copying, redacting and hashing of object graphs.
//!
//! This crate gives every participating type a small reflection surface,
//! [`Object`], usually generated with `#[derive(Object)]`. Three consumers share
//! one traversal contract on top of it:
//!
//! - **Deep copy** ([`deep_copy`], [`deep_copy_with`]): rebuilds an isomorphic,
//!   fully independent graph. Shared `Rc`/`Arc` references, with or without a
//!   cell inside, stay shared in the copy and cycles stay cycles.
//! - **Redaction** ([`remove_secrets`], [`deep_copy_redacted`]): resets every
//!   field tagged `#[object(secret)]`, and everything beneath it, to its zero
//!   value.
//! - **Content hashing** ([`hash`], [`HashBuilder`]): folds a walk into a
//!   deterministic digest. Maps are canonicalized so insertion order never
//!   matters, and type identity is part of the digest. Stable digests name
//!   types by [`Object::stable_name`], which does not depend on the compiler.
//!
//! Key rules:
//! - Only `pub` fields are visited by default. [`Options::with_private_fields`]
//!   and [`HashBuilder::with_private_fields`] opt into private fields. The
//!   generated code lives next to the type, so no encapsulation is bypassed:
//!   opting in is a decision of the type's owner and the caller together.
//! - `#[object(skip)]` hides a field from the engine entirely. Skipped fields are
//!   cloned on copy and default-constructed when zeroed.
//! - Map keys and set elements are treated as values: they are hashed, copied
//!   without hooks, and never visited or redacted.
//! - Function pointers, channels and raw pointers are opaque. They are copied as
//!   is and cannot be hashed.
//!
//! What it does not do:
//! - serialize anything (digests are one-way)
//! - provide equality beyond what copy and hash imply

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
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use objgraph_derive::Object;

#[allow(unused_extern_crates)]
extern crate self as objgraph;

// Module declarations
mod context;
mod copy;
mod error;
mod hash;
mod impls;
mod kind;
mod object;
mod options;
mod redact;
#[cfg(feature = "slog")]
pub mod slog;
mod traverse;

// Re-exports
pub use context::{ProcContext, Segment};
pub use copy::{copy_fn, deep_copy, deep_copy_with, CopyFn, CopyHook, Copier};
pub use error::Error;
pub use hash::{hash, Hash, HashBuilder, HashFunction, HashSession, Mode, SecureHash};
pub use kind::{Field, Kind, Opaque, Scalar, Tag, Width, SECRET_TAG};
pub use object::{Object, ObjectExt};
pub use options::Options;
pub use redact::{
    deep_copy_redacted, deep_copy_redacted_with, remove_secrets, remove_secrets_with,
    SecretRedactor,
};
pub use traverse::{
    inspect, inspect_fn, inspect_with, traverse, traverse_with, visit_fn, Flow, Identity,
    InspectFn, Inspection, Inspector, Traverser, VisitFn, Visitor,
};
#[doc(hidden)]
pub use object::ErasedObject;

/// Hashes any number of values with a fresh stable [`HashBuilder`].
///
/// `hash!(a, b)` is shorthand for `hash(&[&a, &b])`.
#[macro_export]
macro_rules! hash {
    ($($value:expr),+ $(,)?) => {
        $crate::hash(&[$(&$value as &dyn $crate::Object),+])
    };
}
