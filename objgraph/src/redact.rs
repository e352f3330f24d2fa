//! Secret redaction, in place and as a copy.
//!
//! A field is secret when it carries the `secret` tag (`#[object(secret)]`).
//! Redaction resets it to its zero value without looking inside, and marks the
//! context so anything below a secret is treated as secret too.

use std::any::type_name;

use crate::{
    context::ProcContext,
    copy::{deep_copy_with, CopyHook},
    error::Error,
    kind::Field,
    object::Object,
    options::Options,
    traverse::{traverse_with, Flow, Visitor},
};

/// Context payload set on a secret node and inherited by its descendants.
struct InsideSecret;

/// The redaction policy, usable as a [`Visitor`] (zeroes in place) and as a
/// [`CopyHook`] (skips secrets, leaving zero values in the copy).
///
/// Zeroing a shared reference re-points it at a fresh zeroed referent; other
/// holders of the old referent still see the original data.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecretRedactor;

impl SecretRedactor {
    fn mark(ctx: &mut ProcContext<'_>, field: Option<&Field>) -> bool {
        let secret =
            field.is_some_and(Field::is_secret) || ctx.payload::<InsideSecret>().is_some();
        if secret {
            ctx.set_payload(InsideSecret);
        }
        secret
    }
}

impl Visitor for SecretRedactor {
    fn visit(
        &mut self,
        ctx: &mut ProcContext<'_>,
        node: &mut dyn Object,
        field: Option<&Field>,
    ) -> Result<Flow, Error> {
        if !Self::mark(ctx, field) {
            return Ok(Flow::Descend);
        }
        node.zero();
        Ok(Flow::Skip)
    }
}

impl CopyHook for SecretRedactor {
    fn before(
        &mut self,
        ctx: &mut ProcContext<'_>,
        _source: &dyn Object,
        field: Option<&Field>,
    ) -> Result<Flow, Error> {
        Ok(if Self::mark(ctx, field) {
            Flow::Skip
        } else {
            Flow::Descend
        })
    }
}

/// Runs the redactor ahead of a caller hook.
struct Redacting<'h> {
    redactor: SecretRedactor,
    then: Option<&'h mut dyn CopyHook>,
}

impl CopyHook for Redacting<'_> {
    fn before(
        &mut self,
        ctx: &mut ProcContext<'_>,
        source: &dyn Object,
        field: Option<&Field>,
    ) -> Result<Flow, Error> {
        if self.redactor.before(ctx, source, field)? == Flow::Skip {
            return Ok(Flow::Skip);
        }
        match self.then.as_deref_mut() {
            Some(hook) => hook.before(ctx, source, field),
            None => Ok(Flow::Descend),
        }
    }

    fn after(
        &mut self,
        ctx: &mut ProcContext<'_>,
        copy: &mut dyn Object,
        field: Option<&Field>,
    ) -> Result<(), Error> {
        match self.then.as_deref_mut() {
            Some(hook) => hook.after(ctx, copy, field),
            None => Ok(()),
        }
    }
}

/// Zeroes every secret field of `value` in place, along with everything
/// beneath it. Only public fields are considered.
///
/// Fails if a `RefCell` in `value` is already borrowed, or if an immutable
/// `Rc`/`Arc` in `value` has other holders. Fields redacted before that
/// point stay redacted.
pub fn remove_secrets<T: Object>(value: &mut T) -> Result<(), Error> {
    remove_secrets_with(value, &Options::new())
}

/// [`remove_secrets`] with options. Only [`Options::with_private_fields`]
/// applies.
pub fn remove_secrets_with<T: Object>(value: &mut T, options: &Options<'_>) -> Result<(), Error> {
    traverse_with(value, &mut SecretRedactor, options)
}

/// Returns a deep copy of `value` with every secret field at its zero value.
///
/// # Panics
///
/// Panics if a `RefCell` inside `value` is mutably borrowed while copying.
/// Use [`deep_copy_redacted_with`] to get the error instead.
pub fn deep_copy_redacted<T: Object>(value: &T) -> T {
    match deep_copy_redacted_with(value, Options::new()) {
        Ok(copy) => copy,
        Err(err) => panic!("redacted copy of `{}` failed: {err}", type_name::<T>()),
    }
}

/// [`deep_copy_redacted`] with options. A caller hook runs after the
/// redaction policy and never sees secret nodes.
pub fn deep_copy_redacted_with<T: Object>(value: &T, options: Options<'_>) -> Result<T, Error> {
    let (include_private, then) = options.into_parts();
    let mut redacting = Redacting {
        redactor: SecretRedactor,
        then,
    };
    deep_copy_with(
        value,
        Options::new()
            .with_private_fields(include_private)
            .with_hook(&mut redacting),
    )
}
