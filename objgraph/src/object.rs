//! The reflection surface every node of a graph implements.
//!
//! [`Object`] is what `#[derive(Object)]` generates. The engine only ever talks
//! to nodes through it, usually as `&dyn Object` or `&mut dyn Object`:
//!
//! | Method | Used by |
//! |--------|---------|
//! | `kind`, `scalar`, `element_count`, `entries`, `variant` | hashing |
//! | `fields` | callers inspecting records |
//! | `walk` / `walk_mut` | read-only and mutable traversal |
//! | `zeroed` / `zero` | redaction, skipped copies, private fields |
//! | `build_copy` | deep copy |
//!
//! [`ErasedObject`] carries the parts that need `Self: Sized` to implement but
//! must still be callable on trait objects. It is blanket-implemented and never
//! implemented by hand.

use std::{
    any::{type_name, Any, TypeId},
    borrow::Cow,
};

use crate::{
    context::ProcContext,
    copy::{deep_copy, Copier},
    error::Error,
    hash::{hash, Hash},
    kind::{Field, Kind, Scalar},
    redact::{deep_copy_redacted, remove_secrets},
    traverse::{Inspection, Traverser},
};

/// A value the engine can classify, walk, copy, zero and hash.
///
/// Implement it with `#[derive(Object)]`. Implementations for std scalars,
/// strings, tuples, collections, `Option`/`Result`, `Box`, `Rc`, `Arc`,
/// `Rc<RefCell<_>>`, `Arc<Mutex<_>>`, `Arc<RwLock<_>>` and a few opaque types
/// are provided.
///
/// ## Contract for implementors
///
/// - `walk`/`walk_mut` hand each child to the walker exactly once, through
///   [`Inspection::field`]/[`Traverser::field`] for record fields (so private
///   fields can be filtered) and `descend` for everything else.
/// - Shared references must call `enter` with their [`crate::Identity`] before
///   descending and stop when it returns `false`.
/// - `build_copy` must never share mutable storage with `self`, except for
///   opaque handles.
pub trait Object: ErasedObject + 'static {
    /// The node's category.
    fn kind(&self) -> Kind;

    /// Compiler-provided type name, for diagnostics.
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Type name written by stable hashing.
    ///
    /// Unlike [`Object::type_name`] it must not change between compiler
    /// versions. Derived types use their module path and identifier, std types
    /// a fixed spelling such as `Vec<u8>`. The default falls back to
    /// [`std::any::type_name`], which is only good for values that are never
    /// hashed.
    fn stable_name() -> Cow<'static, str>
    where
        Self: Sized,
    {
        Cow::Borrowed(type_name::<Self>())
    }

    /// In-process type identity, used by unstable hashing.
    fn type_token(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// The leaf value, for scalar kinds.
    fn scalar(&self) -> Option<Scalar<'_>> {
        None
    }

    /// Number of elements, for arrays, sequences and maps.
    fn element_count(&self) -> Option<usize> {
        None
    }

    /// Key/value pairs, for maps. Order is unspecified.
    fn entries(&self) -> Vec<(&dyn Object, &dyn Object)> {
        Vec::new()
    }

    /// Name of the active case, for sum types.
    fn variant(&self) -> Option<&'static str> {
        None
    }

    /// Field descriptors, for records (and the active case of derived enums).
    fn fields(&self) -> &'static [Field] {
        &[]
    }

    /// Hands every child to `inspection`.
    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        let _ = (inspection, ctx);
        Ok(())
    }

    /// Hands every child to `traverser` for in-place visiting.
    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        let _ = (traverser, ctx);
        Ok(())
    }

    /// The zero value of the type.
    fn zeroed() -> Self
    where
        Self: Sized;

    /// Builds an independent copy, copying children through `copier`.
    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error>
    where
        Self: Sized;
}

/// Object-safe helpers derived from [`Object`] for every sized implementor.
#[doc(hidden)]
pub trait ErasedObject {
    fn erased_as_any(&self) -> &dyn Any;
    fn erased_as_any_mut(&mut self) -> &mut dyn Any;
    fn erased_zero(&mut self);
    fn erased_stable_name(&self) -> Cow<'static, str>;
    fn erased_zeroed(&self) -> Box<dyn Object>;
    fn erased_copy(
        &self,
        copier: &mut Copier<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<Box<dyn Object>, Error>;
}

impl<T: Object> ErasedObject for T {
    fn erased_as_any(&self) -> &dyn Any {
        self
    }

    fn erased_as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn erased_zero(&mut self) {
        *self = T::zeroed();
    }

    fn erased_stable_name(&self) -> Cow<'static, str> {
        T::stable_name()
    }

    fn erased_zeroed(&self) -> Box<dyn Object> {
        Box::new(T::zeroed())
    }

    fn erased_copy(
        &self,
        copier: &mut Copier<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<Box<dyn Object>, Error> {
        Ok(Box::new(self.build_copy(copier, ctx)?))
    }
}

impl dyn Object {
    pub fn as_any(&self) -> &dyn Any {
        self.erased_as_any()
    }

    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        self.erased_as_any_mut()
    }

    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// See [`Object::stable_name`].
    pub fn stable_name(&self) -> Cow<'static, str> {
        self.erased_stable_name()
    }

    /// Resets the node to its type's zero value.
    ///
    /// Shared references are re-pointed at a fresh zeroed referent; the old
    /// referent is left untouched.
    pub fn zero(&mut self) {
        self.erased_zero();
    }

    /// Replaces the node with `value`.
    ///
    /// Fails with [`Error::TypeMismatch`] when `T` is not the node's type.
    pub fn replace<T: Object>(&mut self, value: T) -> Result<(), Error> {
        let expected = self.type_name();
        match self.downcast_mut::<T>() {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::TypeMismatch {
                expected,
                found: type_name::<T>(),
            }),
        }
    }
}

/// Convenience entrypoints on every sized [`Object`].
///
/// Blanket-implemented; bring it into scope to call `value.deep_copy()` and
/// friends instead of the free functions.
pub trait ObjectExt: Object + Sized {
    /// See [`crate::deep_copy`].
    #[must_use]
    fn deep_copy(&self) -> Self {
        deep_copy(self)
    }

    /// See [`crate::deep_copy_redacted`].
    #[must_use]
    fn redacted(&self) -> Self {
        deep_copy_redacted(self)
    }

    /// See [`crate::remove_secrets`].
    fn remove_secrets(&mut self) -> Result<(), Error> {
        remove_secrets(self)
    }

    /// Stable content hash of this value alone. See [`crate::hash`].
    fn content_hash(&self) -> Result<Hash, Error> {
        let value: &dyn Object = self;
        hash(&[value])
    }
}

impl<T> ObjectExt for T where T: Object {}
