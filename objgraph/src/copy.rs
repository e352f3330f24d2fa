//! Deep copy: rebuilding an object graph as a fully independent one.
//!
//! Every node is rebuilt through [`Object::build_copy`], which copies its
//! children back through the [`Copier`]. Shared references are looked up in a
//! per-call identity map first, so aliasing survives the copy and cycles copy
//! to cycles instead of recursing forever.
//!
//! A [`CopyHook`] can observe and rewrite the copy. `before` runs on the source
//! node ahead of copying and can skip it entirely (the copy then holds the zero
//! value). `after` runs on the finished copy of a node, children included.

use std::{any::type_name, collections::HashMap, fmt};

use tracing::debug;

use crate::{
    context::{ProcContext, Segment},
    error::Error,
    kind::Field,
    object::Object,
    options::Options,
    traverse::{key_label, Flow, Identity},
};

/// Per-node callbacks of a deep copy.
///
/// Both methods default to doing nothing. Errors abort the copy and are
/// returned with the node path attached.
pub trait CopyHook {
    /// Called with the source node before it is copied. Returning
    /// [`Flow::Skip`] makes the copy hold the zero value instead, and neither
    /// the node's children nor `after` are visited.
    fn before(
        &mut self,
        ctx: &mut ProcContext<'_>,
        source: &dyn Object,
        field: Option<&Field>,
    ) -> Result<Flow, Error> {
        let _ = (ctx, source, field);
        Ok(Flow::Descend)
    }

    /// Called with the finished copy of a node. The hook may rewrite it in
    /// place, e.g. through `replace` on `dyn Object`.
    fn after(
        &mut self,
        ctx: &mut ProcContext<'_>,
        copy: &mut dyn Object,
        field: Option<&Field>,
    ) -> Result<(), Error> {
        let _ = (ctx, copy, field);
        Ok(())
    }
}

/// Adapts a closure into a post-order [`CopyHook`]. See [`copy_fn`].
pub struct CopyFn<F>(F);

/// Wraps `f` as a [`CopyHook`] that runs after each node is copied.
///
/// ```
/// use objgraph::{copy_fn, deep_copy_with, Options};
///
/// let mut double = copy_fn(|_ctx, copy, _field| {
///     if let Some(n) = copy.downcast_mut::<u32>() {
///         *n *= 2;
///     }
///     Ok(())
/// });
/// let copy = deep_copy_with(&vec![1_u32, 2], Options::new().with_hook(&mut double))?;
/// assert_eq!(copy, [2, 4]);
/// # Ok::<(), objgraph::Error>(())
/// ```
pub fn copy_fn<F>(f: F) -> CopyFn<F>
where
    F: FnMut(&mut ProcContext<'_>, &mut dyn Object, Option<&Field>) -> Result<(), Error>,
{
    CopyFn(f)
}

impl<F> CopyHook for CopyFn<F>
where
    F: FnMut(&mut ProcContext<'_>, &mut dyn Object, Option<&Field>) -> Result<(), Error>,
{
    fn after(
        &mut self,
        ctx: &mut ProcContext<'_>,
        copy: &mut dyn Object,
        field: Option<&Field>,
    ) -> Result<(), Error> {
        (self.0)(ctx, copy, field)
    }
}

impl<F> fmt::Debug for CopyFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CopyFn")
    }
}

/// State of one deep copy. Handed to [`Object::build_copy`].
pub struct Copier<'h> {
    hook: Option<&'h mut dyn CopyHook>,
    copies: HashMap<Identity, Box<dyn Object>>,
    include_private: bool,
    suppressed: usize,
}

impl<'h> Copier<'h> {
    pub(crate) fn new(hook: Option<&'h mut dyn CopyHook>, include_private: bool) -> Self {
        Self {
            hook,
            copies: HashMap::new(),
            include_private,
            suppressed: 0,
        }
    }

    pub(crate) fn copy_root<T: Object>(&mut self, source: &T) -> Result<T, Error> {
        self.copy_node(source, &mut ProcContext::root(), None)
    }

    /// Copies `source`, reached from the node of `ctx` through `segment`.
    pub fn descend<T: Object>(
        &mut self,
        source: &T,
        ctx: &ProcContext<'_>,
        segment: Segment<'_>,
    ) -> Result<T, Error> {
        self.copy_node(source, &mut ctx.next(segment), None)
    }

    /// Copies a record field. Private fields are left at their zero value
    /// unless private fields were opted into.
    pub fn field<T: Object>(
        &mut self,
        source: &T,
        ctx: &ProcContext<'_>,
        field: &Field,
    ) -> Result<T, Error> {
        if !field.is_public() && !self.include_private {
            return Ok(T::zeroed());
        }
        self.copy_node(source, &mut ctx.next(Segment::Field(field.name())), Some(field))
    }

    /// Copies a map key or set element. Hooks do not see keys.
    pub fn key<K: Object>(&mut self, key: &K, ctx: &ProcContext<'_>) -> Result<K, Error> {
        self.suppressed += 1;
        let copy = self.descend(key, ctx, Segment::Key(key_label(key)));
        self.suppressed -= 1;
        copy
    }

    /// Copies a type-erased node, such as the content of `Box<dyn Object>`.
    pub fn descend_dyn(
        &mut self,
        source: &dyn Object,
        ctx: &ProcContext<'_>,
        segment: Segment<'_>,
    ) -> Result<Box<dyn Object>, Error> {
        let mut ctx = ctx.next(segment);
        if let Some(hook) = self.active_hook() {
            let flow = hook
                .before(&mut ctx, source, None)
                .map_err(|err| err.at(ctx.path()))?;
            if flow == Flow::Skip {
                return Ok(source.erased_zeroed());
            }
        }
        let mut copy = source.erased_copy(self, &ctx)?;
        if let Some(hook) = self.active_hook() {
            hook.after(&mut ctx, &mut *copy, None)
                .map_err(|err| err.at(ctx.path()))?;
        }
        Ok(copy)
    }

    /// Returns the copy already built for the referent `identity`, if any.
    ///
    /// Fails if that copy is not an `R`, which means two reference types
    /// claimed the same identity.
    pub fn lookup<R: Object + Clone>(&self, identity: Identity) -> Result<Option<R>, Error> {
        let Some(copy) = self.copies.get(&identity) else {
            return Ok(None);
        };
        let copy: &dyn Object = &**copy;
        match copy.downcast_ref::<R>() {
            Some(copy) => Ok(Some(copy.clone())),
            None => Err(Error::TypeMismatch {
                expected: type_name::<R>(),
                found: copy.type_name(),
            }),
        }
    }

    /// Records `copy` as the copy of the referent `identity`. Mutable cells
    /// call it before descending into the referent so cycles find it.
    pub fn remember<R: Object + Clone>(&mut self, identity: Identity, copy: &R) {
        self.copies.insert(identity, Box::new(copy.clone()));
    }

    fn active_hook(&mut self) -> Option<&mut (dyn CopyHook + 'h)> {
        if self.suppressed > 0 {
            return None;
        }
        self.hook.as_deref_mut()
    }

    fn copy_node<T: Object>(
        &mut self,
        source: &T,
        ctx: &mut ProcContext<'_>,
        field: Option<&Field>,
    ) -> Result<T, Error> {
        if let Some(hook) = self.active_hook() {
            let flow = hook
                .before(ctx, source, field)
                .map_err(|err| err.at(ctx.path()))?;
            if flow == Flow::Skip {
                return Ok(T::zeroed());
            }
        }
        let mut copy = source.build_copy(self, ctx)?;
        if let Some(hook) = self.active_hook() {
            hook.after(ctx, &mut copy, field)
                .map_err(|err| err.at(ctx.path()))?;
        }
        Ok(copy)
    }
}

impl fmt::Debug for Copier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Copier")
            .field("hook", &self.hook.is_some())
            .field("copies", &self.copies.len())
            .field("include_private", &self.include_private)
            .finish_non_exhaustive()
    }
}

/// Returns a deep copy of `value` that shares no mutable storage with it.
///
/// Private fields are left at their zero value. Shared references stay shared
/// within the copy, and cycles are reproduced.
///
/// # Panics
///
/// Panics if a `RefCell` inside `value` is mutably borrowed while copying.
/// Use [`deep_copy_with`] to get the error instead.
pub fn deep_copy<T: Object>(value: &T) -> T {
    match deep_copy_with(value, Options::new()) {
        Ok(copy) => copy,
        Err(err) => panic!("deep copy of `{}` failed: {err}", type_name::<T>()),
    }
}

/// [`deep_copy`] with options: private fields and a [`CopyHook`].
pub fn deep_copy_with<T: Object>(value: &T, options: Options<'_>) -> Result<T, Error> {
    let (include_private, hook) = options.into_parts();
    let mut copier = Copier::new(hook, include_private);
    let copy = copier.copy_root(value)?;
    debug!(
        type_name = type_name::<T>(),
        shared = copier.copies.len(),
        "deep copy finished"
    );
    Ok(copy)
}
