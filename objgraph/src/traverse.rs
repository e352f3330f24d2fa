//! Depth-first walks over object graphs.
//!
//! Two walkers share one contract:
//! - [`Traverser`] drives a [`Visitor`] over `&mut dyn Object` and lets it
//!   replace nodes in place.
//! - [`Inspection`] drives an [`Inspector`] over `&dyn Object`. Hashing is
//!   built on it.
//!
//! In both, the visitor sees a node before its children (pre-order) and decides
//! with [`Flow`] whether the walk goes inside. Shared references are entered at
//! most once per walk, keyed by [`Identity`], so cycles terminate. Fields that
//! are not `pub` are skipped unless private fields were opted into.

use std::{
    any::TypeId,
    collections::HashSet,
    fmt,
};

use tracing::trace;

use crate::{
    context::{ProcContext, Segment},
    error::Error,
    kind::Field,
    object::Object,
    options::Options,
};

/// What the walk does after a node was visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Walk into the node's children.
    #[default]
    Descend,
    /// Leave the children alone.
    Skip,
}

/// Called for every node of a mutable walk.
///
/// `field` is the descriptor of the record field the node sits in, if any.
/// The visitor may overwrite `node` (see [`Object::zero`](crate::Object) and
/// `replace` on `dyn Object`); the walk then continues into the new value.
/// It may also set a payload on `ctx`, which every descendant inherits.
pub trait Visitor {
    fn visit(
        &mut self,
        ctx: &mut ProcContext<'_>,
        node: &mut dyn Object,
        field: Option<&Field>,
    ) -> Result<Flow, Error>;
}

/// Called for every node of a read-only walk.
pub trait Inspector {
    fn inspect(
        &mut self,
        ctx: &mut ProcContext<'_>,
        node: &dyn Object,
        field: Option<&Field>,
    ) -> Result<Flow, Error>;
}

/// Adapts a closure into a [`Visitor`]. See [`visit_fn`].
pub struct VisitFn<F>(F);

/// Wraps `f` as a [`Visitor`].
///
/// ```
/// use objgraph::{traverse, visit_fn, Flow, Object};
///
/// let mut value = vec![1_u32, 2, 3];
/// let mut seen = 0;
/// traverse(&mut value, &mut visit_fn(|_ctx, _node: &mut dyn Object, _field| {
///     seen += 1;
///     Ok(Flow::Descend)
/// }))?;
/// assert_eq!(seen, 4);
/// # Ok::<(), objgraph::Error>(())
/// ```
pub fn visit_fn<F>(f: F) -> VisitFn<F>
where
    F: FnMut(&mut ProcContext<'_>, &mut dyn Object, Option<&Field>) -> Result<Flow, Error>,
{
    VisitFn(f)
}

impl<F> Visitor for VisitFn<F>
where
    F: FnMut(&mut ProcContext<'_>, &mut dyn Object, Option<&Field>) -> Result<Flow, Error>,
{
    fn visit(
        &mut self,
        ctx: &mut ProcContext<'_>,
        node: &mut dyn Object,
        field: Option<&Field>,
    ) -> Result<Flow, Error> {
        (self.0)(ctx, node, field)
    }
}

impl<F> fmt::Debug for VisitFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VisitFn")
    }
}

/// Adapts a closure into an [`Inspector`]. See [`inspect_fn`].
pub struct InspectFn<F>(F);

/// Wraps `f` as an [`Inspector`].
pub fn inspect_fn<F>(f: F) -> InspectFn<F>
where
    F: FnMut(&mut ProcContext<'_>, &dyn Object, Option<&Field>) -> Result<Flow, Error>,
{
    InspectFn(f)
}

impl<F> Inspector for InspectFn<F>
where
    F: FnMut(&mut ProcContext<'_>, &dyn Object, Option<&Field>) -> Result<Flow, Error>,
{
    fn inspect(
        &mut self,
        ctx: &mut ProcContext<'_>,
        node: &dyn Object,
        field: Option<&Field>,
    ) -> Result<Flow, Error> {
        (self.0)(ctx, node, field)
    }
}

impl<F> fmt::Debug for InspectFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InspectFn")
    }
}

/// Address plus type of a shared referent.
///
/// The type is part of the identity because a value and its first field can
/// live at the same address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    address: usize,
    type_id: TypeId,
}

impl Identity {
    pub fn of<T: ?Sized + 'static>(ptr: *const T) -> Self {
        Self {
            address: ptr.cast::<()>() as usize,
            type_id: TypeId::of::<T>(),
        }
    }

    pub fn address(&self) -> usize {
        self.address
    }
}

/// Reorders map entries before an [`Inspection`] walks them. Used by hashing
/// to make the walk independent of iteration order.
pub(crate) type EntryOrder = for<'a> fn(
    Vec<(&'a dyn Object, &'a dyn Object)>,
    bool,
) -> Result<Vec<(&'a dyn Object, &'a dyn Object)>, Error>;

/// Label used in paths for a map entry.
pub(crate) fn key_label(key: &dyn Object) -> String {
    key.scalar()
        .map_or_else(|| key.type_name().to_owned(), |scalar| scalar.to_string())
}

/// State of one mutable walk. Handed to [`Object::walk_mut`].
pub struct Traverser<'v> {
    visitor: &'v mut dyn Visitor,
    visited: HashSet<Identity>,
    include_private: bool,
}

impl<'v> Traverser<'v> {
    pub(crate) fn new(visitor: &'v mut dyn Visitor, include_private: bool) -> Self {
        Self {
            visitor,
            visited: HashSet::new(),
            include_private,
        }
    }

    /// Visits `child`, reached from the node of `ctx` through `segment`.
    pub fn descend(
        &mut self,
        child: &mut dyn Object,
        ctx: &ProcContext<'_>,
        segment: Segment<'_>,
    ) -> Result<(), Error> {
        let mut ctx = ctx.next(segment);
        self.visit(child, &mut ctx, None)
    }

    /// Visits a record field, unless it is private and private fields are
    /// excluded.
    pub fn field(
        &mut self,
        child: &mut dyn Object,
        ctx: &ProcContext<'_>,
        field: &Field,
    ) -> Result<(), Error> {
        if !field.is_public() && !self.include_private {
            return Ok(());
        }
        let mut ctx = ctx.next(Segment::Field(field.name()));
        self.visit(child, &mut ctx, Some(field))
    }

    /// Records a shared referent. Returns `false` if this walk already entered
    /// it, in which case the caller must not descend.
    pub fn enter(&mut self, identity: Identity) -> bool {
        let first = self.visited.insert(identity);
        if !first {
            trace!(address = identity.address, "referent already visited");
        }
        first
    }

    pub(crate) fn visit(
        &mut self,
        node: &mut dyn Object,
        ctx: &mut ProcContext<'_>,
        field: Option<&Field>,
    ) -> Result<(), Error> {
        let flow = self
            .visitor
            .visit(ctx, node, field)
            .map_err(|err| err.at(ctx.path()))?;
        match flow {
            Flow::Descend => node.walk_mut(self, ctx),
            Flow::Skip => Ok(()),
        }
    }
}

impl fmt::Debug for Traverser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traverser")
            .field("visited", &self.visited.len())
            .field("include_private", &self.include_private)
            .finish_non_exhaustive()
    }
}

/// State of one read-only walk. Handed to [`Object::walk`].
pub struct Inspection<'v> {
    inspector: &'v mut dyn Inspector,
    visited: HashSet<Identity>,
    include_private: bool,
    entry_order: Option<EntryOrder>,
}

impl<'v> Inspection<'v> {
    pub(crate) fn new(inspector: &'v mut dyn Inspector, include_private: bool) -> Self {
        Self {
            inspector,
            visited: HashSet::new(),
            include_private,
            entry_order: None,
        }
    }

    /// Walks map keys as well as values, in the order `order` returns.
    pub(crate) fn with_entry_order(mut self, order: EntryOrder) -> Self {
        self.entry_order = Some(order);
        self
    }

    /// Inspects `child`, reached from the node of `ctx` through `segment`.
    pub fn descend(
        &mut self,
        child: &dyn Object,
        ctx: &ProcContext<'_>,
        segment: Segment<'_>,
    ) -> Result<(), Error> {
        let mut ctx = ctx.next(segment);
        self.inspect(child, &mut ctx, None)
    }

    /// Inspects a record field, unless it is private and private fields are
    /// excluded.
    pub fn field(
        &mut self,
        child: &dyn Object,
        ctx: &ProcContext<'_>,
        field: &Field,
    ) -> Result<(), Error> {
        if !field.is_public() && !self.include_private {
            return Ok(());
        }
        let mut ctx = ctx.next(Segment::Field(field.name()));
        self.inspect(child, &mut ctx, Some(field))
    }

    /// Inspects the entries of a map.
    ///
    /// Values are inspected in the given order. Keys are only inspected when
    /// the walk canonicalizes maps, in which case each key precedes its value.
    pub fn entries(
        &mut self,
        entries: Vec<(&dyn Object, &dyn Object)>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        match self.entry_order {
            None => {
                for (key, value) in entries {
                    self.descend(value, ctx, Segment::Key(key_label(key)))?;
                }
            }
            Some(order) => {
                for (key, value) in order(entries, self.include_private)? {
                    let label = key_label(key);
                    self.descend(key, ctx, Segment::Key(label.clone()))?;
                    self.descend(value, ctx, Segment::Key(label))?;
                }
            }
        }
        Ok(())
    }

    /// Inspects the elements of a set. Like map keys, they are only inspected
    /// when the walk canonicalizes maps.
    pub fn keys(&mut self, keys: Vec<&dyn Object>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        let Some(order) = self.entry_order else {
            return Ok(());
        };
        let unit: &dyn Object = &();
        let entries = keys.into_iter().map(|key| (key, unit)).collect();
        for (key, _) in order(entries, self.include_private)? {
            self.descend(key, ctx, Segment::Key(key_label(key)))?;
        }
        Ok(())
    }

    /// Records a shared referent. Returns `false` if this walk already entered
    /// it, in which case the caller must not descend.
    pub fn enter(&mut self, identity: Identity) -> bool {
        let first = self.visited.insert(identity);
        if !first {
            trace!(address = identity.address, "referent already inspected");
        }
        first
    }

    pub(crate) fn inspect(
        &mut self,
        node: &dyn Object,
        ctx: &mut ProcContext<'_>,
        field: Option<&Field>,
    ) -> Result<(), Error> {
        let flow = self
            .inspector
            .inspect(ctx, node, field)
            .map_err(|err| err.at(ctx.path()))?;
        match flow {
            Flow::Descend => node.walk(self, ctx),
            Flow::Skip => Ok(()),
        }
    }
}

impl fmt::Debug for Inspection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspection")
            .field("visited", &self.visited.len())
            .field("include_private", &self.include_private)
            .field("canonical", &self.entry_order.is_some())
            .finish_non_exhaustive()
    }
}

/// Walks `value` depth-first, calling `visitor` on every node including the
/// root. Only public fields are visited.
///
/// Stops at the first visitor error and returns it with the node path
/// attached. Changes made before the error are kept.
pub fn traverse(value: &mut dyn Object, visitor: &mut dyn Visitor) -> Result<(), Error> {
    traverse_with(value, visitor, &Options::new())
}

/// [`traverse`] with options. Only [`Options::with_private_fields`] applies.
pub fn traverse_with(
    value: &mut dyn Object,
    visitor: &mut dyn Visitor,
    options: &Options<'_>,
) -> Result<(), Error> {
    let mut traverser = Traverser::new(visitor, options.includes_private_fields());
    traverser.visit(value, &mut ProcContext::root(), None)
}

/// Read-only twin of [`traverse`].
pub fn inspect(value: &dyn Object, inspector: &mut dyn Inspector) -> Result<(), Error> {
    inspect_with(value, inspector, &Options::new())
}

/// Read-only twin of [`traverse_with`].
pub fn inspect_with(
    value: &dyn Object,
    inspector: &mut dyn Inspector,
    options: &Options<'_>,
) -> Result<(), Error> {
    let mut inspection = Inspection::new(inspector, options.includes_private_fields());
    inspection.inspect(value, &mut ProcContext::root(), None)
}
