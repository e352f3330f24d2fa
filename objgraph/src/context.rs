//! Per-node context threaded through a walk.

use std::{any::Any, fmt, rc::Rc};

/// One step from a node to one of its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Record field, by name.
    Field(&'a str),
    /// Array or sequence element.
    Index(usize),
    /// Map value, labelled by its key.
    Key(String),
    /// Content of a sum type.
    Content,
    /// Referent of a reference.
    Deref,
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Key(key) => write!(f, "[{key}]"),
            Self::Content => f.write_str("{}"),
            Self::Deref => f.write_str("*"),
        }
    }
}

/// Context handed to visitors and hooks for every node.
///
/// A context is created fresh at the root of each call and extended, never
/// mutated, on the way down: [`ProcContext::next`] derives the child context
/// with a longer path, one more level of depth and a copy of the payload.
///
/// The payload is caller-defined. A visitor may replace it on its own node's
/// context and every descendant inherits the new value, while siblings keep
/// theirs.
#[derive(Clone, Default)]
pub struct ProcContext<'a> {
    parent: Option<&'a ProcContext<'a>>,
    path: String,
    depth: usize,
    payload: Option<Rc<dyn Any>>,
}

impl ProcContext<'static> {
    /// Context for the root node: empty path, depth zero, no payload.
    pub fn root() -> Self {
        Self::default()
    }
}

impl<'a> ProcContext<'a> {
    pub fn parent(&self) -> Option<&'a ProcContext<'a>> {
        self.parent
    }

    /// Dot-delimited path from the root, e.g. `.items.[2].*.name`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Derives the context of a child reached through `segment`.
    pub fn next(&self, segment: Segment<'_>) -> ProcContext<'_> {
        ProcContext {
            parent: Some(self),
            path: format!("{}.{segment}", self.path),
            depth: self.depth + 1,
            payload: self.payload.clone(),
        }
    }

    /// Returns the payload if it is a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref()
    }

    pub fn set_payload<T: Any>(&mut self, payload: T) {
        self.payload = Some(Rc::new(payload));
    }

    pub fn clear_payload(&mut self) {
        self.payload = None;
    }
}

impl fmt::Debug for ProcContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcContext")
            .field("path", &self.path)
            .field("depth", &self.depth)
            .field("has_payload", &self.payload.is_some())
            .finish_non_exhaustive()
    }
}
