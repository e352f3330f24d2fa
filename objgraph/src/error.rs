//! Errors raised while walking, copying or hashing a graph.
//!
//! Nothing here is retried. Cycles and shared references are not errors; they
//! terminate recursion silently.

use std::error::Error as StdError;

use crate::kind::Kind;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The graph contains a function, channel or raw pointer where hashing
    /// needs a deterministic value.
    #[error("cannot hash {kind} value of type `{type_name}` at `{path}`")]
    UnsupportedCategory {
        kind: Kind,
        type_name: &'static str,
        path: String,
    },
    /// A caller-supplied visitor or hook failed. The walk stops here and
    /// mutations already applied stay applied.
    #[error("visitor failed at `{path}`: {source}")]
    Visitor { path: String, source: BoxError },
    /// A hook tried to put a value of the wrong type into a node. This is a
    /// misuse of the hook contract, not a property of the data.
    #[error("cannot replace `{expected}` with `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A `RefCell` in the graph is borrowed elsewhere in a way that conflicts
    /// with the walk.
    #[error("`{type_name}` at `{path}` is already borrowed")]
    Borrowed {
        type_name: &'static str,
        path: String,
    },
    /// A mutable walk reached an `Rc<T>` or `Arc<T>` that has other holders.
    /// Only uniquely held referents can be mutated in place; share
    /// `Rc<RefCell<T>>` or `Arc<Mutex<T>>` instead.
    #[error("`{type_name}` at `{path}` is shared and cannot be mutated in place")]
    Shared {
        type_name: &'static str,
        path: String,
    },
    /// Wraps the failure of one argument of a multi-value hash.
    #[error("argument #{index} of type `{type_name}`: {source}")]
    Argument {
        index: usize,
        type_name: &'static str,
        source: Box<Error>,
    },
}

impl Error {
    /// Builds a caller error for [`crate::Visitor`] or [`crate::CopyHook`]
    /// implementations. The engine fills in the node path.
    pub fn visitor(source: impl Into<BoxError>) -> Self {
        Self::Visitor {
            path: String::new(),
            source: source.into(),
        }
    }

    /// The node path the error was raised at, when it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::UnsupportedCategory { path, .. }
            | Self::Visitor { path, .. }
            | Self::Borrowed { path, .. }
            | Self::Shared { path, .. } => Some(path),
            Self::Argument { source, .. } => source.path(),
            Self::TypeMismatch { .. } => None,
        }
    }

    /// Attaches `path` to a caller error that does not carry one yet.
    pub(crate) fn at(self, path: &str) -> Self {
        match self {
            Self::Visitor { path: existing, source } if existing.is_empty() => Self::Visitor {
                path: path.to_owned(),
                source,
            },
            other => other,
        }
    }
}
