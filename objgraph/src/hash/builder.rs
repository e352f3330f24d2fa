//! The hash accumulator and the walk that feeds it.

use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash as _, Hasher as _},
};

use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

use super::{function::HashFunction, Hash, SecureHash};
use crate::{
    context::ProcContext,
    error::Error,
    kind::{Field, Kind, Scalar},
    object::Object,
    traverse::{Flow, Inspection, Inspector},
};

/// How types are identified in a digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// By [`Object::stable_name`], with little-endian scalars. Reproducible
    /// across runs, platforms and compiler versions for the same source.
    #[default]
    Stable,
    /// By in-process type identity, with native-endian scalars. Only
    /// comparable within one process.
    Unstable,
}

struct State<H> {
    digest: H,
}

impl<H: HashFunction> State<H> {
    /// Re-feeds the current output, then absorbs `bytes`.
    fn extend(&mut self, bytes: &[u8]) {
        let previous = self.digest.sum();
        self.digest.update(&previous);
        self.digest.update(bytes);
    }
}

/// Builds digests of object graphs. See the [module docs](super).
///
/// All operations lock an internal mutex, so one builder can be shared
/// between threads. Interleaved `write`s from different threads do mix into
/// one digest; hold a [`HashSession`] from [`HashBuilder::lock`] to make a
/// sequence of operations exclusive.
///
/// ```
/// use objgraph::HashBuilder;
///
/// let builder = HashBuilder::stable();
/// builder.write(&[&"answer", &42_u64])?;
/// let digest = builder.result();
/// assert_eq!(digest, builder.reset_and_hash(&[&"answer", &42_u64])?);
/// # Ok::<(), objgraph::Error>(())
/// ```
pub struct HashBuilder<H = SecureHash> {
    state: Mutex<State<H>>,
    mode: Mode,
    include_private: bool,
}

impl HashBuilder<SecureHash> {
    /// Stable builder over [`SecureHash`].
    pub fn stable() -> Self {
        Self::stable_with(SecureHash::default())
    }

    /// Unstable builder over [`SecureHash`].
    pub fn unstable() -> Self {
        Self::unstable_with(SecureHash::default())
    }
}

impl Default for HashBuilder<SecureHash> {
    fn default() -> Self {
        Self::stable()
    }
}

impl<H: HashFunction> HashBuilder<H> {
    pub fn stable_with(digest: H) -> Self {
        Self::with_mode(digest, Mode::Stable)
    }

    pub fn unstable_with(digest: H) -> Self {
        Self::with_mode(digest, Mode::Unstable)
    }

    pub fn with_mode(digest: H, mode: Mode) -> Self {
        Self {
            state: Mutex::new(State { digest }),
            mode,
            include_private: false,
        }
    }

    /// Also hash fields that are not declared `pub`.
    #[must_use]
    pub fn with_private_fields(mut self, include: bool) -> Self {
        self.include_private = include;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn includes_private_fields(&self) -> bool {
        self.include_private
    }

    /// Extends the digest with `values`, in order.
    ///
    /// On error the digest holds whatever was written before the failing node.
    pub fn write(&self, values: &[&dyn Object]) -> Result<(), Error> {
        self.lock().write(values)
    }

    /// The current digest. Does not change the state.
    pub fn result(&self) -> Hash {
        self.lock().result()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Resets, writes `values` and returns the digest, as one locked step.
    pub fn reset_and_hash(&self, values: &[&dyn Object]) -> Result<Hash, Error> {
        self.lock().reset_and_hash(values)
    }

    /// Takes the builder's lock until the session is dropped.
    pub fn lock(&self) -> HashSession<'_, H> {
        HashSession {
            state: self.state.lock(),
            mode: self.mode,
            include_private: self.include_private,
        }
    }
}

impl<H> fmt::Debug for HashBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashBuilder")
            .field("mode", &self.mode)
            .field("include_private", &self.include_private)
            .finish_non_exhaustive()
    }
}

/// Exclusive access to a [`HashBuilder`]. Other callers block until it is
/// dropped.
pub struct HashSession<'b, H> {
    state: MutexGuard<'b, State<H>>,
    mode: Mode,
    include_private: bool,
}

impl<H: HashFunction> HashSession<'_, H> {
    /// Extends the digest with `values`, in order. A failure is reported as
    /// [`Error::Argument`] naming the value that failed.
    pub fn write(&mut self, values: &[&dyn Object]) -> Result<(), Error> {
        for (index, value) in values.iter().enumerate() {
            self.write_value(*value).map_err(|source| Error::Argument {
                index,
                type_name: value.type_name(),
                source: Box::new(source),
            })?;
        }
        Ok(())
    }

    pub fn result(&self) -> Hash {
        Hash::from(self.state.digest.sum())
    }

    pub fn reset(&mut self) {
        trace!(mode = ?self.mode, "hash builder reset");
        self.state.digest.reset();
    }

    pub fn reset_and_hash(&mut self, values: &[&dyn Object]) -> Result<Hash, Error> {
        self.reset();
        self.write(values)?;
        Ok(self.result())
    }

    fn write_value(&mut self, value: &dyn Object) -> Result<(), Error> {
        let mut writer = Writer {
            state: &mut *self.state,
            mode: self.mode,
        };
        Inspection::new(&mut writer, self.include_private)
            .with_entry_order(canonical_order)
            .inspect(value, &mut ProcContext::root(), None)
    }
}

impl<H> fmt::Debug for HashSession<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashSession")
            .field("mode", &self.mode)
            .field("include_private", &self.include_private)
            .finish_non_exhaustive()
    }
}

/// Orders map entries by the stable digest of their keys.
fn canonical_order<'a>(
    entries: Vec<(&'a dyn Object, &'a dyn Object)>,
    include_private: bool,
) -> Result<Vec<(&'a dyn Object, &'a dyn Object)>, Error> {
    let keys = HashBuilder::stable().with_private_fields(include_private);
    let mut session = keys.lock();
    let mut keyed = entries
        .into_iter()
        .map(|(key, value)| {
            session.reset();
            session.write_value(key)?;
            Ok((session.result(), key, value))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    trace!(entries = keyed.len(), "map entries canonicalized");
    Ok(keyed.into_iter().map(|(_, key, value)| (key, value)).collect())
}

/// Writes one node per call: type tag, then the value encoding.
struct Writer<'s, H> {
    state: &'s mut State<H>,
    mode: Mode,
}

impl<H: HashFunction> Writer<'_, H> {
    fn write_type(&mut self, node: &dyn Object) {
        match self.mode {
            Mode::Stable => self.state.extend(node.stable_name().as_bytes()),
            Mode::Unstable => {
                let mut hasher = DefaultHasher::new();
                node.type_token().hash(&mut hasher);
                self.state.extend(&hasher.finish().to_ne_bytes());
            }
        }
    }

    fn write_len(&mut self, len: usize) {
        self.write_u64(len as u64);
    }

    fn write_u64(&mut self, value: u64) {
        match self.mode {
            Mode::Stable => self.state.extend(&value.to_le_bytes()),
            Mode::Unstable => self.state.extend(&value.to_ne_bytes()),
        }
    }

    fn write_scalar(&mut self, scalar: Scalar<'_>) {
        macro_rules! number {
            ($value:expr) => {
                match self.mode {
                    Mode::Stable => self.state.extend(&$value.to_le_bytes()),
                    Mode::Unstable => self.state.extend(&$value.to_ne_bytes()),
                }
            };
        }

        match scalar {
            Scalar::Bool(v) => number!(u8::from(v)),
            Scalar::I8(v) => number!(v),
            Scalar::I16(v) => number!(v),
            Scalar::I32(v) => number!(v),
            Scalar::I64(v) => number!(v),
            Scalar::I128(v) => number!(v),
            Scalar::Isize(v) => number!(v as i64),
            Scalar::U8(v) => number!(v),
            Scalar::U16(v) => number!(v),
            Scalar::U32(v) => number!(v),
            Scalar::U64(v) => number!(v),
            Scalar::U128(v) => number!(v),
            Scalar::Usize(v) => self.write_len(v),
            Scalar::F32(v) => number!(v),
            Scalar::F64(v) => number!(v),
            Scalar::Char(v) => number!(u32::from(v)),
            Scalar::Str(v) => self.state.extend(v.as_bytes()),
        }
    }
}

impl<H: HashFunction> Inspector for Writer<'_, H> {
    fn inspect(
        &mut self,
        ctx: &mut ProcContext<'_>,
        node: &dyn Object,
        _field: Option<&Field>,
    ) -> Result<Flow, Error> {
        self.write_type(node);
        match node.kind() {
            Kind::Array | Kind::Sequence | Kind::Map => {
                self.write_len(node.element_count().unwrap_or_default());
                Ok(Flow::Descend)
            }
            Kind::Record | Kind::Reference => Ok(Flow::Descend),
            Kind::Any => {
                if let Some(variant) = node.variant() {
                    self.state.extend(variant.as_bytes());
                }
                Ok(Flow::Descend)
            }
            kind @ Kind::Opaque(_) => Err(Error::UnsupportedCategory {
                kind,
                type_name: node.type_name(),
                path: ctx.path().to_owned(),
            }),
            _ => {
                if let Some(scalar) = node.scalar() {
                    self.write_scalar(scalar);
                }
                Ok(Flow::Skip)
            }
        }
    }
}
