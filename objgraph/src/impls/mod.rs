//! [`Object`] implementations for std types.
//!
//! | Types | Kind |
//! |-------|------|
//! | integers, floats, `bool`, `char` | scalar |
//! | `String`, `&'static str`, `Cow<'static, str>` | `String` |
//! | `()`, `PhantomData<T>` | `Record` without fields |
//! | tuples of 1 to 12 elements | `Record` with fields `0`, `1`, ... |
//! | `[T; N]` | `Array` |
//! | `Vec<T>`, `VecDeque<T>` | `Sequence` |
//! | `HashMap`, `BTreeMap`, `HashSet`, `BTreeSet` | `Map` |
//! | `Option<T>`, `Result<T, E>`, `Box<dyn Object>` | `Any` |
//! | `Box<T>`, `Rc<T>`, `Arc<T>` | `Reference` |
//! | `Rc<RefCell<T>>`, `Arc<Mutex<T>>`, `Arc<RwLock<T>>` | `Reference` |
//! | `fn` pointers, `mpsc` senders, raw pointers | `Opaque` |

mod collections;
mod opaque;
mod references;
mod scalars;
mod tuples;

use std::borrow::Cow;

use crate::object::Object;

fn erased<T: Object>(value: &T) -> &dyn Object {
    value
}

/// Stable name of a generic std type, such as `HashMap<String, u8>`.
fn generic_name(base: &str, params: &[Cow<'static, str>]) -> Cow<'static, str> {
    Cow::Owned(format!("{base}<{}>", params.join(", ")))
}
