//! Per-call configuration for walks and copies.

use std::fmt;

use crate::copy::CopyHook;

/// Options for [`crate::traverse_with`], [`crate::deep_copy_with`] and
/// [`crate::deep_copy_redacted_with`].
///
/// The defaults visit public fields only and install no hook.
///
/// ```
/// use objgraph::{deep_copy_with, Options};
///
/// let copy = deep_copy_with(&vec![1, 2, 3], Options::new().with_private_fields(true))?;
/// assert_eq!(copy, [1, 2, 3]);
/// # Ok::<(), objgraph::Error>(())
/// ```
#[derive(Default)]
pub struct Options<'h> {
    include_private: bool,
    hook: Option<&'h mut dyn CopyHook>,
}

impl<'h> Options<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also visit, copy and redact fields that are not declared `pub`.
    ///
    /// Without it, private fields of a copy are left at their zero value.
    #[must_use]
    pub fn with_private_fields(mut self, include: bool) -> Self {
        self.include_private = include;
        self
    }

    /// Installs a hook called for every node a copy produces. Ignored by
    /// traversal.
    #[must_use]
    pub fn with_hook(mut self, hook: &'h mut dyn CopyHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn includes_private_fields(&self) -> bool {
        self.include_private
    }

    pub(crate) fn into_parts(self) -> (bool, Option<&'h mut dyn CopyHook>) {
        (self.include_private, self.hook)
    }
}

impl fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("include_private", &self.include_private)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
