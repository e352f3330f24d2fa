//! Values the engine never looks inside. They copy as is and cannot be
//! hashed.

use std::{
    ptr,
    sync::mpsc::{self, Sender, SyncSender},
};

use crate::{
    context::ProcContext,
    copy::Copier,
    error::Error,
    kind::{Kind, Opaque},
    object::Object,
};

macro_rules! impl_opaque {
    ($category:ident, $zero:expr) => {
        fn kind(&self) -> Kind {
            Kind::Opaque(Opaque::$category)
        }

        fn zeroed() -> Self {
            $zero
        }

        fn build_copy(
            &self,
            _copier: &mut Copier<'_>,
            _ctx: &ProcContext<'_>,
        ) -> Result<Self, Error> {
            Ok(self.clone())
        }
    };
}

impl<T: 'static> Object for *const T {
    impl_opaque!(RawPointer, ptr::null());
}

impl<T: 'static> Object for *mut T {
    impl_opaque!(RawPointer, ptr::null_mut());
}

/// Zero of a sender: its receiver is already gone, so every send fails.
impl<T: 'static> Object for Sender<T> {
    impl_opaque!(Channel, mpsc::channel().0);
}

impl<T: 'static> Object for SyncSender<T> {
    impl_opaque!(Channel, mpsc::sync_channel(0).0);
}

macro_rules! impl_fn {
    ($($zero:ident($($arg:ident),*);)*) => {$(
        fn $zero<$($arg,)* R: Default>($(_: $arg),*) -> R {
            R::default()
        }

        /// Zero is a function returning `R::default()`.
        impl<$($arg: 'static,)* R: Default + 'static> Object for fn($($arg),*) -> R {
            impl_opaque!(Function, {
                let zero: Self = $zero::<$($arg,)* R>;
                zero
            });
        }
    )*};
}

impl_fn! {
    zero_fn0();
    zero_fn1(A);
    zero_fn2(A, B);
    zero_fn3(A, B, C);
}
