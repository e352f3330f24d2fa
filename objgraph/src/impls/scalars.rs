use std::{borrow::Cow, marker::PhantomData};

use crate::{
    context::ProcContext,
    copy::Copier,
    error::Error,
    kind::{Kind, Scalar},
    object::Object,
};

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Object for $ty {
            fn kind(&self) -> Kind {
                Scalar::$variant(*self).kind()
            }

            fn stable_name() -> Cow<'static, str> {
                Cow::Borrowed(stringify!($ty))
            }

            fn scalar(&self) -> Option<Scalar<'_>> {
                Some(Scalar::$variant(*self))
            }

            fn zeroed() -> Self {
                Self::default()
            }

            fn build_copy(
                &self,
                _copier: &mut Copier<'_>,
                _ctx: &ProcContext<'_>,
            ) -> Result<Self, Error> {
                Ok(*self)
            }
        }
    )*};
}

impl_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    char => Char,
}

impl Object for String {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn stable_name() -> Cow<'static, str> {
        Cow::Borrowed("String")
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Str(self))
    }

    fn zeroed() -> Self {
        Self::new()
    }

    fn build_copy(&self, _copier: &mut Copier<'_>, _ctx: &ProcContext<'_>) -> Result<Self, Error> {
        Ok(self.clone())
    }
}

impl Object for &'static str {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn stable_name() -> Cow<'static, str> {
        Cow::Borrowed("&str")
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Str(self))
    }

    fn zeroed() -> Self {
        ""
    }

    fn build_copy(&self, _copier: &mut Copier<'_>, _ctx: &ProcContext<'_>) -> Result<Self, Error> {
        Ok(*self)
    }
}

impl Object for Cow<'static, str> {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn stable_name() -> Cow<'static, str> {
        Cow::Borrowed("Cow<str>")
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Str(self))
    }

    fn zeroed() -> Self {
        Cow::Borrowed("")
    }

    fn build_copy(&self, _copier: &mut Copier<'_>, _ctx: &ProcContext<'_>) -> Result<Self, Error> {
        Ok(self.clone())
    }
}

impl Object for () {
    fn kind(&self) -> Kind {
        Kind::Record
    }

    fn stable_name() -> Cow<'static, str> {
        Cow::Borrowed("()")
    }

    fn zeroed() -> Self {}

    fn build_copy(&self, _copier: &mut Copier<'_>, _ctx: &ProcContext<'_>) -> Result<Self, Error> {
        Ok(())
    }
}

impl<T: ?Sized + 'static> Object for PhantomData<T> {
    fn kind(&self) -> Kind {
        Kind::Record
    }

    fn stable_name() -> Cow<'static, str> {
        Cow::Borrowed("PhantomData")
    }

    fn zeroed() -> Self {
        PhantomData
    }

    fn build_copy(&self, _copier: &mut Copier<'_>, _ctx: &ProcContext<'_>) -> Result<Self, Error> {
        Ok(PhantomData)
    }
}
