//! Tuples are records with public fields named by position.

use std::borrow::Cow;

use crate::{
    context::ProcContext,
    copy::Copier,
    error::Error,
    kind::{Field, Kind},
    object::Object,
    traverse::{Inspection, Traverser},
};

/// Element types are generic, so descriptors carry `_` as their type.
static FIELDS: [Field; 12] = [
    Field::new("0", "_", true, &[]),
    Field::new("1", "_", true, &[]),
    Field::new("2", "_", true, &[]),
    Field::new("3", "_", true, &[]),
    Field::new("4", "_", true, &[]),
    Field::new("5", "_", true, &[]),
    Field::new("6", "_", true, &[]),
    Field::new("7", "_", true, &[]),
    Field::new("8", "_", true, &[]),
    Field::new("9", "_", true, &[]),
    Field::new("10", "_", true, &[]),
    Field::new("11", "_", true, &[]),
];

fn tuple_name(elements: &[Cow<'static, str>]) -> Cow<'static, str> {
    Cow::Owned(match elements {
        [single] => format!("({single},)"),
        _ => format!("({})", elements.join(", ")),
    })
}

macro_rules! impl_tuple {
    ($($len:literal => ($($index:tt $ty:ident),+);)*) => {$(
        impl<$($ty: Object),+> Object for ($($ty,)+) {
            fn kind(&self) -> Kind {
                Kind::Record
            }

            fn stable_name() -> Cow<'static, str> {
                tuple_name(&[$($ty::stable_name()),+])
            }

            fn fields(&self) -> &'static [Field] {
                &FIELDS[..$len]
            }

            fn walk(
                &self,
                inspection: &mut Inspection<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<(), Error> {
                $(inspection.field(&self.$index, ctx, &FIELDS[$index])?;)+
                Ok(())
            }

            fn walk_mut(
                &mut self,
                traverser: &mut Traverser<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<(), Error> {
                $(traverser.field(&mut self.$index, ctx, &FIELDS[$index])?;)+
                Ok(())
            }

            fn zeroed() -> Self {
                ($($ty::zeroed(),)+)
            }

            fn build_copy(
                &self,
                copier: &mut Copier<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<Self, Error> {
                Ok(($(copier.field(&self.$index, ctx, &FIELDS[$index])?,)+))
            }
        }
    )*};
}

impl_tuple! {
    1 => (0 A);
    2 => (0 A, 1 B);
    3 => (0 A, 1 B, 2 C);
    4 => (0 A, 1 B, 2 C, 3 D);
    5 => (0 A, 1 B, 2 C, 3 D, 4 E);
    6 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
    7 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
    8 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
    9 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I);
    10 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J);
    11 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K);
    12 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K, 11 L);
}
