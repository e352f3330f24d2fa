use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    hash::{BuildHasher, Hash},
};

use super::{erased, generic_name};
use crate::{
    context::{ProcContext, Segment},
    copy::Copier,
    error::Error,
    kind::Kind,
    object::Object,
    traverse::{key_label, Inspection, Traverser},
};

impl<T: Object, const N: usize> Object for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Array
    }

    fn stable_name() -> Cow<'static, str> {
        Cow::Owned(format!("[{}; {}]", T::stable_name(), N))
    }

    fn element_count(&self) -> Option<usize> {
        Some(N)
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        for (index, item) in self.iter().enumerate() {
            inspection.descend(item, ctx, Segment::Index(index))?;
        }
        Ok(())
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        for (index, item) in self.iter_mut().enumerate() {
            traverser.descend(item, ctx, Segment::Index(index))?;
        }
        Ok(())
    }

    fn zeroed() -> Self {
        std::array::from_fn(|_| T::zeroed())
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        let mut copy = Self::zeroed();
        for (index, (slot, item)) in copy.iter_mut().zip(self).enumerate() {
            *slot = copier.descend(item, ctx, Segment::Index(index))?;
        }
        Ok(copy)
    }
}

macro_rules! impl_sequence {
    ($($ty:ident),*) => {$(
        impl<T: Object> Object for $ty<T> {
            fn kind(&self) -> Kind {
                Kind::Sequence
            }

            fn stable_name() -> Cow<'static, str> {
                generic_name(stringify!($ty), &[T::stable_name()])
            }

            fn element_count(&self) -> Option<usize> {
                Some(self.len())
            }

            fn walk(
                &self,
                inspection: &mut Inspection<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<(), Error> {
                for (index, item) in self.iter().enumerate() {
                    inspection.descend(item, ctx, Segment::Index(index))?;
                }
                Ok(())
            }

            fn walk_mut(
                &mut self,
                traverser: &mut Traverser<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<(), Error> {
                for (index, item) in self.iter_mut().enumerate() {
                    traverser.descend(item, ctx, Segment::Index(index))?;
                }
                Ok(())
            }

            fn zeroed() -> Self {
                $ty::new()
            }

            fn build_copy(
                &self,
                copier: &mut Copier<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<Self, Error> {
                self.iter()
                    .enumerate()
                    .map(|(index, item)| copier.descend(item, ctx, Segment::Index(index)))
                    .collect()
            }
        }
    )*};
}

impl_sequence!(Vec, VecDeque);

impl<K, V, S> Object for HashMap<K, V, S>
where
    K: Object + Eq + Hash,
    V: Object,
    S: BuildHasher + Clone + Default + 'static,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("HashMap", &[K::stable_name(), V::stable_name()])
    }

    fn element_count(&self) -> Option<usize> {
        Some(self.len())
    }

    fn entries(&self) -> Vec<(&dyn Object, &dyn Object)> {
        self.iter()
            .map(|(key, value)| (erased(key), erased(value)))
            .collect()
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        inspection.entries(Object::entries(self), ctx)
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        for (key, value) in self.iter_mut() {
            traverser.descend(value, ctx, Segment::Key(key_label(key)))?;
        }
        Ok(())
    }

    fn zeroed() -> Self {
        Self::with_hasher(S::default())
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        let mut copy = Self::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (key, value) in self {
            let value = copier.descend(value, ctx, Segment::Key(key_label(key)))?;
            copy.insert(copier.key(key, ctx)?, value);
        }
        Ok(copy)
    }
}

impl<K, V> Object for BTreeMap<K, V>
where
    K: Object + Ord,
    V: Object,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("BTreeMap", &[K::stable_name(), V::stable_name()])
    }

    fn element_count(&self) -> Option<usize> {
        Some(self.len())
    }

    fn entries(&self) -> Vec<(&dyn Object, &dyn Object)> {
        self.iter()
            .map(|(key, value)| (erased(key), erased(value)))
            .collect()
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        inspection.entries(Object::entries(self), ctx)
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        for (key, value) in self.iter_mut() {
            traverser.descend(value, ctx, Segment::Key(key_label(key)))?;
        }
        Ok(())
    }

    fn zeroed() -> Self {
        Self::new()
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        let mut copy = Self::new();
        for (key, value) in self {
            let value = copier.descend(value, ctx, Segment::Key(key_label(key)))?;
            copy.insert(copier.key(key, ctx)?, value);
        }
        Ok(copy)
    }
}

impl<K, S> Object for HashSet<K, S>
where
    K: Object + Eq + Hash,
    S: BuildHasher + Clone + Default + 'static,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("HashSet", &[K::stable_name()])
    }

    fn element_count(&self) -> Option<usize> {
        Some(self.len())
    }

    fn entries(&self) -> Vec<(&dyn Object, &dyn Object)> {
        self.iter().map(|key| (erased(key), erased(&()))).collect()
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        inspection.keys(self.iter().map(erased).collect(), ctx)
    }

    fn zeroed() -> Self {
        Self::with_hasher(S::default())
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        let mut copy = Self::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for key in self {
            copy.insert(copier.key(key, ctx)?);
        }
        Ok(copy)
    }
}

impl<K: Object + Ord> Object for BTreeSet<K> {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("BTreeSet", &[K::stable_name()])
    }

    fn element_count(&self) -> Option<usize> {
        Some(self.len())
    }

    fn entries(&self) -> Vec<(&dyn Object, &dyn Object)> {
        self.iter().map(|key| (erased(key), erased(&()))).collect()
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        inspection.keys(self.iter().map(erased).collect(), ctx)
    }

    fn zeroed() -> Self {
        Self::new()
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        self.iter().map(|key| copier.key(key, ctx)).collect()
    }
}

impl<T: Object> Object for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Any
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("Option", &[T::stable_name()])
    }

    fn variant(&self) -> Option<&'static str> {
        Some(if self.is_some() { "Some" } else { "None" })
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        match self {
            Some(value) => inspection.descend(value, ctx, Segment::Content),
            None => Ok(()),
        }
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        match self {
            Some(value) => traverser.descend(value, ctx, Segment::Content),
            None => Ok(()),
        }
    }

    fn zeroed() -> Self {
        None
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        self.as_ref()
            .map(|value| copier.descend(value, ctx, Segment::Content))
            .transpose()
    }
}

impl<T: Object, E: Object> Object for Result<T, E> {
    fn kind(&self) -> Kind {
        Kind::Any
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("Result", &[T::stable_name(), E::stable_name()])
    }

    fn variant(&self) -> Option<&'static str> {
        Some(if self.is_ok() { "Ok" } else { "Err" })
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        match self {
            Ok(value) => inspection.descend(value, ctx, Segment::Content),
            Err(err) => inspection.descend(err, ctx, Segment::Content),
        }
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        match self {
            Ok(value) => traverser.descend(value, ctx, Segment::Content),
            Err(err) => traverser.descend(err, ctx, Segment::Content),
        }
    }

    fn zeroed() -> Self {
        Ok(T::zeroed())
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        Ok(match self {
            Ok(value) => Ok(copier.descend(value, ctx, Segment::Content)?),
            Err(err) => Err(copier.descend(err, ctx, Segment::Content)?),
        })
    }
}
