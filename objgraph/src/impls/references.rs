use std::{
    any::type_name,
    borrow::Cow,
    cell::RefCell,
    rc::Rc,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use super::generic_name;
use crate::{
    context::{ProcContext, Segment},
    copy::Copier,
    error::Error,
    kind::Kind,
    object::Object,
    traverse::{Identity, Inspection, Traverser},
};

fn borrowed<T>(ctx: &ProcContext<'_>) -> Error {
    Error::Borrowed {
        type_name: type_name::<T>(),
        path: ctx.path().to_owned(),
    }
}

fn shared<T>(ctx: &ProcContext<'_>) -> Error {
    Error::Shared {
        type_name: type_name::<T>(),
        path: ctx.path().to_owned(),
    }
}

/// Uniquely owned, so it cannot alias and is never identity-checked.
impl<T: Object> Object for Box<T> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("Box", &[T::stable_name()])
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        inspection.descend(&**self, ctx, Segment::Deref)
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        traverser.descend(&mut **self, ctx, Segment::Deref)
    }

    fn zeroed() -> Self {
        Box::new(T::zeroed())
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        Ok(Box::new(copier.descend(&**self, ctx, Segment::Deref)?))
    }
}

/// A value of any [`Object`] type. Zero is `Box::new(())`.
impl Object for Box<dyn Object> {
    fn kind(&self) -> Kind {
        Kind::Any
    }

    fn stable_name() -> Cow<'static, str> {
        Cow::Borrowed("Box<dyn Object>")
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        inspection.descend(&**self, ctx, Segment::Content)
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        traverser.descend(&mut **self, ctx, Segment::Content)
    }

    fn zeroed() -> Self {
        Box::new(())
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        copier.descend_dyn(&**self, ctx, Segment::Content)
    }
}

/// Immutable shared referents. A mutable walk only enters one that is
/// uniquely held and fails with [`Error::Shared`] otherwise.
///
/// Copies build the referent before allocating. A cycle can still pass
/// through one of these by way of a mutable cell further down, so the
/// identity map is consulted again before the new allocation is recorded.
macro_rules! impl_shared {
    ($($ptr:ident),*) => {$(
        impl<T: Object> Object for $ptr<T> {
            fn kind(&self) -> Kind {
                Kind::Reference
            }

            fn stable_name() -> Cow<'static, str> {
                generic_name(stringify!($ptr), &[T::stable_name()])
            }

            fn walk(
                &self,
                inspection: &mut Inspection<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<(), Error> {
                if !inspection.enter(Identity::of($ptr::as_ptr(self))) {
                    return Ok(());
                }
                inspection.descend(&**self, ctx, Segment::Deref)
            }

            fn walk_mut(
                &mut self,
                traverser: &mut Traverser<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<(), Error> {
                if !traverser.enter(Identity::of($ptr::as_ptr(self))) {
                    return Ok(());
                }
                let inner = $ptr::get_mut(self).ok_or_else(|| shared::<Self>(ctx))?;
                traverser.descend(inner, ctx, Segment::Deref)
            }

            fn zeroed() -> Self {
                $ptr::new(T::zeroed())
            }

            fn build_copy(
                &self,
                copier: &mut Copier<'_>,
                ctx: &ProcContext<'_>,
            ) -> Result<Self, Error> {
                let identity = Identity::of($ptr::as_ptr(self));
                if let Some(copy) = copier.lookup::<Self>(identity)? {
                    return Ok(copy);
                }
                let value = copier.descend(&**self, ctx, Segment::Deref)?;
                if let Some(copy) = copier.lookup::<Self>(identity)? {
                    return Ok(copy);
                }
                let copy = $ptr::new(value);
                copier.remember(identity, &copy);
                Ok(copy)
            }
        }
    )*};
}

impl_shared!(Rc, Arc);

impl<T: Object> Object for Rc<RefCell<T>> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("Rc", &[generic_name("RefCell", &[T::stable_name()])])
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        if !inspection.enter(Identity::of(Rc::as_ptr(self))) {
            return Ok(());
        }
        let inner = self.try_borrow().map_err(|_| borrowed::<Self>(ctx))?;
        inspection.descend(&*inner, ctx, Segment::Deref)
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        if !traverser.enter(Identity::of(Rc::as_ptr(self))) {
            return Ok(());
        }
        let mut inner = self.try_borrow_mut().map_err(|_| borrowed::<Self>(ctx))?;
        traverser.descend(&mut *inner, ctx, Segment::Deref)
    }

    fn zeroed() -> Self {
        Rc::new(RefCell::new(T::zeroed()))
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        let identity = Identity::of(Rc::as_ptr(self));
        if let Some(copy) = copier.lookup::<Self>(identity)? {
            return Ok(copy);
        }
        let copy = Self::zeroed();
        copier.remember(identity, &copy);
        let inner = self.try_borrow().map_err(|_| borrowed::<Self>(ctx))?;
        let value = copier.descend(&*inner, ctx, Segment::Deref)?;
        *copy.borrow_mut() = value;
        Ok(copy)
    }
}

/// Locks are taken one node at a time. A poisoned lock is used as is.
impl<T: Object> Object for Arc<Mutex<T>> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("Arc", &[generic_name("Mutex", &[T::stable_name()])])
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        if !inspection.enter(Identity::of(Arc::as_ptr(self))) {
            return Ok(());
        }
        let inner = self.lock().unwrap_or_else(PoisonError::into_inner);
        inspection.descend(&*inner, ctx, Segment::Deref)
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        if !traverser.enter(Identity::of(Arc::as_ptr(self))) {
            return Ok(());
        }
        let mut inner = self.lock().unwrap_or_else(PoisonError::into_inner);
        traverser.descend(&mut *inner, ctx, Segment::Deref)
    }

    fn zeroed() -> Self {
        Arc::new(Mutex::new(T::zeroed()))
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        let identity = Identity::of(Arc::as_ptr(self));
        if let Some(copy) = copier.lookup::<Self>(identity)? {
            return Ok(copy);
        }
        let copy = Self::zeroed();
        copier.remember(identity, &copy);
        let value = {
            let inner = self.lock().unwrap_or_else(PoisonError::into_inner);
            copier.descend(&*inner, ctx, Segment::Deref)?
        };
        *copy.lock().unwrap_or_else(PoisonError::into_inner) = value;
        Ok(copy)
    }
}

/// Same locking rules as `Arc<Mutex<T>>`: read locks for read-only walks,
/// write locks for mutable ones.
impl<T: Object> Object for Arc<RwLock<T>> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn stable_name() -> Cow<'static, str> {
        generic_name("Arc", &[generic_name("RwLock", &[T::stable_name()])])
    }

    fn walk(&self, inspection: &mut Inspection<'_>, ctx: &ProcContext<'_>) -> Result<(), Error> {
        if !inspection.enter(Identity::of(Arc::as_ptr(self))) {
            return Ok(());
        }
        let inner = self.read().unwrap_or_else(PoisonError::into_inner);
        inspection.descend(&*inner, ctx, Segment::Deref)
    }

    fn walk_mut(
        &mut self,
        traverser: &mut Traverser<'_>,
        ctx: &ProcContext<'_>,
    ) -> Result<(), Error> {
        if !traverser.enter(Identity::of(Arc::as_ptr(self))) {
            return Ok(());
        }
        let mut inner = self.write().unwrap_or_else(PoisonError::into_inner);
        traverser.descend(&mut *inner, ctx, Segment::Deref)
    }

    fn zeroed() -> Self {
        Arc::new(RwLock::new(T::zeroed()))
    }

    fn build_copy(&self, copier: &mut Copier<'_>, ctx: &ProcContext<'_>) -> Result<Self, Error> {
        let identity = Identity::of(Arc::as_ptr(self));
        if let Some(copy) = copier.lookup::<Self>(identity)? {
            return Ok(copy);
        }
        let copy = Self::zeroed();
        copier.remember(identity, &copy);
        let value = {
            let inner = self.read().unwrap_or_else(PoisonError::into_inner);
            copier.descend(&*inner, ctx, Segment::Deref)?
        };
        *copy.write().unwrap_or_else(PoisonError::into_inner) = value;
        Ok(copy)
    }
}
