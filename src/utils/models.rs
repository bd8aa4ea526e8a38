#[cfg(all(loom, shuttle))]
compile_error!("cannot use loom and shuttle at once");

#[cfg(loom)]
pub(crate) mod alloc {
  pub(crate) use ::loom::alloc::alloc;
  pub(crate) use ::loom::alloc::dealloc;
}

#[cfg(not(loom))]
pub(crate) mod alloc {
  pub(crate) use ::std::alloc::alloc;
  pub(crate) use ::std::alloc::dealloc;
}

#[cfg(not(any(loom, shuttle)))]
pub(crate) mod sync {
  pub(crate) mod atomic {
    pub(crate) use ::core::sync::atomic::AtomicU32;
    pub(crate) use ::core::sync::atomic::AtomicU64;
    pub(crate) use ::core::sync::atomic::Ordering;
  }
}

#[cfg(loom)]
pub(crate) mod sync {
  pub(crate) mod atomic {
    pub(crate) use ::loom::sync::atomic::AtomicU32;
    pub(crate) use ::loom::sync::atomic::AtomicU64;
    pub(crate) use ::loom::sync::atomic::Ordering;
  }
}

#[cfg(shuttle)]
pub(crate) mod sync {
  pub(crate) mod atomic {
    pub(crate) use ::shuttle::sync::atomic::AtomicU32;
    pub(crate) use ::shuttle::sync::atomic::AtomicU64;
    pub(crate) use ::shuttle::sync::atomic::Ordering;
  }
}

#[cfg(loom)]
pub(crate) mod cell {
  pub(crate) use ::loom::cell::UnsafeCell;
}

#[cfg(not(loom))]
pub(crate) mod cell {
  /// An [`UnsafeCell`] with the access-closure shape of the loom model.
  ///
  /// [`UnsafeCell`]: core::cell::UnsafeCell
  #[derive(Debug)]
  #[repr(transparent)]
  pub(crate) struct UnsafeCell<T> {
    inner: ::core::cell::UnsafeCell<T>,
  }

  impl<T> UnsafeCell<T> {
    #[inline]
    pub(crate) const fn new(value: T) -> Self {
      Self {
        inner: ::core::cell::UnsafeCell::new(value),
      }
    }

    #[inline]
    pub(crate) fn with<F, R>(&self, f: F) -> R
    where
      F: FnOnce(*const T) -> R,
    {
      f(self.inner.get())
    }

    #[inline]
    pub(crate) fn with_mut<F, R>(&self, f: F) -> R
    where
      F: FnOnce(*mut T) -> R,
    {
      f(self.inner.get())
    }
  }
}
