//! Definition of `Shared`, a cloneable handle over a consume-once future.
//!
//! # Examples
//!
//! ```
//! use futures_shared::{ok, Shared};
//!
//! let shared1 = Shared::new(ok::<_, bool>(6));
//! let shared2 = shared1.clone();
//! assert_eq!(shared1.get(), &Ok(6));
//! assert_eq!(shared2.get(), &Ok(6));
//! ```

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, RwLock, TryLockError, Weak};

use tracing::{debug, trace};

use crate::error::Error;
use crate::unique::UniqueFuture;

/// A handle to the result of a [`UniqueFuture`] that can be cloned and
/// observed from multiple threads.
///
/// Every clone refers to the same cell. The cell starts out holding the
/// wrapped future and switches to holding its result the first time any clone
/// calls [`get`](Shared::get); the wrapped future's consuming `get` runs exactly
/// once no matter how many clones race for the result.
///
/// A handle built from an invalid future, or through `Default`, is empty:
/// [`valid`](Shared::valid) returns `false` and every other query fails with
/// [`Error::NoState`].
#[must_use = "shared futures do nothing unless waited on"]
pub struct Shared<F: UniqueFuture> {
    inner: Option<Arc<Inner<F>>>,
}

/// A weak reference to the cell of a [`Shared`], created with
/// [`Shared::downgrade`].
pub struct WeakShared<F: UniqueFuture>(Weak<Inner<F>>);

struct Inner<F: UniqueFuture> {
    // `Some` while the cell is pending.
    future: RwLock<Option<F>>,
    // Written once, under the write lock of `future`, in the same critical
    // section that empties it.
    result: OnceLock<F::Output>,
    // Set when the wrapped future's `wait` unwinds. A panic under a read
    // guard does not poison `future`.
    poisoned: AtomicBool,
}

struct Reset<'a>(&'a AtomicBool);

impl Drop for Reset<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl<F: UniqueFuture> Inner<F> {
    fn new(future: F) -> Self {
        Inner {
            future: RwLock::new(Some(future)),
            result: OnceLock::new(),
            poisoned: AtomicBool::new(false),
        }
    }

    fn is_ready(&self) -> Result<bool, Error> {
        if self.result.get().is_some() {
            return Ok(true);
        }
        self.check_poisoned()?;
        match self.future.try_read() {
            Ok(future) => match &*future {
                Some(future) => Ok(future.is_ready()),
                None => self.completed().map(|_| true),
            },
            // The write lock is only taken after the wrapped future finished
            // waiting, so whoever holds it is about to store the result.
            Err(TryLockError::WouldBlock) => Ok(true),
            Err(TryLockError::Poisoned(_)) => Err(self.poisoned()),
        }
    }

    fn wait(&self) -> Result<(), Error> {
        if self.result.get().is_some() {
            return Ok(());
        }
        self.check_poisoned()?;
        let future = self.future.read().map_err(|_| self.poisoned())?;
        match &*future {
            Some(future) => {
                let reset = Reset(&self.poisoned);
                future.wait();
                mem::forget(reset);
                Ok(())
            }
            None => self.completed().map(drop),
        }
    }

    fn get(&self) -> Result<&F::Output, Error> {
        if let Some(result) = self.result.get() {
            return Ok(result);
        }

        // Block under the shared lock first, so `is_ready` callers are never
        // stuck behind a computation that has not finished yet.
        self.wait()?;

        let mut slot = self.future.write().map_err(|_| self.poisoned())?;
        match slot.take() {
            Some(future) => {
                trace!("materializing shared future result");
                Ok(self.result.get_or_init(move || future.get()))
            }
            None => {
                drop(slot);
                self.completed()
            }
        }
    }

    fn completed(&self) -> Result<&F::Output, Error> {
        self.result.get().ok_or_else(|| self.poisoned())
    }

    fn check_poisoned(&self) -> Result<(), Error> {
        if self.poisoned.load(Ordering::SeqCst) {
            Err(self.poisoned())
        } else {
            Ok(())
        }
    }

    fn poisoned(&self) -> Error {
        debug!("shared future cell is poisoned");
        Error::Poisoned
    }

    fn state(&self) -> &'static str {
        if self.result.get().is_some() {
            "ready"
        } else {
            "pending"
        }
    }
}

#[track_caller]
fn expect_state<T>(res: Result<T, Error>) -> T {
    match res {
        Ok(t) => t,
        Err(e) => panic!("{}", e),
    }
}

impl<F: UniqueFuture> Shared<F> {
    /// Wraps `future` into a new cell.
    ///
    /// If `future.is_valid()` is `false` the future is dropped and the
    /// returned handle is empty.
    pub fn new(future: F) -> Self {
        if !future.is_valid() {
            trace!("wrapped future is invalid, shared handle left empty");
            return Shared { inner: None };
        }
        trace!("allocating shared future cell");
        Shared {
            inner: Some(Arc::new(Inner::new(future))),
        }
    }

    /// Returns `true` if this handle refers to a cell.
    pub fn valid(&self) -> bool {
        self.inner.is_some()
    }

    fn inner(&self) -> Result<&Inner<F>, Error> {
        self.inner.as_deref().ok_or(Error::NoState)
    }

    /// Returns whether the result can be obtained without blocking.
    ///
    /// Once the cell holds the result this is always `true`. Before that, the
    /// wrapped future's own readiness is reported; asking never consumes it.
    pub fn try_is_ready(&self) -> Result<bool, Error> {
        self.inner()?.is_ready()
    }

    /// Like [`try_is_ready`](Shared::try_is_ready), but panics if the handle
    /// is empty or poisoned.
    #[track_caller]
    pub fn is_ready(&self) -> bool {
        expect_state(self.try_is_ready())
    }

    /// Blocks until the result is available, without obtaining it.
    pub fn try_wait(&self) -> Result<(), Error> {
        self.inner()?.wait()
    }

    /// Like [`try_wait`](Shared::try_wait), but panics if the handle is empty
    /// or poisoned.
    #[track_caller]
    pub fn wait(&self) {
        expect_state(self.try_wait())
    }

    /// Blocks until the result is available and returns a reference to it.
    ///
    /// The first call on any clone consumes the wrapped future and stores its
    /// output in the cell; every later call, on any clone, returns the stored
    /// output.
    pub fn try_get(&self) -> Result<&F::Output, Error> {
        self.inner()?.get()
    }

    /// Like [`try_get`](Shared::try_get), but panics if the handle is empty or
    /// poisoned.
    #[track_caller]
    pub fn get(&self) -> &F::Output {
        expect_state(self.try_get())
    }

    /// Returns the stored result if some clone already obtained it. Never
    /// blocks and never consumes the wrapped future.
    pub fn peek(&self) -> Option<&F::Output> {
        self.inner.as_ref()?.result.get()
    }

    /// Returns `true` if both handles refer to the same cell.
    ///
    /// Empty handles are never equal to anything.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of handles sharing this cell, or `None` for an empty handle.
    pub fn strong_count(&self) -> Option<usize> {
        self.inner.as_ref().map(Arc::strong_count)
    }

    /// Number of [`WeakShared`] references to this cell, or `None` for an
    /// empty handle.
    pub fn weak_count(&self) -> Option<usize> {
        self.inner.as_ref().map(Arc::weak_count)
    }

    /// Creates a [`WeakShared`] reference to this cell, or `None` for an
    /// empty handle.
    pub fn downgrade(&self) -> Option<WeakShared<F>> {
        self.inner.as_ref().map(|inner| WeakShared(Arc::downgrade(inner)))
    }
}

impl<F: UniqueFuture> WeakShared<F> {
    /// Attempts to get a [`Shared`] back, which succeeds while at least one
    /// handle to the cell is alive.
    pub fn upgrade(&self) -> Option<Shared<F>> {
        self.0.upgrade().map(|inner| Shared { inner: Some(inner) })
    }
}

impl<F: UniqueFuture> From<F> for Shared<F> {
    fn from(future: F) -> Self {
        Shared::new(future)
    }
}

impl<F: UniqueFuture> Clone for Shared<F> {
    fn clone(&self) -> Self {
        Shared {
            inner: self.inner.clone(),
        }
    }
}

impl<F: UniqueFuture> Default for Shared<F> {
    fn default() -> Self {
        Shared { inner: None }
    }
}

impl<F: UniqueFuture> Clone for WeakShared<F> {
    fn clone(&self) -> Self {
        WeakShared(self.0.clone())
    }
}

impl<F: UniqueFuture> fmt::Debug for Shared<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("state", &self.inner.as_ref().map_or("empty", |inner| inner.state()))
            .finish()
    }
}

impl<F: UniqueFuture> fmt::Debug for WeakShared<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakShared").finish()
    }
}
