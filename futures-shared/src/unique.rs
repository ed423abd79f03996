use crate::shared::Shared;

/// A move-only handle to a result that becomes available at some point.
///
/// The result can be observed without blocking through `is_ready`, waited for
/// through `wait`, and taken exactly once through `get`. Taking `self` by value
/// in `get` is what makes a second consumption impossible.
///
/// Implementations are expected to be cheap to query: `is_ready` must never
/// block on the computation.
pub trait UniqueFuture: Sized {
    /// The value this future resolves to.
    type Output;

    /// Whether this handle refers to a computation at all.
    ///
    /// An invalid handle wrapped by [`Shared::new`] produces an empty shared
    /// handle. Most futures are always valid, which is the default.
    fn is_valid(&self) -> bool {
        true
    }

    /// Returns `true` if `get` would return without blocking.
    fn is_ready(&self) -> bool;

    /// Blocks the current thread until the result is available.
    fn wait(&self);

    /// Blocks until the result is available and returns it.
    fn get(self) -> Self::Output;

    /// Wraps this future into a cloneable [`Shared`] handle.
    ///
    /// ```
    /// use futures_shared::{ok, UniqueFuture};
    ///
    /// let shared = ok::<_, ()>(1).shared();
    /// assert_eq!(shared.get(), &Ok(1));
    /// ```
    fn shared(self) -> Shared<Self> {
        Shared::new(self)
    }
}
