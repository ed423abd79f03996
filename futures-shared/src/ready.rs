use crate::unique::UniqueFuture;

/// A unique future that is immediately ready with a value.
///
/// Created by the [`ready()`], [`ok()`] and [`err()`] functions.
#[derive(Debug)]
#[must_use = "futures do nothing unless waited on"]
pub struct Ready<T>(T);

impl<T> UniqueFuture for Ready<T> {
    type Output = T;

    #[inline]
    fn is_ready(&self) -> bool {
        true
    }

    #[inline]
    fn wait(&self) {}

    #[inline]
    fn get(self) -> T {
        self.0
    }
}

/// Create a unique future that is immediately ready with a value.
///
/// # Examples
///
/// ```
/// use futures_shared::{ready, UniqueFuture};
///
/// let a = ready(1);
/// assert!(a.is_ready());
/// assert_eq!(a.get(), 1);
/// ```
pub fn ready<T>(t: T) -> Ready<T> {
    Ready(t)
}

/// Create a unique future that is immediately ready with a success value.
///
/// # Examples
///
/// ```
/// use futures_shared::{ok, UniqueFuture};
///
/// let a = ok::<i32, i32>(1);
/// assert_eq!(a.get(), Ok(1));
/// ```
pub fn ok<T, E>(t: T) -> Ready<Result<T, E>> {
    Ready(Ok(t))
}

/// Create a unique future that is immediately ready with an error value.
///
/// # Examples
///
/// ```
/// use futures_shared::{err, UniqueFuture};
///
/// let a = err::<i32, i32>(1);
/// assert_eq!(a.get(), Err(1));
/// ```
pub fn err<T, E>(err: E) -> Ready<Result<T, E>> {
    Ready(Err(err))
}
