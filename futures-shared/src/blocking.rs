use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, TryLockError};
use std::task::Context;

use futures::executor::block_on;
use futures::future::{maybe_done, MaybeDone};
use futures::task::noop_waker_ref;

use crate::unique::UniqueFuture;

/// A unique future backed by an ordinary [`Future`], driven on whichever
/// thread waits for it.
///
/// Created by the [`blocking()`] function.
#[must_use = "futures do nothing unless waited on"]
pub struct Blocking<Fut: Future> {
    state: Mutex<MaybeDone<Pin<Box<Fut>>>>,
    // Set once `state` has been observed as done.
    done: AtomicBool,
}

/// Turns an asynchronous [`Future`] into a [`UniqueFuture`].
///
/// `wait` and `get` run the future to completion on the calling thread with
/// [`block_on`], while `is_ready` polls it once without waiting for it.
///
/// That poll runs on the thread calling `is_ready`, so any synchronous work
/// the future does inside `poll` happens there too. Futures that compute
/// inline rather than waiting on another thread are best wrapped after moving
/// that work elsewhere.
///
/// # Examples
///
/// ```
/// use futures::channel::oneshot;
/// use futures_shared::{blocking, UniqueFuture};
///
/// let (tx, rx) = oneshot::channel::<u32>();
/// let shared = blocking(rx).shared();
/// assert!(!shared.is_ready());
/// tx.send(7).unwrap();
/// assert_eq!(shared.get(), &Ok(7));
/// ```
pub fn blocking<Fut: Future>(future: Fut) -> Blocking<Fut> {
    Blocking {
        state: Mutex::new(maybe_done(Box::pin(future))),
        done: AtomicBool::new(false),
    }
}

impl<Fut: Future> UniqueFuture for Blocking<Fut> {
    type Output = Fut::Output;

    fn is_ready(&self) -> bool {
        if self.done.load(Ordering::Acquire) {
            return true;
        }
        let mut state = match self.state.try_lock() {
            Ok(state) => state,
            // Another thread is driving the future, or a poll panicked.
            Err(TryLockError::WouldBlock) | Err(TryLockError::Poisoned(_)) => return false,
        };
        let mut cx = Context::from_waker(noop_waker_ref());
        if Pin::new(&mut *state).poll(&mut cx).is_ready() {
            self.done.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    fn wait(&self) {
        if self.done.load(Ordering::Acquire) {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        block_on(&mut *state);
        self.done.store(true, Ordering::Release);
    }

    fn get(self) -> Fut::Output {
        match self.state.into_inner().unwrap_or_else(PoisonError::into_inner) {
            MaybeDone::Done(output) => output,
            MaybeDone::Future(future) => block_on(future),
            MaybeDone::Gone => unreachable!("output of a blocking future was already taken"),
        }
    }
}

impl<Fut: Future> fmt::Debug for Blocking<Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blocking")
            .field("done", &self.done.load(Ordering::Relaxed))
            .finish()
    }
}
