//! Shared handles over consume-once futures.
//!
//! A [`UniqueFuture`] is a move-only handle to a result that is produced
//! elsewhere: it can be polled for readiness, waited on, and consumed exactly
//! once. [`Shared`] wraps such a handle so that any number of clones can
//! observe the same result. The wrapped future is consumed lazily, by the
//! first clone that asks for the result, and never more than once.
//!
//! ```
//! use futures_shared::{ready, UniqueFuture};
//!
//! let a = ready(6).shared();
//! let b = a.clone();
//! assert_eq!(*a.get(), 6);
//! assert!(b.is_ready());
//! assert_eq!(*b.get(), 6);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use crate::error::Error;

mod unique;
pub use crate::unique::UniqueFuture;

mod shared;
pub use crate::shared::{Shared, WeakShared};

mod ready;
pub use crate::ready::{err, ok, ready, Ready};

#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
mod blocking;
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub use crate::blocking::{blocking, Blocking};
