//! Deferred values: run a supplier on first demand and memoize the outcome.
//!
//! Two variants are provided:
//! - [`UnsyncDeferred`]: single-threaded. Only successful results are
//!   cached; a failed supplier may be retried by the next `get`.
//! - [`SyncDeferred`]: safe to share between threads. The supplier runs
//!   exactly once and its outcome, success or failure, is cached for
//!   every observer.
//!
//! Both implement [`DeferredValue`], so code that only needs "give me the
//! value" can stay generic over the variant.

mod sync;
mod unsync;

pub use sync::SyncDeferred;
pub use unsync::UnsyncDeferred;

/// Common interface of the deferred value variants.
pub trait DeferredValue<T> {
    /// What `get` hands back when the supplier fails.
    ///
    /// [`UnsyncDeferred`] returns the supplier's error by value because it
    /// does not keep it. [`SyncDeferred`] returns a reference to the one
    /// cached error.
    type Failure<'a>
    where
        Self: 'a;

    /// Returns the memoized value, running the supplier if needed.
    fn get(&self) -> Result<&T, Self::Failure<'_>>;

    /// Returns `true` once a value or a cached failure is available.
    fn is_computed(&self) -> bool;
}
