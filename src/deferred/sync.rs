//! Thread-safe deferred value built on double-checked locking.

use std::cell::UnsafeCell;
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;

use super::DeferredValue;
use crate::error::{Error, Result};

const EMPTY: u8 = 0;
const COMPUTING: u8 = 1;
const DONE: u8 = 2;
const POISONED: u8 = 3;

/// A memoizing cell that can be shared between threads.
///
/// The supplier runs exactly once over the lifetime of the cell, no matter
/// how many threads call [`get`](Self::get) at the same time. Its outcome
/// is stored whether it succeeded or failed, and every caller observes the
/// same stored outcome: a failure comes back as a reference to the one
/// cached error.
///
/// Once the outcome is published, `get` is a single acquire load. Callers
/// that arrive while the supplier is still running block on an internal
/// mutex until it finishes.
///
/// If the supplier panics the cell is poisoned, and later calls to `get`
/// panic instead of running anything again.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use parmatrix::SyncDeferred;
///
/// let cell = Arc::new(SyncDeferred::new(|| Ok::<_, String>(String::from("ready"))));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let cell = Arc::clone(&cell);
///         thread::spawn(move || cell.get().map(|s| s.len()).unwrap_or(0))
///     })
///     .collect();
///
/// for handle in handles {
///     assert_eq!(handle.join().unwrap(), 5);
/// }
/// ```
pub struct SyncDeferred<T, E, F>
where
    F: FnOnce() -> std::result::Result<T, E>,
{
    state: AtomicU8,
    supplier: Mutex<Option<F>>,
    outcome: UnsafeCell<Option<std::result::Result<T, E>>>,
}

// SAFETY: `outcome` is written once, by the thread holding `supplier`'s lock,
// before `state` is set to DONE with release ordering. Readers only touch it
// after an acquire load observes DONE. The value may be produced on one thread
// and dropped on another, hence `Send` on top of `Sync`.
unsafe impl<T, E, F> Sync for SyncDeferred<T, E, F>
where
    T: Send + Sync,
    E: Send + Sync,
    F: FnOnce() -> std::result::Result<T, E> + Send,
{
}

impl<T, E, F> SyncDeferred<T, E, F>
where
    F: FnOnce() -> std::result::Result<T, E>,
{
    /// Wraps `supplier` without calling it.
    pub fn new(supplier: F) -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            supplier: Mutex::new(Some(supplier)),
            outcome: UnsafeCell::new(None),
        }
    }

    /// Builds a cell from a supplier that may be absent.
    ///
    /// Returns [`Error::InvalidArgument`] for `None`.
    pub fn try_new(supplier: Option<F>) -> Result<Self> {
        supplier
            .map(Self::new)
            .ok_or_else(|| Error::InvalidArgument("deferred value requires a supplier".into()))
    }

    /// Returns the memoized outcome, running the supplier on first use.
    ///
    /// # Panics
    ///
    /// Panics if the supplier panicked on an earlier call.
    pub fn get(&self) -> std::result::Result<&T, &E> {
        if self.state.load(Ordering::Acquire) == DONE {
            return self.cached();
        }
        self.initialize()
    }

    #[cold]
    fn initialize(&self) -> std::result::Result<&T, &E> {
        let mut supplier = self.supplier.lock();

        // another thread may have finished while we waited for the lock
        match self.state.load(Ordering::Acquire) {
            DONE => return self.cached(),
            POISONED => panic!("SyncDeferred supplier panicked; the cell is poisoned"),
            _ => {}
        }

        let Some(supplier_fn) = supplier.take() else {
            panic!("SyncDeferred supplier panicked; the cell is poisoned");
        };

        self.state.store(COMPUTING, Ordering::Relaxed);
        let poison = PoisonOnUnwind(&self.state);
        let outcome = supplier_fn();
        mem::forget(poison);

        // SAFETY: we hold the lock and the state is not DONE, so no other
        // thread is reading or writing `outcome`.
        unsafe {
            *self.outcome.get() = Some(outcome);
        }
        self.state.store(DONE, Ordering::Release);
        drop(supplier);

        self.cached()
    }

    fn cached(&self) -> std::result::Result<&T, &E> {
        // SAFETY: only reached after observing DONE, after which `outcome`
        // is never written again.
        match unsafe { &*self.outcome.get() } {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) => Err(err),
            None => unreachable!("SyncDeferred marked done without an outcome"),
        }
    }

    /// True once the supplier has returned, with a value or a failure.
    pub fn is_computed(&self) -> bool {
        self.state.load(Ordering::Acquire) == DONE
    }

    /// True if the supplier panicked; every later `get` panics too.
    pub fn is_poisoned(&self) -> bool {
        self.state.load(Ordering::Acquire) == POISONED
    }

    /// Consumes the cell, returning the outcome if the supplier has run.
    pub fn into_inner(self) -> Option<std::result::Result<T, E>> {
        self.outcome.into_inner()
    }
}

struct PoisonOnUnwind<'a>(&'a AtomicU8);

impl Drop for PoisonOnUnwind<'_> {
    fn drop(&mut self) {
        self.0.store(POISONED, Ordering::Release);
    }
}

impl<T, E, F> DeferredValue<T> for SyncDeferred<T, E, F>
where
    F: FnOnce() -> std::result::Result<T, E>,
{
    type Failure<'a>
        = &'a E
    where
        Self: 'a;

    fn get(&self) -> std::result::Result<&T, &E> {
        SyncDeferred::get(self)
    }

    fn is_computed(&self) -> bool {
        SyncDeferred::is_computed(self)
    }
}

impl<T: fmt::Debug, E: fmt::Debug, F> fmt::Debug for SyncDeferred<T, E, F>
where
    F: FnOnce() -> std::result::Result<T, E>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("SyncDeferred");
        match self.state.load(Ordering::Acquire) {
            DONE => s.field("outcome", &self.cached()),
            POISONED => s.field("outcome", &"<poisoned>"),
            _ => s.field("outcome", &"<pending>"),
        };
        s.finish()
    }
}
