//! Single-threaded deferred value.

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use super::DeferredValue;
use crate::error::{Error, Result};

/// A memoizing cell for single-threaded use.
///
/// The supplier is called on the first [`get`](Self::get). A successful
/// result is stored and the supplier is dropped; a failure is handed to
/// the caller and nothing is stored, so the next `get` calls the supplier
/// again. `UnsyncDeferred` is `!Sync`, which keeps it on one thread.
///
/// If the supplier panics the cell is poisoned: the supplier is lost and
/// every later `get` panics.
///
/// # Example
///
/// ```
/// use parmatrix::UnsyncDeferred;
///
/// let cell = UnsyncDeferred::new(|| Ok::<_, String>(6 * 7));
/// assert_eq!(cell.get(), Ok(&42));
/// ```
pub struct UnsyncDeferred<T, E, F>
where
    F: FnMut() -> std::result::Result<T, E>,
{
    value: OnceCell<T>,
    supplier: Cell<Option<F>>,
    poisoned: Cell<bool>,
    _failure: PhantomData<fn() -> E>,
}

impl<T, E, F> UnsyncDeferred<T, E, F>
where
    F: FnMut() -> std::result::Result<T, E>,
{
    /// Wraps `supplier` without calling it.
    pub fn new(supplier: F) -> Self {
        Self {
            value: OnceCell::new(),
            supplier: Cell::new(Some(supplier)),
            poisoned: Cell::new(false),
            _failure: PhantomData,
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

    /// Returns the cached value, calling the supplier if none is stored yet.
    ///
    /// # Panics
    ///
    /// Panics if called again from inside its own supplier, or if an
    /// earlier call's supplier panicked.
    pub fn get(&self) -> std::result::Result<&T, E> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        if self.poisoned.get() {
            panic!("UnsyncDeferred supplier panicked earlier; the cell is poisoned");
        }

        let mut supplier = match self.supplier.take() {
            Some(supplier) => supplier,
            None => panic!("UnsyncDeferred::get called re-entrantly from its own supplier"),
        };

        let guard = PoisonOnUnwind(&self.poisoned);
        let outcome = supplier();
        mem::forget(guard);

        match outcome {
            Ok(value) => {
                drop(supplier);
                Ok(self.value.get_or_init(|| value))
            }
            Err(err) => {
                self.supplier.set(Some(supplier));
                Err(err)
            }
        }
    }

    /// True once a value is stored.
    pub fn is_computed(&self) -> bool {
        self.value.get().is_some()
    }

    /// True if a supplier call panicked.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.get()
    }

    /// Consumes the cell, returning the value if it was computed.
    pub fn into_inner(self) -> Option<T> {
        self.value.into_inner()
    }
}

/// Marks the cell poisoned if dropped during unwinding out of the supplier.
struct PoisonOnUnwind<'a>(&'a Cell<bool>);

impl Drop for PoisonOnUnwind<'_> {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

impl<T, E, F> DeferredValue<T> for UnsyncDeferred<T, E, F>
where
    F: FnMut() -> std::result::Result<T, E>,
{
    type Failure<'a>
        = E
    where
        Self: 'a;

    fn get(&self) -> std::result::Result<&T, E> {
        UnsyncDeferred::get(self)
    }

    fn is_computed(&self) -> bool {
        UnsyncDeferred::is_computed(self)
    }
}

impl<T: fmt::Debug, E, F> fmt::Debug for UnsyncDeferred<T, E, F>
where
    F: FnMut() -> std::result::Result<T, E>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsyncDeferred")
            .field("value", &self.value.get())
            .finish_non_exhaustive()
    }
}
