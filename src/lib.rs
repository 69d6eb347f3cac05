//! Exactly-once deferred values and a row-parallel matrix multiplier.
//!
//! Two small concurrency building blocks live here:
//!
//! - **Deferred values** run an expensive or side-effecting supplier on
//!   first demand and hand out the memoized result afterwards.
//!   [`SyncDeferred`] guarantees the supplier runs exactly once even when
//!   many threads ask at the same time, and caches failures too.
//!   [`UnsyncDeferred`] is the single-threaded version.
//! - **Row-parallel multiplication** splits `A × B` into one task per
//!   output row, puts the row indices in a [`RowWorkQueue`] and lets a
//!   fixed number of worker threads drain it.
//!
//! ## Usage
//!
//! ```
//! use parmatrix::{Matrix, multiply, sequential_multiply};
//!
//! let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]])?;
//! let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]])?;
//!
//! let parallel = multiply(&a, &b, 4)?;
//! let sequential = sequential_multiply(&a, &b)?;
//!
//! assert_eq!(parallel, sequential);
//! assert_eq!(parallel.as_slice(), &[19, 22, 43, 50]);
//! # Ok::<(), parmatrix::Error>(())
//! ```
//!
//! Memoizing a computation shared between threads:
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::thread;
//! use parmatrix::SyncDeferred;
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let cell = Arc::new(SyncDeferred::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok::<_, String>(vec![1, 2, 3])
//! }));
//!
//! thread::scope(|s| {
//!     for _ in 0..8 {
//!         s.spawn(|| assert_eq!(cell.get().map(Vec::len), Ok(3)));
//!     }
//! });
//!
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```
//!
//! ## What's inside
//!
//! - [`deferred`]: the two deferred value variants and their shared trait
//! - [`matrix`]: dense integer matrix plus its text format
//! - [`parallel`]: the row queue and worker pool
//! - [`perf`]: timing harness used by the `parmatrix` binary

pub mod deferred;
pub mod error;
pub mod matrix;
pub mod parallel;
pub mod perf;
pub mod sequential;

pub use deferred::{DeferredValue, SyncDeferred, UnsyncDeferred};
pub use error::{Error, Result};
pub use matrix::Matrix;
pub use parallel::{RowWorkQueue, RunStats, multiply, multiply_with_stats};
pub use sequential::sequential_multiply;
