//! Fixed-size worker pool that multiplies one output row per task.

use std::marker::PhantomData;
use std::panic;
use std::slice;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::queue::RowWorkQueue;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::sequential::{check_dimensions, compute_row};

/// What happened during one [`multiply_with_stats`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Always equal to the requested `max_workers`.
    pub workers_spawned: usize,
    pub rows_processed: usize,
    /// Rows computed by each worker, indexed by worker id.
    pub rows_per_worker: Vec<usize>,
}

/// Coordination counters for one multiply call.
#[derive(Default)]
struct WorkerPoolRun {
    active_workers: AtomicUsize,
    processed_rows: AtomicUsize,
    /// Set once any row fails; workers stop taking new rows.
    cancelled: AtomicBool,
    /// First row failure, returned to the caller after all workers exit.
    failure: Mutex<Option<Error>>,
}

impl WorkerPoolRun {
    fn fail(&self, err: Error) {
        let mut failure = self.failure.lock();
        if failure.is_none() {
            *failure = Some(err);
        }
        self.cancelled.store(true, Ordering::Release);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Writable view of the result matrix's rows, shared by all workers.
///
/// There is no lock: a worker writes a row only after popping its index
/// from the [`RowWorkQueue`], which hands out each index exactly once.
struct RowSink<'a> {
    ptr: *mut i64,
    rows: usize,
    columns: usize,
    _marker: PhantomData<&'a mut [i64]>,
}

// SAFETY: workers write disjoint rows (see `row_mut`), and the scope that
// shares the sink ends before the borrowed matrix is used again.
unsafe impl Send for RowSink<'_> {}
unsafe impl Sync for RowSink<'_> {}

impl<'a> RowSink<'a> {
    fn new(result: &'a mut Matrix) -> Self {
        let rows = result.rows();
        let columns = result.columns();
        Self {
            ptr: result.as_mut_slice().as_mut_ptr(),
            rows,
            columns,
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// The caller must be the only one accessing row `index` for as long
    /// as the returned slice lives.
    #[allow(clippy::mut_from_ref)]
    unsafe fn row_mut(&self, index: usize) -> &mut [i64] {
        assert!(index < self.rows, "row {} out of range for {} rows", index, self.rows);
        unsafe { slice::from_raw_parts_mut(self.ptr.add(index * self.columns), self.columns) }
    }
}

/// Multiplies `first × second` using `max_workers` threads.
///
/// Every output row index goes into a shared [`RowWorkQueue`]. Exactly
/// `max_workers` workers are started; each pops an index, computes that
/// row, and repeats until the queue is empty. The call returns once every
/// worker has exited. Workers that find the queue already empty exit
/// immediately, so `max_workers` may exceed the row count.
///
/// The values are identical to [`crate::sequential_multiply`]; only the
/// order in which rows complete varies.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if `first.columns() != second.rows()`.
/// - [`Error::InvalidArgument`] if `max_workers` is zero.
/// - [`Error::Overflow`] if an element of the product does not fit in
///   `i64`. The remaining workers stop picking up rows and the partial
///   result is discarded.
/// - [`Error::Io`] if a worker thread cannot be spawned.
///
/// No result is allocated when validation fails.
///
/// # Example
///
/// ```
/// use parmatrix::{Matrix, multiply};
///
/// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]])?;
/// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]])?;
///
/// let c = multiply(&a, &b, 4)?;
/// assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
/// # Ok::<(), parmatrix::Error>(())
/// ```
pub fn multiply(first: &Matrix, second: &Matrix, max_workers: usize) -> Result<Matrix> {
    multiply_with_stats(first, second, max_workers).map(|(result, _)| result)
}

/// Same as [`multiply`] but also reports how the rows were distributed.
pub fn multiply_with_stats(
    first: &Matrix,
    second: &Matrix,
    max_workers: usize,
) -> Result<(Matrix, RunStats)> {
    check_dimensions(first, second)?;
    if max_workers == 0 {
        return Err(Error::InvalidArgument("max_workers must be at least 1".into()));
    }

    let start = Instant::now();
    let mut result = Matrix::new(first.rows(), second.columns());
    let queue = RowWorkQueue::seeded(first.rows());
    let run = WorkerPoolRun::default();

    let rows_per_worker = {
        let sink = RowSink::new(&mut result);
        run_workers(first, second, max_workers, &queue, &sink, &run)?
    };

    let WorkerPoolRun {
        processed_rows,
        failure,
        ..
    } = run;
    if let Some(err) = failure.into_inner() {
        warn!(workers = max_workers, error = %err, "parallel multiply aborted");
        return Err(err);
    }

    let stats = RunStats {
        workers_spawned: max_workers,
        rows_processed: processed_rows.into_inner(),
        rows_per_worker,
    };

    info!(
        rows = result.rows(),
        columns = result.columns(),
        workers = max_workers,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "parallel multiply finished"
    );

    Ok((result, stats))
}

fn run_workers(
    first: &Matrix,
    second: &Matrix,
    max_workers: usize,
    queue: &RowWorkQueue,
    sink: &RowSink<'_>,
    run: &WorkerPoolRun,
) -> Result<Vec<usize>> {
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(max_workers);
        for worker in 0..max_workers {
            let handle = thread::Builder::new()
                .name(format!("row-worker-{}", worker))
                .spawn_scoped(scope, move || {
                    run_worker(worker, first, second, queue, sink, run)
                })?;
            handles.push(handle);
        }

        Ok(handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect())
    })
}

fn run_worker(
    worker: usize,
    first: &Matrix,
    second: &Matrix,
    queue: &RowWorkQueue,
    sink: &RowSink<'_>,
    run: &WorkerPoolRun,
) -> usize {
    run.active_workers.fetch_add(1, Ordering::AcqRel);
    debug!(worker, "row worker started");

    let mut rows = 0;
    while !run.is_cancelled() {
        let Some(index) = queue.try_pop() else {
            break;
        };
        // SAFETY: the queue delivered `index` to this worker alone.
        let out = unsafe { sink.row_mut(index) };
        if let Err(err) = compute_row(first, second, index, out) {
            debug!(worker, row = index, error = %err, "row failed, cancelling run");
            run.fail(err);
            break;
        }
        rows += 1;
        run.processed_rows.fetch_add(1, Ordering::AcqRel);
    }

    let still_running = run.active_workers.fetch_sub(1, Ordering::AcqRel) - 1;
    debug!(worker, rows, still_running, "row worker exiting");
    rows
}
