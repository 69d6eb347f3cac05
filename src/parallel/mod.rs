//! Row-parallel matrix multiplication.
//!
//! The work unit is one output row. Row indices sit in a [`RowWorkQueue`]
//! and a fixed set of worker threads drains it. Each index is delivered to
//! exactly one worker, which therefore owns that row of the result outright:
//! the result matrix itself is never locked.

mod pool;
mod queue;

pub use pool::{RunStats, multiply, multiply_with_stats};
pub use queue::RowWorkQueue;
