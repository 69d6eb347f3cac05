//! Error types for matrix and worker-pool operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "matrix dimension mismatch: first is {left_rows}x{left_columns}, second is {right_rows}x{right_columns}"
    )]
    DimensionMismatch {
        left_rows: usize,
        left_columns: usize,
        right_rows: usize,
        right_columns: usize,
    },

    #[error("index ({row}, {column}) is out of range for a {rows}x{columns} matrix")]
    IndexOutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("integer overflow computing result element ({row}, {column})")]
    Overflow { row: usize, column: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
