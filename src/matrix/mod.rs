//! Dense row-major integer matrix and its text format.
//!
//! [`Matrix`] is the value type both multipliers consume and produce.
//! Element access is bounds-checked; row slices are exposed for the hot
//! loops so they don't pay a check per element.

pub mod io;

use std::fmt;

use rand::Rng;

use crate::error::{Error, Result};

/// Range of values produced by [`Matrix::random`].
pub const RANDOM_RANGE: std::ops::RangeInclusive<i64> = -100..=100;

/// Dense matrix of `i64`, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Matrix {
    data: Vec<i64>,
    rows: usize,
    columns: usize,
}

impl Matrix {
    /// Allocates a `rows × columns` matrix filled with zeros.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            data: vec![0; rows * columns],
            rows,
            columns,
        }
    }

    /// Builds a matrix from a list of rows.
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut data = Vec::with_capacity(row_count * columns);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(Error::InvalidArgument(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    columns
                )));
            }
            data.extend(row);
        }

        Ok(Self {
            data,
            rows: row_count,
            columns,
        })
    }

    /// Builds a matrix with entries drawn uniformly from [`RANDOM_RANGE`].
    pub fn random<R: Rng + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Self {
        let data = (0..rows * columns)
            .map(|_| rng.gen_range(RANDOM_RANGE))
            .collect();
        Self {
            data,
            rows,
            columns,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Reads the element at (`row`, `column`).
    pub fn get(&self, row: usize, column: usize) -> Result<i64> {
        let idx = self.index(row, column)?;
        Ok(self.data[idx])
    }

    /// Writes the element at (`row`, `column`).
    pub fn set(&mut self, row: usize, column: usize, value: i64) -> Result<()> {
        let idx = self.index(row, column)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Returns row `row` as a slice, or `None` if it is out of range.
    pub fn row(&self, row: usize) -> Option<&[i64]> {
        if row >= self.rows {
            return None;
        }
        Some(&self.data[row * self.columns..(row + 1) * self.columns])
    }

    /// Iterates over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[i64]> {
        // not chunks_exact: it panics on a zero chunk size
        (0..self.rows).map(move |i| &self.data[i * self.columns..(i + 1) * self.columns])
    }

    /// Row-major view of all elements.
    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [i64] {
        &mut self.data
    }

    /// Changes the row count, keeping existing rows and zero-filling new ones.
    pub fn set_rows(&mut self, rows: usize) {
        if rows == self.rows {
            return;
        }
        self.data.resize(rows * self.columns, 0);
        self.rows = rows;
    }

    /// Changes the column count, keeping the overlapping columns of every
    /// row and zero-filling new ones.
    pub fn set_columns(&mut self, columns: usize) {
        if columns == self.columns {
            return;
        }

        let keep = columns.min(self.columns);
        let mut data = vec![0; self.rows * columns];
        for i in 0..self.rows {
            let src = &self.data[i * self.columns..i * self.columns + keep];
            data[i * columns..i * columns + keep].copy_from_slice(src);
        }

        self.data = data;
        self.columns = columns;
    }

    /// `true` if `first × second` is defined.
    pub fn is_compatible(first: &Matrix, second: &Matrix) -> bool {
        first.columns == second.rows
    }

    fn index(&self, row: usize, column: usize) -> Result<usize> {
        if row >= self.rows || column >= self.columns {
            return Err(Error::IndexOutOfRange {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(row * self.columns + column)
    }
}

/// Renders the text format read by [`io::parse_matrix`]: one `(a, b, c)` per line.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            write!(f, "(")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}
