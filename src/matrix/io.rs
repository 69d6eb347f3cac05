//! Reading and writing matrices as text.
//!
//! One row per line, wrapped in parentheses, values separated by commas:
//!
//! ```text
//! (1, 2, 3)
//! (4, 5, 6)
//! ```
//!
//! The reader is lenient about whitespace, blank lines, trailing commas and
//! a missing closing parenthesis, but every row must have the same number
//! of values.

use std::fs;
use std::path::Path;

use super::Matrix;
use crate::error::{Error, Result};

/// Parses a matrix from its text form.
pub fn parse_matrix(text: &str) -> Result<Matrix> {
    let mut rows: Vec<Vec<i64>> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let cleared = line.replace(['(', ')'], "");
        let cleared = cleared.trim();
        if cleared.is_empty() {
            continue;
        }

        let row = cleared
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<i64>().map_err(|e| Error::Parse {
                    line: line_no,
                    message: format!("{:?}: {}", token, e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(Error::Parse {
                    line: line_no,
                    message: format!("expected {} values, found {}", first.len(), row.len()),
                });
            }
        }
        rows.push(row);
    }

    Matrix::from_rows(rows)
}

/// Reads a matrix from a file.
pub fn read_matrix(path: impl AsRef<Path>) -> Result<Matrix> {
    let text = fs::read_to_string(path)?;
    parse_matrix(&text)
}

/// Writes a matrix to a file, replacing any existing content.
pub fn write_matrix(path: impl AsRef<Path>, matrix: &Matrix) -> Result<()> {
    fs::write(path, matrix.to_string())?;
    Ok(())
}
