//! Single-threaded reference multiplication.

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Multiplies `first × second` on the calling thread.
///
/// This is the oracle the parallel engine is checked against, and the
/// better choice for small inputs where spawning workers costs more than
/// it saves. Same preconditions and result as [`crate::multiply`].
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if `first.columns() != second.rows()`.
/// - [`Error::Overflow`] if an element of the product does not fit in `i64`.
pub fn sequential_multiply(first: &Matrix, second: &Matrix) -> Result<Matrix> {
    check_dimensions(first, second)?;

    let mut result = Matrix::new(first.rows(), second.columns());
    let columns = second.columns();
    if columns == 0 {
        return Ok(result);
    }

    for (i, out) in result.as_mut_slice().chunks_mut(columns).enumerate() {
        compute_row(first, second, i, out)?;
    }

    Ok(result)
}

/// Fails with [`Error::DimensionMismatch`] unless `first × second` is defined.
pub fn check_dimensions(first: &Matrix, second: &Matrix) -> Result<()> {
    if !Matrix::is_compatible(first, second) {
        return Err(Error::DimensionMismatch {
            left_rows: first.rows(),
            left_columns: first.columns(),
            right_rows: second.rows(),
            right_columns: second.columns(),
        });
    }
    Ok(())
}

/// Computes row `i` of `first × second` into `out`.
///
/// Uses i-k-j order so the inner loop walks `second` and `out`
/// sequentially. `out` must be zeroed and `second.columns()` long, and
/// `i` must be a valid row of `first`.
///
/// Arithmetic is checked: the first partial sum or product that leaves
/// the `i64` range fails with [`Error::Overflow`], and `out` is then left
/// partially written.
pub(crate) fn compute_row(
    first: &Matrix,
    second: &Matrix,
    i: usize,
    out: &mut [i64],
) -> Result<()> {
    let Some(lhs) = first.row(i) else {
        return Ok(());
    };

    for (&a, rhs) in lhs.iter().zip(second.iter_rows()) {
        for (j, (c, &b)) in out.iter_mut().zip(rhs).enumerate() {
            *c = a
                .checked_mul(b)
                .and_then(|product| c.checked_add(product))
                .ok_or(Error::Overflow { row: i, column: j })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2x2() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();

        let c = sequential_multiply(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
    }

    #[test]
    fn test_2x3_times_3x2() {
        let a = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let b = Matrix::from_rows(vec![vec![7, 8], vec![9, 10], vec![11, 12]]).unwrap();

        let c = sequential_multiply(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[58, 64, 139, 154]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Matrix::new(2, 3);
        let b = Matrix::new(2, 2);
        assert!(matches!(
            sequential_multiply(&a, &b),
            Err(Error::DimensionMismatch {
                left_rows: 2,
                left_columns: 3,
                right_rows: 2,
                right_columns: 2
            })
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let a = Matrix::from_rows(vec![vec![i64::MAX, 2]]).unwrap();
        let b = Matrix::from_rows(vec![vec![2], vec![1]]).unwrap();

        assert!(matches!(
            sequential_multiply(&a, &b),
            Err(Error::Overflow { row: 0, column: 0 })
        ));
    }

    #[test]
    fn test_overflow_in_accumulation() {
        let a = Matrix::from_rows(vec![vec![1, 1], vec![i64::MAX, 1]]).unwrap();
        let b = Matrix::from_rows(vec![vec![1, 0], vec![1, 1]]).unwrap();

        assert!(matches!(
            sequential_multiply(&a, &b),
            Err(Error::Overflow { row: 1, column: 0 })
        ));
    }

    #[test]
    fn test_extreme_values_that_fit() {
        let a = Matrix::from_rows(vec![vec![i64::MAX, i64::MIN]]).unwrap();
        let b = Matrix::from_rows(vec![vec![1], vec![0]]).unwrap();

        assert_eq!(sequential_multiply(&a, &b).unwrap().as_slice(), &[i64::MAX]);
    }

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions(&Matrix::new(2, 3), &Matrix::new(3, 1)).is_ok());
        assert!(matches!(
            check_dimensions(&Matrix::new(2, 3), &Matrix::new(2, 2)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_shapes() {
        let c = sequential_multiply(&Matrix::new(3, 0), &Matrix::new(0, 4)).unwrap();
        assert_eq!((c.rows(), c.columns()), (3, 4));
        assert!(c.as_slice().iter().all(|&v| v == 0));

        let c = sequential_multiply(&Matrix::new(0, 2), &Matrix::new(2, 0)).unwrap();
        assert_eq!((c.rows(), c.columns()), (0, 0));
    }
}
