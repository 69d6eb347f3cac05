//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Barrier;
use std::thread;

use parmatrix::Matrix;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Runs `f` on `threads` threads released together by a barrier and
/// returns every thread's result.
pub fn race<T, F>(threads: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn() -> T + Sync,
{
    let barrier = Barrier::new(threads);
    thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    f()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

pub fn random_matrix(rows: usize, columns: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::random(rows, columns, &mut rng)
}

/// Textbook i-j-k product through the bounds-checked accessors.
pub fn naive_product(a: &Matrix, b: &Matrix) -> Matrix {
    let mut c = Matrix::new(a.rows(), b.columns());
    for i in 0..a.rows() {
        for j in 0..b.columns() {
            let mut sum = 0;
            for p in 0..a.columns() {
                sum += a.get(i, p).unwrap() * b.get(p, j).unwrap();
            }
            c.set(i, j, sum).unwrap();
        }
    }
    c
}

pub fn assert_matrices_equal(expected: &Matrix, actual: &Matrix, name: &str) {
    assert_eq!(
        (expected.rows(), expected.columns()),
        (actual.rows(), actual.columns()),
        "{}: shape mismatch",
        name
    );
    for (i, (e, a)) in expected.as_slice().iter().zip(actual.as_slice()).enumerate() {
        assert_eq!(
            e,
            a,
            "{}: mismatch at row {}, column {}",
            name,
            i / expected.columns(),
            i % expected.columns()
        );
    }
}
