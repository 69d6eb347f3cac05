//! Timing harness comparing the sequential and parallel multipliers.

pub mod config;
pub mod stats;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

pub use config::{PerfConfig, Shape};

use crate::error::Result;
use crate::matrix::Matrix;
use crate::parallel::multiply;
use crate::sequential::sequential_multiply;

/// Wall-clock samples of repeated runs, in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub samples_ms: Vec<f64>,
}

impl Measurement {
    /// Mean of the timed samples, in milliseconds.
    pub fn mean_ms(&self) -> f64 {
        stats::mean(&self.samples_ms)
    }

    /// Population standard deviation of the samples, in milliseconds.
    pub fn std_dev_ms(&self) -> f64 {
        stats::std_dev(&self.samples_ms)
    }
}

/// Runs `f` once to warm up, then `runs` more times under the clock.
///
/// Stops at the first error.
pub fn measure<T, F>(runs: usize, mut f: F) -> Result<Measurement>
where
    F: FnMut() -> Result<T>,
{
    f()?;

    let mut samples_ms = Vec::with_capacity(runs);
    for _ in 0..runs {
        let start = Instant::now();
        let out = f()?;
        samples_ms.push(start.elapsed().as_secs_f64() * 1000.0);
        drop(out);
    }

    Ok(Measurement { samples_ms })
}

/// Sequential vs parallel timings for one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub shape: Shape,
    pub workers: usize,
    pub sequential: Measurement,
    pub parallel: Measurement,
}

impl Comparison {
    /// How many times faster the parallel mean is. 0.0 if it took no time.
    pub fn speedup(&self) -> f64 {
        let parallel = self.parallel.mean_ms();
        if parallel == 0.0 {
            return 0.0;
        }
        self.sequential.mean_ms() / parallel
    }

    /// Shape caption such as `[4x4] * [4x4]`.
    pub fn label(&self) -> String {
        let Shape {
            rows,
            common,
            columns,
        } = self.shape;
        format!("[{}x{}] * [{}x{}]", rows, common, common, columns)
    }
}

/// Times both multipliers on random operands of every configured shape.
pub fn compare(config: &PerfConfig) -> Result<Vec<Comparison>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut results = Vec::with_capacity(config.shapes.len());

    for &shape in &config.shapes {
        let first = Matrix::random(shape.rows, shape.common, &mut rng);
        let second = Matrix::random(shape.common, shape.columns, &mut rng);

        let sequential = measure(config.runs, || sequential_multiply(&first, &second))?;
        let parallel = measure(config.runs, || multiply(&first, &second, config.workers))?;

        let comparison = Comparison {
            shape,
            workers: config.workers,
            sequential,
            parallel,
        };
        info!(
            shape = %comparison.label(),
            sequential_ms = comparison.sequential.mean_ms(),
            parallel_ms = comparison.parallel.mean_ms(),
            speedup = comparison.speedup(),
            "shape measured"
        );
        results.push(comparison);
    }

    Ok(results)
}

/// Writes comparisons as a tab-separated table.
pub fn write_report(path: impl AsRef<Path>, comparisons: &[Comparison]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    render_report(&mut out, comparisons)?;
    out.flush()?;
    Ok(())
}

fn render_report<W: Write>(out: &mut W, comparisons: &[Comparison]) -> std::io::Result<()> {
    writeln!(out, "Performance testing results:")?;
    writeln!(
        out,
        "Dimensions\tSequential(ms)\tParallel(ms)\tSpeedup\tMean Sequential\tStd Dev Sequential\tMean Parallel\tStd Dev Parallel"
    )?;

    for c in comparisons {
        let seq_total: f64 = c.sequential.samples_ms.iter().sum();
        let par_total: f64 = c.parallel.samples_ms.iter().sum();
        writeln!(
            out,
            "{}\t{:12.2}\t{:12.2}\t{:8.2}x\t{:8.2}\t{:8.2}\t{:8.2}\t{:8.2}",
            c.label(),
            seq_total,
            par_total,
            c.speedup(),
            c.sequential.mean_ms(),
            c.sequential.std_dev_ms(),
            c.parallel.mean_ms(),
            c.parallel.std_dev_ms()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn measurement(samples: &[f64]) -> Measurement {
        Measurement {
            samples_ms: samples.to_vec(),
        }
    }

    #[test]
    fn test_measure_runs_warmup_plus_runs() {
        let mut calls = 0;
        let m = measure(4, || {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls, 5);
        assert_eq!(m.samples_ms.len(), 4);
        assert!(m.samples_ms.iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_measure_propagates_error() {
        let result = measure(3, || -> Result<()> { Err(Error::InvalidArgument("nope".into())) });
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_speedup() {
        let c = Comparison {
            shape: Shape::square(4),
            workers: 2,
            sequential: measurement(&[10.0, 30.0]),
            parallel: measurement(&[5.0, 5.0]),
        };
        assert!((c.speedup() - 4.0).abs() < 1e-12);
        assert_eq!(c.label(), "[4x4] * [4x4]");
    }

    #[test]
    fn test_compare_small_shapes() {
        let config = PerfConfig {
            shapes: vec![
                Shape::square(4),
                Shape {
                    rows: 3,
                    common: 5,
                    columns: 2,
                },
            ],
            runs: 2,
            workers: 2,
            ..PerfConfig::default()
        };

        let results = compare(&config).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].label(), "[3x5] * [5x2]");
        assert!(results.iter().all(|c| c.sequential.samples_ms.len() == 2));
    }

    #[test]
    fn test_report_layout() {
        let c = Comparison {
            shape: Shape::square(2),
            workers: 2,
            sequential: measurement(&[2.0, 2.0]),
            parallel: measurement(&[1.0, 1.0]),
        };

        let mut buf = Vec::new();
        render_report(&mut buf, &[c]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Dimensions\tSequential(ms)"));
        let cells: Vec<&str> = lines[2].split('\t').collect();
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], "[2x2] * [2x2]");
        assert_eq!(cells[3].trim(), "2.00x");
    }
}
