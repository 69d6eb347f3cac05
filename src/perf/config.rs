//! Settings for the performance comparison run.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const ENV_RUNS: &str = "PARMATRIX_RUNS";
pub const ENV_WORKERS: &str = "PARMATRIX_WORKERS";
pub const ENV_REPORT: &str = "PARMATRIX_REPORT";
pub const ENV_SIZES: &str = "PARMATRIX_SIZES";

/// Problem shape `[rows × common] * [common × columns]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub common: usize,
    pub columns: usize,
}

impl Shape {
    /// `size × size` times `size × size`.
    pub const fn square(size: usize) -> Self {
        Self {
            rows: size,
            common: size,
            columns: size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerfConfig {
    pub shapes: Vec<Shape>,
    /// Timed runs per shape and method, after one warmup run.
    pub runs: usize,
    pub workers: usize,
    pub report_path: PathBuf,
    pub seed: u64,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            shapes: vec![Shape::square(100), Shape::square(500), Shape::square(1000)],
            runs: 5,
            workers: num_cpus::get(),
            report_path: PathBuf::from("performance_results.txt"),
            seed: 42,
        }
    }
}

impl PerfConfig {
    /// Defaults overlaid with any `PARMATRIX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_RUNS) {
            config.runs = parse_positive(ENV_RUNS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_WORKERS) {
            config.workers = parse_positive(ENV_WORKERS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REPORT) {
            config.report_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_SIZES) {
            config.shapes = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_positive(ENV_SIZES, s).map(Shape::square))
                .collect::<Result<_>>()?;
        }

        Ok(config)
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<usize> {
    match usize::from_str(raw.trim()) {
        Ok(0) | Err(_) => Err(Error::InvalidArgument(format!(
            "{} must be a positive integer, got {:?}",
            key, raw
        ))),
        Ok(v) => Ok(v),
    }
}
