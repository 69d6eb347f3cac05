//! Command-line entry point.
//!
//! - no arguments: compare sequential and parallel multiplication and
//!   write a report file
//! - `<matrix1> <matrix2> <result>`: multiply two matrix files
//! - anything else: print usage

use std::env;

use parmatrix::matrix::io::{read_matrix, write_matrix};
use parmatrix::perf::{self, Comparison, PerfConfig};
use parmatrix::sequential::check_dimensions;
use parmatrix::{multiply, sequential_multiply};
use tracing::{error, warn};

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.as_slice() {
        [] => {
            if let Err(e) = run_performance_tests() {
                error!(error = %e, "performance run failed");
                println!("Error: {}", e);
            }
        }
        [first, second, output] => {
            // errors are reported, not propagated: the process still exits normally
            if let Err(e) = multiply_files(first, second, output) {
                error!(error = %e, "file multiplication failed");
                println!("Error: {}", e);
            }
        }
        _ => print_usage(),
    }
}

fn print_usage() {
    println!("For performance tests: parmatrix");
    println!("For file multiplication: parmatrix matrix1.txt matrix2.txt result.txt");
}

fn multiply_files(first_path: &str, second_path: &str, output_path: &str) -> parmatrix::Result<()> {
    let first = read_matrix(first_path)?;
    let second = read_matrix(second_path)?;

    check_dimensions(&first, &second)?;

    println!("Sequential matrix multiplication:");
    let sequential = sequential_multiply(&first, &second)?;
    println!("Result: Matrix [{}x{}]", sequential.rows(), sequential.columns());

    let workers = num_cpus::get();
    println!("Parallel matrix multiplication ({} workers):", workers);
    let parallel = multiply(&first, &second, workers)?;
    println!("Result: Matrix [{}x{}]", parallel.rows(), parallel.columns());

    if parallel != sequential {
        warn!("parallel and sequential results differ");
    }

    write_matrix(output_path, &parallel)?;
    println!("Written to {}", output_path);
    Ok(())
}

fn run_performance_tests() -> parmatrix::Result<()> {
    let config = PerfConfig::from_env()?;

    println!("=== Sequential vs Parallel Multiplication ===\n");
    println!("Workers: {}, runs per method: {}\n", config.workers, config.runs);

    let results = perf::compare(&config)?;
    for c in &results {
        print_comparison(c);
    }

    perf::write_report(&config.report_path, &results)?;
    println!("Report written to {}", config.report_path.display());
    Ok(())
}

fn print_comparison(c: &Comparison) {
    println!("{}", c.label());
    println!("{}", "-".repeat(50));
    println!(
        "Sequential: {:10.2} ms  (sd {:.2})",
        c.sequential.mean_ms(),
        c.sequential.std_dev_ms()
    );
    println!(
        "Parallel:   {:10.2} ms  (sd {:.2})",
        c.parallel.mean_ms(),
        c.parallel.std_dev_ms()
    );
    println!("Speedup:    {:10.2}×\n", c.speedup());
}
