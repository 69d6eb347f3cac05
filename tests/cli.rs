use std::fs;
use std::process::Command;

fn parmatrix() -> Command {
    Command::new(env!("CARGO_BIN_EXE_parmatrix"))
}

#[test]
fn test_multiplies_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let out = dir.path().join("out.txt");
    fs::write(&a, "(1, 2)\n(3, 4)\n").unwrap();
    fs::write(&b, "(5, 6)\n(7, 8)\n").unwrap();

    let status = parmatrix().args([&a, &b, &out]).status().unwrap();

    assert!(status.success());
    assert_eq!(fs::read_to_string(&out).unwrap(), "(19, 22)\n(43, 50)\n");
}

#[test]
fn test_incompatible_files_report_error_and_exit_normally() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let out = dir.path().join("out.txt");
    fs::write(&a, "(1, 2, 3)\n(4, 5, 6)\n").unwrap();
    fs::write(&b, "(1, 2)\n(3, 4)\n").unwrap();

    let output = parmatrix().args([&a, &b, &out]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error: matrix dimension mismatch"), "{}", stdout);
    assert!(!out.exists());
}

#[test]
fn test_overflowing_product_reports_error_and_exit_normally() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let out = dir.path().join("out.txt");
    fs::write(&a, "(9223372036854775807, 2)\n").unwrap();
    fs::write(&b, "(2)\n(1)\n").unwrap();

    let output = parmatrix().args([&a, &b, &out]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error: integer overflow"), "{}", stdout);
    assert!(!out.exists());
}

#[test]
fn test_missing_input_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let out = dir.path().join("out.txt");

    let output = parmatrix().args([&missing, &missing, &out]).output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Error:"));
}

#[test]
fn test_wrong_argument_count_prints_usage() {
    let output = parmatrix().args(["only-one"]).output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("For file multiplication"));
}

#[test]
fn test_performance_mode_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.txt");

    let status = parmatrix()
        .env("PARMATRIX_SIZES", "4,8")
        .env("PARMATRIX_RUNS", "1")
        .env("PARMATRIX_WORKERS", "2")
        .env("PARMATRIX_REPORT", &report)
        .status()
        .unwrap();

    assert!(status.success());
    let text = fs::read_to_string(&report).unwrap();
    assert!(text.contains("[4x4] * [4x4]"));
    assert!(text.contains("[8x8] * [8x8]"));
}
