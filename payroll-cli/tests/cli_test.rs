//! End-to-end tests for the `payroll` binary and its configuration files.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use payroll_cli::config::{ConfigError, PayrollConfig};
use payroll_core::calculations::{BracketWalk, SolverConfigError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn payroll(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_payroll"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run payroll binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// configuration files
// =============================================================================

#[test]
fn fixture_config_loads() {
    let config = PayrollConfig::load(&fixture("payroll.toml")).expect("valid fixture");

    assert_eq!(config.solver.max_iterations, 60);
    assert_eq!(config.solver.initial_scale, dec!(1.3));
    assert_eq!(config.calculation.bracket_walk, BracketWalk::Cascading);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn invalid_damping_is_reported() {
    let err = PayrollConfig::load(&fixture("invalid_solver.toml")).expect_err("bad damping");

    assert!(matches!(
        err,
        ConfigError::Solver(SolverConfigError::InvalidDamping(_))
    ));
}

// =============================================================================
// binary
// =============================================================================

#[test]
fn compute_prints_payslip() {
    let output = payroll(&["compute", "--base", "1000"]);

    assert!(output.status.success());
    let report = stdout(&output);
    assert!(report.contains("Net salary"));
    assert!(report.contains("888,70"));
}

#[test]
fn compute_with_family_and_children() {
    let output = payroll(&[
        "compute",
        "--base",
        "2000",
        "--cnss-code",
        "334",
        "--family-head",
        "--child",
        "1:cd",
        "--child",
        "2:cs",
        "--other-deductions",
        "100",
    ]);

    assert!(output.status.success());
    let report = stdout(&output);
    assert!(report.contains("1 400,78"));
    assert!(report.contains("-154,88"));
}

#[test]
fn solve_emits_json_with_outcome() {
    let config = fixture("payroll.toml");
    let output = payroll(&[
        "solve",
        "--net",
        "888.70",
        "--json",
        "--config",
        config.to_str().expect("utf-8 path"),
    ]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["salary_type"], "net");
    assert_eq!(json["solve"]["converged"], true);
}

#[test]
fn invalid_input_exits_with_field_errors() {
    let output = payroll(&["gross", "--gross", "-5", "--contract", "99"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("input_value"));
    assert!(stderr.contains("contract_type"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn smig_floor_is_enforced() {
    let output = payroll(&["compute", "--base", "400", "--smig"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn oversized_salary_is_rejected_not_computed() {
    let output = payroll(&["compute", "--base", "9999999999999999999999999999"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot exceed"));
}

#[test]
fn annual_solve_converges() {
    let output = payroll(&["solve", "--net", "888.70", "--annual", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["solve"]["converged"], true);
}

#[test]
fn breakdown_honours_walk_flag() {
    let cascading = stdout(&payroll(&["breakdown", "--income", "10800"]));
    let marginal = stdout(&payroll(&["breakdown", "--income", "10800", "--walk", "marginal"]));

    assert!(cascading.contains("cascading walk"));
    assert!(cascading.lines().any(|l| l.starts_with("  Total") && l.ends_with("120,00")));
    assert!(marginal.lines().any(|l| l.starts_with("  Total") && l.ends_with("950,00")));
}

#[test]
fn contracts_lists_catalog() {
    let output = payroll(&["contracts", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json.as_array().map(Vec::len), Some(8));
}

#[test]
fn missing_config_file_fails() {
    let output = payroll(&["contracts", "--config", "no/such/file.toml"]);

    assert!(!output.status.success());
}
