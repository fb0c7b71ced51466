use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use payroll_core::calculations::common::round_half_up;
use payroll_core::calculations::{BracketWalk, SolverConfig};
use payroll_core::{PayrollEngine, PayslipCalculator};
use payroll_data::PayslipLoader;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Calculate payslips for every employee in a CSV file.
///
/// The CSV file should have the following columns (only the first three
/// are required):
/// - employee, salary_type (base|gross|net), amount
/// - contract, cnss_code, is_annual, is_family_head
/// - children (e.g. 1:c;2:cs), other_deductions, other_deductions_is_annual
/// - expected_cnss, expected_irpp, expected_css, expected_net
///
/// Exits with an error when a record is invalid or an expected figure is
/// not reproduced within the tolerance.
#[derive(Parser, Debug)]
#[command(name = "payroll-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing payslip records
    #[arg(short, long)]
    file: PathBuf,

    /// Largest accepted difference between expected and calculated figures
    #[arg(short, long, default_value = "0.01")]
    tolerance: Decimal,

    /// Iteration cap for net-salary records
    #[arg(long, default_value_t = 20)]
    max_iterations: u32,

    /// Use the marginal bracket walk instead of the cascading one
    #[arg(long, default_value_t = false)]
    marginal: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let walk = if args.marginal {
        BracketWalk::Marginal
    } else {
        BracketWalk::Cascading
    };
    let solver_config = SolverConfig {
        max_iterations: args.max_iterations,
        ..SolverConfig::default()
    };
    let engine = PayrollEngine::new(
        PayslipCalculator::current().with_bracket_walk(walk),
        solver_config,
    )
    .context("Invalid solver settings")?;

    println!("Loading payslips from: {}", args.file.display());

    let records = PayslipLoader::load_from_file(&args.file)
        .with_context(|| format!("Failed to load: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let mut failures = 0usize;
    let results = PayslipLoader::evaluate(&engine, &records);

    for (record, result) in records.iter().zip(results) {
        let calculation = match result {
            Ok(calculation) => calculation,
            Err(err) => {
                failures += 1;
                println!("{:<12} INVALID  {}", record.employee, err);
                continue;
            }
        };

        let mismatches = PayslipLoader::compare(record, &calculation, args.tolerance);
        let status = match (&calculation.solve, mismatches.is_empty()) {
            (Some(outcome), _) if !outcome.converged => "NOCONV",
            (_, true) => "OK",
            (_, false) => "MISMATCH",
        };
        let r = &calculation.result;

        println!(
            "{:<12} {:<8} gross {:>10} cnss {:>8} irpp {:>8} css {:>7} net {:>10}",
            record.employee,
            status,
            round_half_up(r.gross_salary),
            round_half_up(r.cnss),
            round_half_up(r.irpp),
            round_half_up(r.css),
            round_half_up(r.net_salary),
        );

        for mismatch in &mismatches {
            println!(
                "{:<12}          {} expected {} got {} (off by {})",
                "",
                mismatch.field,
                mismatch.expected,
                mismatch.actual,
                mismatch.difference()
            );
        }
        if !mismatches.is_empty() {
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} payslips failed", records.len());
    }

    println!("All {} payslips calculated.", records.len());
    Ok(())
}
