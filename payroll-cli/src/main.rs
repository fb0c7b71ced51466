use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use payroll_core::validation::validate_form;
use payroll_core::{PayrollEngine, PayslipCalculator, SalaryType};
use tracing::{debug, error};

use payroll_cli::args::{Cli, Command, InputArgs};
use payroll_cli::config::PayrollConfig;
use payroll_cli::logging;
use payroll_cli::report::{BreakdownReport, ContractsReport, PayslipReport};

// ─── configuration ───────────────────────────────────────────────────────────

/// Loads the config file and applies command line overrides on top.
fn resolve_config(cli: &Cli) -> Result<PayrollConfig> {
    let mut config = PayrollConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }
    if let Some(walk) = cli.walk {
        config.calculation.bracket_walk = walk;
    }
    if let Command::Solve {
        max_iterations: Some(cap),
        ..
    } = &cli.command
    {
        config.solver.max_iterations = *cap;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

// ─── commands ────────────────────────────────────────────────────────────────

/// Validates the input and prints the payslip. Returns `false` when the
/// input was rejected.
fn run_payslip(
    engine: &PayrollEngine<'_>,
    salary_type: SalaryType,
    amount: &str,
    input: &InputArgs,
    json: bool,
) -> Result<bool> {
    let form = input.to_form(salary_type, amount);
    let errors = validate_form(&form, engine.calculator().contracts());
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("error: {err}");
        }
        return Ok(false);
    }

    let calculation = engine.calculate(salary_type, form.amount(), &form.to_input());

    if json {
        println!("{}", serde_json::to_string_pretty(&calculation)?);
    } else {
        print!("{}", PayslipReport(&calculation));
    }
    Ok(true)
}

fn run(
    cli: Cli,
    config: PayrollConfig,
) -> Result<bool> {
    let calculator =
        PayslipCalculator::current().with_bracket_walk(config.calculation.bracket_walk);
    let engine =
        PayrollEngine::new(calculator, config.solver.clone()).context("invalid solver settings")?;
    debug!(?config, "engine ready");

    match &cli.command {
        Command::Compute { base, input } => {
            run_payslip(&engine, SalaryType::Base, base, input, cli.json)
        }
        Command::Solve { net, input, .. } => {
            run_payslip(&engine, SalaryType::Net, net, input, cli.json)
        }
        Command::Gross { gross, input } => {
            run_payslip(&engine, SalaryType::Gross, gross, input, cli.json)
        }
        Command::Breakdown { income } => {
            let walk = calculator.bracket_walk();
            let slices = calculator.table().breakdown(*income, walk);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&slices)?);
            } else {
                print!(
                    "{}",
                    BreakdownReport {
                        income: *income,
                        walk,
                        slices: &slices,
                    }
                );
            }
            Ok(true)
        }
        Command::Contracts => {
            let contracts = calculator.contracts().all();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(contracts)?);
            } else {
                print!("{}", ContractsReport(contracts));
            }
            Ok(true)
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    logging::init_logging(&config.logging.level, config.logging.file.as_deref())?;

    match run(cli, config) {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::from(2)),
        Err(err) => {
            error!(error = %err, "payroll command failed");
            Err(err)
        }
    }
}
