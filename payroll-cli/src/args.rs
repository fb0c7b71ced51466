use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use payroll_core::calculations::BracketWalk;
use payroll_core::validation::SalaryForm;
use payroll_core::{ChildRecord, SalaryType};
use rust_decimal::Decimal;

/// Tunisian payslip calculator.
///
/// Computes CNSS, IRPP and CSS withholdings from a base or gross salary,
/// or finds the base salary that yields a target net salary.
#[derive(Debug, Parser)]
#[command(name = "payroll", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file ([solver], [calculation], [logging]).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive; overrides the config file.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append logs to this file; overrides the config file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON instead of a text report.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Progressive tax walk; overrides the config file.
    #[arg(long, global = true, value_parser = parse_bracket_walk)]
    pub walk: Option<BracketWalk>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Payslip for a base salary.
    Compute {
        #[arg(long, allow_hyphen_values = true)]
        base: String,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Base salary and payslip for a target net salary.
    Solve {
        #[arg(long, allow_hyphen_values = true)]
        net: String,

        /// Iteration cap; overrides the config file.
        #[arg(long)]
        max_iterations: Option<u32>,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Payslip for a gross salary.
    Gross {
        #[arg(long, allow_hyphen_values = true)]
        gross: String,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Per-bracket tax on an annual income.
    Breakdown {
        #[arg(long)]
        income: Decimal,
    },

    /// List the known contract types.
    Contracts,
}

/// Employee situation shared by the calculating subcommands.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Contract type id (see `payroll contracts`).
    #[arg(long, default_value = "1")]
    pub contract: String,

    /// CNSS regime code; 334 deducts 400 TND a month from gross.
    #[arg(long, default_value = "")]
    pub cnss_code: String,

    /// Amounts are annual rather than monthly.
    #[arg(long, default_value_t = false)]
    pub annual: bool,

    /// The salary is the guaranteed minimum wage; rejects amounts below it.
    #[arg(long, default_value_t = false)]
    pub smig: bool,

    #[arg(long, default_value_t = false)]
    pub family_head: bool,

    /// Child as rank:flags with c=charged, s=student, d=disabled. Repeatable.
    #[arg(long = "child", value_name = "RANK:FLAGS")]
    pub children: Vec<ChildRecord>,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub other_deductions: String,

    /// `--other-deductions` is an annual figure.
    #[arg(long, default_value_t = false)]
    pub other_deductions_annual: bool,
}

impl InputArgs {
    pub fn to_form(
        &self,
        salary_type: SalaryType,
        amount: &str,
    ) -> SalaryForm {
        SalaryForm {
            input_value: amount.to_string(),
            salary_type,
            cnss_code: self.cnss_code.clone(),
            contract_type: self.contract.clone(),
            is_annual: self.annual,
            is_smig: self.smig,
            is_family_head: self.family_head,
            children: self.children.clone(),
            allowances: Vec::new(),
            other_deductions: self.other_deductions.clone(),
            other_deductions_is_annual: self.other_deductions_annual,
        }
    }
}

fn parse_bracket_walk(value: &str) -> Result<BracketWalk, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "cascading" => Ok(BracketWalk::Cascading),
        "marginal" => Ok(BracketWalk::Marginal),
        other => Err(format!("unknown bracket walk '{other}' (cascading or marginal)")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("payroll").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn compute_collects_repeated_children() {
        let cli = parse(&["compute", "--base", "1000", "--child", "1:c", "--child", "2:cs"]);

        let Command::Compute { base, input } = cli.command else {
            panic!("expected compute, got {:?}", cli.command);
        };
        assert_eq!(base, "1000");
        assert_eq!(input.contract, "1");
        assert_eq!(input.children, vec![ChildRecord::charged(1), ChildRecord::student(2)]);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = parse(&["solve", "--net", "888.70", "--json", "--walk", "marginal"]);

        assert!(cli.json);
        assert_eq!(cli.walk, Some(BracketWalk::Marginal));
    }

    #[test]
    fn bad_child_spec_is_a_usage_error() {
        let result = Cli::try_parse_from(["payroll", "compute", "--base", "1", "--child", "x"]);

        assert!(result.is_err());
    }

    #[test]
    fn negative_amount_reaches_validation() {
        let cli = parse(&["gross", "--gross", "-5"]);

        let Command::Gross { gross, .. } = cli.command else {
            panic!("expected gross");
        };
        assert_eq!(gross, "-5");
    }

    #[test]
    fn to_form_carries_every_flag() {
        let cli = parse(&[
            "compute",
            "--base",
            "2000",
            "--contract",
            "2",
            "--cnss-code",
            "334",
            "--annual",
            "--smig",
            "--family-head",
            "--other-deductions",
            "100",
            "--other-deductions-annual",
        ]);
        let Command::Compute { base, input } = cli.command else {
            panic!("expected compute");
        };

        let form = input.to_form(SalaryType::Base, &base);

        assert_eq!(form.input_value, "2000");
        assert_eq!(form.contract_type, "2");
        assert_eq!(form.cnss_code, "334");
        assert!(form.is_annual && form.is_smig && form.is_family_head);
        assert_eq!(form.other_deductions, "100");
        assert!(form.other_deductions_is_annual);
    }
}
