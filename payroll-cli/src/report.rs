//! Plain-text rendering of calculation results.
//!
//! Amounts use the French-Tunisian layout: two decimals, a comma decimal
//! mark and spaces between thousands (`1 234,56`).

use std::fmt;

use payroll_core::calculations::common::round_half_up;
use payroll_core::calculations::{BracketSlice, BracketWalk};
use payroll_core::{ContractType, PayrollCalculation, SalaryType};
use rust_decimal::Decimal;

const LABEL_WIDTH: usize = 26;
const AMOUNT_WIDTH: usize = 14;

/// Formats `value` as a two-decimal fr-TN amount.
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_cli::report::format_currency;
///
/// assert_eq!(format_currency(dec!(1234.567)), "1 234,57");
/// assert_eq!(format_currency(dec!(-96.8)), "-96,80");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped},{fraction}")
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Monthly payslip for one calculation.
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_cli::report::PayslipReport;
/// use payroll_core::{PayrollEngine, SalaryInput, SalaryType};
///
/// let calculation =
///     PayrollEngine::current().calculate(SalaryType::Base, dec!(1000), &SalaryInput::default());
///
/// assert!(PayslipReport(&calculation).to_string().contains("888,70"));
/// ```
pub struct PayslipReport<'a>(pub &'a PayrollCalculation);

/// Per-bracket split of an annual income.
pub struct BreakdownReport<'a> {
    pub income: Decimal,
    pub walk: BracketWalk,
    pub slices: &'a [BracketSlice],
}

pub struct ContractsReport<'a>(pub &'a [ContractType]);

fn line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    writeln!(
        f,
        "  {label:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}",
        format_currency(amount)
    )
}

impl fmt::Display for PayslipReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let calculation = self.0;
        let r = &calculation.result;

        writeln!(f, "Payslip (monthly, TND)")?;
        let entered = match calculation.salary_type {
            SalaryType::Base => "Entered base salary",
            SalaryType::Gross => "Entered gross salary",
            SalaryType::Net => "Target net salary",
        };
        line(f, entered, calculation.amount)?;
        writeln!(f)?;

        line(f, "Base salary", r.base_salary)?;
        line(f, "Gross salary", r.gross_salary)?;
        line(f, "CNSS", -r.cnss)?;
        line(f, "IRPP", -r.irpp)?;
        line(f, "CSS", -r.css)?;
        writeln!(f, "  {}", "-".repeat(LABEL_WIDTH + AMOUNT_WIDTH))?;
        line(f, "Net salary", r.net_salary)?;
        writeln!(f)?;

        line(f, "Sector allowances", r.sector_allowances)?;
        line(f, "Professional expenses", r.professional_expenses)?;
        line(f, "Taxable income", r.taxable_income)?;
        line(f, "IRP base", r.irp_base)?;

        if let Some(solve) = &calculation.solve {
            writeln!(f)?;
            let status = if solve.converged {
                "converged"
            } else {
                "did not converge"
            };
            writeln!(
                f,
                "  Solver {status} after {} iterations (residual {})",
                solve.iterations,
                format_currency(solve.residual)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for BreakdownReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "Annual tax on {} TND ({} walk)",
            format_currency(self.income),
            self.walk.as_str()
        )?;
        writeln!(
            f,
            "  {:>12} {:>12} {:>6} {:>14} {:>12}",
            "from", "to", "rate", "taxed", "tax"
        )?;

        for slice in self.slices {
            let bracket = &slice.bracket;
            let upper = bracket
                .max_income
                .map(format_currency)
                .unwrap_or_else(|| "and above".to_string());
            writeln!(
                f,
                "  {:>12} {:>12} {:>6} {:>14} {:>12}",
                format_currency(bracket.min_income),
                upper,
                percent(bracket.tax_rate),
                format_currency(slice.taxable_amount),
                format_currency(slice.tax)
            )?;
        }

        let total: Decimal = self.slices.iter().map(|s| s.tax).sum();
        writeln!(f, "  Total {:>55}", format_currency(total))?;
        writeln!(f, "  Monthly {:>53}", format_currency(total / Decimal::from(12)))
    }
}

impl fmt::Display for ContractsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for contract in self.0 {
            let exempt = if contract.tax_exempt { "exempt" } else { "taxed" };
            writeln!(
                f,
                "  {:>2}  {:<10} {:<10} {:<6} {}",
                contract.id,
                contract.label,
                contract.category.as_str(),
                exempt,
                contract.description
            )?;
        }
        Ok(())
    }
}
