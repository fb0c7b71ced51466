//! Dispatch on the kind of salary figure the caller entered.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculations::{
    NetSalarySolver, PayslipCalculator, SolveOutcome, SolverConfig, SolverConfigError,
};
use crate::models::{SalaryInput, SalaryResult, SalaryType};
use crate::reference::StatutoryRates;

/// A finished calculation together with how its base salary was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    pub salary_type: SalaryType,

    /// The amount the caller entered.
    pub amount: Decimal,

    /// Base salary fed to the forward calculation, in the input's period.
    pub base_salary: Decimal,

    pub result: SalaryResult,

    /// Present only for net-salary requests.
    pub solve: Option<SolveOutcome>,
}

/// Entry point combining the forward calculator and the net-salary solver.
#[derive(Debug, Clone)]
pub struct PayrollEngine<'a> {
    calculator: PayslipCalculator<'a>,
    solver: NetSalarySolver<'a>,
}

impl PayrollEngine<'static> {
    /// Engine over the current reference data with default solver settings.
    pub fn current() -> Self {
        Self::with_calculator(PayslipCalculator::current())
    }
}

impl<'a> PayrollEngine<'a> {
    pub fn with_calculator(calculator: PayslipCalculator<'a>) -> Self {
        Self {
            calculator,
            solver: NetSalarySolver::new(calculator),
        }
    }

    /// # Errors
    ///
    /// Returns [`SolverConfigError`] if `solver_config` fails validation.
    pub fn new(
        calculator: PayslipCalculator<'a>,
        solver_config: SolverConfig,
    ) -> Result<Self, SolverConfigError> {
        Ok(Self {
            calculator,
            solver: NetSalarySolver::with_config(calculator, solver_config)?,
        })
    }

    pub fn calculator(&self) -> &PayslipCalculator<'a> {
        &self.calculator
    }

    pub fn solver(&self) -> &NetSalarySolver<'a> {
        &self.solver
    }

    /// Computes the payslip for `amount` interpreted as `salary_type`.
    ///
    /// Gross requests under the special CNSS code get the monthly offset
    /// added back (twelve times for annual inputs) so that the reported gross
    /// equals the amount entered.
    pub fn calculate(
        &self,
        salary_type: SalaryType,
        amount: Decimal,
        input: &SalaryInput,
    ) -> PayrollCalculation {
        let (base_salary, solve) = match salary_type {
            SalaryType::Base => (amount, None),
            SalaryType::Gross => (self.base_for_gross(amount, input), None),
            SalaryType::Net => {
                let outcome = self.solver.solve_for_net(amount, input);
                (outcome.base_salary, Some(outcome))
            }
        };

        let result = self.calculator.compute(base_salary, input);

        info!(
            salary_type = salary_type.as_str(),
            amount = %amount,
            base_salary = %base_salary,
            net_salary = %result.net_salary,
            "payroll calculated"
        );

        PayrollCalculation {
            salary_type,
            amount,
            base_salary,
            result,
            solve,
        }
    }

    fn base_for_gross(
        &self,
        gross: Decimal,
        input: &SalaryInput,
    ) -> Decimal {
        let base = self.solver.solve_for_gross(gross);
        let rates = self.calculator.rates();

        if input.cnss_code != rates.special_cnss_code {
            return base;
        }

        let offset = if input.is_annual {
            rates.special_cnss_offset * StatutoryRates::months_per_year()
        } else {
            rates.special_cnss_offset
        };
        base + offset
    }
}
