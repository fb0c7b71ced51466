//! Forward payroll calculation: from a base salary to a full payslip.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Monthly base (annual inputs divided by 12) |
//! | 2    | Gross salary (monthly base less 400 TND under CNSS code 334) |
//! | 3    | CNSS: gross × 9.68% (zero for exempt contracts) |
//! | 4    | Annual gross: gross × 12 |
//! | 5    | Head of household deduction: 300 TND |
//! | 6    | Children deductions: 100 / 1000 / 2000 TND per charged child |
//! | 7    | Taxable income: annual gross − lines 5 and 6 |
//! | 8    | Professional expenses: taxable income × 10%, at most 2000 TND |
//! | 9    | Other deductions, annualised |
//! | 10   | IRP base: taxable income − lines 8 and 9 |
//! | 11   | CSS: IRP base × 0.5% / 12 when the annual IRP base exceeds 5000 TND |
//! | 12   | Annual IRPP from the bracket table |
//! | 13   | Monthly IRPP: max(0, line 12 / 12) (zero for exempt contracts) |
//! | 15   | Net salary: gross − CNSS − IRPP − CSS |
//! | 16   | Sector allowances: gross × 10% (reported only) |
//!
//! CSS is assessed on the IRP base, after professional expenses and other
//! deductions, not on taxable income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::SalaryInput;
//! use payroll_core::calculations::PayslipCalculator;
//! use payroll_core::calculations::common::round_half_up;
//!
//! let calculator = PayslipCalculator::current();
//! let result = calculator.compute(dec!(1000), &SalaryInput::default());
//!
//! assert_eq!(round_half_up(result.cnss), dec!(96.80));
//! assert_eq!(round_half_up(result.irpp), dec!(10.00));
//! assert_eq!(round_half_up(result.css), dec!(4.50));
//! assert_eq!(round_half_up(result.net_salary), dec!(888.70));
//! ```

use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::BracketWalk;
use crate::calculations::common::max;
use crate::models::{ChildRecord, MAX_CHILDREN, SalaryInput, SalaryResult};
use crate::reference::{ContractCatalog, ContractLookup, StatutoryRates, TaxTable};

static BUILT_IN_CONTRACTS: ContractCatalog = ContractCatalog;

/// Computes payslips from a base salary.
///
/// Holds references to the reference data it reads; it carries no state of
/// its own, so one instance can serve any number of threads.
#[derive(Clone, Copy)]
pub struct PayslipCalculator<'a> {
    table: &'a TaxTable,
    rates: &'a StatutoryRates,
    contracts: &'a dyn ContractLookup,
    walk: BracketWalk,
}

impl fmt::Debug for PayslipCalculator<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("PayslipCalculator")
            .field("brackets", &self.table.brackets().len())
            .field("walk", &self.walk)
            .finish_non_exhaustive()
    }
}

impl PayslipCalculator<'static> {
    /// Calculator over the current bracket table, rates and contract catalog.
    pub fn current() -> Self {
        Self::new(
            TaxTable::current(),
            StatutoryRates::current(),
            &BUILT_IN_CONTRACTS,
        )
    }
}

impl Default for PayslipCalculator<'static> {
    fn default() -> Self {
        Self::current()
    }
}

impl<'a> PayslipCalculator<'a> {
    /// Creates a calculator over the given reference data.
    ///
    /// # Arguments
    ///
    /// * `table` - Progressive IRPP brackets
    /// * `rates` - CNSS, CSS and deduction rates
    /// * `contracts` - Lookup deciding which contract types are tax exempt
    ///
    /// The bracket walk starts as [`BracketWalk::Cascading`].
    pub fn new(
        table: &'a TaxTable,
        rates: &'a StatutoryRates,
        contracts: &'a dyn ContractLookup,
    ) -> Self {
        Self {
            table,
            rates,
            contracts,
            walk: BracketWalk::default(),
        }
    }

    /// Returns the calculator with `walk` used for the annual IRPP.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_core::calculations::{BracketWalk, PayslipCalculator};
    ///
    /// let calculator = PayslipCalculator::current().with_bracket_walk(BracketWalk::Marginal);
    ///
    /// assert_eq!(calculator.bracket_walk(), BracketWalk::Marginal);
    /// ```
    pub fn with_bracket_walk(
        mut self,
        walk: BracketWalk,
    ) -> Self {
        self.walk = walk;
        self
    }

    /// How the bracket table is walked.
    pub fn bracket_walk(&self) -> BracketWalk {
        self.walk
    }

    pub fn table(&self) -> &'a TaxTable {
        self.table
    }

    pub fn rates(&self) -> &'a StatutoryRates {
        self.rates
    }

    /// Contract lookup, shared with the form validator.
    pub fn contracts(&self) -> &'a dyn ContractLookup {
        self.contracts
    }

    /// Computes the full payslip for `base_salary`.
    ///
    /// # Arguments
    ///
    /// * `base_salary` - Monthly base, or annual when `input.is_annual` is set
    /// * `input` - Contract, CNSS code, family situation and other deductions
    ///
    /// # Returns
    ///
    /// A [`SalaryResult`] with every figure expressed monthly and unrounded.
    ///
    /// Negative or zero salaries flow through the arithmetic unchanged and
    /// only the explicit caps and floors clamp. Amounts are expected within
    /// [`MAX_AMOUNT`](crate::validation::MAX_AMOUNT), which the form
    /// validator enforces; far larger values overflow the decimal type.
    pub fn compute(
        &self,
        base_salary: Decimal,
        input: &SalaryInput,
    ) -> SalaryResult {
        let months = StatutoryRates::months_per_year();

        // Steps 1-2: monthly base and gross
        let monthly_base = self.monthly_base(base_salary, input.is_annual);
        let gross_salary = self.gross_salary(monthly_base, &input.cnss_code);

        // Step 3: social security
        let tax_exempt = self.contracts.is_tax_exempt(&input.contract_type);
        let cnss = self.cnss(gross_salary, tax_exempt);

        // Steps 4-7: taxable income
        let annual_gross = gross_salary * months;
        let family_head = self.family_head_deduction(input.is_family_head);
        let children = self.children_deduction(&input.children);
        let taxable_income = annual_gross - family_head - children;

        // Steps 8-10: IRP base
        let professional_expenses = self.professional_expenses(taxable_income);
        let other_deductions =
            self.other_deductions_annual(input.other_deductions, input.other_deductions_is_annual);
        let irp_base = taxable_income - professional_expenses - other_deductions;
        if irp_base < Decimal::ZERO {
            warn!(irp_base = %irp_base, "deductions exceed income; IRP base is negative");
        }

        // Step 11: solidarity contribution
        let css = self.css(irp_base);

        // Steps 12-14: income tax
        let irpp = if tax_exempt {
            Decimal::ZERO
        } else {
            self.irpp(irp_base)
        };

        // Steps 15-16
        let net_salary = gross_salary - cnss - irpp - css;
        let sector_allowances = gross_salary * self.rates.sector_allowance_rate;

        debug!(
            base_salary = %base_salary,
            gross_salary = %gross_salary,
            taxable_income = %taxable_income,
            irp_base = %irp_base,
            cnss = %cnss,
            irpp = %irpp,
            css = %css,
            net_salary = %net_salary,
            "computed payslip"
        );

        SalaryResult {
            base_salary: monthly_base,
            sector_allowances,
            gross_salary,
            cnss,
            irpp,
            css,
            net_salary,
            professional_expenses: professional_expenses / months,
            taxable_income: taxable_income / months,
            irp_base: irp_base / months,
        }
    }

    /// Annual deduction earned by one child slot.
    pub fn child_deduction(
        &self,
        child: &ChildRecord,
    ) -> Decimal {
        child.tier().annual_amount(&self.rates.child_deductions)
    }

    fn monthly_base(
        &self,
        base_salary: Decimal,
        is_annual: bool,
    ) -> Decimal {
        if is_annual {
            base_salary / StatutoryRates::months_per_year()
        } else {
            base_salary
        }
    }

    fn gross_salary(
        &self,
        monthly_base: Decimal,
        cnss_code: &str,
    ) -> Decimal {
        if cnss_code == self.rates.special_cnss_code {
            monthly_base - self.rates.special_cnss_offset
        } else {
            monthly_base
        }
    }

    fn cnss(
        &self,
        gross_salary: Decimal,
        tax_exempt: bool,
    ) -> Decimal {
        if tax_exempt {
            Decimal::ZERO
        } else {
            gross_salary * self.rates.cnss_rate
        }
    }

    fn family_head_deduction(
        &self,
        is_family_head: bool,
    ) -> Decimal {
        if is_family_head {
            self.rates.family_head_deduction
        } else {
            Decimal::ZERO
        }
    }

    /// Sums the deduction per rank; a later slot with the same rank replaces
    /// an earlier one.
    fn children_deduction(
        &self,
        children: &[ChildRecord],
    ) -> Decimal {
        let mut by_rank = [Decimal::ZERO; MAX_CHILDREN];

        for child in children.iter().filter(|c| c.is_charged) {
            match usize::from(child.rank).checked_sub(1).and_then(|i| by_rank.get_mut(i)) {
                Some(slot) => *slot = self.child_deduction(child),
                None => warn!(rank = child.rank, "child rank outside 1..=4; ignored"),
            }
        }

        by_rank.iter().sum()
    }

    /// Capped at the annual ceiling; not floored, so a negative taxable
    /// income yields a negative allowance.
    fn professional_expenses(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        (taxable_income * self.rates.professional_expenses_rate)
            .min(self.rates.professional_expenses_cap)
    }

    fn other_deductions_annual(
        &self,
        other_deductions: Decimal,
        is_annual: bool,
    ) -> Decimal {
        if is_annual {
            other_deductions
        } else {
            other_deductions * StatutoryRates::months_per_year()
        }
    }

    /// Monthly CSS; the threshold is tested on the annual base.
    fn css(
        &self,
        irp_base_annual: Decimal,
    ) -> Decimal {
        if irp_base_annual > self.rates.css_threshold {
            irp_base_annual * self.rates.css_rate / StatutoryRates::months_per_year()
        } else {
            Decimal::ZERO
        }
    }

    /// Monthly IRPP, never negative.
    fn irpp(
        &self,
        irp_base_annual: Decimal,
    ) -> Decimal {
        let annual = self.table.annual_tax(irp_base_annual, self.walk);
        max(Decimal::ZERO, annual / StatutoryRates::months_per_year())
    }
}
