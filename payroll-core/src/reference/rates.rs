use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::Serialize;

/// Annual per-child deduction amounts in TND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildDeductions {
    pub standard: Decimal,
    pub student: Decimal,
    pub disabled: Decimal,
}

/// Statutory minimum wage (SMIG) figures in TND.
///
/// Only used as a validation floor; never enters the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Smig {
    pub hourly_48h: Decimal,
    pub hourly_40h: Decimal,
    pub monthly_48h: Decimal,
    pub monthly_40h: Decimal,
}

/// Fixed-rate constants of the payroll calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatutoryRates {
    /// CNSS employee contribution rate, applied to gross salary.
    pub cnss_rate: Decimal,

    /// CSS rate, applied to the annual IRP base.
    pub css_rate: Decimal,

    /// CSS only applies when the annual IRP base is strictly above this.
    pub css_threshold: Decimal,

    pub professional_expenses_rate: Decimal,

    /// Annual cap on the professional expenses allowance.
    pub professional_expenses_cap: Decimal,

    /// Annual deduction for a head of household.
    pub family_head_deduction: Decimal,

    pub child_deductions: ChildDeductions,

    /// CNSS code that carries a fixed monthly offset.
    pub special_cnss_code: &'static str,

    /// Monthly amount removed from base salary under `special_cnss_code`.
    pub special_cnss_offset: Decimal,

    /// Share of gross reported as sector allowances.
    pub sector_allowance_rate: Decimal,

    pub smig: Smig,
}

static CURRENT: LazyLock<StatutoryRates> = LazyLock::new(|| StatutoryRates {
    cnss_rate: Decimal::new(968, 4),
    css_rate: Decimal::new(5, 3),
    css_threshold: Decimal::from(5000),
    professional_expenses_rate: Decimal::new(10, 2),
    professional_expenses_cap: Decimal::from(2000),
    family_head_deduction: Decimal::from(300),
    child_deductions: ChildDeductions {
        standard: Decimal::from(100),
        student: Decimal::from(1000),
        disabled: Decimal::from(2000),
    },
    special_cnss_code: "334",
    special_cnss_offset: Decimal::from(400),
    sector_allowance_rate: Decimal::new(10, 2),
    smig: Smig {
        hourly_48h: Decimal::new(2540, 3),
        hourly_40h: Decimal::new(2618, 3),
        monthly_48h: Decimal::new(528320, 3),
        monthly_40h: Decimal::new(448238, 3),
    },
});

impl StatutoryRates {
    /// The rates currently in force.
    pub fn current() -> &'static StatutoryRates {
        &CURRENT
    }

    pub fn months_per_year() -> Decimal {
        Decimal::from(12)
    }
}
