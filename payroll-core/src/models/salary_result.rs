use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payslip figures produced by the forward calculation.
///
/// Every field is a monthly amount regardless of the input period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryResult {
    /// Monthly base salary before the CNSS-334 offset.
    pub base_salary: Decimal,

    /// Sector allowances (10% of gross). Reported only; never deducted.
    pub sector_allowances: Decimal,

    pub gross_salary: Decimal,

    /// Social security contribution.
    pub cnss: Decimal,

    /// Personal income tax.
    pub irpp: Decimal,

    /// Social solidarity contribution.
    pub css: Decimal,

    pub net_salary: Decimal,

    /// Professional expenses allowance ("frais professionnels").
    pub professional_expenses: Decimal,

    /// Income after family and children deductions.
    pub taxable_income: Decimal,

    /// Income after professional expenses and other deductions.
    pub irp_base: Decimal,
}

impl SalaryResult {
    /// Total withheld from gross to reach net.
    pub fn total_withholdings(&self) -> Decimal {
        self.cnss + self.irpp + self.css
    }
}
