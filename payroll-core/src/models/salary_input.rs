use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ChildRecord;

/// Number of child slots that take part in the deduction.
pub const MAX_CHILDREN: usize = 4;

/// Employee inputs for one payroll calculation.
///
/// The salary amount itself is passed separately so the same input can be
/// evaluated against many candidate salaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryInput {
    /// CNSS affiliation code. Code `"334"` triggers a fixed monthly offset.
    pub cnss_code: String,

    /// Contract type id, resolved through a contract catalog.
    pub contract_type: String,

    /// Whether the salary amount is an annual figure.
    pub is_annual: bool,

    /// Head of household ("chef de famille").
    pub is_family_head: bool,

    /// The four child slots, ranks 1 through 4.
    pub children: [ChildRecord; MAX_CHILDREN],

    /// Other deductible amounts (pension, life insurance, ...).
    pub other_deductions: Decimal,

    /// Whether `other_deductions` is an annual figure.
    pub other_deductions_is_annual: bool,
}

impl Default for SalaryInput {
    fn default() -> Self {
        Self {
            cnss_code: String::new(),
            contract_type: "1".to_string(),
            is_annual: false,
            is_family_head: false,
            children: [1, 2, 3, 4].map(ChildRecord::new),
            other_deductions: Decimal::ZERO,
            other_deductions_is_annual: false,
        }
    }
}

impl SalaryInput {
    /// Replaces the slot matching `child.rank`. Ranks outside 1..=4 are ignored.
    pub fn with_child(
        mut self,
        child: ChildRecord,
    ) -> Self {
        if let Some(slot) = self.children.iter_mut().find(|c| c.rank == child.rank) {
            *slot = child;
        }
        self
    }

    pub fn charged_children(&self) -> usize {
        self.children.iter().filter(|c| c.is_charged).count()
    }
}
