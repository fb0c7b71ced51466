//! Progressive income tax over a [`TaxTable`].
//!
//! Two walks over the schedule are supported:
//!
//! | Walk        | Slice taxed in bracket `[min, max)`                               |
//! |-------------|-------------------------------------------------------------------|
//! | `Cascading` | `min(remaining - min, max - min)` while `remaining > min`, then `remaining -= slice` |
//! | `Marginal`  | `min(max(0, income - min), max - min)`                            |
//!
//! The cascading walk is the one the published payslip figures are computed
//! with and is the default. Both walks are continuous and non-decreasing in
//! income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TaxBracket;
use crate::calculations::common::max;
use crate::reference::TaxTable;

/// How income is distributed across the brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketWalk {
    /// Running remainder; each bracket consumes from what the previous
    /// brackets left over.
    #[default]
    Cascading,
    /// Textbook marginal rates; each bracket taxes the part of income that
    /// falls inside it.
    Marginal,
}

impl BracketWalk {
    /// Lowercase name, as accepted by `--walk` and the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cascading => "cascading",
            Self::Marginal => "marginal",
        }
    }
}

/// Income taxed in one bracket and the tax it produces, in annual TND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub bracket: TaxBracket,
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

impl TaxTable {
    /// Splits `income` over every bracket of the table.
    ///
    /// Brackets that receive nothing are still listed with zero amounts, so
    /// the result always has one entry per bracket.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::calculations::BracketWalk;
    /// use payroll_core::reference::TaxTable;
    ///
    /// let slices = TaxTable::current().breakdown(dec!(10800), BracketWalk::Marginal);
    ///
    /// assert_eq!(slices[1].taxable_amount, dec!(5000));
    /// assert_eq!(slices[2].taxable_amount, dec!(800));
    /// ```
    pub fn breakdown(
        &self,
        income: Decimal,
        walk: BracketWalk,
    ) -> Vec<BracketSlice> {
        let mut remaining = income;

        self.brackets()
            .iter()
            .map(|bracket| {
                let taxable_amount = match walk {
                    BracketWalk::Cascading => {
                        if remaining > bracket.min_income {
                            let slice = (remaining - bracket.min_income)
                                .min(bracket.width().unwrap_or(remaining));
                            remaining -= slice;
                            slice
                        } else {
                            Decimal::ZERO
                        }
                    }
                    BracketWalk::Marginal => {
                        let above = max(Decimal::ZERO, income - bracket.min_income);
                        match bracket.width() {
                            Some(width) => above.min(width),
                            None => above,
                        }
                    }
                };

                BracketSlice {
                    bracket: bracket.clone(),
                    taxable_amount,
                    tax: taxable_amount * bracket.tax_rate,
                }
            })
            .collect()
    }

    /// Annual tax owed on `income`.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::calculations::BracketWalk;
    /// use payroll_core::reference::TaxTable;
    ///
    /// let table = TaxTable::current();
    ///
    /// assert_eq!(table.annual_tax(dec!(10800), BracketWalk::Cascading), dec!(120));
    /// assert_eq!(table.annual_tax(dec!(10800), BracketWalk::Marginal), dec!(950));
    /// ```
    pub fn annual_tax(
        &self,
        income: Decimal,
        walk: BracketWalk,
    ) -> Decimal {
        self.breakdown(income, walk).iter().map(|s| s.tax).sum()
    }
}
