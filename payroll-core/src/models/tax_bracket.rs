use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One slice of the progressive income-tax schedule, in annual TND.
///
/// `max_income` is `None` for the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    /// Width of the bracket, or `None` when it has no upper bound.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.min_income)
    }

    pub fn is_open_ended(&self) -> bool {
        self.max_income.is_none()
    }
}
