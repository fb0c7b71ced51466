use std::sync::LazyLock;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::TaxBracket;

/// Errors raised when a bracket table breaks its ordering invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("no tax brackets provided")]
    Empty,

    /// Bracket `index` does not start where the previous one ended.
    #[error("bracket {index} starts at {found}, expected {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    /// Bracket `index` has an upper bound at or below its lower bound.
    #[error("bracket {index} is empty or inverted ({min} to {max})")]
    InvertedBracket {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    /// An open-ended bracket appears before the end of the table.
    #[error("open-ended bracket at position {0} is not the last one")]
    OpenBracketNotLast(usize),

    #[error("last bracket must be open-ended")]
    MissingOpenBracket,

    #[error("bracket {index} has a rate outside [0, 1]: {rate}")]
    InvalidRate { index: usize, rate: Decimal },
}

/// An ordered, contiguous progressive tax schedule in annual TND.
///
/// Exactly one bracket is open-ended and it is the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTable {
    brackets: Vec<TaxBracket>,
}

static CURRENT: LazyLock<TaxTable> = LazyLock::new(|| {
    let bounds = [0, 5000, 10000, 20000, 30000, 40000, 50000, 70000];
    let rates: [i64; 8] = [0, 15, 25, 30, 33, 36, 38, 40];

    let brackets = bounds
        .iter()
        .zip(rates)
        .enumerate()
        .map(|(i, (&min, rate))| {
            TaxBracket::new(
                Decimal::from(min),
                bounds.get(i + 1).map(|&max| Decimal::from(max)),
                Decimal::new(rate, 2),
            )
        })
        .collect();

    TaxTable { brackets }
});

impl TaxTable {
    /// Builds a table after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableError`] if the brackets are empty, not contiguous,
    /// inverted, carry a rate outside `[0, 1]`, or do not end with exactly one
    /// open-ended bracket.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, TaxTableError> {
        if brackets.is_empty() {
            return Err(TaxTableError::Empty);
        }

        let last = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(TaxTableError::InvalidRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }

            match bracket.max_income {
                None if index != last => return Err(TaxTableError::OpenBracketNotLast(index)),
                Some(_) if index == last => return Err(TaxTableError::MissingOpenBracket),
                Some(max) if max <= bracket.min_income => {
                    return Err(TaxTableError::InvertedBracket {
                        index,
                        min: bracket.min_income,
                        max,
                    });
                }
                _ => {}
            }

            if let Some(next) = brackets.get(index + 1) {
                let expected = bracket.max_income.unwrap_or(Decimal::MAX);
                if next.min_income != expected {
                    return Err(TaxTableError::NotContiguous {
                        index: index + 1,
                        expected,
                        found: next.min_income,
                    });
                }
            }
        }

        Ok(Self { brackets })
    }

    /// The schedule currently in force.
    pub fn current() -> &'static TaxTable {
        &CURRENT
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}
