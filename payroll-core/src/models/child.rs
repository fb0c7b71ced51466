use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reference::ChildDeductions;

/// Which annual deduction a dependent child earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildDeductionTier {
    /// The child is not a dependent; contributes nothing.
    NotCharged,
    Standard,
    Student,
    Disabled,
}

impl ChildDeductionTier {
    /// Annual amount for this tier under the given deduction schedule.
    pub fn annual_amount(
        &self,
        schedule: &ChildDeductions,
    ) -> Decimal {
        match self {
            Self::NotCharged => Decimal::ZERO,
            Self::Standard => schedule.standard,
            Self::Student => schedule.student,
            Self::Disabled => schedule.disabled,
        }
    }
}

/// Errors from parsing a `rank:flags` child spec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChildSpecError {
    #[error("child spec '{0}' must look like rank:flags, e.g. 2:cs")]
    MissingSeparator(String),

    #[error("child rank '{0}' must be a positive integer")]
    InvalidRank(String),

    #[error("unknown child flag '{flag}' in '{spec}' (expected c, s or d)")]
    UnknownFlag { spec: String, flag: char },
}

/// A child slot on the salary form.
///
/// `rank` is 1-based; only ranks 1 through 4 are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub rank: u8,
    pub is_charged: bool,
    pub is_disabled: bool,
    pub is_student: bool,
}

impl ChildRecord {
    /// An empty (non-dependent) slot at `rank`.
    pub fn new(rank: u8) -> Self {
        Self {
            rank,
            is_charged: false,
            is_disabled: false,
            is_student: false,
        }
    }

    pub fn charged(rank: u8) -> Self {
        Self {
            is_charged: true,
            ..Self::new(rank)
        }
    }

    pub fn student(rank: u8) -> Self {
        Self {
            is_student: true,
            ..Self::charged(rank)
        }
    }

    pub fn disabled(rank: u8) -> Self {
        Self {
            is_disabled: true,
            ..Self::charged(rank)
        }
    }

    /// Disabled takes precedence over student.
    pub fn tier(&self) -> ChildDeductionTier {
        match (self.is_charged, self.is_disabled, self.is_student) {
            (false, _, _) => ChildDeductionTier::NotCharged,
            (true, true, _) => ChildDeductionTier::Disabled,
            (true, false, true) => ChildDeductionTier::Student,
            (true, false, false) => ChildDeductionTier::Standard,
        }
    }
}

/// Parses `rank:flags`, where flags combine `c` (charged), `s` (student)
/// and `d` (disabled). An empty flag list is an uncharged slot.
///
/// ```
/// use payroll_core::ChildRecord;
///
/// let child: ChildRecord = "2:cs".parse().unwrap();
/// assert_eq!(child, ChildRecord::student(2));
/// ```
impl FromStr for ChildRecord {
    type Err = ChildSpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        let (rank, flags) = spec
            .split_once(':')
            .ok_or_else(|| ChildSpecError::MissingSeparator(spec.to_string()))?;

        let rank = rank.trim();
        let rank = match rank.parse::<u8>() {
            Ok(r) if r > 0 => r,
            _ => return Err(ChildSpecError::InvalidRank(rank.to_string())),
        };

        let mut child = Self::new(rank);
        for flag in flags.trim().chars() {
            match flag.to_ascii_lowercase() {
                'c' => child.is_charged = true,
                's' => child.is_student = true,
                'd' => child.is_disabled = true,
                _ => {
                    return Err(ChildSpecError::UnknownFlag {
                        spec: spec.to_string(),
                        flag,
                    });
                }
            }
        }
        Ok(child)
    }
}

impl ChildRecord {
    /// Parses a `;`-separated list of child specs, skipping empty entries.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, ChildSpecError> {
        list.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::from_str)
            .collect()
    }
}
