use std::fs::File;
use std::io::Read;
use std::path::Path;

use payroll_core::calculations::common::round_half_up;
use payroll_core::validation::{SalaryForm, validate_form};
use payroll_core::{ChildRecord, PayrollCalculation, PayrollEngine, SalaryInput, SalaryType};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading or evaluating payslip records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayslipLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Failed to open {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid record for '{employee}': {reason}")]
    InvalidRecord { employee: String, reason: String },
}

impl From<csv::Error> for PayslipLoadError {
    fn from(err: csv::Error) -> Self {
        PayslipLoadError::CsvParse(err.to_string())
    }
}

/// A single row of the batch payslip CSV.
///
/// Columns:
/// - `employee`: free-form identifier, echoed in reports
/// - `salary_type`: `base`, `gross` or `net`
/// - `amount`: the figure to interpret according to `salary_type`
/// - `contract`: contract id (empty means `1`)
/// - `cnss_code`: CNSS regime code, may be empty
/// - `is_annual`, `is_family_head`, `other_deductions_is_annual`: booleans
///   (`true`/`false`, `1`/`0`, `yes`/`no`, empty is false)
/// - `children`: `;`-separated `rank:flags` specs, e.g. `1:c;2:cs`
/// - `other_deductions`: amount in the same period as its flag (empty is 0)
/// - `expected_cnss`, `expected_irpp`, `expected_css`, `expected_net`:
///   optional monthly figures to check the calculation against
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayslipRecord {
    pub employee: String,
    #[serde(deserialize_with = "deserialize_salary_type")]
    pub salary_type: SalaryType,
    pub amount: Decimal,
    #[serde(default = "default_contract", deserialize_with = "deserialize_contract")]
    pub contract: String,
    #[serde(default)]
    pub cnss_code: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_annual: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_family_head: bool,
    #[serde(default, deserialize_with = "deserialize_children")]
    pub children: Vec<ChildRecord>,
    #[serde(default, deserialize_with = "deserialize_decimal_or_zero")]
    pub other_deductions: Decimal,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub other_deductions_is_annual: bool,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub expected_cnss: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub expected_irpp: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub expected_css: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub expected_net: Option<Decimal>,
}

/// One expected figure that the calculation did not reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub field: &'static str,
    pub expected: Decimal,
    /// The calculated value, rounded to two decimals.
    pub actual: Decimal,
}

impl Mismatch {
    pub fn difference(&self) -> Decimal {
        (self.actual - self.expected).abs()
    }
}

fn default_contract() -> String {
    "1".to_string()
}

fn deserialize_salary_type<'de, D>(deserializer: D) -> Result<SalaryType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    SalaryType::parse(&s).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid salary type '{s}' (expected base, gross or net)"))
    })
}

fn deserialize_contract<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Ok(default_contract()),
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    let Some(s) = s else {
        return Ok(false);
    };
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "n" => Ok(false),
        "true" | "1" | "yes" | "y" => Ok(true),
        other => Err(serde::de::Error::custom(format!("invalid boolean '{other}'"))),
    }
}

fn deserialize_children<'de, D>(deserializer: D) -> Result<Vec<ChildRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) => ChildRecord::parse_list(&s).map_err(serde::de::Error::custom),
        None => Ok(Vec::new()),
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_optional_decimal(deserializer).map(Option::unwrap_or_default)
}

impl PayslipRecord {
    /// The record as a salary form, for running the form rules.
    pub fn to_form(&self) -> SalaryForm {
        SalaryForm {
            input_value: self.amount.to_string(),
            salary_type: self.salary_type,
            cnss_code: self.cnss_code.clone(),
            contract_type: self.contract.clone(),
            is_annual: self.is_annual,
            is_smig: false,
            is_family_head: self.is_family_head,
            children: self.children.clone(),
            allowances: Vec::new(),
            other_deductions: self.other_deductions.to_string(),
            other_deductions_is_annual: self.other_deductions_is_annual,
        }
    }

    pub fn to_input(&self) -> SalaryInput {
        let mut input = SalaryInput {
            cnss_code: self.cnss_code.clone(),
            contract_type: self.contract.clone(),
            is_annual: self.is_annual,
            is_family_head: self.is_family_head,
            other_deductions: self.other_deductions,
            other_deductions_is_annual: self.other_deductions_is_annual,
            ..SalaryInput::default()
        };
        for child in &self.children {
            input = input.with_child(*child);
        }
        input
    }

    pub fn has_expectations(&self) -> bool {
        self.expected_cnss.is_some()
            || self.expected_irpp.is_some()
            || self.expected_css.is_some()
            || self.expected_net.is_some()
    }
}

/// Loader for batch payslip data from CSV files.
pub struct PayslipLoader;

impl PayslipLoader {
    /// Parse payslip records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<PayslipRecord>, PayslipLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: PayslipRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "Parsed payslip records");
        Ok(records)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<PayslipRecord>, PayslipLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PayslipLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(file)
    }

    /// Validates and calculates every record, in input order.
    ///
    /// A record that fails the form rules yields
    /// [`PayslipLoadError::InvalidRecord`]; the others are still calculated.
    pub fn evaluate(
        engine: &PayrollEngine<'_>,
        records: &[PayslipRecord],
    ) -> Vec<Result<PayrollCalculation, PayslipLoadError>> {
        let contracts = engine.calculator().contracts();

        records
            .iter()
            .map(|record| {
                let errors = validate_form(&record.to_form(), contracts);
                if !errors.is_empty() {
                    let reason = errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; ");
                    warn!(employee = %record.employee, %reason, "Skipping invalid payslip record");
                    return Err(PayslipLoadError::InvalidRecord {
                        employee: record.employee.clone(),
                        reason,
                    });
                }

                Ok(engine.calculate(record.salary_type, record.amount, &record.to_input()))
            })
            .collect()
    }

    /// Compares the record's expected figures with a calculation.
    ///
    /// Calculated values are rounded to two decimals first; a figure
    /// mismatches when it differs by more than `tolerance`.
    pub fn compare(
        record: &PayslipRecord,
        calculation: &PayrollCalculation,
        tolerance: Decimal,
    ) -> Vec<Mismatch> {
        let result = &calculation.result;
        let checks = [
            ("cnss", record.expected_cnss, result.cnss),
            ("irpp", record.expected_irpp, result.irpp),
            ("css", record.expected_css, result.css),
            ("net", record.expected_net, result.net_salary),
        ];

        checks
            .into_iter()
            .filter_map(|(field, expected, actual)| {
                let expected = expected?;
                let mismatch = Mismatch {
                    field,
                    expected,
                    actual: round_half_up(actual),
                };
                (mismatch.difference() > tolerance).then_some(mismatch)
            })
            .collect()
    }
}
