use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::reference::{ContractLookup, StatutoryRates, find_allowance};
use crate::validation::number::{parse_amount, parse_formatted_number};
use crate::{ChildRecord, MAX_CHILDREN, SalaryInput, SalaryType};

/// One optional allowance line as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowanceEntry {
    pub id: String,
    pub value: String,
    pub is_annual: bool,
}

/// Raw salary form values, before any conversion.
///
/// Amounts are kept as text so that validation can report what the user
/// actually typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalaryForm {
    pub input_value: String,
    pub salary_type: SalaryType,
    pub cnss_code: String,
    pub contract_type: String,
    pub is_annual: bool,
    /// The employee is paid the guaranteed minimum wage.
    pub is_smig: bool,
    pub is_family_head: bool,
    pub children: Vec<ChildRecord>,
    pub allowances: Vec<AllowanceEntry>,
    pub other_deductions: String,
    pub other_deductions_is_annual: bool,
}

/// Largest salary or deduction amount the form accepts, in TND.
///
/// Keeps every product the calculator forms well inside the range of
/// [`Decimal`].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A form rule that failed, keyed by the offending field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl SalaryForm {
    /// The entered amount, read leniently. Unparseable text is zero.
    pub fn amount(&self) -> Decimal {
        parse_formatted_number(&self.input_value)
    }

    /// Converts the form into calculator input.
    ///
    /// Children are placed by rank; records with a rank outside 1..=4 are
    /// dropped. Call [`validate_form`] first if the form may be invalid.
    pub fn to_input(&self) -> SalaryInput {
        let mut input = SalaryInput {
            cnss_code: self.cnss_code.clone(),
            contract_type: self.contract_type.clone(),
            is_annual: self.is_annual,
            is_family_head: self.is_family_head,
            other_deductions: parse_formatted_number(&self.other_deductions),
            other_deductions_is_annual: self.other_deductions_is_annual,
            ..SalaryInput::default()
        };
        for child in &self.children {
            input = input.with_child(*child);
        }
        input
    }
}

/// Runs every form rule and returns all failures, in field order.
///
/// An empty vector means the form can be converted and calculated.
pub fn validate_form(
    form: &SalaryForm,
    contracts: &dyn ContractLookup,
) -> Vec<ValidationError> {
    let rates = StatutoryRates::current();

    let mut errors: Vec<ValidationError> = [
        check_input_value(form),
        check_contract(form, contracts),
        check_smig(form, rates),
        check_children(form),
    ]
    .into_iter()
    .flatten()
    .collect();

    errors.extend(form.allowances.iter().filter_map(check_allowance));
    errors.extend(check_other_deductions(form));

    debug!(errors = errors.len(), "Validated salary form");
    errors
}

fn check_input_value(form: &SalaryForm) -> Option<ValidationError> {
    match parse_amount(&form.input_value) {
        None => Some(ValidationError::new(
            "input_value",
            "salary must be a valid number",
        )),
        Some(value) if value < Decimal::ZERO => Some(ValidationError::new(
            "input_value",
            "salary cannot be negative",
        )),
        Some(value) if value > MAX_AMOUNT => Some(ValidationError::new(
            "input_value",
            format!("salary cannot exceed {MAX_AMOUNT} TND"),
        )),
        Some(_) => None,
    }
}

fn check_contract(
    form: &SalaryForm,
    contracts: &dyn ContractLookup,
) -> Option<ValidationError> {
    if contracts.find(&form.contract_type).is_some() {
        return None;
    }
    Some(ValidationError::new(
        "contract_type",
        format!("unknown contract type \"{}\"", form.contract_type),
    ))
}

fn check_smig(
    form: &SalaryForm,
    rates: &StatutoryRates,
) -> Option<ValidationError> {
    if !form.is_smig {
        return None;
    }

    let minimum = if form.is_annual {
        rates.smig.monthly_40h * StatutoryRates::months_per_year()
    } else {
        rates.smig.monthly_40h
    };

    let value = parse_amount(&form.input_value)?;
    if value >= minimum {
        return None;
    }
    Some(ValidationError::new(
        "input_value",
        format!("salary cannot be below the SMIG ({minimum:.3} TND)"),
    ))
}

fn check_children(form: &SalaryForm) -> Option<ValidationError> {
    let charged = form.children.iter().filter(|c| c.is_charged).count();
    if charged <= MAX_CHILDREN {
        return None;
    }
    Some(ValidationError::new(
        "children",
        format!("at most {MAX_CHILDREN} dependent children can be declared, got {charged}"),
    ))
}

fn check_allowance(entry: &AllowanceEntry) -> Option<ValidationError> {
    if entry.value.trim().is_empty() {
        return None;
    }
    let name = find_allowance(&entry.id).map_or(entry.id.as_str(), |a| a.label);
    match parse_amount(&entry.value) {
        Some(value) if value >= Decimal::ZERO => None,
        _ => Some(ValidationError::new(
            format!("allowance_{}", entry.id),
            format!("{name} allowance must be a non-negative number"),
        )),
    }
}

fn check_other_deductions(form: &SalaryForm) -> Option<ValidationError> {
    if form.other_deductions.trim().is_empty() {
        return None;
    }
    match parse_amount(&form.other_deductions) {
        Some(value) if value > MAX_AMOUNT => Some(ValidationError::new(
            "other_deductions",
            format!("other deductions cannot exceed {MAX_AMOUNT} TND"),
        )),
        Some(value) if value >= Decimal::ZERO => None,
        _ => Some(ValidationError::new(
            "other_deductions",
            "other deductions must be a non-negative number",
        )),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::reference::ContractCatalog;

    fn valid_form() -> SalaryForm {
        SalaryForm {
            input_value: "1000".to_string(),
            contract_type: "1".to_string(),
            ..SalaryForm::default()
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    // =========================================================================
    // validate_form tests
    // =========================================================================

    #[test]
    fn valid_form_has_no_errors() {
        assert_eq!(validate_form(&valid_form(), &ContractCatalog), vec![]);
    }

    #[test]
    fn rejects_non_numeric_salary() {
        let form = SalaryForm {
            input_value: "abc".to_string(),
            ..valid_form()
        };
        assert_eq!(fields(&validate_form(&form, &ContractCatalog)), vec!["input_value"]);
    }

    #[test]
    fn rejects_negative_salary() {
        let form = SalaryForm {
            input_value: "-10".to_string(),
            ..valid_form()
        };
        let errors = validate_form(&form, &ContractCatalog);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "salary cannot be negative");
    }

    #[test]
    fn rejects_salary_above_maximum() {
        let form = SalaryForm {
            input_value: "9999999999999999999999999999".to_string(),
            ..valid_form()
        };

        let errors = validate_form(&form, &ContractCatalog);

        assert_eq!(fields(&errors), vec!["input_value"]);
        assert_eq!(errors[0].message, "salary cannot exceed 1000000000 TND");
    }

    #[test]
    fn largest_accepted_amounts_compute_without_overflow() {
        let form = SalaryForm {
            input_value: MAX_AMOUNT.to_string(),
            other_deductions: MAX_AMOUNT.to_string(),
            ..valid_form()
        };
        assert_eq!(validate_form(&form, &ContractCatalog), vec![]);

        let result = crate::PayslipCalculator::current().compute(form.amount(), &form.to_input());

        assert!(result.net_salary > Decimal::ZERO);
    }

    #[test]
    fn rejects_other_deductions_above_maximum() {
        let form = SalaryForm {
            other_deductions: "1000000000.01".to_string(),
            ..valid_form()
        };

        assert_eq!(fields(&validate_form(&form, &ContractCatalog)), vec!["other_deductions"]);
    }

    #[test]
    fn error_displays_field_and_message() {
        let error = ValidationError::new("children", "too many");

        assert_eq!(error.to_string(), "children: too many");
    }

    #[test]
    fn accepts_zero_salary() {
        let form = SalaryForm {
            input_value: "0".to_string(),
            ..valid_form()
        };
        assert!(validate_form(&form, &ContractCatalog).is_empty());
    }

    #[test]
    fn rejects_unknown_contract() {
        let form = SalaryForm {
            contract_type: "99".to_string(),
            ..valid_form()
        };
        assert_eq!(fields(&validate_form(&form, &ContractCatalog)), vec!["contract_type"]);
    }

    #[test]
    fn smig_floor_applies_only_when_flagged() {
        let below = SalaryForm {
            input_value: "400".to_string(),
            ..valid_form()
        };
        assert!(validate_form(&below, &ContractCatalog).is_empty());

        let flagged = SalaryForm {
            is_smig: true,
            ..below
        };
        let errors = validate_form(&flagged, &ContractCatalog);
        assert_eq!(fields(&errors), vec!["input_value"]);
        assert!(errors[0].message.contains("448.238"));
    }

    #[test]
    fn smig_floor_is_annualized() {
        let form = SalaryForm {
            input_value: "5000".to_string(),
            is_smig: true,
            is_annual: true,
            ..valid_form()
        };
        let errors = validate_form(&form, &ContractCatalog);
        assert_eq!(fields(&errors), vec!["input_value"]);
        assert!(errors[0].message.contains("5378.856"));

        let at_floor = SalaryForm {
            input_value: "5378.856".to_string(),
            ..form
        };
        assert!(validate_form(&at_floor, &ContractCatalog).is_empty());
    }

    #[test]
    fn rejects_more_than_four_charged_children() {
        let form = SalaryForm {
            children: (1..=5).map(ChildRecord::charged).collect(),
            ..valid_form()
        };
        assert_eq!(fields(&validate_form(&form, &ContractCatalog)), vec!["children"]);
    }

    #[test]
    fn uncharged_children_do_not_count() {
        let mut children: Vec<ChildRecord> = (1..=4).map(ChildRecord::charged).collect();
        children.push(ChildRecord::new(5));
        let form = SalaryForm {
            children,
            ..valid_form()
        };
        assert!(validate_form(&form, &ContractCatalog).is_empty());
    }

    #[test]
    fn rejects_negative_allowance_by_id() {
        let form = SalaryForm {
            allowances: vec![
                AllowanceEntry {
                    id: "transport".to_string(),
                    value: "-1".to_string(),
                    is_annual: false,
                },
                AllowanceEntry {
                    id: "repas".to_string(),
                    value: String::new(),
                    is_annual: false,
                },
            ],
            ..valid_form()
        };
        let errors = validate_form(&form, &ContractCatalog);
        assert_eq!(fields(&errors), vec!["allowance_transport"]);
        assert_eq!(errors[0].message, "Transport allowance must be a non-negative number");
    }

    #[test]
    fn rejects_invalid_other_deductions() {
        let form = SalaryForm {
            other_deductions: "x".to_string(),
            ..valid_form()
        };
        assert_eq!(
            fields(&validate_form(&form, &ContractCatalog)),
            vec!["other_deductions"]
        );
    }

    #[test]
    fn reports_every_failure_in_field_order() {
        let form = SalaryForm {
            input_value: "-1".to_string(),
            contract_type: String::new(),
            other_deductions: "-3".to_string(),
            ..SalaryForm::default()
        };
        assert_eq!(
            fields(&validate_form(&form, &ContractCatalog)),
            vec!["input_value", "contract_type", "other_deductions"]
        );
    }

    // =========================================================================
    // to_input tests
    // =========================================================================

    #[test]
    fn to_input_copies_flags_and_parses_deductions() {
        let form = SalaryForm {
            cnss_code: "334".to_string(),
            contract_type: "2".to_string(),
            is_annual: true,
            is_family_head: true,
            other_deductions: "1 200,5".to_string(),
            other_deductions_is_annual: true,
            ..valid_form()
        };

        let input = form.to_input();

        assert_eq!(input.cnss_code, "334");
        assert_eq!(input.contract_type, "2");
        assert!(input.is_annual);
        assert!(input.is_family_head);
        assert_eq!(input.other_deductions, dec!(1200.5));
        assert!(input.other_deductions_is_annual);
    }

    #[test]
    fn to_input_places_children_by_rank() {
        let form = SalaryForm {
            children: vec![ChildRecord::student(3), ChildRecord::charged(9)],
            ..valid_form()
        };

        let input = form.to_input();

        assert_eq!(input.children[2], ChildRecord::student(3));
        assert_eq!(input.charged_children(), 1);
    }

    #[test]
    fn amount_is_lenient() {
        let form = SalaryForm {
            input_value: "2 000,500 TND".to_string(),
            ..valid_form()
        };
        assert_eq!(form.amount(), dec!(2000.500));
    }
}
