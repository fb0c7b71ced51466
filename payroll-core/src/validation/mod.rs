//! Input checks and lenient number parsing for the salary form.
//!
//! The calculators accept any numeric input; this module is where a caller
//! enforces the form-level rules before calling them.

mod form;
mod number;

pub use form::{AllowanceEntry, MAX_AMOUNT, SalaryForm, ValidationError, validate_form};
pub use number::{parse_amount, parse_formatted_number, standardize_number};
