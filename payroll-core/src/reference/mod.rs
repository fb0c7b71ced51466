//! Statutory reference data: the bracket table, contribution rates and the
//! contract and allowance catalogs.
//!
//! Everything here is built once on first use and is read-only afterwards.

mod allowances;
mod contracts;
mod rates;
mod tax_table;

pub use allowances::{ALLOWANCE_TYPES, AllowanceCategory, AllowanceType, find_allowance};
pub use contracts::{CONTRACT_TYPES, ContractCatalog, ContractLookup};
pub use rates::{ChildDeductions, Smig, StatutoryRates};
pub use tax_table::{TaxTable, TaxTableError};
