pub mod calculations;
pub mod models;
pub mod reference;
pub mod validation;

pub use calculations::{PayrollCalculation, PayrollEngine, PayslipCalculator};
pub use models::*;
pub use reference::{ContractCatalog, ContractLookup, StatutoryRates, TaxTable};
