mod child;
mod contract;
mod salary_input;
mod salary_result;
mod salary_type;
mod tax_bracket;

pub use child::{ChildDeductionTier, ChildRecord, ChildSpecError};
pub use contract::{ContractCategory, ContractType};
pub use salary_input::{MAX_CHILDREN, SalaryInput};
pub use salary_result::SalaryResult;
pub use salary_type::SalaryType;
pub use tax_bracket::TaxBracket;
