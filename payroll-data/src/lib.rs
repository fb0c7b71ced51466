mod loader;

pub use loader::{Mismatch, PayslipLoadError, PayslipLoader, PayslipRecord};
