//! Payroll calculations: the progressive tax walk, the forward payslip
//! calculator, the net-salary solver and the salary-type dispatcher.

pub mod brackets;
pub mod common;
pub mod engine;
pub mod payslip;
pub mod solver;

pub use brackets::{BracketSlice, BracketWalk};
pub use engine::{PayrollCalculation, PayrollEngine};
pub use payslip::PayslipCalculator;
pub use solver::{NetSalarySolver, SolveOutcome, SolverConfig, SolverConfigError};
