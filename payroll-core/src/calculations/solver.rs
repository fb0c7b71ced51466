//! Inverse payroll calculation: find the base salary behind a target net.
//!
//! Net salary is a piecewise-linear, non-decreasing function of base salary
//! except at the CSS threshold, where it drops by about 2 TND. A damped
//! fixed-point iteration converges as long as the damping stays below the
//! reciprocal of the steepest local slope:
//!
//! ```text
//! guess₀     = target × initial_scale
//! guessₙ₊₁   = guessₙ − (net(guessₙ) − target) × damping
//! ```
//!
//! The iteration stops as soon as `|net(guess) − target| < tolerance` or the
//! iteration cap is reached. Hitting the cap is not an error: the last guess
//! is returned with `converged = false`.
//!
//! The target is always the monthly net found on the payslip. Annual inputs
//! are searched on the monthly base and the result is scaled back to a year,
//! so each step moves the guess in the same unit as the residual.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::SalaryInput;
//! use payroll_core::calculations::{NetSalarySolver, PayslipCalculator};
//!
//! let calculator = PayslipCalculator::current();
//! let solver = NetSalarySolver::new(calculator);
//! let input = SalaryInput::default();
//!
//! let outcome = solver.solve_for_net(dec!(888.70), &input);
//!
//! assert!(outcome.converged);
//! assert!((outcome.base_salary - dec!(1000)).abs() < dec!(1));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::PayslipCalculator;
use crate::models::SalaryInput;
use crate::reference::StatutoryRates;

/// Errors raised for solver settings that cannot converge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverConfigError {
    #[error("initial scale must be positive, got {0}")]
    InvalidInitialScale(Decimal),

    /// Damping must lie in (0, 1].
    #[error("damping must be between 0 (exclusive) and 1, got {0}")]
    InvalidDamping(Decimal),

    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(Decimal),

    #[error("iteration cap must be at least 1")]
    ZeroIterations,
}

/// Tuning for the net-salary search.
///
/// The defaults are empirical and not derived from the steepest bracket
/// slope; large targets may need a higher iteration cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Multiplier applied to the target to form the first guess.
    pub initial_scale: Decimal,

    /// Fraction of the residual removed from the guess at each step.
    pub damping: Decimal,

    /// Upper bound on guess updates before giving up.
    pub max_iterations: u32,

    /// Absolute net-salary tolerance in TND.
    pub tolerance: Decimal,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_scale: Decimal::new(13, 1),
            damping: Decimal::new(7, 1),
            max_iterations: 20,
            tolerance: Decimal::new(1, 2),
        }
    }
}

impl SolverConfig {
    /// # Errors
    ///
    /// Returns [`SolverConfigError`] if the initial scale or tolerance is not
    /// positive, damping is outside (0, 1], or the iteration cap is zero.
    pub fn validate(&self) -> Result<(), SolverConfigError> {
        if self.initial_scale <= Decimal::ZERO {
            return Err(SolverConfigError::InvalidInitialScale(self.initial_scale));
        }
        if self.damping <= Decimal::ZERO || self.damping > Decimal::ONE {
            return Err(SolverConfigError::InvalidDamping(self.damping));
        }
        if self.tolerance <= Decimal::ZERO {
            return Err(SolverConfigError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(SolverConfigError::ZeroIterations);
        }
        Ok(())
    }
}

/// Result of a net-salary search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOutcome {
    /// The base salary found, in the input's period (monthly or annual).
    pub base_salary: Decimal,

    /// Whether `residual` is within tolerance.
    pub converged: bool,

    /// Number of guess updates applied.
    pub iterations: u32,

    /// `net(base_salary) − target` at the returned guess.
    pub residual: Decimal,
}

/// Searches for the base salary that yields a target net salary.
#[derive(Debug, Clone)]
pub struct NetSalarySolver<'a> {
    calculator: PayslipCalculator<'a>,
    config: SolverConfig,
}

impl<'a> NetSalarySolver<'a> {
    /// Solver with the default settings.
    pub fn new(calculator: PayslipCalculator<'a>) -> Self {
        Self {
            calculator,
            config: SolverConfig::default(),
        }
    }

    /// # Errors
    ///
    /// Returns [`SolverConfigError`] if `config` fails validation.
    pub fn with_config(
        calculator: PayslipCalculator<'a>,
        config: SolverConfig,
    ) -> Result<Self, SolverConfigError> {
        config.validate()?;
        Ok(Self { calculator, config })
    }

    /// The settings this solver runs with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a base salary whose net salary is within tolerance of
    /// `target_net`.
    ///
    /// # Arguments
    ///
    /// * `target_net` - Monthly net salary to reach
    /// * `input` - Employee situation; `is_annual` selects the period of the
    ///   returned base salary
    ///
    /// # Returns
    ///
    /// The last guess with its residual. Never fails; check
    /// [`SolveOutcome::converged`] to know whether the tolerance was met.
    pub fn solve_for_net(
        &self,
        target_net: Decimal,
        input: &SalaryInput,
    ) -> SolveOutcome {
        if !input.is_annual {
            return self.search(target_net, input);
        }

        let monthly = SalaryInput {
            is_annual: false,
            ..input.clone()
        };
        let outcome = self.search(target_net, &monthly);
        SolveOutcome {
            base_salary: outcome.base_salary * StatutoryRates::months_per_year(),
            ..outcome
        }
    }

    /// Base salary for a target gross salary.
    ///
    /// Gross is the base salary itself outside CNSS code 334; callers that
    /// need an exact inverse under that code add the offset back.
    pub fn solve_for_gross(
        &self,
        target_gross: Decimal,
    ) -> Decimal {
        target_gross
    }

    fn search(
        &self,
        target_net: Decimal,
        input: &SalaryInput,
    ) -> SolveOutcome {
        let mut guess = target_net * self.config.initial_scale;

        for iteration in 0..self.config.max_iterations {
            let residual = self.residual(guess, target_net, input);
            if residual.abs() < self.config.tolerance {
                debug!(
                    target_net = %target_net,
                    base_salary = %guess,
                    iterations = iteration,
                    "net salary search converged"
                );
                return SolveOutcome {
                    base_salary: guess,
                    converged: true,
                    iterations: iteration,
                    residual,
                };
            }

            guess -= residual * self.config.damping;
        }

        let residual = self.residual(guess, target_net, input);
        let converged = residual.abs() < self.config.tolerance;
        if !converged {
            warn!(
                target_net = %target_net,
                base_salary = %guess,
                residual = %residual,
                max_iterations = self.config.max_iterations,
                "net salary search did not converge; returning last guess"
            );
        }

        SolveOutcome {
            base_salary: guess,
            converged,
            iterations: self.config.max_iterations,
            residual,
        }
    }

    fn residual(
        &self,
        guess: Decimal,
        target_net: Decimal,
        input: &SalaryInput,
    ) -> Decimal {
        self.calculator.compute(guess, input).net_salary - target_net
    }
}
