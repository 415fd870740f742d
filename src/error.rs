//! Error types for the formula engine

use thiserror::Error;

/// Result type returned by every solver in this crate
pub type FinanceResult<T> = Result<T, FinanceError>;

/// Errors surfaced by the solvers
///
/// An approximate IRR is not an error; see [`crate::irr::IrrResult::is_approximate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinanceError {
    /// Periodicity name not present in the fixed table
    #[error("Unknown periodicity '{name}'")]
    InvalidUnit {
        /// The name that failed to parse
        name: String,
    },

    /// The solvable set does not have exactly the expected variable absent
    #[error("Cannot solve for {target}: {reason}")]
    MissingVariable {
        /// Variable the caller asked for (or "unknown" when inferring)
        target: String,
        /// What was wrong with the supplied set
        reason: String,
    },

    /// A divisor was zero during inversion
    #[error("Division by zero: {quantity} is zero")]
    DivisionByZero {
        /// Name of the zero quantity
        quantity: &'static str,
    },

    /// Logarithm, root or power outside its domain
    #[error("Undefined operation: {reason}")]
    UndefinedOperation {
        /// Description of the violated domain
        reason: String,
    },

    /// Geometric gradient whose growth equals the rate
    #[error("Degenerate geometric gradient: rate {rate} equals growth {growth}")]
    DegenerateGradient {
        /// Periodic interest rate
        rate: f64,
        /// Periodic growth rate
        growth: f64,
    },

    /// Newton-Raphson had to stop before reaching the iteration cap
    #[error("IRR iteration aborted at step {iteration}: {reason}")]
    ConvergenceAbort {
        /// Iteration at which the solver stopped
        iteration: u32,
        /// Why the iteration could not continue
        reason: String,
    },

    /// Input outside the range a formula accepts
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input
        reason: String,
    },
}

impl FinanceError {
    #[must_use]
    pub fn missing_variable(target: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::MissingVariable {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn undefined(reason: impl Into<String>) -> Self {
        Self::UndefinedOperation {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn convergence_abort(iteration: u32, reason: impl Into<String>) -> Self {
        Self::ConvergenceAbort {
            iteration,
            reason: reason.into(),
        }
    }
}
