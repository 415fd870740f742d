//! Inverse-solvable formula families
//!
//! Each family takes a set of optional variables plus unit tags and an
//! explicit target naming the variable to compute:
//! - **Simple interest**: `I = C·i·t`
//! - **Compound interest**: `FV = P(1+i)^t`
//! - **Annuities**: ordinary and due level payment series
//! - **Gradients**: arithmetic and geometric growing payment series
//! - **Capitalization**: final or initial capital under the classic regimes
//!
//! All solvers return a [`CalculationResult`] tagging the computed variable,
//! its value, its unit (rates and times only) and the formula used.

mod simple;
mod compound;
mod annuity;
mod gradient;
mod capitalization;

pub use simple::{SimpleInterestInputs, SimpleVariable};
pub use compound::{CompoundInterestInputs, CompoundVariable};
pub use annuity::{AnnuityInputs, AnnuityTiming, AnnuityVariable};
pub use gradient::{GradientInputs, GradientTarget, Growth, DEFAULT_DEGENERACY_TOLERANCE};
pub use capitalization::{CapitalizationInputs, CapitalizationRegime, CapitalizationTarget};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FinanceError, FinanceResult};
use crate::units::Periodicity;

/// Variable a solver computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Capital,
    Interest,
    Rate,
    Time,
    FutureValue,
    PresentValue,
    Payment,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variable::Capital => "capital",
            Variable::Interest => "interest",
            Variable::Rate => "rate",
            Variable::Time => "time",
            Variable::FutureValue => "future value",
            Variable::PresentValue => "present value",
            Variable::Payment => "payment",
        };
        f.write_str(name)
    }
}

/// Formula that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    SimpleInterest,
    CompoundInterest,
    OrdinaryAnnuity,
    AnnuityDue,
    ArithmeticGradient,
    GeometricGradient,
    Capitalization(CapitalizationRegime),
}

/// Outcome of one solver invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub variable: Variable,
    pub value: f64,
    /// Periodicity of a solved rate or time; `None` for amounts
    pub unit: Option<Periodicity>,
    pub formula: Formula,
}

impl CalculationResult {
    pub fn amount(variable: Variable, value: f64, formula: Formula) -> Self {
        Self { variable, value, unit: None, formula }
    }

    pub fn with_unit(variable: Variable, value: f64, unit: Periodicity, formula: Formula) -> Self {
        Self { variable, value, unit: Some(unit), formula }
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.variable, self.unit) {
            (Variable::Rate, Some(unit)) => write!(f, "rate: {:.6}% {}", self.value * 100.0, unit),
            (_, Some(unit)) => write!(f, "{}: {:.6} {}", self.variable, self.value, unit),
            (_, None) => write!(f, "{}: {:.2}", self.variable, self.value),
        }
    }
}

/// Take a required input or report which one is absent
pub(crate) fn require(value: Option<f64>, name: &str, target: impl fmt::Display) -> FinanceResult<f64> {
    value.ok_or_else(|| FinanceError::missing_variable(target, format!("{name} is required")))
}

/// The target must not be supplied alongside the inputs
pub(crate) fn require_absent(value: Option<f64>, target: impl fmt::Display) -> FinanceResult<()> {
    match value {
        Some(_) => Err(FinanceError::missing_variable(
            &target,
            format!("{target} was supplied; exactly one variable must be absent"),
        )),
        None => Ok(()),
    }
}

/// Inputs that must be strictly positive; NaN is rejected too
pub(crate) fn positive(value: f64, name: &str) -> FinanceResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(FinanceError::invalid_input(format!("{name} must be positive, got {value}")))
    }
}

/// Reject NaN and infinite results instead of handing them to the caller
pub(crate) fn finite(value: f64, what: &str) -> FinanceResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FinanceError::undefined(format!("{what} evaluated to {value}")))
    }
}
