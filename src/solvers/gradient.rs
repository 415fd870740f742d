//! Growing payment series
//!
//! Arithmetic gradients add a fixed amount `G` each period, geometric
//! gradients grow the payment by a fixed fraction `g`.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{finite, CalculationResult, Formula, Variable};
use crate::error::{FinanceError, FinanceResult};
use crate::units::{convert_rate, Periodicity};

/// Tolerance under which a geometric growth is treated as equal to the rate
pub const DEFAULT_DEGENERACY_TOLERANCE: f64 = 1e-12;

/// Growth term of the series, per period of the time unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Growth {
    /// Fixed increment added each period
    Arithmetic(f64),
    /// Decimal growth rate applied each period
    Geometric(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientTarget {
    PresentValue,
    FutureValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientInputs {
    /// Base payment
    pub payment: f64,
    /// Decimal rate per `rate_unit`
    pub rate: f64,
    /// Number of periods, in `time_unit`
    pub time: f64,
    pub growth: Growth,
    pub rate_unit: Periodicity,
    pub time_unit: Periodicity,
}

impl GradientInputs {
    pub fn solve(&self, target: GradientTarget) -> FinanceResult<CalculationResult> {
        self.solve_with_tolerance(target, DEFAULT_DEGENERACY_TOLERANCE)
    }

    /// Solve with an explicit tolerance for the geometric `i == g` check
    pub fn solve_with_tolerance(
        &self,
        target: GradientTarget,
        degeneracy_tolerance: f64,
    ) -> FinanceResult<CalculationResult> {
        if self.time <= 0.0 {
            return Err(FinanceError::undefined(format!(
                "number of periods must be positive, got {}",
                self.time
            )));
        }
        let i = convert_rate(self.rate, self.rate_unit, self.time_unit)?;
        let n = self.time;
        let a = self.payment;
        debug!("gradient {:?}: i={i} n={n} target={target:?}", self.growth);

        let (value, formula) = match self.growth {
            Growth::Arithmetic(g) => {
                if i == 0.0 {
                    return Err(FinanceError::DivisionByZero { quantity: "rate" });
                }
                let factor = match target {
                    GradientTarget::FutureValue => (1.0 + i).powf(n) - 1.0,
                    GradientTarget::PresentValue => 1.0 - (1.0 + i).powf(-n),
                };
                (a * factor / i + g * factor / (i * i), Formula::ArithmeticGradient)
            }
            Growth::Geometric(g) => {
                if (i - g).abs() < degeneracy_tolerance {
                    return Err(FinanceError::DegenerateGradient { rate: i, growth: g });
                }
                let numerator = match target {
                    GradientTarget::FutureValue => (1.0 + g).powf(n) - 1.0,
                    GradientTarget::PresentValue => 1.0 - (1.0 + g).powf(n),
                };
                (a * numerator / (i - g), Formula::GeometricGradient)
            }
        };

        let variable = match target {
            GradientTarget::FutureValue => Variable::FutureValue,
            GradientTarget::PresentValue => Variable::PresentValue,
        };
        Ok(CalculationResult::amount(variable, finite(value, "gradient value")?, formula))
    }
}
