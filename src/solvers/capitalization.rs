//! Capitalization regimes on a nominal annual rate
//!
//! Grows a capital to its final amount (or discounts a final amount back to
//! the initial capital) under the classic regimes. The rate is nominal
//! annual and capitalized every `compounding` period; time is converted
//! to years.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{finite, CalculationResult, Formula, Variable};
use crate::error::{FinanceError, FinanceResult};
use crate::units::{Periodicity, TimeValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapitalizationRegime {
    /// `M = C(1 + r·t)`
    Simple,
    /// `M = C(1 + r_eff)^t`
    Compound,
    /// `M = C·e^(r·t)`
    Continuous,
    /// `M = C(1 + r/k)^(k·t)` with `k` periods per year
    Periodic,
    /// Compound with interest paid one capitalization period in advance
    Anticipated,
    /// Compound starting after a waiting time
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapitalizationTarget {
    FinalCapital,
    InitialCapital,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalizationInputs {
    pub regime: CapitalizationRegime,
    /// Initial capital when solving the final amount, final amount otherwise
    pub amount: f64,
    /// Nominal annual rate
    pub annual_rate: f64,
    pub compounding: Periodicity,
    pub time: TimeValue,
    /// Periods per year for the periodic regime
    pub periods_per_year: Option<f64>,
    /// Waiting time for the deferred regime
    pub deferral: Option<TimeValue>,
}

impl CapitalizationInputs {
    pub fn solve(&self, target: CapitalizationTarget) -> FinanceResult<CalculationResult> {
        let growth = self.growth_factor()?;
        debug!("capitalization {:?}: growth factor {growth}", self.regime);

        let (variable, value) = match target {
            CapitalizationTarget::FinalCapital => (Variable::FutureValue, self.amount * growth),
            CapitalizationTarget::InitialCapital => {
                if growth == 0.0 {
                    return Err(FinanceError::DivisionByZero { quantity: "growth factor" });
                }
                (Variable::Capital, self.amount / growth)
            }
        };
        Ok(CalculationResult::amount(
            variable,
            finite(value, "capital")?,
            Formula::Capitalization(self.regime),
        ))
    }

    /// Factor by which one unit of capital grows over the term
    pub fn growth_factor(&self) -> FinanceResult<f64> {
        let r = self.annual_rate;
        let t = self.time.in_years();
        let m = self.compounding.periods_per_year();
        let effective = (1.0 + r / m).powf(m) - 1.0;

        let factor = match self.regime {
            CapitalizationRegime::Simple => 1.0 + r * t,
            CapitalizationRegime::Compound => (1.0 + effective).powf(t),
            CapitalizationRegime::Continuous => (r * t).exp(),
            CapitalizationRegime::Periodic => {
                let k = self.periods_per_year.ok_or_else(|| {
                    FinanceError::invalid_input("periodic capitalization needs periods per year")
                })?;
                if k.is_nan() || k <= 0.0 {
                    return Err(FinanceError::invalid_input(format!(
                        "periods per year must be positive, got {k}"
                    )));
                }
                (1.0 + r / k).powf(k * t)
            }
            CapitalizationRegime::Anticipated => (1.0 + effective).powf(t + 1.0 / m),
            CapitalizationRegime::Deferred => {
                let d = self
                    .deferral
                    .ok_or_else(|| FinanceError::invalid_input("deferred capitalization needs a waiting time"))?
                    .in_years();
                if d < 0.0 || t <= d {
                    return Err(FinanceError::invalid_input(format!(
                        "time ({t} years) must exceed a non-negative waiting time ({d} years)"
                    )));
                }
                (1.0 + effective).powf(t - d)
            }
        };
        finite(factor, "growth factor")
    }
}
