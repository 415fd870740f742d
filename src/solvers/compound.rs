//! Compound interest: `FV = P(1+i)^t`
//!
//! The rate is brought to the time's periodicity by compound equivalence
//! before evaluation. When a compounding periodicity is given the rate is
//! read as nominal (quoted per `rate_unit`, capitalized every compounding
//! period), so 5% annual compounded monthly behaves as `(1 + 0.05/12)^12`.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{finite, positive, require, require_absent, CalculationResult, Formula, Variable};
use crate::error::{FinanceError, FinanceResult};
use crate::units::{convert_rate, effective_to_nominal, nominal_to_effective, Periodicity, RateValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundVariable {
    Principal,
    Rate,
    Time,
    FutureValue,
}

impl fmt::Display for CompoundVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompoundVariable::Principal => "principal",
            CompoundVariable::Rate => "rate",
            CompoundVariable::Time => "time",
            CompoundVariable::FutureValue => "future value",
        };
        f.write_str(name)
    }
}

/// Known and unknown variables of a compound interest problem
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompoundInterestInputs {
    pub principal: Option<f64>,
    /// Decimal rate per `rate_unit` (nominal when `compounding` is set)
    pub rate: Option<f64>,
    pub time: Option<f64>,
    pub future_value: Option<f64>,
    pub rate_unit: Periodicity,
    pub time_unit: Periodicity,
    /// Capitalization frequency of a nominal rate
    pub compounding: Option<Periodicity>,
    pub desired_rate_unit: Option<Periodicity>,
    pub desired_time_unit: Option<Periodicity>,
}

impl CompoundInterestInputs {
    pub fn missing_variable(&self) -> FinanceResult<CompoundVariable> {
        let absent: Vec<CompoundVariable> = [
            (self.principal, CompoundVariable::Principal),
            (self.rate, CompoundVariable::Rate),
            (self.time, CompoundVariable::Time),
            (self.future_value, CompoundVariable::FutureValue),
        ]
        .into_iter()
        .filter(|(value, _)| value.is_none())
        .map(|(_, variable)| variable)
        .collect();

        match absent.as_slice() {
            [single] => Ok(*single),
            other => Err(FinanceError::missing_variable(
                "unknown",
                format!(
                    "exactly one of principal, rate, time, future value must be absent, found {}",
                    other.len()
                ),
            )),
        }
    }

    pub fn solve_missing(&self) -> FinanceResult<CalculationResult> {
        self.solve(self.missing_variable()?)
    }

    /// Solve for `target`
    ///
    /// Principal and future value must be positive and time strictly
    /// positive. Solving rate or time additionally requires `FV > P`.
    pub fn solve(&self, target: CompoundVariable) -> FinanceResult<CalculationResult> {
        debug!("compound interest: solving for {target}");
        let formula = Formula::CompoundInterest;

        match target {
            CompoundVariable::FutureValue => {
                require_absent(self.future_value, target)?;
                let principal = positive(require(self.principal, "principal", target)?, "principal")?;
                let time = positive(require(self.time, "time", target)?, "time")?;
                let rate = self.effective_rate(target)?.to(self.time_unit)?;
                let fv = finite(principal * (1.0 + rate.rate).powf(time), "future value")?;
                Ok(CalculationResult::amount(Variable::FutureValue, fv, formula))
            }
            CompoundVariable::Principal => {
                require_absent(self.principal, target)?;
                let fv = positive(require(self.future_value, "future value", target)?, "future value")?;
                let time = positive(require(self.time, "time", target)?, "time")?;
                let rate = self.effective_rate(target)?.to(self.time_unit)?;
                let principal = finite(fv / (1.0 + rate.rate).powf(time), "principal")?;
                Ok(CalculationResult::amount(Variable::Capital, principal, formula))
            }
            CompoundVariable::Rate => {
                require_absent(self.rate, target)?;
                let (principal, fv) = self.growing_pair(target)?;
                let time = positive(require(self.time, "time", target)?, "time")?;
                let per_time_unit = (fv / principal).powf(1.0 / time) - 1.0;
                let solved = RateValue::new(per_time_unit, self.time_unit);

                let unit = self.desired_rate_unit.unwrap_or(self.rate_unit);
                let rate = match self.compounding {
                    Some(compounding) => effective_to_nominal(solved, unit, compounding)?,
                    None => convert_rate(solved.rate, solved.unit, unit)?,
                };
                Ok(CalculationResult::with_unit(Variable::Rate, finite(rate, "rate")?, unit, formula))
            }
            CompoundVariable::Time => {
                require_absent(self.time, target)?;
                let (principal, fv) = self.growing_pair(target)?;
                let unit = self.desired_time_unit.unwrap_or(self.time_unit);
                let rate = self.effective_rate(target)?.to(unit)?;
                if rate.rate == 0.0 {
                    return Err(FinanceError::DivisionByZero { quantity: "rate" });
                }
                if rate.rate < 0.0 {
                    return Err(FinanceError::undefined(format!(
                        "a negative rate {} never grows {principal} into {fv}",
                        rate.rate
                    )));
                }
                let time = finite((fv / principal).ln() / (1.0 + rate.rate).ln(), "time")?;
                Ok(CalculationResult::with_unit(Variable::Time, time, unit, formula))
            }
        }
    }

    /// Rate as an effective periodic rate, before conversion to the time unit
    fn effective_rate(&self, target: CompoundVariable) -> FinanceResult<RateValue> {
        let rate = require(self.rate, "rate", target)?;
        match self.compounding {
            Some(compounding) => nominal_to_effective(rate, self.rate_unit, compounding),
            None => Ok(RateValue::new(rate, self.rate_unit)),
        }
    }

    fn growing_pair(&self, target: CompoundVariable) -> FinanceResult<(f64, f64)> {
        let principal = positive(require(self.principal, "principal", target)?, "principal")?;
        let fv = positive(require(self.future_value, "future value", target)?, "future value")?;
        if fv <= principal {
            return Err(FinanceError::undefined(format!(
                "future value {fv} must exceed principal {principal} to solve for {target}"
            )));
        }
        Ok((principal, fv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base() -> CompoundInterestInputs {
        CompoundInterestInputs {
            principal: Some(1000.0),
            rate: Some(0.05),
            time: Some(2.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_future_value() {
        let result = base().solve_missing().unwrap();
        assert_eq!(result.variable, Variable::FutureValue);
        assert_relative_eq!(result.value, 1102.5, epsilon = 1e-9);
    }

    #[test]
    fn test_monthly_compounding_scenario() {
        let inputs = CompoundInterestInputs {
            compounding: Some(Periodicity::Monthly),
            ..base()
        };
        let result = inputs.solve(CompoundVariable::FutureValue).unwrap();
        assert!((result.value - 1104.94).abs() < 0.005, "got {}", result.value);
    }

    #[test]
    fn test_rate_converted_to_time_unit() {
        // 1% monthly for 12 months equals the annual effective equivalent
        let inputs = CompoundInterestInputs {
            rate: Some(0.01),
            rate_unit: Periodicity::Monthly,
            time: Some(1.0),
            time_unit: Periodicity::Annual,
            ..base()
        };
        let result = inputs.solve(CompoundVariable::FutureValue).unwrap();
        assert_relative_eq!(result.value, 1000.0 * 1.01_f64.powi(12), epsilon = 1e-9);
    }

    #[test]
    fn test_principal() {
        let inputs = CompoundInterestInputs {
            principal: None,
            future_value: Some(1102.5),
            ..base()
        };
        let result = inputs.solve(CompoundVariable::Principal).unwrap();
        assert_eq!(result.variable, Variable::Capital);
        assert_relative_eq!(result.value, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rate_in_desired_unit() {
        let inputs = CompoundInterestInputs {
            rate: None,
            future_value: Some(1102.5),
            desired_rate_unit: Some(Periodicity::Semiannual),
            ..base()
        };
        let result = inputs.solve(CompoundVariable::Rate).unwrap();
        assert_eq!(result.unit, Some(Periodicity::Semiannual));
        assert_relative_eq!(result.value, 1.05_f64.sqrt() - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nominal_rate_round_trip() {
        let inputs = CompoundInterestInputs {
            rate: None,
            future_value: Some(1000.0 * (1.0 + 0.06 / 4.0_f64).powi(12)),
            time: Some(3.0),
            compounding: Some(Periodicity::Quarterly),
            ..base()
        };
        let result = inputs.solve(CompoundVariable::Rate).unwrap();
        assert_relative_eq!(result.value, 0.06, epsilon = 1e-10);
    }

    #[test]
    fn test_time_in_months() {
        let inputs = CompoundInterestInputs {
            time: None,
            future_value: Some(1102.5),
            desired_time_unit: Some(Periodicity::Monthly),
            ..base()
        };
        let result = inputs.solve(CompoundVariable::Time).unwrap();
        assert_eq!(result.unit, Some(Periodicity::Monthly));
        assert_relative_eq!(result.value, 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_future_value_must_exceed_principal() {
        let inputs = CompoundInterestInputs {
            time: None,
            future_value: Some(900.0),
            ..base()
        };
        assert!(matches!(
            inputs.solve(CompoundVariable::Time),
            Err(FinanceError::UndefinedOperation { .. })
        ));
    }

    #[test]
    fn test_zero_rate_time_is_division_by_zero() {
        let inputs = CompoundInterestInputs {
            rate: Some(0.0),
            time: None,
            future_value: Some(1100.0),
            ..base()
        };
        assert_eq!(
            inputs.solve(CompoundVariable::Time).unwrap_err(),
            FinanceError::DivisionByZero { quantity: "rate" }
        );
    }

    #[test]
    fn test_negative_rate_time_is_undefined() {
        let inputs = CompoundInterestInputs {
            rate: Some(-0.05),
            time: None,
            future_value: Some(1100.0),
            ..base()
        };
        assert!(matches!(
            inputs.solve(CompoundVariable::Time),
            Err(FinanceError::UndefinedOperation { .. })
        ));
    }

    #[test]
    fn test_non_positive_time_rejected() {
        let inputs = CompoundInterestInputs {
            time: Some(0.0),
            ..base()
        };
        assert!(matches!(
            inputs.solve(CompoundVariable::FutureValue),
            Err(FinanceError::InvalidInput { .. })
        ));
    }
}
