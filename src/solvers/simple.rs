//! Simple interest: `I = C·i·t`
//!
//! The rate is never converted. Instead the duration is re-expressed in
//! the rate's periodicity (linear scaling), which keeps every inversion
//! exact for non-compounding rates.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{finite, require, require_absent, CalculationResult, Formula, Variable};
use crate::error::{FinanceError, FinanceResult};
use crate::units::{convert_time, Periodicity};

/// Variable to solve for in a simple interest set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleVariable {
    Capital,
    Rate,
    Time,
    Interest,
}

impl fmt::Display for SimpleVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimpleVariable::Capital => "capital",
            SimpleVariable::Rate => "rate",
            SimpleVariable::Time => "time",
            SimpleVariable::Interest => "interest",
        };
        f.write_str(name)
    }
}

/// Known and unknown variables of a simple interest problem
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleInterestInputs {
    pub capital: Option<f64>,
    /// Decimal rate per `rate_unit`
    pub rate: Option<f64>,
    /// Duration in `time_unit`
    pub time: Option<f64>,
    pub interest: Option<f64>,
    pub rate_unit: Periodicity,
    pub time_unit: Periodicity,
    /// Periodicity for a solved rate; defaults to `rate_unit`
    pub desired_rate_unit: Option<Periodicity>,
    /// Periodicity for a solved time; defaults to `time_unit`
    pub desired_time_unit: Option<Periodicity>,
}

impl SimpleInterestInputs {
    /// The single absent variable
    ///
    /// Fails with `MissingVariable` when zero or several are absent.
    pub fn missing_variable(&self) -> FinanceResult<SimpleVariable> {
        let absent: Vec<SimpleVariable> = [
            (self.capital, SimpleVariable::Capital),
            (self.rate, SimpleVariable::Rate),
            (self.time, SimpleVariable::Time),
            (self.interest, SimpleVariable::Interest),
        ]
        .into_iter()
        .filter(|(value, _)| value.is_none())
        .map(|(_, variable)| variable)
        .collect();

        match absent.as_slice() {
            [single] => Ok(*single),
            other => Err(FinanceError::missing_variable(
                "unknown",
                format!("exactly one of capital, rate, time, interest must be absent, found {}", other.len()),
            )),
        }
    }

    /// Solve for whichever variable is absent
    pub fn solve_missing(&self) -> FinanceResult<CalculationResult> {
        self.solve(self.missing_variable()?)
    }

    /// Solve for `target`; every other variable must be present
    pub fn solve(&self, target: SimpleVariable) -> FinanceResult<CalculationResult> {
        debug!("simple interest: solving for {target}");
        let formula = Formula::SimpleInterest;

        match target {
            SimpleVariable::Interest => {
                require_absent(self.interest, target)?;
                let capital = require(self.capital, "capital", target)?;
                let rate = require(self.rate, "rate", target)?;
                let time = self.time_in(self.rate_unit, target)?;
                let interest = finite(capital * rate * time, "interest")?;
                Ok(CalculationResult::amount(Variable::Interest, interest, formula))
            }
            SimpleVariable::Capital => {
                require_absent(self.capital, target)?;
                let interest = require(self.interest, "interest", target)?;
                let rate = require(self.rate, "rate", target)?;
                let time = self.time_in(self.rate_unit, target)?;
                nonzero(rate, "rate")?;
                nonzero(time, "time")?;
                let capital = finite(interest / (rate * time), "capital")?;
                Ok(CalculationResult::amount(Variable::Capital, capital, formula))
            }
            SimpleVariable::Rate => {
                require_absent(self.rate, target)?;
                let capital = require(self.capital, "capital", target)?;
                let interest = require(self.interest, "interest", target)?;
                let unit = self.desired_rate_unit.unwrap_or(self.rate_unit);
                let time = self.time_in(unit, target)?;
                nonzero(capital, "capital")?;
                nonzero(time, "time")?;
                let rate = finite(interest / (capital * time), "rate")?;
                Ok(CalculationResult::with_unit(Variable::Rate, rate, unit, formula))
            }
            SimpleVariable::Time => {
                require_absent(self.time, target)?;
                let capital = require(self.capital, "capital", target)?;
                let interest = require(self.interest, "interest", target)?;
                let rate = require(self.rate, "rate", target)?;
                nonzero(capital, "capital")?;
                nonzero(rate, "rate")?;
                // Duration counted in rate periods, then re-expressed
                let periods = interest / (capital * rate);
                let unit = self.desired_time_unit.unwrap_or(self.time_unit);
                let time = finite(convert_time(periods, self.rate_unit, unit), "time")?;
                Ok(CalculationResult::with_unit(Variable::Time, time, unit, formula))
            }
        }
    }

    fn time_in(&self, unit: Periodicity, target: SimpleVariable) -> FinanceResult<f64> {
        let time = require(self.time, "time", target)?;
        Ok(convert_time(time, self.time_unit, unit))
    }
}

fn nonzero(value: f64, quantity: &'static str) -> FinanceResult<()> {
    if value == 0.0 {
        return Err(FinanceError::DivisionByZero { quantity });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base() -> SimpleInterestInputs {
        SimpleInterestInputs {
            capital: Some(1000.0),
            rate: Some(0.05),
            time: Some(2.0),
            interest: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_interest_scenario() {
        let result = base().solve_missing().unwrap();
        assert_eq!(result.variable, Variable::Interest);
        assert_relative_eq!(result.value, 100.0, epsilon = 1e-9);
        assert_eq!(result.unit, None);
    }

    #[test]
    fn test_capital_solves_back() {
        let inputs = SimpleInterestInputs {
            capital: None,
            interest: Some(100.0),
            ..base()
        };
        let result = inputs.solve(SimpleVariable::Capital).unwrap();
        assert_relative_eq!(result.value, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mixed_units_interest() {
        // 1% monthly over 2 years is 24% of capital
        let inputs = SimpleInterestInputs {
            rate: Some(0.01),
            rate_unit: Periodicity::Monthly,
            time_unit: Periodicity::Annual,
            ..base()
        };
        let result = inputs.solve(SimpleVariable::Interest).unwrap();
        assert_relative_eq!(result.value, 240.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rate_in_desired_unit() {
        let inputs = SimpleInterestInputs {
            rate: None,
            interest: Some(120.0),
            time: Some(12.0),
            time_unit: Periodicity::Monthly,
            desired_rate_unit: Some(Periodicity::Annual),
            ..base()
        };
        let result = inputs.solve(SimpleVariable::Rate).unwrap();
        assert_eq!(result.unit, Some(Periodicity::Annual));
        assert_relative_eq!(result.value, 0.12, epsilon = 1e-12);

        let monthly = SimpleInterestInputs {
            desired_rate_unit: Some(Periodicity::Monthly),
            ..inputs
        }
        .solve(SimpleVariable::Rate)
        .unwrap();
        assert_relative_eq!(monthly.value, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_time_in_desired_unit() {
        let inputs = SimpleInterestInputs {
            time: None,
            interest: Some(100.0),
            desired_time_unit: Some(Periodicity::Monthly),
            ..base()
        };
        let result = inputs.solve(SimpleVariable::Time).unwrap();
        assert_eq!(result.unit, Some(Periodicity::Monthly));
        assert_relative_eq!(result.value, 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_rate_division() {
        let inputs = SimpleInterestInputs {
            rate: Some(0.0),
            time: None,
            interest: Some(10.0),
            ..base()
        };
        assert_eq!(
            inputs.solve(SimpleVariable::Time).unwrap_err(),
            FinanceError::DivisionByZero { quantity: "rate" }
        );
    }

    #[test]
    fn test_wrong_number_missing() {
        let none_missing = SimpleInterestInputs {
            interest: Some(100.0),
            ..base()
        };
        assert!(matches!(
            none_missing.solve_missing(),
            Err(FinanceError::MissingVariable { .. })
        ));

        let two_missing = SimpleInterestInputs {
            rate: None,
            ..base()
        };
        assert!(matches!(
            two_missing.missing_variable(),
            Err(FinanceError::MissingVariable { .. })
        ));
    }

    #[test]
    fn test_explicit_target_must_be_absent() {
        let inputs = SimpleInterestInputs {
            interest: Some(100.0),
            ..base()
        };
        assert!(matches!(
            inputs.solve(SimpleVariable::Rate),
            Err(FinanceError::MissingVariable { .. })
        ));
    }
}
