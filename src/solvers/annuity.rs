//! Level payment annuities, ordinary and due
//!
//! `FV = A[(1+i)^n - 1]/i`, `PV = A[1 - (1+i)^-n]/i`. An annuity due pays at
//! the start of each period, which scales both values by `(1+i)`.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{finite, positive, require, require_absent, CalculationResult, Formula, Variable};
use crate::error::{FinanceError, FinanceResult};
use crate::units::{convert_rate, convert_time, Periodicity};

/// When payments fall within each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnuityTiming {
    /// End of period (vencida)
    #[default]
    Ordinary,
    /// Start of period (anticipada)
    Due,
}

impl AnnuityTiming {
    fn formula(&self) -> Formula {
        match self {
            AnnuityTiming::Ordinary => Formula::OrdinaryAnnuity,
            AnnuityTiming::Due => Formula::AnnuityDue,
        }
    }

    fn factor(&self, rate: f64) -> f64 {
        match self {
            AnnuityTiming::Ordinary => 1.0,
            AnnuityTiming::Due => 1.0 + rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnuityVariable {
    FutureValue,
    PresentValue,
    Rate,
    Time,
    Payment,
}

impl fmt::Display for AnnuityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnnuityVariable::FutureValue => "future value",
            AnnuityVariable::PresentValue => "present value",
            AnnuityVariable::Rate => "rate",
            AnnuityVariable::Time => "time",
            AnnuityVariable::Payment => "payment",
        };
        f.write_str(name)
    }
}

/// Known and unknown variables of an annuity
///
/// The inputs each target needs:
/// - future or present value: payment, rate, time
/// - rate: present value, future value, time
/// - time: present value, future value, rate
/// - payment: rate, time and exactly one of present or future value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnuityInputs {
    pub payment: Option<f64>,
    pub present_value: Option<f64>,
    pub future_value: Option<f64>,
    pub rate: Option<f64>,
    /// Number of payments, counted in `time_unit`
    pub time: Option<f64>,
    pub rate_unit: Periodicity,
    pub time_unit: Periodicity,
    pub timing: AnnuityTiming,
    pub desired_rate_unit: Option<Periodicity>,
    pub desired_time_unit: Option<Periodicity>,
}

impl AnnuityInputs {
    pub fn solve(&self, target: AnnuityVariable) -> FinanceResult<CalculationResult> {
        debug!("annuity ({:?}): solving for {target}", self.timing);
        let formula = self.timing.formula();

        match target {
            AnnuityVariable::FutureValue => {
                require_absent(self.future_value, target)?;
                let payment = require(self.payment, "payment", target)?;
                let (i, n) = self.rate_and_periods(target)?;
                let fv = payment * ((1.0 + i).powf(n) - 1.0) / i * self.timing.factor(i);
                Ok(CalculationResult::amount(Variable::FutureValue, finite(fv, "future value")?, formula))
            }
            AnnuityVariable::PresentValue => {
                require_absent(self.present_value, target)?;
                let payment = require(self.payment, "payment", target)?;
                let (i, n) = self.rate_and_periods(target)?;
                let pv = payment * (1.0 - (1.0 + i).powf(-n)) / i * self.timing.factor(i);
                Ok(CalculationResult::amount(Variable::PresentValue, finite(pv, "present value")?, formula))
            }
            AnnuityVariable::Payment => {
                require_absent(self.payment, target)?;
                let (i, n) = self.rate_and_periods(target)?;
                let payment = match (self.present_value, self.future_value) {
                    (Some(pv), None) => pv * i / (1.0 - (1.0 + i).powf(-n)),
                    (None, Some(fv)) => fv * i / ((1.0 + i).powf(n) - 1.0),
                    _ => {
                        return Err(FinanceError::missing_variable(
                            target,
                            "exactly one of present value or future value must be given",
                        ))
                    }
                } / self.timing.factor(i);
                Ok(CalculationResult::amount(Variable::Payment, finite(payment, "payment")?, formula))
            }
            AnnuityVariable::Rate => {
                require_absent(self.rate, target)?;
                let (pv, fv) = self.growing_pair(target)?;
                let n = positive(require(self.time, "time", target)?, "time")?;
                let per_time_unit = (fv / pv).powf(1.0 / n) - 1.0;
                let unit = self.desired_rate_unit.unwrap_or(self.rate_unit);
                let rate = convert_rate(per_time_unit, self.time_unit, unit)?;
                Ok(CalculationResult::with_unit(Variable::Rate, finite(rate, "rate")?, unit, formula))
            }
            AnnuityVariable::Time => {
                require_absent(self.time, target)?;
                let (pv, fv) = self.growing_pair(target)?;
                let rate = positive(require(self.rate, "rate", target)?, "rate")?;
                let i = convert_rate(rate, self.rate_unit, self.time_unit)?;
                let periods = (fv / pv).ln() / (1.0 + i).ln();
                let unit = self.desired_time_unit.unwrap_or(self.time_unit);
                let time = convert_time(periods, self.time_unit, unit);
                Ok(CalculationResult::with_unit(Variable::Time, finite(time, "time")?, unit, formula))
            }
        }
    }

    /// Periodic rate in the time's periodicity and the number of periods
    fn rate_and_periods(&self, target: AnnuityVariable) -> FinanceResult<(f64, f64)> {
        let rate = require(self.rate, "rate", target)?;
        if rate == 0.0 {
            return Err(FinanceError::DivisionByZero { quantity: "rate" });
        }
        let rate = positive(rate, "rate")?;
        let n = positive(require(self.time, "time", target)?, "time")?;
        let i = convert_rate(rate, self.rate_unit, self.time_unit)?;
        Ok((i, n))
    }

    fn growing_pair(&self, target: AnnuityVariable) -> FinanceResult<(f64, f64)> {
        let pv = positive(require(self.present_value, "present value", target)?, "present value")?;
        let fv = positive(require(self.future_value, "future value", target)?, "future value")?;
        if fv <= pv {
            return Err(FinanceError::undefined(format!(
                "future value {fv} must exceed present value {pv} to solve for {target}"
            )));
        }
        Ok((pv, fv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn monthly(payment: f64, rate: f64, n: f64) -> AnnuityInputs {
        AnnuityInputs {
            payment: Some(payment),
            rate: Some(rate),
            time: Some(n),
            rate_unit: Periodicity::Monthly,
            time_unit: Periodicity::Monthly,
            ..Default::default()
        }
    }

    #[test]
    fn test_present_value_ordinary() {
        // $100/month for 12 months at 0.5% monthly
        let result = monthly(100.0, 0.005, 12.0).solve(AnnuityVariable::PresentValue).unwrap();
        assert!((result.value - 1161.89).abs() < 0.01, "got {}", result.value);
        assert_eq!(result.formula, Formula::OrdinaryAnnuity);
    }

    #[test]
    fn test_due_scales_by_one_plus_rate() {
        let ordinary = monthly(100.0, 0.005, 12.0).solve(AnnuityVariable::FutureValue).unwrap();
        let due = AnnuityInputs {
            timing: AnnuityTiming::Due,
            ..monthly(100.0, 0.005, 12.0)
        }
        .solve(AnnuityVariable::FutureValue)
        .unwrap();
        assert_relative_eq!(due.value, ordinary.value * 1.005, epsilon = 1e-9);
        assert_eq!(due.formula, Formula::AnnuityDue);
    }

    #[test]
    fn test_annual_rate_over_monthly_periods() {
        let inputs = AnnuityInputs {
            rate_unit: Periodicity::Annual,
            ..monthly(100.0, 1.01_f64.powi(12) - 1.0, 12.0)
        };
        let result = inputs.solve(AnnuityVariable::FutureValue).unwrap();
        let expected = 100.0 * (1.01_f64.powi(12) - 1.0) / 0.01;
        assert_relative_eq!(result.value, expected, epsilon = 1e-8);
    }

    #[test]
    fn test_payment_from_present_value() {
        let inputs = AnnuityInputs {
            payment: None,
            present_value: Some(10_000.0),
            ..monthly(0.0, 0.01, 12.0)
        };
        let result = inputs.solve(AnnuityVariable::Payment).unwrap();
        assert!((result.value - 888.49).abs() < 0.01, "got {}", result.value);
    }

    #[test]
    fn test_payment_from_future_value() {
        // 5000 saved over 10 years at 6%: 5000 * 0.06 / (1.06^10 - 1)
        let inputs = AnnuityInputs {
            future_value: Some(5000.0),
            rate: Some(0.06),
            time: Some(10.0),
            ..Default::default()
        };
        let result = inputs.solve(AnnuityVariable::Payment).unwrap();
        assert!((result.value - 379.34).abs() < 0.01, "got {}", result.value);
        assert_eq!(result.variable, Variable::Payment);
    }

    #[test]
    fn test_due_payment_and_present_value() {
        let due = |payment: Option<f64>, present_value: Option<f64>| AnnuityInputs {
            payment,
            present_value,
            rate: Some(0.01),
            time: Some(12.0),
            rate_unit: Periodicity::Monthly,
            time_unit: Periodicity::Monthly,
            timing: AnnuityTiming::Due,
            ..Default::default()
        };

        // Ordinary payment 888.4879 divided by 1.01
        let payment = due(None, Some(10_000.0)).solve(AnnuityVariable::Payment).unwrap();
        assert!((payment.value - 879.69).abs() < 0.01, "got {}", payment.value);
        assert_eq!(payment.formula, Formula::AnnuityDue);

        // 100 * (1 - 1.01^-12) / 0.01 * 1.01
        let pv = due(Some(100.0), None).solve(AnnuityVariable::PresentValue).unwrap();
        assert!((pv.value - 1136.76).abs() < 0.01, "got {}", pv.value);

        let payment = due(None, Some(pv.value)).solve(AnnuityVariable::Payment).unwrap();
        assert_relative_eq!(payment.value, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_payment_needs_one_value() {
        let inputs = AnnuityInputs {
            payment: None,
            ..monthly(0.0, 0.01, 12.0)
        };
        assert!(matches!(
            inputs.solve(AnnuityVariable::Payment),
            Err(FinanceError::MissingVariable { .. })
        ));
    }

    #[test]
    fn test_rate_and_time_inversion() {
        let inputs = AnnuityInputs {
            present_value: Some(1000.0),
            future_value: Some(1000.0 * 1.02_f64.powi(10)),
            rate: None,
            ..monthly(0.0, 0.0, 10.0)
        };
        let rate = inputs.solve(AnnuityVariable::Rate).unwrap();
        assert_relative_eq!(rate.value, 0.02, epsilon = 1e-12);
        assert_eq!(rate.unit, Some(Periodicity::Monthly));

        let time = AnnuityInputs {
            rate: Some(0.02),
            time: None,
            ..inputs
        }
        .solve(AnnuityVariable::Time)
        .unwrap();
        assert_relative_eq!(time.value, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rate_requires_growth() {
        let inputs = AnnuityInputs {
            present_value: Some(1000.0),
            future_value: Some(1000.0),
            rate: None,
            ..monthly(0.0, 0.0, 10.0)
        };
        assert!(matches!(
            inputs.solve(AnnuityVariable::Rate),
            Err(FinanceError::UndefinedOperation { .. })
        ));
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert_eq!(
            monthly(100.0, 0.0, 12.0).solve(AnnuityVariable::FutureValue).unwrap_err(),
            FinanceError::DivisionByZero { quantity: "rate" }
        );
    }
}
