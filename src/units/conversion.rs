//! Conversion of rates and durations between periodicities
//!
//! Durations scale linearly. Rates are converted by compound equivalence:
//! the rate is first expressed as an effective annual rate and then
//! re-expressed as the effective rate of the target period.

use log::debug;
use serde::{Deserialize, Serialize};

use super::Periodicity;
use crate::error::{FinanceError, FinanceResult};

/// A decimal interest rate tagged with its periodicity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateValue {
    pub rate: f64,
    pub unit: Periodicity,
}

impl RateValue {
    pub fn new(rate: f64, unit: Periodicity) -> Self {
        Self { rate, unit }
    }

    /// Equivalent effective rate in another periodicity
    pub fn to(&self, unit: Periodicity) -> FinanceResult<RateValue> {
        Ok(RateValue::new(convert_rate(self.rate, self.unit, unit)?, unit))
    }

    pub fn annual_effective(&self) -> FinanceResult<f64> {
        to_annual_effective(self.rate, self.unit)
    }
}

/// A duration tagged with its periodicity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    pub time: f64,
    pub unit: Periodicity,
}

impl TimeValue {
    pub fn new(time: f64, unit: Periodicity) -> Self {
        Self { time, unit }
    }

    pub fn to(&self, unit: Periodicity) -> TimeValue {
        TimeValue::new(convert_time(self.time, self.unit, unit), unit)
    }

    pub fn in_years(&self) -> f64 {
        convert_time(self.time, self.unit, Periodicity::Annual)
    }
}

/// Convert a duration between periodicities
///
/// `time_to = time_from * factor(to) / factor(from)`
pub fn convert_time(time: f64, from: Periodicity, to: Periodicity) -> f64 {
    if from == to {
        return time;
    }
    time * to.periods_per_year() / from.periods_per_year()
}

/// Convert an effective periodic rate between periodicities
///
/// Fails when `rate <= -1`, where the equivalent rate has no real value.
pub fn convert_rate(rate: f64, from: Periodicity, to: Periodicity) -> FinanceResult<f64> {
    if from == to {
        return Ok(rate);
    }
    let annual = to_annual_effective(rate, from)?;
    let converted = from_annual_effective(annual, to)?;
    debug!("convert_rate: {rate} {from} -> {converted} {to} (annual {annual})");
    Ok(converted)
}

/// Effective annual rate: `(1 + rate)^factor - 1`
pub fn to_annual_effective(rate: f64, unit: Periodicity) -> FinanceResult<f64> {
    check_growth_base(rate)?;
    if unit == Periodicity::Annual {
        return Ok(rate);
    }
    Ok((1.0 + rate).powf(unit.periods_per_year()) - 1.0)
}

/// Effective periodic rate from an annual one: `(1 + annual)^(1/factor) - 1`
pub fn from_annual_effective(annual: f64, unit: Periodicity) -> FinanceResult<f64> {
    check_growth_base(annual)?;
    if unit == Periodicity::Annual {
        return Ok(annual);
    }
    Ok((1.0 + annual).powf(1.0 / unit.periods_per_year()) - 1.0)
}

/// Effective periodic rate for a nominal rate
///
/// `rate` is quoted per `quoted` period and compounded every `compounding`
/// period, so the rate earned in one compounding period is
/// `rate * factor(quoted) / factor(compounding)`.
pub fn nominal_to_effective(
    rate: f64,
    quoted: Periodicity,
    compounding: Periodicity,
) -> FinanceResult<RateValue> {
    let periodic = rate * quoted.periods_per_year() / compounding.periods_per_year();
    check_growth_base(periodic)?;
    Ok(RateValue::new(periodic, compounding))
}

/// Nominal rate quoted per `quoted` and compounded every `compounding`
/// period that is equivalent to `effective`
pub fn effective_to_nominal(
    effective: RateValue,
    quoted: Periodicity,
    compounding: Periodicity,
) -> FinanceResult<f64> {
    let periodic = convert_rate(effective.rate, effective.unit, compounding)?;
    Ok(periodic * compounding.periods_per_year() / quoted.periods_per_year())
}

fn check_growth_base(rate: f64) -> FinanceResult<()> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(FinanceError::undefined(format!(
            "rate {rate} has no compound equivalent (must be greater than -1)"
        )));
    }
    Ok(())
}
