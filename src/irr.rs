//! Internal Rate of Return (IRR) calculation
//!
//! Finds the periodic rate that zeroes the net present value of a
//! cash-flow sequence using Newton-Raphson.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::units::{to_annual_effective, Periodicity};

/// Newton-Raphson settings for the IRR solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrConfig {
    /// Starting rate
    pub initial_guess: f64,
    /// Stop once successive iterates differ by less than this
    pub tolerance: f64,
    pub max_iterations: u32,
    /// Abort when |NPV'| falls below this
    pub min_derivative: f64,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            tolerance: 1e-5,
            max_iterations: 100,
            min_derivative: 1e-10,
        }
    }
}

/// Solved IRR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrResult {
    /// Periodic rate (per period of the cash-flow sequence)
    pub rate: f64,
    pub iterations: u32,
    /// False when the iteration cap was hit before the tolerance was met
    pub converged: bool,
    /// NPV at `rate`
    pub npv: f64,
}

impl IrrResult {
    pub fn is_approximate(&self) -> bool {
        !self.converged
    }

    /// Annual effective rate when the flows are spaced by `periodicity`
    pub fn annualized(&self, periodicity: Periodicity) -> FinanceResult<f64> {
        to_annual_effective(self.rate, periodicity)
    }
}

/// Calculate the IRR of `cashflows` with the default settings
///
/// # Arguments
/// * `cashflows` - Flows indexed by period 0..N-1 (negative = outflow)
///
/// # Returns
/// * The periodic IRR, flagged approximate when the iteration cap was hit
pub fn calculate_irr(cashflows: &[f64]) -> FinanceResult<IrrResult> {
    calculate_irr_with(cashflows, &IrrConfig::default())
}

pub fn calculate_irr_with(cashflows: &[f64], config: &IrrConfig) -> FinanceResult<IrrResult> {
    if cashflows.len() < 2 {
        return Err(FinanceError::invalid_input(format!(
            "IRR needs at least 2 cash flows, got {}",
            cashflows.len()
        )));
    }
    if cashflows.iter().any(|cf| !cf.is_finite()) {
        return Err(FinanceError::invalid_input("cash flows must be finite numbers"));
    }
    if cashflows[0] >= 0.0 {
        debug!("first cash flow {} is not an outflow", cashflows[0]);
    }

    let mut rate = config.initial_guess;

    for iteration in 0..config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < config.min_derivative {
            return Err(FinanceError::convergence_abort(
                iteration,
                format!("NPV derivative {dnpv:.3e} is too close to zero at rate {rate}"),
            ));
        }

        let new_rate = rate - npv / dnpv;
        if !new_rate.is_finite() {
            return Err(FinanceError::convergence_abort(
                iteration,
                format!("iterate became {new_rate}"),
            ));
        }

        if (new_rate - rate).abs() < config.tolerance {
            debug!("IRR converged to {new_rate} after {} iterations", iteration + 1);
            return Ok(IrrResult {
                rate: new_rate,
                iterations: iteration + 1,
                converged: true,
                npv: npv_at_rate(cashflows, new_rate),
            });
        }

        rate = new_rate;
    }

    warn!(
        "IRR did not reach tolerance {} in {} iterations; returning approximation {rate}",
        config.tolerance, config.max_iterations
    );
    Ok(IrrResult {
        rate,
        iterations: config.max_iterations,
        converged: false,
        npv: npv_at_rate(cashflows, rate),
    })
}

/// Net present value of `cashflows` at a periodic `rate`
pub fn npv(rate: f64, cashflows: &[f64]) -> FinanceResult<f64> {
    if rate <= -1.0 {
        return Err(FinanceError::undefined(format!(
            "discount rate {rate} must be greater than -1"
        )));
    }
    Ok(npv_at_rate(cashflows, rate))
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / ((1.0 + rate).powi(t as i32 + 1));
        }
    }

    (npv, dnpv)
}

fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
