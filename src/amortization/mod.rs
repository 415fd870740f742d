//! Loan amortization schedules
//!
//! Three repayment methods are supported:
//! - **French** (constant payment): fixed installment, interest on the
//!   declining balance, principal = payment − interest
//! - **German** (constant amortization): fixed principal `P/n`, payment
//!   decreases with the interest
//! - **American** (interest only): interest every period, the whole
//!   principal with the last payment
//!
//! Every schedule ends with a zero balance; residuals under the configured
//! tolerance are snapped to zero, anything larger is a defect.

mod schedule;

pub use schedule::{AmortizationRow, AmortizationSchedule, ScheduleSummary};

use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FinanceError, FinanceResult};
use crate::units::{convert_rate, Periodicity};

/// Largest final balance accepted as "paid off"
pub const BALANCE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationMethod {
    /// Constant payment (French system)
    ConstantPayment,
    /// Constant amortization (German system)
    ConstantAmortization,
    /// Interest only with a balloon repayment (American system)
    InterestOnly,
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AmortizationMethod::ConstantPayment => "constant-payment",
            AmortizationMethod::ConstantAmortization => "constant-amortization",
            AmortizationMethod::InterestOnly => "interest-only",
        };
        f.write_str(name)
    }
}

impl FromStr for AmortizationMethod {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constant-payment" | "french" | "frances" => Ok(AmortizationMethod::ConstantPayment),
            "constant-amortization" | "german" | "aleman" => Ok(AmortizationMethod::ConstantAmortization),
            "interest-only" | "american" | "americano" => Ok(AmortizationMethod::InterestOnly),
            other => Err(FinanceError::invalid_input(format!("unknown amortization method '{other}'"))),
        }
    }
}

/// Parameters of a loan to amortize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRequest {
    pub principal: f64,
    /// Decimal rate per period
    pub rate: f64,
    pub periods: u32,
    pub method: AmortizationMethod,
}

impl AmortizationRequest {
    pub fn new(principal: f64, rate: f64, periods: u32, method: AmortizationMethod) -> Self {
        Self { principal, rate, periods, method }
    }

    /// Request whose rate is quoted in another periodicity than the payments
    pub fn with_rate_unit(
        principal: f64,
        rate: f64,
        rate_unit: Periodicity,
        periods: u32,
        period_unit: Periodicity,
        method: AmortizationMethod,
    ) -> FinanceResult<Self> {
        let rate = convert_rate(rate, rate_unit, period_unit)?;
        Ok(Self::new(principal, rate, periods, method))
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(FinanceError::invalid_input(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(FinanceError::invalid_input(format!(
                "rate must be non-negative, got {}",
                self.rate
            )));
        }
        if self.periods == 0 {
            return Err(FinanceError::invalid_input("at least one period is required"));
        }
        Ok(())
    }
}

/// Build the schedule with the default balance tolerance
pub fn amortize(request: &AmortizationRequest) -> FinanceResult<AmortizationSchedule> {
    amortize_with_tolerance(request, BALANCE_TOLERANCE)
}

/// Build the schedule; `tolerance` bounds the final residual balance
pub fn amortize_with_tolerance(
    request: &AmortizationRequest,
    tolerance: f64,
) -> FinanceResult<AmortizationSchedule> {
    request.validate()?;
    debug!(
        "amortize {}: P={} i={} n={}",
        request.method, request.principal, request.rate, request.periods
    );

    let mut schedule = match request.method {
        AmortizationMethod::ConstantPayment => constant_payment(request),
        AmortizationMethod::ConstantAmortization => constant_amortization(request),
        AmortizationMethod::InterestOnly => interest_only(request),
    };

    settle_final_balance(&mut schedule, tolerance);
    Ok(schedule)
}

/// French payment: `P·i(1+i)^n / ((1+i)^n − 1)`, or `P/n` at zero rate
pub fn constant_payment_amount(principal: f64, rate: f64, periods: u32) -> f64 {
    let n = periods as f64;
    if rate == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + rate).powf(n);
    principal * rate * growth / (growth - 1.0)
}

fn constant_payment(request: &AmortizationRequest) -> AmortizationSchedule {
    let mut schedule = AmortizationSchedule::new(request.method);
    let payment = constant_payment_amount(request.principal, request.rate, request.periods);
    let mut previous = request.principal;

    for period in 1..=request.periods {
        // Balance from the closed form, never rolled forward from `payment`
        let balance = remaining_balance(request, period);
        let interest = previous * request.rate;
        let principal = previous - balance;
        schedule.add_row(AmortizationRow { period, payment, interest, principal, balance });
        previous = balance;
    }

    schedule.payment = payment;
    schedule
}

/// Outstanding French balance after `period` payments
///
/// `P·((1+i)^n − (1+i)^k) / ((1+i)^n − 1)`, linear at zero rate.
fn remaining_balance(request: &AmortizationRequest, period: u32) -> f64 {
    let n = request.periods as f64;
    let k = period as f64;
    if request.rate == 0.0 {
        return request.principal * (n - k) / n;
    }
    let growth_n = (1.0 + request.rate).powf(n);
    let growth_k = (1.0 + request.rate).powf(k);
    request.principal * (growth_n - growth_k) / (growth_n - 1.0)
}

fn constant_amortization(request: &AmortizationRequest) -> AmortizationSchedule {
    let mut schedule = AmortizationSchedule::new(request.method);
    let principal = request.principal / request.periods as f64;
    let mut balance = request.principal;
    let mut total_paid = 0.0;

    for period in 1..=request.periods {
        let interest = balance * request.rate;
        let payment = principal + interest;
        balance -= principal;
        total_paid += payment;
        schedule.add_row(AmortizationRow { period, payment, interest, principal, balance });
    }

    schedule.payment = total_paid / request.periods as f64;
    schedule
}

fn interest_only(request: &AmortizationRequest) -> AmortizationSchedule {
    let mut schedule = AmortizationSchedule::new(request.method);
    let interest = request.principal * request.rate;

    for period in 1..=request.periods {
        let last = period == request.periods;
        let principal = if last { request.principal } else { 0.0 };
        let balance = if last { 0.0 } else { request.principal };
        schedule.add_row(AmortizationRow {
            period,
            payment: interest + principal,
            interest,
            principal,
            balance,
        });
    }

    let n = request.periods as f64;
    schedule.payment = (interest * n + request.principal) / n;
    schedule
}

/// Snap a floating-point residual on the last row to zero
fn settle_final_balance(schedule: &mut AmortizationSchedule, tolerance: f64) {
    let Some(last) = schedule.rows.last_mut() else {
        return;
    };
    let residual = last.balance;
    if residual.abs() > tolerance {
        error!(
            "{} schedule closed with balance {residual}, above tolerance {tolerance}",
            schedule.method
        );
    }
    debug_assert!(residual.abs() <= tolerance, "amortization left balance {residual}");

    if residual.abs() <= tolerance {
        last.principal += residual;
        last.payment += residual;
        last.balance = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn check_invariants(schedule: &AmortizationSchedule, principal: f64) {
        let summary = schedule.summary();
        assert_abs_diff_eq!(summary.total_principal, principal, epsilon = 0.01);
        assert_abs_diff_eq!(summary.final_balance, 0.0, epsilon = 0.01);
        for pair in schedule.rows.windows(2) {
            let slack = 1e-9 * pair[0].balance.max(1.0);
            assert!(pair[1].balance <= pair[0].balance + slack, "balance increased at {}", pair[1].period);
        }
    }

    #[test]
    fn test_french_scenario() {
        let request = AmortizationRequest::new(10_000.0, 0.01, 12, AmortizationMethod::ConstantPayment);
        let schedule = amortize(&request).unwrap();

        assert_eq!(schedule.rows.len(), 12);
        assert_abs_diff_eq!(schedule.payment, 888.49, epsilon = 0.005);
        assert_abs_diff_eq!(schedule.rows[0].interest, 100.0, epsilon = 1e-9);
        assert_eq!(schedule.rows[11].balance, 0.0);
        check_invariants(&schedule, 10_000.0);
    }

    #[test]
    fn test_french_zero_rate() {
        let request = AmortizationRequest::new(1200.0, 0.0, 12, AmortizationMethod::ConstantPayment);
        let schedule = amortize(&request).unwrap();
        assert_abs_diff_eq!(schedule.payment, 100.0, epsilon = 1e-12);
        check_invariants(&schedule, 1200.0);
    }

    #[test]
    fn test_french_long_high_rate_loan() {
        let request = AmortizationRequest::new(1_000_000.0, 0.10, 360, AmortizationMethod::ConstantPayment);
        let schedule = amortize(&request).unwrap();

        assert_eq!(schedule.final_balance(), 0.0);
        for row in &schedule.rows {
            assert_abs_diff_eq!(row.interest + row.principal, schedule.payment, epsilon = 1e-6);
        }
        check_invariants(&schedule, 1_000_000.0);
    }

    #[test]
    fn test_german_schedule() {
        let request = AmortizationRequest::new(12_000.0, 0.01, 12, AmortizationMethod::ConstantAmortization);
        let schedule = amortize(&request).unwrap();

        assert_abs_diff_eq!(schedule.rows[0].principal, 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.rows[0].payment, 1120.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.rows[11].payment, 1010.0, epsilon = 1e-9);
        // Mean of an arithmetic sequence from 1120 to 1010
        assert_abs_diff_eq!(schedule.payment, 1065.0, epsilon = 1e-9);
        check_invariants(&schedule, 12_000.0);
    }

    #[test]
    fn test_american_schedule() {
        let request = AmortizationRequest::new(5000.0, 0.02, 4, AmortizationMethod::InterestOnly);
        let schedule = amortize(&request).unwrap();

        assert_eq!(schedule.rows[0].payment, 100.0);
        assert_eq!(schedule.rows[2].balance, 5000.0);
        assert_eq!(schedule.rows[3].payment, 5100.0);
        assert_abs_diff_eq!(schedule.payment, 1350.0, epsilon = 1e-9);
        check_invariants(&schedule, 5000.0);
    }

    #[test]
    fn test_invariants_across_methods() {
        for method in [
            AmortizationMethod::ConstantPayment,
            AmortizationMethod::ConstantAmortization,
            AmortizationMethod::InterestOnly,
        ] {
            for &(p, i, n) in &[
                (1000.0, 0.005, 360),
                (250_000.0, 0.0375, 30),
                (99.99, 0.2, 1),
                (1_000_000.0, 0.10, 360),
                (250_000.0, 0.05, 600),
                (100_000.0, 0.02, 1000),
            ] {
                let schedule = amortize(&AmortizationRequest::new(p, i, n, method)).unwrap();
                check_invariants(&schedule, p);
            }
        }
    }

    #[test]
    fn test_rate_unit_conversion() {
        let request = AmortizationRequest::with_rate_unit(
            10_000.0,
            1.01_f64.powi(12) - 1.0,
            Periodicity::Annual,
            12,
            Periodicity::Monthly,
            AmortizationMethod::ConstantPayment,
        )
        .unwrap();
        assert_abs_diff_eq!(request.rate, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_validation() {
        let bad = [
            AmortizationRequest::new(0.0, 0.01, 12, AmortizationMethod::ConstantPayment),
            AmortizationRequest::new(100.0, -0.01, 12, AmortizationMethod::ConstantPayment),
            AmortizationRequest::new(100.0, 0.01, 0, AmortizationMethod::ConstantPayment),
            AmortizationRequest::new(f64::NAN, 0.01, 12, AmortizationMethod::ConstantPayment),
            AmortizationRequest::new(100.0, f64::NAN, 12, AmortizationMethod::ConstantPayment),
        ];
        for request in &bad {
            assert!(matches!(amortize(request), Err(FinanceError::InvalidInput { .. })));
        }
    }

    #[test]
    fn test_method_names() {
        assert_eq!("french".parse::<AmortizationMethod>().unwrap(), AmortizationMethod::ConstantPayment);
        assert_eq!("aleman".parse::<AmortizationMethod>().unwrap(), AmortizationMethod::ConstantAmortization);
        assert_eq!("interest-only".parse::<AmortizationMethod>().unwrap(), AmortizationMethod::InterestOnly);
        assert!("balloon".parse::<AmortizationMethod>().is_err());
    }
}
