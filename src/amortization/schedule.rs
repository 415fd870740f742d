//! Amortization schedule output structures

use serde::{Deserialize, Serialize};
use std::io::Write;

use super::AmortizationMethod;

/// A single period of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Period index, starting at 1
    pub period: u32,
    pub payment: f64,
    pub interest: f64,
    /// Principal repaid this period
    pub principal: f64,
    /// Outstanding balance after the payment
    pub balance: f64,
}

/// Complete amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub method: AmortizationMethod,

    /// Fixed payment for French schedules, mean payment otherwise
    pub payment: f64,

    /// Period rows in order
    pub rows: Vec<AmortizationRow>,
}

impl AmortizationSchedule {
    pub fn new(method: AmortizationMethod) -> Self {
        Self {
            method,
            payment: 0.0,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: AmortizationRow) {
        self.rows.push(row);
    }

    pub fn final_balance(&self) -> f64 {
        self.rows.last().map(|r| r.balance).unwrap_or(0.0)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_paid: f64 = self.rows.iter().map(|r| r.payment).sum();
        let total_interest: f64 = self.rows.iter().map(|r| r.interest).sum();
        let total_principal: f64 = self.rows.iter().map(|r| r.principal).sum();

        ScheduleSummary {
            periods: self.rows.len() as u32,
            payment: self.payment,
            total_paid,
            total_interest,
            total_principal,
            final_balance: self.final_balance(),
        }
    }

    /// Write the rows as CSV with a header line
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub periods: u32,
    pub payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub final_balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_and_csv() {
        let mut schedule = AmortizationSchedule::new(AmortizationMethod::InterestOnly);
        schedule.payment = 55.0;
        schedule.add_row(AmortizationRow { period: 1, payment: 10.0, interest: 10.0, principal: 0.0, balance: 100.0 });
        schedule.add_row(AmortizationRow { period: 2, payment: 110.0, interest: 10.0, principal: 100.0, balance: 0.0 });

        let summary = schedule.summary();
        assert_eq!(summary.periods, 2);
        assert_eq!(summary.total_paid, 120.0);
        assert_eq!(summary.total_interest, 20.0);
        assert_eq!(summary.total_principal, 100.0);
        assert_eq!(summary.final_balance, 0.0);

        let mut buf = Vec::new();
        schedule.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("period,payment,interest,principal,balance"));
        assert_eq!(lines.next(), Some("1,10.0,10.0,0.0,100.0"));
        assert_eq!(lines.count(), 1);
    }
}
