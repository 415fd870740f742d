//! Scenario runner for batch calculations
//!
//! Holds one engine configuration and evaluates many independent requests
//! in parallel. Every solver is pure, so requests share nothing but the
//! read-only configuration.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationRequest, AmortizationSchedule};
use crate::config::EngineConfig;
use crate::engine::FinanceEngine;
use crate::error::FinanceResult;
use crate::irr::IrrResult;

/// One point of a rate sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSweepRow {
    pub rate: f64,
    pub payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

/// Runner for batches of calculations sharing one configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let rates = [0.005, 0.01, 0.015];
/// let rows = runner.amortization_rate_sweep(&request, &rates)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: FinanceEngine,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: FinanceEngine::new(config),
        }
    }

    pub fn engine(&self) -> &FinanceEngine {
        &self.engine
    }

    /// Build every schedule; results keep the order of `requests`
    pub fn run_amortizations(
        &self,
        requests: &[AmortizationRequest],
    ) -> Vec<FinanceResult<AmortizationSchedule>> {
        requests
            .par_iter()
            .map(|request| self.engine.amortize(request))
            .collect()
    }

    /// Re-price one loan at each periodic rate
    ///
    /// Fails on the first rate the base request rejects.
    pub fn amortization_rate_sweep(
        &self,
        base: &AmortizationRequest,
        rates: &[f64],
    ) -> FinanceResult<Vec<RateSweepRow>> {
        let rows = rates
            .par_iter()
            .map(|&rate| {
                let request = AmortizationRequest { rate, ..base.clone() };
                let summary = self.engine.amortize(&request)?.summary();
                Ok(RateSweepRow {
                    rate,
                    payment: summary.payment,
                    total_paid: summary.total_paid,
                    total_interest: summary.total_interest,
                })
            })
            .collect::<FinanceResult<Vec<_>>>()?;

        info!("rate sweep: {} points for {}", rows.len(), base.method);
        Ok(rows)
    }

    /// IRR of each cash-flow sequence; results keep the input order
    pub fn irr_batch(&self, sequences: &[Vec<f64>]) -> Vec<FinanceResult<IrrResult>> {
        sequences
            .par_iter()
            .map(|flows| self.engine.irr(flows))
            .collect()
    }
}
