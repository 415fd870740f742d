//! Sweep a loan over a range of periodic rates
//!
//! Writes one CSV row per rate with the payment and total interest, e.g.
//!
//! ```bash
//! rate_sweep --principal 250000 --periods 360 --from 0.002 --to 0.006 --step 0.0005
//! ```

use anyhow::{ensure, Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use interest_engine::{AmortizationMethod, AmortizationRequest, EngineConfig, ScenarioRunner};

/// Largest number of rates one sweep may price
const MAX_POINTS: usize = 100_000;

#[derive(Parser)]
#[command(name = "rate_sweep", version, about = "Amortization payment and interest across rates")]
struct Args {
    #[arg(long)]
    principal: f64,

    #[arg(long)]
    periods: u32,

    #[arg(long, default_value = "constant-payment")]
    method: AmortizationMethod,

    /// Lowest periodic rate
    #[arg(long)]
    from: f64,

    /// Highest periodic rate
    #[arg(long)]
    to: f64,

    #[arg(long, default_value_t = 0.0005)]
    step: f64,

    #[arg(long, default_value = "rate_sweep.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let rates = sweep_rates(args.from, args.to, args.step)?;

    let runner = ScenarioRunner::with_config(EngineConfig::default().with_env_overrides());
    let base = AmortizationRequest::new(args.principal, args.from, args.periods, args.method);

    let start = Instant::now();
    let rows = runner
        .amortization_rate_sweep(&base, &rates)
        .context("rate sweep failed")?;
    println!("Priced {} rates in {:?}", rows.len(), start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("unable to create {}", args.output.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    println!("Results written to: {}", args.output.display());
    Ok(())
}

/// Evenly spaced rates from `from` to `to` inclusive
fn sweep_rates(from: f64, to: f64, step: f64) -> Result<Vec<f64>> {
    ensure!(from.is_finite() && to.is_finite(), "rate bounds must be finite");
    ensure!(step.is_finite() && step > 0.0, "--step must be positive");
    ensure!(to >= from, "--to must not be below --from");

    let intervals = ((to - from) / step).round();
    ensure!(
        intervals < MAX_POINTS as f64,
        "sweep would price {} rates; at most {MAX_POINTS} are allowed",
        intervals + 1.0
    );

    let count = intervals as usize + 1;
    Ok((0..count).map(|k| from + k as f64 * step).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_includes_both_ends() {
        let rates = sweep_rates(0.002, 0.006, 0.001).unwrap();
        assert_eq!(rates.len(), 5);
        assert!((rates[4] - 0.006).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_rejects_tiny_step() {
        assert!(sweep_rates(0.0, 0.01, 1e-300).is_err());
        assert!(sweep_rates(0.0, 0.01, 0.0).is_err());
        assert!(sweep_rates(0.01, 0.0, 0.001).is_err());
    }
}
