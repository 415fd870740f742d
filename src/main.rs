//! Interest Engine CLI
//!
//! Command-line interface for the financial formula engine
//!
//! ```bash
//! interest-engine simple --capital 1000 --rate 0.05 --time 2
//! interest-engine compound --principal 1000 --rate 0.05 --time 2 --compounding monthly
//! interest-engine amortize --principal 10000 --rate 0.01 --periods 12 --csv schedule.csv
//! interest-engine --json irr -- -1000 500 500 500
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::path::PathBuf;

use interest_engine::amortization::AmortizationRequest;
use interest_engine::solvers::{
    AnnuityInputs, AnnuityTiming, AnnuityVariable, CapitalizationInputs, CapitalizationRegime,
    CapitalizationTarget, CompoundInterestInputs, GradientInputs, GradientTarget, Growth,
    SimpleInterestInputs,
};
use interest_engine::units::{convert_rate, convert_time, nominal_to_effective};
use interest_engine::{
    AmortizationMethod, EngineConfig, FinanceEngine, IrrResult, Periodicity, TimeValue,
};

/// Interest Engine - unit-aware interest, annuity, amortization and IRR calculator
#[derive(Parser)]
#[command(name = "interest-engine")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an effective (or nominal) rate to another periodicity
    ConvertRate(ConvertRateArgs),

    /// Convert a duration to another periodicity
    ConvertTime(ConvertTimeArgs),

    /// Simple interest I = C·i·t; omit exactly one of the four variables
    Simple(SimpleArgs),

    /// Compound interest FV = P(1+i)^t; omit exactly one of the four variables
    Compound(CompoundArgs),

    /// Level payment annuity (ordinary or due)
    Annuity(AnnuityArgs),

    /// Arithmetic or geometric gradient series
    Gradient(GradientArgs),

    /// Build an amortization schedule
    Amortize(AmortizeArgs),

    /// Internal rate of return of a cash-flow sequence
    Irr(IrrArgs),

    /// Final or initial capital under a capitalization regime
    Capitalize(CapitalizeArgs),
}

#[derive(Args)]
struct ConvertRateArgs {
    /// Decimal rate (0.05 for 5%)
    #[arg(long, allow_negative_numbers = true)]
    rate: f64,

    #[arg(long, default_value = "annual")]
    from: Periodicity,

    #[arg(long)]
    to: Periodicity,

    /// Treat the rate as nominal, capitalized at this periodicity
    #[arg(long)]
    compounding: Option<Periodicity>,
}

#[derive(Args)]
struct ConvertTimeArgs {
    #[arg(long)]
    time: f64,

    #[arg(long)]
    from: Periodicity,

    #[arg(long)]
    to: Periodicity,
}

#[derive(Args)]
struct SimpleArgs {
    #[arg(long)]
    capital: Option<f64>,

    #[arg(long)]
    rate: Option<f64>,

    #[arg(long)]
    time: Option<f64>,

    #[arg(long)]
    interest: Option<f64>,

    #[arg(long, default_value = "annual")]
    rate_unit: Periodicity,

    #[arg(long, default_value = "annual")]
    time_unit: Periodicity,

    /// Periodicity of a solved rate
    #[arg(long)]
    desired_rate_unit: Option<Periodicity>,

    /// Periodicity of a solved time
    #[arg(long)]
    desired_time_unit: Option<Periodicity>,
}

#[derive(Args)]
struct CompoundArgs {
    #[arg(long)]
    principal: Option<f64>,

    #[arg(long)]
    rate: Option<f64>,

    #[arg(long)]
    time: Option<f64>,

    #[arg(long)]
    future_value: Option<f64>,

    #[arg(long, default_value = "annual")]
    rate_unit: Periodicity,

    #[arg(long, default_value = "annual")]
    time_unit: Periodicity,

    /// Capitalization frequency when the rate is nominal
    #[arg(long)]
    compounding: Option<Periodicity>,

    #[arg(long)]
    desired_rate_unit: Option<Periodicity>,

    #[arg(long)]
    desired_time_unit: Option<Periodicity>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnnuitySolve {
    FutureValue,
    PresentValue,
    Rate,
    Time,
    Payment,
}

impl From<AnnuitySolve> for AnnuityVariable {
    fn from(solve: AnnuitySolve) -> Self {
        match solve {
            AnnuitySolve::FutureValue => AnnuityVariable::FutureValue,
            AnnuitySolve::PresentValue => AnnuityVariable::PresentValue,
            AnnuitySolve::Rate => AnnuityVariable::Rate,
            AnnuitySolve::Time => AnnuityVariable::Time,
            AnnuitySolve::Payment => AnnuityVariable::Payment,
        }
    }
}

#[derive(Args)]
struct AnnuityArgs {
    /// Variable to compute
    #[arg(long, value_enum)]
    solve: AnnuitySolve,

    #[arg(long)]
    payment: Option<f64>,

    #[arg(long)]
    present_value: Option<f64>,

    #[arg(long)]
    future_value: Option<f64>,

    #[arg(long)]
    rate: Option<f64>,

    /// Number of payments
    #[arg(long)]
    time: Option<f64>,

    #[arg(long, default_value = "annual")]
    rate_unit: Periodicity,

    #[arg(long, default_value = "annual")]
    time_unit: Periodicity,

    /// Payments at the start of each period
    #[arg(long)]
    due: bool,

    #[arg(long)]
    desired_rate_unit: Option<Periodicity>,

    #[arg(long)]
    desired_time_unit: Option<Periodicity>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GradientSolve {
    PresentValue,
    FutureValue,
}

#[derive(Args)]
struct GradientArgs {
    #[arg(long, value_enum, default_value = "present-value")]
    solve: GradientSolve,

    /// Base payment
    #[arg(long)]
    payment: f64,

    #[arg(long)]
    rate: f64,

    #[arg(long)]
    time: f64,

    /// Fixed increment per period
    #[arg(long, allow_negative_numbers = true, conflicts_with = "geometric")]
    arithmetic: Option<f64>,

    /// Decimal growth per period
    #[arg(long, allow_negative_numbers = true)]
    geometric: Option<f64>,

    #[arg(long, default_value = "annual")]
    rate_unit: Periodicity,

    #[arg(long, default_value = "annual")]
    time_unit: Periodicity,
}

#[derive(Args)]
struct AmortizeArgs {
    #[arg(long)]
    principal: f64,

    /// Decimal rate per `rate-unit`
    #[arg(long)]
    rate: f64,

    /// Number of payments
    #[arg(long)]
    periods: u32,

    /// constant-payment (french), constant-amortization (german) or interest-only (american)
    #[arg(long, default_value = "constant-payment")]
    method: AmortizationMethod,

    /// Periodicity of the quoted rate; defaults to the payment periodicity
    #[arg(long)]
    rate_unit: Option<Periodicity>,

    /// Payment periodicity
    #[arg(long, default_value = "monthly")]
    period_unit: Periodicity,

    /// Write the schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct IrrArgs {
    /// Cash flows for periods 0..N-1 (outflows negative)
    #[arg(required = true, num_args = 2.., allow_negative_numbers = true)]
    flows: Vec<f64>,

    /// Spacing of the flows; also report the annual effective rate
    #[arg(long)]
    periodicity: Option<Periodicity>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RegimeArg {
    Simple,
    Compound,
    Continuous,
    Periodic,
    Anticipated,
    Deferred,
}

impl From<RegimeArg> for CapitalizationRegime {
    fn from(regime: RegimeArg) -> Self {
        match regime {
            RegimeArg::Simple => CapitalizationRegime::Simple,
            RegimeArg::Compound => CapitalizationRegime::Compound,
            RegimeArg::Continuous => CapitalizationRegime::Continuous,
            RegimeArg::Periodic => CapitalizationRegime::Periodic,
            RegimeArg::Anticipated => CapitalizationRegime::Anticipated,
            RegimeArg::Deferred => CapitalizationRegime::Deferred,
        }
    }
}

#[derive(Args)]
struct CapitalizeArgs {
    #[arg(long, value_enum)]
    regime: RegimeArg,

    /// Initial capital, or the final amount with --initial
    #[arg(long)]
    amount: f64,

    /// Nominal annual rate
    #[arg(long)]
    rate: f64,

    #[arg(long, default_value = "annual")]
    compounding: Periodicity,

    #[arg(long)]
    time: f64,

    #[arg(long, default_value = "annual")]
    time_unit: Periodicity,

    /// Capitalizations per year for the periodic regime
    #[arg(long)]
    periods_per_year: Option<f64>,

    /// Waiting time for the deferred regime, in `time-unit`
    #[arg(long)]
    deferral: Option<f64>,

    /// Discount the amount back to the initial capital
    #[arg(long)]
    initial: bool,
}

#[derive(Serialize)]
struct Converted {
    value: f64,
    unit: Periodicity,
}

impl Display for Converted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.10} {}", self.value, self.unit)
    }
}

#[derive(Serialize)]
struct IrrReport {
    #[serde(flatten)]
    result: IrrResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    annual_effective: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let engine = FinanceEngine::new(config);

    match cli.command {
        Commands::ConvertRate(args) => {
            let value = match args.compounding {
                Some(compounding) => nominal_to_effective(args.rate, args.from, compounding)
                    .and_then(|effective| effective.to(args.to))
                    .map(|r| r.rate),
                None => convert_rate(args.rate, args.from, args.to),
            }
            .context("rate conversion failed")?;
            report(&Converted { value, unit: args.to }, cli.json)?;
        }
        Commands::ConvertTime(args) => {
            let value = convert_time(args.time, args.from, args.to);
            report(&Converted { value, unit: args.to }, cli.json)?;
        }
        Commands::Simple(args) => {
            let inputs = SimpleInterestInputs {
                capital: args.capital,
                rate: args.rate,
                time: args.time,
                interest: args.interest,
                rate_unit: args.rate_unit,
                time_unit: args.time_unit,
                desired_rate_unit: args.desired_rate_unit,
                desired_time_unit: args.desired_time_unit,
            };
            let result = engine
                .simple_interest(&inputs, None)
                .context("simple interest calculation failed")?;
            report(&result, cli.json)?;
        }
        Commands::Compound(args) => {
            let inputs = CompoundInterestInputs {
                principal: args.principal,
                rate: args.rate,
                time: args.time,
                future_value: args.future_value,
                rate_unit: args.rate_unit,
                time_unit: args.time_unit,
                compounding: args.compounding,
                desired_rate_unit: args.desired_rate_unit,
                desired_time_unit: args.desired_time_unit,
            };
            let result = engine
                .compound_interest(&inputs, None)
                .context("compound interest calculation failed")?;
            report(&result, cli.json)?;
        }
        Commands::Annuity(args) => {
            let inputs = AnnuityInputs {
                payment: args.payment,
                present_value: args.present_value,
                future_value: args.future_value,
                rate: args.rate,
                time: args.time,
                rate_unit: args.rate_unit,
                time_unit: args.time_unit,
                timing: if args.due { AnnuityTiming::Due } else { AnnuityTiming::Ordinary },
                desired_rate_unit: args.desired_rate_unit,
                desired_time_unit: args.desired_time_unit,
            };
            let result = engine
                .annuity(&inputs, args.solve.into())
                .context("annuity calculation failed")?;
            report(&result, cli.json)?;
        }
        Commands::Gradient(args) => {
            let growth = match (args.arithmetic, args.geometric) {
                (Some(g), None) => Growth::Arithmetic(g),
                (None, Some(g)) => Growth::Geometric(g),
                _ => return Err(anyhow!("pass exactly one of --arithmetic or --geometric")),
            };
            let inputs = GradientInputs {
                payment: args.payment,
                rate: args.rate,
                time: args.time,
                growth,
                rate_unit: args.rate_unit,
                time_unit: args.time_unit,
            };
            let target = match args.solve {
                GradientSolve::PresentValue => GradientTarget::PresentValue,
                GradientSolve::FutureValue => GradientTarget::FutureValue,
            };
            let result = engine.gradient(&inputs, target).context("gradient calculation failed")?;
            report(&result, cli.json)?;
        }
        Commands::Amortize(args) => run_amortize(&engine, args, cli.json)?,
        Commands::Irr(args) => {
            let result = engine.irr(&args.flows).context("IRR calculation failed")?;
            let annual_effective = args
                .periodicity
                .map(|p| result.annualized(p))
                .transpose()
                .context("IRR annualization failed")?;

            if cli.json {
                let report = IrrReport { result, annual_effective };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("IRR: {:.6}% per period", result.rate * 100.0);
                println!("  Iterations: {}", result.iterations);
                println!("  NPV at IRR: {:.8}", result.npv);
                if let Some(annual) = annual_effective {
                    println!("  Annual effective: {:.6}%", annual * 100.0);
                }
                if result.is_approximate() {
                    println!("  (approximate: iteration limit reached)");
                }
            }
        }
        Commands::Capitalize(args) => {
            let inputs = CapitalizationInputs {
                regime: args.regime.into(),
                amount: args.amount,
                annual_rate: args.rate,
                compounding: args.compounding,
                time: TimeValue::new(args.time, args.time_unit),
                periods_per_year: args.periods_per_year,
                deferral: args.deferral.map(|d| TimeValue::new(d, args.time_unit)),
            };
            let target = if args.initial {
                CapitalizationTarget::InitialCapital
            } else {
                CapitalizationTarget::FinalCapital
            };
            let result = engine.capitalize(&inputs, target).context("capitalization failed")?;
            report(&result, cli.json)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_json_path(path)
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let config = config.with_env_overrides();
    config.validate().map_err(|e| anyhow!(e)).context("invalid engine configuration")?;
    Ok(config)
}

fn run_amortize(engine: &FinanceEngine, args: AmortizeArgs, json: bool) -> Result<()> {
    let request = AmortizationRequest::with_rate_unit(
        args.principal,
        args.rate,
        args.rate_unit.unwrap_or(args.period_unit),
        args.periods,
        args.period_unit,
        args.method,
    )
    .context("invalid amortization request")?;
    let schedule = engine.amortize(&request).context("amortization failed")?;
    let summary = schedule.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        println!("{:>6} {:>14} {:>14} {:>14} {:>14}", "Period", "Payment", "Interest", "Principal", "Balance");
        println!("{}", "-".repeat(66));
        for row in &schedule.rows {
            println!(
                "{:>6} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
                row.period, row.payment, row.interest, row.principal, row.balance
            );
        }
        println!("\nSummary ({}):", schedule.method);
        println!("  Payment: {:.2}", summary.payment);
        println!("  Total Paid: {:.2}", summary.total_paid);
        println!("  Total Interest: {:.2}", summary.total_interest);
        println!("  Final Balance: {:.2}", summary.final_balance);
    }

    if let Some(path) = args.csv {
        let file = File::create(&path).with_context(|| format!("unable to create {}", path.display()))?;
        schedule.write_csv(file).context("failed to write schedule CSV")?;
        info!("schedule written to {}", path.display());
        if !json {
            println!("\nSchedule written to: {}", path.display());
        }
    }
    Ok(())
}

fn report<T: Serialize + Display>(value: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}
