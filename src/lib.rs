//! Interest Engine - Unit-aware financial formula engine
//!
//! This library provides:
//! - Periodicity tags with rate and time conversion between them
//! - Inverse-solvable simple and compound interest
//! - Ordinary and due annuities, arithmetic and geometric gradients
//! - French, German and American amortization schedules
//! - IRR via Newton-Raphson
//! - Capitalization regimes and parallel scenario batches

pub mod error;
pub mod units;
pub mod solvers;
pub mod amortization;
pub mod irr;
pub mod config;
pub mod engine;
pub mod scenario;

// Re-export commonly used types
pub use error::{FinanceError, FinanceResult};
pub use units::{convert_rate, convert_time, Periodicity, RateValue, TimeValue};
pub use solvers::{CalculationResult, Formula, Variable};
pub use amortization::{amortize, AmortizationMethod, AmortizationRequest, AmortizationSchedule};
pub use irr::{calculate_irr, IrrConfig, IrrResult};
pub use config::EngineConfig;
pub use engine::FinanceEngine;
pub use scenario::ScenarioRunner;
