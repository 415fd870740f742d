//! Engine configuration
//!
//! Numeric tolerances and iteration bounds shared by the solvers. Values
//! come from `Default`, a JSON file, or `INTEREST_ENGINE_*` environment
//! variables layered on top.

use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fs::File;
use std::path::Path;

use crate::amortization::BALANCE_TOLERANCE;
use crate::irr::IrrConfig;
use crate::solvers::DEFAULT_DEGENERACY_TOLERANCE;

/// Configuration for a `FinanceEngine`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Newton-Raphson settings for IRR
    pub irr: IrrConfig,

    /// Largest final balance an amortization schedule may leave
    pub amortization_tolerance: f64,

    /// Distance under which geometric growth counts as equal to the rate
    pub gradient_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            irr: IrrConfig::default(),
            amortization_tolerance: BALANCE_TOLERANCE,
            gradient_tolerance: DEFAULT_DEGENERACY_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// Tighter IRR convergence with a larger iteration budget
    pub fn precise() -> Self {
        Self {
            irr: IrrConfig {
                tolerance: 1e-10,
                max_iterations: 1000,
                ..IrrConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let config: EngineConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `INTEREST_ENGINE_*` environment variables
    ///
    /// Unset or unparsable variables leave the current value in place.
    pub fn with_env_overrides(mut self) -> Self {
        self.irr.initial_guess = env_or("INTEREST_ENGINE_IRR_GUESS", self.irr.initial_guess);
        self.irr.tolerance = env_or("INTEREST_ENGINE_IRR_TOLERANCE", self.irr.tolerance);
        self.irr.max_iterations = env_or("INTEREST_ENGINE_IRR_MAX_ITERATIONS", self.irr.max_iterations);
        self.irr.min_derivative = env_or("INTEREST_ENGINE_IRR_MIN_DERIVATIVE", self.irr.min_derivative);
        self.amortization_tolerance =
            env_or("INTEREST_ENGINE_AMORTIZATION_TOLERANCE", self.amortization_tolerance);
        self.gradient_tolerance = env_or("INTEREST_ENGINE_GRADIENT_TOLERANCE", self.gradient_tolerance);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.irr.tolerance.is_nan() || self.irr.tolerance <= 0.0 {
            return Err(format!("irr.tolerance must be positive, got {}", self.irr.tolerance));
        }
        if self.irr.max_iterations == 0 {
            return Err("irr.max_iterations must be at least 1".to_string());
        }
        if self.irr.initial_guess <= -1.0 {
            return Err(format!("irr.initial_guess must exceed -1, got {}", self.irr.initial_guess));
        }
        if self.amortization_tolerance.is_nan() || self.amortization_tolerance < 0.0 {
            return Err(format!(
                "amortization_tolerance must be non-negative, got {}",
                self.amortization_tolerance
            ));
        }
        if self.gradient_tolerance.is_nan() || self.gradient_tolerance < 0.0 {
            return Err(format!(
                "gradient_tolerance must be non-negative, got {}",
                self.gradient_tolerance
            ));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, current: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(current)
}
