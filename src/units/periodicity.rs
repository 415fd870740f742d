//! Periodicity tags and the periods-per-year table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinanceError;

/// Named compounding or measurement frequency
///
/// Every variant maps to a fixed periods-per-year factor. Weeks are counted
/// as 52 per year and days as 365 (no leap years).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    #[default]
    Annual,
    Semiannual,
    /// Every four months (cuatrimestral)
    FourMonthly,
    Quarterly,
    Bimonthly,
    Monthly,
    /// Every half month (quincenal)
    Fortnightly,
    Weekly,
    Daily,
    Hourly,
    PerMinute,
    PerSecond,
}

impl Periodicity {
    /// All periodicities, longest period first
    pub const ALL: [Periodicity; 12] = [
        Periodicity::Annual,
        Periodicity::Semiannual,
        Periodicity::FourMonthly,
        Periodicity::Quarterly,
        Periodicity::Bimonthly,
        Periodicity::Monthly,
        Periodicity::Fortnightly,
        Periodicity::Weekly,
        Periodicity::Daily,
        Periodicity::Hourly,
        Periodicity::PerMinute,
        Periodicity::PerSecond,
    ];

    /// Number of periods in one year
    #[must_use]
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Periodicity::Annual => 1.0,
            Periodicity::Semiannual => 2.0,
            Periodicity::FourMonthly => 3.0,
            Periodicity::Quarterly => 4.0,
            Periodicity::Bimonthly => 6.0,
            Periodicity::Monthly => 12.0,
            Periodicity::Fortnightly => 24.0,
            Periodicity::Weekly => 52.0,
            Periodicity::Daily => 365.0,
            Periodicity::Hourly => 8_760.0,
            Periodicity::PerMinute => 525_600.0,
            Periodicity::PerSecond => 31_536_000.0,
        }
    }

    /// Length of one period in years
    #[must_use]
    pub fn years_per_period(&self) -> f64 {
        1.0 / self.periods_per_year()
    }

    /// Canonical lower-case name, accepted back by `from_str`
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Periodicity::Annual => "annual",
            Periodicity::Semiannual => "semiannual",
            Periodicity::FourMonthly => "four-monthly",
            Periodicity::Quarterly => "quarterly",
            Periodicity::Bimonthly => "bimonthly",
            Periodicity::Monthly => "monthly",
            Periodicity::Fortnightly => "fortnightly",
            Periodicity::Weekly => "weekly",
            Periodicity::Daily => "daily",
            Periodicity::Hourly => "hourly",
            Periodicity::PerMinute => "per-minute",
            Periodicity::PerSecond => "per-second",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Periodicity {
    type Err = FinanceError;

    /// Parses English names and the Spanish tags used by the mobile forms
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let periodicity = match normalized.as_str() {
            "annual" | "yearly" | "anual" => Periodicity::Annual,
            "semiannual" | "semi-annual" | "semestral" => Periodicity::Semiannual,
            "four-monthly" | "fourmonthly" | "cuatrimestral" => Periodicity::FourMonthly,
            "quarterly" | "trimestral" => Periodicity::Quarterly,
            "bimonthly" | "bimestral" => Periodicity::Bimonthly,
            "monthly" | "mensual" => Periodicity::Monthly,
            "fortnightly" | "biweekly" | "quincenal" => Periodicity::Fortnightly,
            "weekly" | "semanal" => Periodicity::Weekly,
            "daily" | "diario" => Periodicity::Daily,
            "hourly" | "horario" | "horas" => Periodicity::Hourly,
            "per-minute" | "minutely" | "minutos" => Periodicity::PerMinute,
            "per-second" | "secondly" | "segundos" => Periodicity::PerSecond,
            _ => {
                return Err(FinanceError::InvalidUnit {
                    name: s.to_string(),
                })
            }
        };
        Ok(periodicity)
    }
}
