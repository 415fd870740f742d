//! Periodicities and unit conversion shared by all solvers

mod periodicity;
mod conversion;

pub use periodicity::Periodicity;
pub use conversion::{
    convert_rate, convert_time, effective_to_nominal, from_annual_effective,
    nominal_to_effective, to_annual_effective, RateValue, TimeValue,
};
