//! Calculation engine
//!
//! Binds one [`EngineConfig`] to every formula family so callers pick the
//! tolerances once instead of threading them through each solver.

use log::{debug, info};

use crate::amortization::{amortize_with_tolerance, AmortizationRequest, AmortizationSchedule};
use crate::config::EngineConfig;
use crate::error::FinanceResult;
use crate::irr::{calculate_irr_with, IrrResult};
use crate::solvers::{
    AnnuityInputs, AnnuityVariable, CalculationResult, CapitalizationInputs, CapitalizationTarget,
    CompoundInterestInputs, CompoundVariable, GradientInputs, GradientTarget, SimpleInterestInputs,
    SimpleVariable,
};

/// Main calculation engine
#[derive(Debug, Clone, Default)]
pub struct FinanceEngine {
    config: EngineConfig,
}

impl FinanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Solve a simple interest problem
    ///
    /// With no explicit target the single absent variable is solved.
    pub fn simple_interest(
        &self,
        inputs: &SimpleInterestInputs,
        target: Option<SimpleVariable>,
    ) -> FinanceResult<CalculationResult> {
        let target = match target {
            Some(t) => t,
            None => inputs.missing_variable()?,
        };
        debug!("engine: simple interest -> {target}");
        inputs.solve(target)
    }

    pub fn compound_interest(
        &self,
        inputs: &CompoundInterestInputs,
        target: Option<CompoundVariable>,
    ) -> FinanceResult<CalculationResult> {
        let target = match target {
            Some(t) => t,
            None => inputs.missing_variable()?,
        };
        debug!("engine: compound interest -> {target}");
        inputs.solve(target)
    }

    pub fn annuity(
        &self,
        inputs: &AnnuityInputs,
        target: AnnuityVariable,
    ) -> FinanceResult<CalculationResult> {
        debug!("engine: annuity -> {target}");
        inputs.solve(target)
    }

    /// Gradient series using the configured degeneracy tolerance
    pub fn gradient(
        &self,
        inputs: &GradientInputs,
        target: GradientTarget,
    ) -> FinanceResult<CalculationResult> {
        inputs.solve_with_tolerance(target, self.config.gradient_tolerance)
    }

    pub fn amortize(&self, request: &AmortizationRequest) -> FinanceResult<AmortizationSchedule> {
        let schedule = amortize_with_tolerance(request, self.config.amortization_tolerance)?;
        info!(
            "{} schedule: {} periods, payment {:.2}",
            schedule.method,
            schedule.rows.len(),
            schedule.payment
        );
        Ok(schedule)
    }

    pub fn irr(&self, cashflows: &[f64]) -> FinanceResult<IrrResult> {
        calculate_irr_with(cashflows, &self.config.irr)
    }

    pub fn capitalize(
        &self,
        inputs: &CapitalizationInputs,
        target: CapitalizationTarget,
    ) -> FinanceResult<CalculationResult> {
        inputs.solve(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::AmortizationMethod;
    use crate::error::FinanceError;
    use crate::solvers::{Growth, Variable};
    use crate::units::Periodicity;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_interest_infers_target() {
        let engine = FinanceEngine::default();
        let inputs = SimpleInterestInputs {
            capital: Some(1000.0),
            rate: Some(0.05),
            time: Some(2.0),
            ..Default::default()
        };
        let result = engine.simple_interest(&inputs, None).unwrap();
        assert_eq!(result.variable, Variable::Interest);
        assert_abs_diff_eq!(result.value, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compound_interest_monthly_compounding() {
        let engine = FinanceEngine::default();
        let inputs = CompoundInterestInputs {
            principal: Some(1000.0),
            rate: Some(0.05),
            time: Some(2.0),
            compounding: Some(Periodicity::Monthly),
            ..Default::default()
        };
        let result = engine.compound_interest(&inputs, Some(CompoundVariable::FutureValue)).unwrap();
        assert_abs_diff_eq!(result.value, 1104.94, epsilon = 0.005);
    }

    #[test]
    fn test_gradient_uses_configured_tolerance() {
        let inputs = GradientInputs {
            payment: 100.0,
            rate: 0.05,
            time: 10.0,
            growth: Growth::Geometric(0.0501),
            rate_unit: Periodicity::Annual,
            time_unit: Periodicity::Annual,
        };

        assert!(FinanceEngine::default().gradient(&inputs, GradientTarget::PresentValue).is_ok());

        let loose = FinanceEngine::new(EngineConfig {
            gradient_tolerance: 1e-3,
            ..EngineConfig::default()
        });
        assert!(matches!(
            loose.gradient(&inputs, GradientTarget::PresentValue),
            Err(FinanceError::DegenerateGradient { .. })
        ));
    }

    #[test]
    fn test_amortize_and_irr_agree() {
        let engine = FinanceEngine::new(EngineConfig::precise());
        let request = AmortizationRequest::new(10_000.0, 0.01, 12, AmortizationMethod::ConstantPayment);
        let schedule = engine.amortize(&request).unwrap();

        let mut flows = vec![10_000.0];
        flows.extend(schedule.rows.iter().map(|r| -r.payment));
        let irr = engine.irr(&flows).unwrap();
        assert!(irr.converged);
        assert_abs_diff_eq!(irr.rate, 0.01, epsilon = 1e-6);
    }
}
