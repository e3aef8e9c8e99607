//! Avidity controllers.
//!
//! Avidity multiplies every reward. It is lowered when demand rises, to
//! conserve supply, and raised back when demand falls or stalls. Every policy
//! clamps its output to its own bounds.

use fly_core::config::SimulationConfig;
use fly_core::constants::{AVIDITY_MAX, AVIDITY_STEP, PROPORTIONAL_AVIDITY_MIN, STEP_AVIDITY_MIN};
use fly_core::traits::AvidityPolicy;
use fly_core::types::AvidityPolicyKind;

/// Build the avidity policy selected by `config`.
pub fn from_config(config: &SimulationConfig) -> Box<dyn AvidityPolicy> {
    match config.avidity_policy {
        AvidityPolicyKind::Fixed => Box::new(FixedAvidity::new(config.initial_avidity)),
        AvidityPolicyKind::Proportional => Box::new(ProportionalAvidity::default()),
        AvidityPolicyKind::Step => Box::new(StepAvidity::default()),
    }
}

/// Avidity pinned to a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAvidity {
    value: f64,
}

impl FixedAvidity {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl AvidityPolicy for FixedAvidity {
    fn adjust(&self, _avidity: f64, _previous_demand: f64, _current_demand: f64) -> f64 {
        self.value
    }

    fn bounds(&self) -> (f64, f64) {
        (self.value, self.value)
    }
}

/// Moves avidity by the relative change in demand.
///
/// With `factor = current / max(1, previous)`, avidity drops by `factor - 1`
/// on growth and rises by `1 - factor` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionalAvidity {
    min: f64,
    max: f64,
}

impl ProportionalAvidity {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for ProportionalAvidity {
    fn default() -> Self {
        Self::new(PROPORTIONAL_AVIDITY_MIN, AVIDITY_MAX)
    }
}

impl AvidityPolicy for ProportionalAvidity {
    fn adjust(&self, avidity: f64, previous_demand: f64, current_demand: f64) -> f64 {
        let factor = current_demand / previous_demand.max(1.0);
        let next = if factor > 1.0 {
            avidity - (factor - 1.0)
        } else {
            avidity + (1.0 - factor)
        };
        next.clamp(self.min, self.max)
    }

    fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Moves avidity by a fixed step: down when demand grew, up otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepAvidity {
    step: f64,
    min: f64,
    max: f64,
}

impl StepAvidity {
    pub fn new(step: f64, min: f64, max: f64) -> Self {
        Self { step, min, max }
    }
}

impl Default for StepAvidity {
    fn default() -> Self {
        Self::new(AVIDITY_STEP, STEP_AVIDITY_MIN, AVIDITY_MAX)
    }
}

impl AvidityPolicy for StepAvidity {
    fn adjust(&self, avidity: f64, previous_demand: f64, current_demand: f64) -> f64 {
        let next = if current_demand > previous_demand {
            avidity - self.step
        } else {
            avidity + self.step
        };
        next.clamp(self.min, self.max)
    }

    fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    // --- StepAvidity ---

    #[test]
    fn step_decreases_on_rising_demand() {
        let p = StepAvidity::default();
        assert!(close(p.adjust(1.0, 3.0, 4.0), 0.9));
    }

    #[test]
    fn step_increases_on_flat_or_falling_demand() {
        let p = StepAvidity::default();
        assert!(close(p.adjust(0.5, 4.0, 4.0), 0.6));
        assert!(close(p.adjust(0.5, 4.0, 2.0), 0.6));
    }

    #[test]
    fn step_clamps_at_bounds() {
        let p = StepAvidity::default();
        assert_eq!(p.adjust(1.0, 4.0, 1.0), 1.0);
        assert_eq!(p.adjust(0.1, 1.0, 9.0), 0.1);
        assert_eq!(p.adjust(0.15, 1.0, 9.0), 0.1);
    }

    #[test]
    fn step_walks_down_to_floor_in_nine_steps() {
        let p = StepAvidity::default();
        let mut avidity = 1.0;
        for demand in 1..=9 {
            avidity = p.adjust(avidity, f64::from(demand), f64::from(demand + 1));
        }
        assert!(close(avidity, 0.1));
    }

    // --- ProportionalAvidity ---

    #[test]
    fn proportional_drops_by_relative_growth() {
        let p = ProportionalAvidity::default();
        // factor 1.2 -> -0.2
        assert!(close(p.adjust(1.0, 5.0, 6.0), 0.8));
    }

    #[test]
    fn proportional_rises_by_relative_fall() {
        let p = ProportionalAvidity::default();
        // factor 0.75 -> +0.25
        assert!(close(p.adjust(0.7, 4.0, 3.0), 0.95));
    }

    #[test]
    fn proportional_clamps_to_range() {
        let p = ProportionalAvidity::default();
        assert_eq!(p.adjust(1.0, 1.0, 10.0), 0.7);
        assert_eq!(p.adjust(0.9, 10.0, 1.0), 1.0);
    }

    #[test]
    fn proportional_treats_zero_previous_as_one() {
        let p = ProportionalAvidity::default();
        assert!(close(p.adjust(1.0, 0.0, 1.0), 1.0));
    }

    // --- FixedAvidity ---

    #[test]
    fn fixed_ignores_demand() {
        let p = FixedAvidity::new(1.0);
        assert_eq!(p.adjust(1.0, 1.0, 100.0), 1.0);
        assert_eq!(p.bounds(), (1.0, 1.0));
    }

    #[test]
    fn from_config_matches_bounds() {
        for cfg in [
            SimulationConfig::deterministic(),
            SimulationConfig::stochastic(),
            SimulationConfig::refined(),
        ] {
            assert_eq!(from_config(&cfg).bounds(), cfg.avidity_bounds());
        }
    }

    proptest! {
        #[test]
        fn step_stays_in_bounds(
            avidity in 0.1f64..=1.0,
            previous in 0u32..500,
            current in 1u32..500,
        ) {
            let p = StepAvidity::default();
            let next = p.adjust(avidity, f64::from(previous), f64::from(current));
            prop_assert!((0.1..=1.0).contains(&next));
        }

        #[test]
        fn proportional_stays_in_bounds(
            avidity in 0.7f64..=1.0,
            previous in 0u32..500,
            current in 1u32..500,
        ) {
            let p = ProportionalAvidity::default();
            let next = p.adjust(avidity, f64::from(previous), f64::from(current));
            prop_assert!((0.7..=1.0).contains(&next));
        }
    }
}
