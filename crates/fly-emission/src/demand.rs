//! Demand generators: how many real estates are sold each month.
//!
//! Both models return a raw demand level; the month schedules
//! `floor(level)` sales and the level never drops below 1.

use fly_core::config::SimulationConfig;
use fly_core::constants::{DEMAND_CAP_MONTHS, MONTHS_PER_YEAR};
use fly_core::traits::DemandModel;
use fly_core::types::DemandModelKind;
use rand::{Rng, RngCore};

/// Build the demand model selected by `config`.
pub fn from_config(config: &SimulationConfig) -> Box<dyn DemandModel> {
    match config.demand_model {
        DemandModelKind::FixedGrowth => Box::new(FixedGrowth::new(
            config.demand_growth_factor,
            config.demand_growth_decay,
        )),
        DemandModelKind::FixedStepWalk => Box::new(BoundedWalk::new(WalkStep::Fixed(config.walk_step))),
        DemandModelKind::ScaledStepWalk => Box::new(BoundedWalk::new(WalkStep::Scaled)),
    }
}

/// Demand compounding once a year.
///
/// After every twelfth month the demand is multiplied by the growth factor,
/// then the factor itself is multiplied by `decay`, but only while the decayed
/// factor would stay above 1. From then on the factor is frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedGrowth {
    growth_factor: f64,
    decay: f64,
}

impl FixedGrowth {
    pub fn new(growth_factor: f64, decay: f64) -> Self {
        Self { growth_factor, decay }
    }

    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }
}

impl DemandModel for FixedGrowth {
    fn next_demand(&mut self, closed_month: u32, last_demand: f64, _rng: &mut dyn RngCore) -> f64 {
        if closed_month % MONTHS_PER_YEAR != 0 {
            return last_demand.max(1.0);
        }
        let demand = last_demand * self.growth_factor;
        if self.growth_factor * self.decay > 1.0 {
            self.growth_factor *= self.decay;
        }
        demand.max(1.0)
    }
}

/// Step sizes of a [`BoundedWalk`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalkStep {
    /// Same step down and up.
    Fixed(f64),
    /// `round(last / 10) + 1` down, `round(last / 5) + 1` up.
    Scaled,
}

impl WalkStep {
    /// `(floor_step, ceil_step)` around `last`.
    ///
    /// Rounding is half-to-even so that e.g. a demand of 25 steps down by 3.
    pub fn steps(&self, last: f64) -> (f64, f64) {
        match *self {
            Self::Fixed(step) => (step, step),
            Self::Scaled => (
                (last / 10.0).round_ties_even() + 1.0,
                (last / 5.0).round_ties_even() + 1.0,
            ),
        }
    }
}

/// Uniform random walk between `max(1, last - floor_step)` and
/// `min(cap, last + ceil_step)`, with `cap = max(1, closed_month / 5)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedWalk {
    step: WalkStep,
}

impl BoundedWalk {
    pub fn new(step: WalkStep) -> Self {
        Self { step }
    }

    /// Highest demand reachable after `closed_month` months.
    pub fn cap(closed_month: u32) -> f64 {
        f64::from((closed_month / DEMAND_CAP_MONTHS).max(1))
    }

    /// Inclusive sampling interval for the month after `closed_month`.
    pub fn range(&self, closed_month: u32, last: f64) -> (f64, f64) {
        let (floor_step, ceil_step) = self.step.steps(last);
        let lower = (last - floor_step).max(1.0);
        let upper = (last + ceil_step).min(Self::cap(closed_month));
        // Only reachable when the initial demand exceeds the first caps.
        if lower <= upper { (lower, upper) } else { (upper, lower) }
    }
}

impl DemandModel for BoundedWalk {
    fn next_demand(&mut self, closed_month: u32, last_demand: f64, rng: &mut dyn RngCore) -> f64 {
        let (lo, hi) = self.range(closed_month, last_demand);
        let drawn: f64 = rng.gen_range(lo..=hi);
        drawn.round_ties_even().max(1.0)
    }
}
