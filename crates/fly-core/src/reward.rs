//! Per-sale reward and the mint coefficient halving schedule.
//!
//! A sale is rewarded `remaining_supply * rmc * avidity` FLY per NFT, never
//! less than the configured floor. The reward mint coefficient (RMC) halves
//! every [`RMC_HALVING_INTERVAL`](crate::constants::RMC_HALVING_INTERVAL)
//! months (48 by default):
//!
//! - Months 1–48: `rmc`
//! - Months 49–96: `rmc / 2`
//! - Months 97–144: `rmc / 4`
//! - …
//!
//! Once a further halving would not stay strictly above the halving floor the
//! coefficient saturates and keeps its last value.

use tracing::debug;

use crate::types::RewardOutcome;

/// Converts supply, coefficient and avidity into a reward per NFT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardCalculator {
    min_reward: f64,
}

impl RewardCalculator {
    pub fn new(min_reward: f64) -> Self {
        Self { min_reward }
    }

    pub fn min_reward(&self) -> f64 {
        self.min_reward
    }

    /// Reward per NFT for the next sale.
    ///
    /// Returns [`RewardOutcome::Floored`] carrying the floor when the product
    /// is below the floor or not strictly positive. A product exactly equal
    /// to the floor is still [`RewardOutcome::Computed`].
    pub fn reward(&self, remaining_supply: f64, mint_coefficient: f64, avidity: f64) -> RewardOutcome {
        let reward = remaining_supply * mint_coefficient * avidity;
        if reward < self.min_reward || reward <= 0.0 || reward.is_nan() {
            RewardOutcome::Floored(self.min_reward)
        } else {
            RewardOutcome::Computed(reward)
        }
    }
}

/// Outcome of closing one month on the halving schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HalvingStep {
    /// The interval has not elapsed yet.
    NotDue,
    /// The coefficient was halved.
    Halved { coefficient: f64 },
    /// Halving was due but would have reached the floor; coefficient kept.
    Saturated { coefficient: f64 },
}

/// Tracks the mint coefficient and the months left before the next halving.
#[derive(Debug, Clone, PartialEq)]
pub struct HalvingSchedule {
    coefficient: f64,
    interval: u32,
    countdown: u32,
    floor: f64,
}

impl HalvingSchedule {
    /// `interval` must be non-zero (enforced by config validation).
    pub fn new(initial_coefficient: f64, interval: u32, floor: f64) -> Self {
        Self {
            coefficient: initial_coefficient,
            interval,
            countdown: interval,
            floor,
        }
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Months left, the current one included, before the next halving check.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Close one month. When the interval has elapsed, halve the coefficient
    /// if the result stays strictly above the floor, and restart the
    /// countdown either way.
    pub fn close_month(&mut self) -> HalvingStep {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return HalvingStep::NotDue;
        }
        self.countdown = self.interval;

        let halved = self.coefficient / 2.0;
        if halved > self.floor {
            self.coefficient = halved;
            debug!(coefficient = halved, "mint coefficient halved");
            HalvingStep::Halved { coefficient: halved }
        } else {
            debug!(coefficient = self.coefficient, floor = self.floor, "mint coefficient saturated");
            HalvingStep::Saturated {
                coefficient: self.coefficient,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{INITIAL_RMC, PICOFLY, RMC_HALVING_INTERVAL};
    use proptest::prelude::*;

    fn close_months(schedule: &mut HalvingSchedule, months: u32) -> Vec<HalvingStep> {
        (0..months).map(|_| schedule.close_month()).collect()
    }

    // ------------------------------------------------------------------
    // RewardCalculator
    // ------------------------------------------------------------------

    #[test]
    fn literal_first_reward() {
        let calc = RewardCalculator::new(PICOFLY);
        let reward = calc.reward(8_700_000.0, INITIAL_RMC, 1.0);
        assert!(!reward.is_floored());
        assert!((reward.value() - 36.54).abs() < 1e-9);
    }

    #[test]
    fn avidity_scales_reward() {
        let calc = RewardCalculator::new(PICOFLY);
        let full = calc.reward(7_000_000.0, INITIAL_RMC, 1.0).value();
        let half = calc.reward(7_000_000.0, INITIAL_RMC, 0.5).value();
        assert!((full / 2.0 - half).abs() < 1e-12);
    }

    #[test]
    fn tiny_reward_is_floored() {
        let calc = RewardCalculator::new(0.0001);
        assert_eq!(calc.reward(1.0, INITIAL_RMC, 1.0), RewardOutcome::Floored(0.0001));
    }

    #[test]
    fn reward_equal_to_floor_is_computed() {
        let calc = RewardCalculator::new(0.5);
        assert_eq!(calc.reward(1.0, 0.5, 1.0), RewardOutcome::Computed(0.5));
    }

    #[test]
    fn zero_product_with_zero_floor_is_floored() {
        let calc = RewardCalculator::new(0.0);
        let outcome = calc.reward(0.0, INITIAL_RMC, 1.0);
        assert_eq!(outcome, RewardOutcome::Floored(0.0));
        assert!(outcome.is_unrewardable());
    }

    // ------------------------------------------------------------------
    // HalvingSchedule
    // ------------------------------------------------------------------

    #[test]
    fn no_halving_inside_first_interval() {
        let mut s = HalvingSchedule::new(INITIAL_RMC, RMC_HALVING_INTERVAL, PICOFLY);
        let steps = close_months(&mut s, RMC_HALVING_INTERVAL - 1);
        assert!(steps.iter().all(|s| *s == HalvingStep::NotDue));
        assert_eq!(s.coefficient(), INITIAL_RMC);
        assert_eq!(s.countdown(), 1);
    }

    #[test]
    fn halves_at_interval() {
        let mut s = HalvingSchedule::new(INITIAL_RMC, RMC_HALVING_INTERVAL, PICOFLY);
        let steps = close_months(&mut s, RMC_HALVING_INTERVAL);
        assert_eq!(
            steps.last(),
            Some(&HalvingStep::Halved {
                coefficient: INITIAL_RMC / 2.0
            })
        );
        assert_eq!(s.coefficient(), INITIAL_RMC / 2.0);
        assert_eq!(s.countdown(), RMC_HALVING_INTERVAL);
    }

    #[test]
    fn second_halving_quarters() {
        let mut s = HalvingSchedule::new(INITIAL_RMC, RMC_HALVING_INTERVAL, PICOFLY);
        close_months(&mut s, 2 * RMC_HALVING_INTERVAL);
        assert_eq!(s.coefficient(), INITIAL_RMC / 4.0);
    }

    #[test]
    fn saturates_above_floor() {
        let mut s = HalvingSchedule::new(0.3, 1, 0.1);
        assert_eq!(s.close_month(), HalvingStep::Halved { coefficient: 0.15 });
        assert_eq!(s.close_month(), HalvingStep::Saturated { coefficient: 0.15 });
        assert_eq!(s.close_month(), HalvingStep::Saturated { coefficient: 0.15 });
        assert_eq!(s.countdown(), 1);
    }

    #[test]
    fn halving_equal_to_floor_saturates() {
        let mut s = HalvingSchedule::new(0.2, 1, 0.1);
        assert_eq!(s.close_month(), HalvingStep::Saturated { coefficient: 0.2 });
    }

    #[test]
    fn countdown_resets_after_saturation() {
        let mut s = HalvingSchedule::new(0.2, 3, 0.1);
        close_months(&mut s, 3);
        assert_eq!(s.countdown(), 3);
        assert_eq!(s.close_month(), HalvingStep::NotDue);
    }

    proptest! {
        #[test]
        fn coefficient_never_increases_nor_crosses_floor(
            initial in 1e-9f64..1.0,
            interval in 1u32..60,
            months in 0u32..2_000,
        ) {
            let floor = PICOFLY;
            let mut s = HalvingSchedule::new(initial, interval, floor);
            let mut prev = s.coefficient();
            for _ in 0..months {
                s.close_month();
                prop_assert!(s.coefficient() <= prev);
                prop_assert!(s.coefficient() > floor);
                prev = s.coefficient();
            }
        }

        #[test]
        fn reward_never_below_floor(
            supply in 0.0f64..10_000_000.0,
            rmc in 0.0f64..0.001,
            avidity in 0.1f64..=1.0,
            floor in 0.0f64..1.0,
        ) {
            let calc = RewardCalculator::new(floor);
            prop_assert!(calc.reward(supply, rmc, avidity).value() >= floor);
        }
    }
}
