//! Simulation configuration.
//!
//! Provides [`SimulationConfig`] with one preset per [`Variant`]. Every
//! constant of the model is a field, so a run can be tuned from a config file
//! or the environment without touching code. [`SimulationConfig::validate`]
//! must pass before a simulator is built.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::{AvidityPolicyKind, DemandModelKind, ReportLayout, Variant};

/// Configuration of a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Preset the remaining fields were derived from. Informational.
    pub variant: Variant,
    /// Issuable FLY supply at month 1.
    pub initial_supply: f64,
    /// Fiat value of one rewarded NFT.
    pub unit_value: u64,
    /// Average fiat value of a sold real estate.
    pub avg_asset_value: u64,
    pub initial_mint_coefficient: f64,
    pub halving_interval_months: u32,
    /// The coefficient only halves while the result stays strictly above this.
    pub halving_floor: f64,
    pub period_months: u32,
    pub initial_demand: f64,
    pub demand_model: DemandModelKind,
    /// Step of [`DemandModelKind::FixedStepWalk`].
    pub walk_step: f64,
    /// Yearly growth of [`DemandModelKind::FixedGrowth`].
    pub demand_growth_factor: f64,
    /// Yearly decay applied to `demand_growth_factor`.
    pub demand_growth_decay: f64,
    pub avidity_policy: AvidityPolicyKind,
    pub initial_avidity: f64,
    pub transfer_fee: f64,
    /// Minimum reward, in transfer fees.
    pub reward_floor_multiplier: f64,
    /// Month 1 is January of `start_year + 1`.
    pub start_year: i32,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::deterministic()
    }
}

impl SimulationConfig {
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Deterministic => Self::deterministic(),
            Variant::Stochastic => Self::stochastic(),
            Variant::Refined => Self::refined(),
        }
    }

    /// Fixed-growth demand without avidity; rewards never below a picofly.
    pub fn deterministic() -> Self {
        Self {
            variant: Variant::Deterministic,
            initial_supply: INITIAL_TOTAL_SUPPLY,
            unit_value: NFT_VALUE,
            avg_asset_value: AVG_REAL_ESTATE_VALUE,
            initial_mint_coefficient: INITIAL_RMC,
            halving_interval_months: RMC_HALVING_INTERVAL,
            halving_floor: PICOFLY,
            period_months: REWARD_PERIOD,
            initial_demand: REAL_ESTATE_PER_MONTH,
            demand_model: DemandModelKind::FixedGrowth,
            walk_step: DEMAND_WALK_STEP,
            demand_growth_factor: REAL_ESTATE_PER_MONTH_GROWTH_FACTOR,
            demand_growth_decay: REAL_ESTATE_PER_MONTH_GROWTH_FACTOR_DECREASE,
            avidity_policy: AvidityPolicyKind::Fixed,
            initial_avidity: INITIAL_AVIDITY,
            transfer_fee: PICOFLY,
            reward_floor_multiplier: 1.0,
            start_year: START_YEAR,
            seed: DEFAULT_SEED,
        }
    }

    /// Random-walk demand (step 2) with proportional avidity.
    pub fn stochastic() -> Self {
        Self {
            variant: Variant::Stochastic,
            demand_model: DemandModelKind::FixedStepWalk,
            avidity_policy: AvidityPolicyKind::Proportional,
            ..Self::deterministic()
        }
    }

    /// Scaled random-walk demand, step avidity and a floor of ten transfer fees.
    pub fn refined() -> Self {
        Self {
            variant: Variant::Refined,
            initial_supply: REFINED_TOTAL_SUPPLY,
            demand_model: DemandModelKind::ScaledStepWalk,
            avidity_policy: AvidityPolicyKind::Step,
            transfer_fee: TRANSFER_FEE,
            reward_floor_multiplier: REWARD_FLOOR_FEE_MULTIPLIER,
            ..Self::deterministic()
        }
    }

    /// Minimum reward per NFT.
    pub fn min_reward(&self) -> f64 {
        self.transfer_fee * self.reward_floor_multiplier
    }

    /// NFTs per average real estate; integer division, as contract values are
    /// whole NFTs.
    pub fn fiat_multiplier(&self) -> u64 {
        self.avg_asset_value / self.unit_value.max(1)
    }

    /// `(min, max)` avidity clamp of the configured policy.
    pub fn avidity_bounds(&self) -> (f64, f64) {
        match self.avidity_policy {
            AvidityPolicyKind::Fixed => (AVIDITY_MAX, AVIDITY_MAX),
            AvidityPolicyKind::Proportional => (PROPORTIONAL_AVIDITY_MIN, AVIDITY_MAX),
            AvidityPolicyKind::Step => (STEP_AVIDITY_MIN, AVIDITY_MAX),
        }
    }

    pub fn records_avidity(&self) -> bool {
        self.avidity_policy != AvidityPolicyKind::Fixed
    }

    pub fn report_layout(&self) -> ReportLayout {
        if self.records_avidity() {
            ReportLayout::WithAvidity
        } else {
            ReportLayout::Plain
        }
    }

    /// Check every parameter. A zero reward floor is accepted: it stops the
    /// run as soon as rewards would be floored.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("initial_supply", self.initial_supply)?;
        positive("initial_mint_coefficient", self.initial_mint_coefficient)?;
        non_negative("halving_floor", self.halving_floor)?;
        non_negative("transfer_fee", self.transfer_fee)?;
        non_negative("reward_floor_multiplier", self.reward_floor_multiplier)?;
        positive("walk_step", self.walk_step)?;
        at_least("initial_demand", 1.0, self.initial_demand)?;
        at_least("demand_growth_factor", 1.0, self.demand_growth_factor)?;
        finite("demand_growth_decay", self.demand_growth_decay)?;
        if self.demand_growth_decay <= 0.0 || self.demand_growth_decay > 1.0 {
            return Err(ConfigError::InvalidGrowthDecay(self.demand_growth_decay));
        }
        positive("initial_avidity", self.initial_avidity)?;

        if self.unit_value == 0 {
            return Err(ConfigError::Zero("unit_value"));
        }
        if self.avg_asset_value < self.unit_value {
            return Err(ConfigError::AssetBelowUnit {
                asset: self.avg_asset_value,
                unit: self.unit_value,
            });
        }
        if self.halving_interval_months == 0 {
            return Err(ConfigError::Zero("halving_interval_months"));
        }
        if self.period_months == 0 {
            return Err(ConfigError::Zero("period_months"));
        }

        let (min, max) = self.avidity_bounds();
        if self.initial_avidity < min || self.initial_avidity > max {
            return Err(ConfigError::AvidityOutOfBounds {
                value: self.initial_avidity,
                min,
                max,
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn at_least(field: &'static str, min: f64, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < min {
        return Err(ConfigError::BelowMinimum { field, min, value });
    }
    Ok(())
}
