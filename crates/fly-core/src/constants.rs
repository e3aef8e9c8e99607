//! Simulation constants. Supply, rewards and fees are expressed in whole FLY,
//! asset values in fiat units.
//!
//! These are the defaults behind the three [`Variant`](crate::types::Variant)
//! presets; every one of them can be overridden through
//! [`SimulationConfig`](crate::config::SimulationConfig).

/// Smallest meaningful FLY amount: one picofly (10^-12 FLY).
///
/// Reward floor of the deterministic and stochastic variants, and the floor
/// below which the mint coefficient stops halving.
pub const PICOFLY: f64 = 0.000_000_000_001;

/// Issuable supply of the deterministic and stochastic variants.
pub const INITIAL_TOTAL_SUPPLY: f64 = 8_700_000.0;

/// Issuable supply of the refined variant.
pub const REFINED_TOTAL_SUPPLY: f64 = 7_000_000.0;

/// Fiat value represented by one reward unit (one NFT).
pub const NFT_VALUE: u64 = 100;

/// Average fiat value of a sold real estate.
pub const AVG_REAL_ESTATE_VALUE: u64 = 400_000;

/// Initial reward mint coefficient (RMC).
pub const INITIAL_RMC: f64 = 0.000_004_2;

/// Months between two halvings of the mint coefficient (4 years).
pub const RMC_HALVING_INTERVAL: u32 = 4 * MONTHS_PER_YEAR;

/// Length of a full simulation (100 years).
pub const REWARD_PERIOD: u32 = 100 * MONTHS_PER_YEAR;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Real estates sold in the first month.
pub const REAL_ESTATE_PER_MONTH: f64 = 1.0;

/// Annual growth factor of the deterministic demand.
pub const REAL_ESTATE_PER_MONTH_GROWTH_FACTOR: f64 = 1.30;

/// Yearly decay applied to the growth factor (-0.4% per year).
pub const REAL_ESTATE_PER_MONTH_GROWTH_FACTOR_DECREASE: f64 = 0.996;

/// Symmetric step of the stochastic variant's random walk.
pub const DEMAND_WALK_STEP: f64 = 2.0;

/// The random-walk ceiling grows by one sale every this many months.
pub const DEMAND_CAP_MONTHS: u32 = 5;

pub const INITIAL_AVIDITY: f64 = 1.0;

/// Upper clamp shared by every avidity policy.
pub const AVIDITY_MAX: f64 = 1.0;

/// Lower clamp of the proportional avidity policy.
pub const PROPORTIONAL_AVIDITY_MIN: f64 = 0.7;

/// Lower clamp of the step avidity policy.
pub const STEP_AVIDITY_MIN: f64 = 0.1;

/// Avidity change applied by the step policy each month.
pub const AVIDITY_STEP: f64 = 0.1;

/// FLY transfer fee.
pub const TRANSFER_FEE: f64 = 0.000_010_00;

/// The refined variant never rewards less than this many transfer fees.
pub const REWARD_FLOOR_FEE_MULTIPLIER: f64 = 10.0;

/// Year preceding the first simulated year; month 1 is January 2024.
pub const START_YEAR: i32 = 2023;

pub const DEFAULT_SEED: u64 = 42;
