//! # fly-core
//! Foundation types, configuration and reward arithmetic for the FLY
//! emission simulator.

pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod reward;
pub mod traits;
pub mod types;

pub use config::SimulationConfig;
pub use ledger::SupplyLedger;
pub use reward::{HalvingSchedule, HalvingStep, RewardCalculator};
pub use types::{HaltReason, ReportLayout, RewardOutcome, RunOutcome, RunSummary, SaleEvent, Variant};
