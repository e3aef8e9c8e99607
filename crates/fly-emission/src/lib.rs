//! # fly-emission: monthly FLY emission engine.
//!
//! Drives the reward schedule of `fly-core` month by month:
//! - **Demand generators**: a fixed-growth model compounding yearly, and a
//!   bounded random walk whose ceiling grows with elapsed months.
//! - **Avidity controllers**: feedback multipliers that throttle rewards when
//!   demand rises and relax them when it falls.
//! - **Emission simulator**: the per-sale loop of reward, supply debit and
//!   report row, with halving at interval boundaries and two hard stops.
//! - **Report sinks**: CSV output and an in-memory collector.

pub mod avidity;
pub mod demand;
pub mod engine;
pub mod report;

pub use avidity::{FixedAvidity, ProportionalAvidity, StepAvidity};
pub use demand::{BoundedWalk, FixedGrowth, WalkStep};
pub use engine::EmissionSimulator;
pub use report::{CsvReport, MemoryReport};
