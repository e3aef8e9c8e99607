//! Trait interfaces for the emission simulator.
//!
//! These traits define the contracts between crates:
//! - [`DemandModel`]: monthly sale volume (fly-emission implements)
//! - [`AvidityPolicy`]: demand-trend feedback on rewards (fly-emission implements)
//! - [`ReportSink`]: append-only destination of sale rows (fly-emission implements)

use rand::RngCore;

use crate::error::ReportError;
use crate::types::{ReportLayout, SaleEvent};

/// Produces the demand level of the next month.
///
/// A month schedules `floor(demand)` sales. Implementations must never
/// return a demand below 1.
pub trait DemandModel {
    /// Demand for the month following `closed_month` (1-based).
    ///
    /// `last_demand` is the demand level of `closed_month`. Stochastic models
    /// draw from `rng` only; deterministic ones ignore it.
    fn next_demand(&mut self, closed_month: u32, last_demand: f64, rng: &mut dyn RngCore) -> f64;
}

/// Feedback controller throttling rewards when demand rises.
pub trait AvidityPolicy {
    /// New avidity given the sales of the month before the one just closed
    /// (`previous_demand`) and of the month ahead (`current_demand`). The
    /// result lies within [`bounds`](Self::bounds).
    fn adjust(&self, avidity: f64, previous_demand: f64, current_demand: f64) -> f64;

    /// Inclusive `(min, max)` clamp applied by [`adjust`](Self::adjust).
    fn bounds(&self) -> (f64, f64);
}

/// Append-only tabular writer receiving one row per rewarded sale.
///
/// The simulator calls [`begin`](Self::begin) once, [`record`](Self::record)
/// per sale, and [`finish`](Self::finish) on every exit path.
pub trait ReportSink {
    /// Write the header for `layout`. Subsequent rows use the same layout.
    fn begin(&mut self, layout: ReportLayout) -> Result<(), ReportError>;

    /// Append one fully computed sale.
    fn record(&mut self, event: &SaleEvent) -> Result<(), ReportError>;

    /// Flush buffered rows.
    fn finish(&mut self) -> Result<(), ReportError>;
}
