//! Shared helpers for scenario and invariant tests.

use std::collections::BTreeMap;

use fly_core::config::SimulationConfig;
use fly_core::error::ReportError;
use fly_core::traits::ReportSink;
use fly_core::types::{ReportLayout, RunSummary, SaleEvent, period_label};
use fly_emission::EmissionSimulator;

/// Report sink that keeps no rows, only checks them.
///
/// Every row is validated against the previous one; violations are collected
/// as messages so a test can print all of them at once.
#[derive(Debug)]
pub struct CheckingSink {
    initial_supply: f64,
    fiat_multiplier: f64,
    avidity_bounds: (f64, f64),
    start_year: i32,
    layout: Option<ReportLayout>,
    last: Option<SaleEvent>,
    first: Option<SaleEvent>,
    rows_per_month: BTreeMap<u32, (u64, u64)>,
    rows: u64,
    finished: bool,
    violations: Vec<String>,
}

impl CheckingSink {
    pub fn for_config(config: &SimulationConfig) -> Self {
        Self {
            initial_supply: config.initial_supply,
            fiat_multiplier: config.fiat_multiplier() as f64,
            avidity_bounds: config.avidity_bounds(),
            start_year: config.start_year,
            layout: None,
            last: None,
            first: None,
            rows_per_month: BTreeMap::new(),
            rows: 0,
            finished: false,
            violations: Vec::new(),
        }
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn layout(&self) -> Option<ReportLayout> {
        self.layout
    }

    pub fn first(&self) -> Option<&SaleEvent> {
        self.first.as_ref()
    }

    pub fn last(&self) -> Option<&SaleEvent> {
        self.last.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `(rows recorded, scheduled sales)` per month.
    pub fn rows_per_month(&self) -> &BTreeMap<u32, (u64, u64)> {
        &self.rows_per_month
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Panic with every collected violation, if any.
    pub fn assert_clean(&self) {
        assert!(
            self.violations.is_empty(),
            "{} invariant violations, first ones:\n{}",
            self.violations.len(),
            self.violations.iter().take(10).cloned().collect::<Vec<_>>().join("\n")
        );
    }

    fn check(&mut self, e: &SaleEvent) {
        let mut fail = |msg: String| self.violations.push(format!("sale {}: {msg}", e.sale_index));

        if e.remaining_supply < 0.0 {
            fail(format!("negative supply {}", e.remaining_supply));
        }
        if e.reward_per_unit <= 0.0 {
            fail(format!("non-positive reward {}", e.reward_per_unit));
        }
        if e.contract_value != e.reward_per_unit * self.fiat_multiplier {
            fail(format!("contract {} != reward * multiplier", e.contract_value));
        }
        let (min, max) = self.avidity_bounds;
        if e.avidity < min || e.avidity > max {
            fail(format!("avidity {} outside [{min}, {max}]", e.avidity));
        }
        if e.demand_level < 1 {
            fail("no scheduled sale in a month with a sale".into());
        }
        if e.mint_coefficient <= 0.0 {
            fail(format!("coefficient {}", e.mint_coefficient));
        }
        if e.period != period_label(self.start_year, e.month) {
            fail(format!("period {} for month {}", e.period, e.month));
        }

        match &self.last {
            None => {
                if e.sale_index != 1 {
                    fail(format!("first index {}", e.sale_index));
                }
                if e.remaining_supply > self.initial_supply {
                    fail("supply above initial".into());
                }
            }
            Some(prev) => {
                if e.sale_index != prev.sale_index + 1 {
                    fail(format!("index jumped from {}", prev.sale_index));
                }
                if e.month < prev.month {
                    fail(format!("month went back from {}", prev.month));
                }
                if e.remaining_supply > prev.remaining_supply {
                    fail(format!("supply grew from {}", prev.remaining_supply));
                }
                if e.mint_coefficient > prev.mint_coefficient {
                    fail(format!("coefficient grew from {}", prev.mint_coefficient));
                }
                if e.month == prev.month && e.avidity != prev.avidity {
                    fail("avidity changed within a month".into());
                }
                if (prev.remaining_supply - e.contract_value - e.remaining_supply).abs()
                    > 1e-9 * prev.remaining_supply.max(1.0)
                {
                    fail("supply not debited by the contract value".into());
                }
            }
        }
    }
}

impl ReportSink for CheckingSink {
    fn begin(&mut self, layout: ReportLayout) -> Result<(), ReportError> {
        self.layout = Some(layout);
        Ok(())
    }

    fn record(&mut self, event: &SaleEvent) -> Result<(), ReportError> {
        if self.layout.is_none() {
            return Err(ReportError::NotStarted);
        }
        self.check(event);
        let entry = self.rows_per_month.entry(event.month).or_insert((0, event.demand_level));
        entry.0 += 1;
        self.rows += 1;
        if self.first.is_none() {
            self.first = Some(event.clone());
        }
        self.last = Some(event.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ReportError> {
        self.finished = true;
        Ok(())
    }
}

/// Run `config` to the end through a [`CheckingSink`].
pub fn run_checked(config: SimulationConfig) -> (RunSummary, CheckingSink) {
    let mut sink = CheckingSink::for_config(&config);
    let summary = EmissionSimulator::new(config)
        .and_then(|sim| sim.run(&mut sink))
        .unwrap_or_else(|e| panic!("simulation failed: {e}"));
    (summary, sink)
}

/// `preset` shortened to `months`.
pub fn months(preset: SimulationConfig, months: u32) -> SimulationConfig {
    SimulationConfig {
        period_months: months,
        ..preset
    }
}

/// `preset` with a different seed.
pub fn seeded(preset: SimulationConfig, seed: u64) -> SimulationConfig {
    SimulationConfig { seed, ..preset }
}
