//! Emission simulator.
//!
//! Runs the monthly loop: every scheduled sale is rewarded, debited from the
//! supply and reported; every month end draws the next demand, adjusts
//! avidity and ticks the halving schedule. A run ends when the configured
//! period is over or on one of two hard stops:
//!
//! - [`HaltReason::RewardFloor`]: the reward had to be floored and the floor
//!   itself is zero.
//! - [`HaltReason::Exhausted`]: the next sale would distribute more than the
//!   remaining supply. That sale is neither committed nor reported.

use fly_core::config::SimulationConfig;
use fly_core::error::{LedgerError, SimError};
use fly_core::ledger::SupplyLedger;
use fly_core::reward::{HalvingSchedule, HalvingStep, RewardCalculator};
use fly_core::traits::{AvidityPolicy, DemandModel, ReportSink};
use fly_core::types::{HaltReason, RunOutcome, RunSummary, SaleEvent, SimulationState, period_label};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, trace, warn};

use crate::{avidity, demand};

/// A single, non-resumable simulation run.
pub struct EmissionSimulator {
    config: SimulationConfig,
    state: SimulationState,
    calculator: RewardCalculator,
    demand: Box<dyn DemandModel>,
    avidity: Box<dyn AvidityPolicy>,
    rng: Box<dyn RngCore>,
}

impl EmissionSimulator {
    /// Validate `config` and seed the random source from `config.seed`.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Like [`new`](Self::new) with an explicit random source.
    pub fn with_rng<R: RngCore + 'static>(config: SimulationConfig, rng: R) -> Result<Self, SimError> {
        config.validate()?;
        let demand = demand::from_config(&config);
        let avidity = avidity::from_config(&config);
        let state = SimulationState::new(
            SupplyLedger::new(config.initial_supply),
            HalvingSchedule::new(
                config.initial_mint_coefficient,
                config.halving_interval_months,
                config.halving_floor,
            ),
            config.initial_demand,
            config.initial_avidity,
        );
        Ok(Self {
            calculator: RewardCalculator::new(config.min_reward()),
            config,
            state,
            demand,
            avidity,
            rng: Box::new(rng),
        })
    }

    /// Replace the demand model built from the configuration.
    pub fn with_demand_model(mut self, model: Box<dyn DemandModel>) -> Self {
        self.demand = model;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Run to completion, writing every rewarded sale to `sink`.
    ///
    /// The sink is finished on every terminal path. Halting is not an error:
    /// it is reported through [`RunSummary::outcome`].
    pub fn run<S: ReportSink + ?Sized>(mut self, sink: &mut S) -> Result<RunSummary, SimError> {
        info!(
            variant = %self.config.variant,
            seed = self.config.seed,
            months = self.config.period_months,
            supply = self.config.initial_supply,
            "starting emission simulation"
        );

        let result = sink
            .begin(self.config.report_layout())
            .map_err(SimError::from)
            .and_then(|()| self.run_months(sink));
        let finished = sink.finish();
        let outcome = result?;
        finished?;

        let summary = self.summary(outcome);
        match outcome {
            RunOutcome::Completed => info!(
                sales = summary.total_sales,
                remaining_supply = summary.remaining_supply,
                halvings = summary.halvings,
                "simulation completed"
            ),
            RunOutcome::Halted(reason) => warn!(
                ?reason,
                month = summary.months_simulated,
                sales = summary.total_sales,
                remaining_supply = summary.remaining_supply,
                "simulation halted"
            ),
        }
        Ok(summary)
    }

    fn run_months<S: ReportSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunOutcome, SimError> {
        while self.state.current_month <= self.config.period_months {
            for _ in 0..self.state.scheduled_sales() {
                if let Some(reason) = self.sell(sink)? {
                    return Ok(RunOutcome::Halted(reason));
                }
            }
            self.close_month();
        }
        Ok(RunOutcome::Completed)
    }

    /// Reward, debit and report one sale.
    fn sell<S: ReportSink + ?Sized>(&mut self, sink: &mut S) -> Result<Option<HaltReason>, SimError> {
        let reward = self.calculator.reward(
            self.state.remaining_supply(),
            self.state.mint_coefficient(),
            self.state.avidity,
        );
        if reward.is_unrewardable() {
            return Ok(Some(HaltReason::RewardFloor));
        }

        let reward_per_unit = reward.value();
        let contract_value = reward_per_unit * self.config.fiat_multiplier() as f64;
        let remaining_supply = match self.state.ledger.debit(contract_value) {
            Ok(remaining) => remaining,
            Err(LedgerError::Overdraft { .. }) => return Ok(Some(HaltReason::Exhausted)),
            Err(err) => return Err(err.into()),
        };

        self.state.total_sales += 1;
        self.state.sales_this_month += 1;
        let event = SaleEvent {
            sale_index: self.state.total_sales,
            month: self.state.current_month,
            reward_per_unit,
            contract_value,
            remaining_supply,
            mint_coefficient: self.state.mint_coefficient(),
            avidity: self.state.avidity,
            demand_level: self.state.scheduled_sales(),
            period: period_label(self.config.start_year, self.state.current_month),
        };
        sink.record(&event)?;
        Ok(None)
    }

    /// Draw the next month's demand, adjust avidity, tick the halving
    /// schedule and move to the next month.
    fn close_month(&mut self) {
        let closed = self.state.current_month;
        let next_demand = self
            .demand
            .next_demand(closed, self.state.demand_level, self.rng.as_mut());

        // Compared against the month before the one just closed.
        let previous_sales = self.state.sales_last_month as f64;
        let upcoming_sales = next_demand.floor();
        self.state.avidity = self
            .avidity
            .adjust(self.state.avidity, previous_sales, upcoming_sales);

        trace!(
            month = closed,
            sales = self.state.sales_this_month,
            next_demand,
            avidity = self.state.avidity,
            "month closed"
        );

        self.state.demand_level = next_demand;
        self.state.sales_last_month = self.state.sales_this_month;
        self.state.sales_this_month = 0;

        if let HalvingStep::Halved { .. } = self.state.halving.close_month() {
            self.state.halvings += 1;
        }

        self.state.current_month += 1;
    }

    fn summary(&self, outcome: RunOutcome) -> RunSummary {
        let months_simulated = match outcome {
            RunOutcome::Completed => self.config.period_months,
            RunOutcome::Halted(_) => self.state.current_month,
        };
        RunSummary {
            outcome,
            months_simulated,
            total_sales: self.state.total_sales,
            remaining_supply: self.state.remaining_supply(),
            mint_coefficient: self.state.mint_coefficient(),
            avidity: self.state.avidity,
            halvings: self.state.halvings,
        }
    }
}
