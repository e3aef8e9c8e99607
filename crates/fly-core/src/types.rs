//! Data model shared by the reward schedule, the simulator and report sinks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::MONTHS_PER_YEAR;
use crate::error::ConfigError;
use crate::ledger::SupplyLedger;
use crate::reward::HalvingSchedule;

/// The three evolutions of the emission model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Fixed-growth demand, no avidity, picofly reward floor.
    #[default]
    Deterministic,
    /// Fixed-step random-walk demand with proportional avidity.
    Stochastic,
    /// Scaled-step random-walk demand, step avidity, fee-aware reward floor.
    Refined,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Deterministic, Variant::Stochastic, Variant::Refined];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::Stochastic => "stochastic",
            Self::Refined => "refined",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownVariant(s.to_string()))
    }
}

/// How the number of monthly sales evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandModelKind {
    /// Demand compounds yearly by a slowly decaying growth factor.
    FixedGrowth,
    /// Bounded random walk with a constant step.
    FixedStepWalk,
    /// Bounded random walk with steps proportional to the last demand.
    ScaledStepWalk,
}

/// How avidity reacts to the demand trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvidityPolicyKind {
    /// Avidity never changes and is not reported.
    Fixed,
    /// Adjusted by the relative demand change, clamped to `[0.7, 1.0]`.
    Proportional,
    /// Adjusted by ±0.1 on the demand direction, clamped to `[0.1, 1.0]`.
    Step,
}

/// Result of a reward computation.
///
/// The tag tells apart a reward that was computed from one that was replaced
/// by the policy floor, even when both carry the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewardOutcome {
    Computed(f64),
    Floored(f64),
}

impl RewardOutcome {
    pub fn value(&self) -> f64 {
        match *self {
            Self::Computed(v) | Self::Floored(v) => v,
        }
    }

    pub fn is_floored(&self) -> bool {
        matches!(self, Self::Floored(_))
    }

    /// The floor was applied and the floor itself pays nothing: no further
    /// sale can be rewarded.
    pub fn is_unrewardable(&self) -> bool {
        matches!(*self, Self::Floored(v) if v <= 0.0)
    }
}

/// Why a run stopped before the end of the configured period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// The next sale would have distributed more than the remaining supply.
    Exhausted,
    /// The reward floor is zero, so no sale can be rewarded anymore.
    RewardFloor,
}

/// Terminal state of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Halted(HaltReason),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Halted(HaltReason::Exhausted) => f.write_str("halted: supply exhausted"),
            Self::Halted(HaltReason::RewardFloor) => f.write_str("halted: reward floor is zero"),
        }
    }
}

/// Column set written by a report sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLayout {
    Plain,
    WithAvidity,
}

const PLAIN_COLUMNS: [&str; 7] = [
    "real_estate_sold",
    "reward_per_nft",
    "contract_value",
    "remaining_supply",
    "rmc",
    "real_estate_per_month",
    "date",
];

const AVIDITY_COLUMNS: [&str; 8] = [
    "real_estate_sold",
    "reward_per_nft",
    "contract_value",
    "remaining_supply",
    "rmc",
    "avidity",
    "real_estate_per_month",
    "date",
];

impl ReportLayout {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Plain => &PLAIN_COLUMNS,
            Self::WithAvidity => &AVIDITY_COLUMNS,
        }
    }
}

/// One rewarded sale, as handed to a report sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleEvent {
    /// Sales rewarded so far, this one included.
    pub sale_index: u64,
    /// Simulated month (1-based) the sale happened in.
    pub month: u32,
    pub reward_per_unit: f64,
    /// Supply debited for the sale: `reward_per_unit * (asset value / unit value)`.
    pub contract_value: f64,
    pub remaining_supply: f64,
    pub mint_coefficient: f64,
    pub avidity: f64,
    /// Sales scheduled for the month.
    pub demand_level: u64,
    /// `YYYY-MM` label of `month`.
    pub period: String,
}

impl SaleEvent {
    /// Row fields in the order of `layout.columns()`.
    ///
    /// Numbers use the shortest representation that round-trips, so no
    /// precision is lost in the report.
    pub fn fields(&self, layout: ReportLayout) -> Vec<String> {
        let mut fields = vec![
            self.sale_index.to_string(),
            self.reward_per_unit.to_string(),
            self.contract_value.to_string(),
            self.remaining_supply.to_string(),
            self.mint_coefficient.to_string(),
        ];
        if layout == ReportLayout::WithAvidity {
            fields.push(self.avidity.to_string());
        }
        fields.push(self.demand_level.to_string());
        fields.push(self.period.clone());
        fields
    }
}

/// Mutable state of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Month being simulated, 1-based.
    pub current_month: u32,
    pub ledger: SupplyLedger,
    /// Mint coefficient and halving countdown.
    pub halving: HalvingSchedule,
    pub sales_this_month: u64,
    /// Sales of the month before the current one; 1 until a month has closed.
    pub sales_last_month: u64,
    pub avidity: f64,
    /// Raw demand; the month schedules `floor(demand_level)` sales.
    pub demand_level: f64,
    pub total_sales: u64,
    /// Halvings actually applied so far.
    pub halvings: u32,
}

impl SimulationState {
    pub fn new(ledger: SupplyLedger, halving: HalvingSchedule, initial_demand: f64, initial_avidity: f64) -> Self {
        Self {
            current_month: 1,
            ledger,
            halving,
            sales_this_month: 0,
            sales_last_month: 1,
            avidity: initial_avidity,
            demand_level: initial_demand,
            total_sales: 0,
            halvings: 0,
        }
    }

    pub fn remaining_supply(&self) -> f64 {
        self.ledger.remaining()
    }

    pub fn mint_coefficient(&self) -> f64 {
        self.halving.coefficient()
    }

    pub fn halving_countdown(&self) -> u32 {
        self.halving.countdown()
    }

    /// Sales scheduled for the current month.
    pub fn scheduled_sales(&self) -> u64 {
        self.demand_level.floor().max(0.0) as u64
    }
}

/// What a finished run reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    /// Months fully or partially simulated.
    pub months_simulated: u32,
    pub total_sales: u64,
    pub remaining_supply: f64,
    pub mint_coefficient: f64,
    pub avidity: f64,
    pub halvings: u32,
}

/// `YYYY-MM` label of a 1-based simulated month.
///
/// Month 1 falls in `start_year + 1`.
pub fn period_label(start_year: i32, month: u32) -> String {
    let index = month.saturating_sub(1);
    let year = start_year + (index / MONTHS_PER_YEAR) as i32 + 1;
    let month_of_year = index % MONTHS_PER_YEAR + 1;
    format!("{year}-{month_of_year:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> SaleEvent {
        SaleEvent {
            sale_index: 3,
            month: 2,
            reward_per_unit: 0.5,
            contract_value: 2000.0,
            remaining_supply: 1000.25,
            mint_coefficient: 0.0000042,
            avidity: 0.9,
            demand_level: 2,
            period: period_label(2023, 2),
        }
    }

    #[test]
    fn first_month_is_january_next_year() {
        assert_eq!(period_label(2023, 1), "2024-01");
    }

    #[test]
    fn december_stays_in_first_year() {
        assert_eq!(period_label(2023, 12), "2024-12");
    }

    #[test]
    fn thirteenth_month_rolls_year() {
        assert_eq!(period_label(2023, 13), "2025-01");
    }

    #[test]
    fn last_month_of_century() {
        assert_eq!(period_label(2023, 1200), "2123-12");
    }

    #[test]
    fn variant_round_trips_through_str() {
        for v in Variant::ALL {
            assert_eq!(v.to_string().parse::<Variant>().unwrap(), v);
        }
        assert_eq!("REFINED".parse::<Variant>().unwrap(), Variant::Refined);
    }

    #[test]
    fn unknown_variant_rejected() {
        assert_eq!(
            "linear".parse::<Variant>(),
            Err(ConfigError::UnknownVariant("linear".into()))
        );
    }

    #[test]
    fn floored_and_computed_share_value_but_not_tag() {
        let c = RewardOutcome::Computed(0.0001);
        let f = RewardOutcome::Floored(0.0001);
        assert_eq!(c.value(), f.value());
        assert_ne!(c, f);
        assert!(f.is_floored());
        assert!(!c.is_floored());
    }

    #[test]
    fn only_zero_floor_is_unrewardable() {
        assert!(RewardOutcome::Floored(0.0).is_unrewardable());
        assert!(!RewardOutcome::Floored(1e-12).is_unrewardable());
        assert!(!RewardOutcome::Computed(0.0).is_unrewardable());
    }

    #[test]
    fn plain_layout_has_no_avidity() {
        assert!(!ReportLayout::Plain.columns().contains(&"avidity"));
        assert_eq!(event().fields(ReportLayout::Plain).len(), 7);
    }

    #[test]
    fn avidity_column_follows_rmc() {
        let cols = ReportLayout::WithAvidity.columns();
        let rmc = cols.iter().position(|c| *c == "rmc").unwrap();
        assert_eq!(cols[rmc + 1], "avidity");
    }

    #[test]
    fn fields_follow_column_order() {
        let fields = event().fields(ReportLayout::WithAvidity);
        assert_eq!(
            fields,
            vec!["3", "0.5", "2000", "1000.25", "0.0000042", "0.9", "2", "2024-02"]
        );
    }

    #[test]
    fn scheduled_sales_floors_demand() {
        let mut state = SimulationState::new(
            SupplyLedger::new(100.0),
            HalvingSchedule::new(0.001, 48, 1e-12),
            1.0,
            1.0,
        );
        assert_eq!(state.remaining_supply(), 100.0);
        assert_eq!(state.mint_coefficient(), 0.001);
        assert_eq!(state.halving_countdown(), 48);
        assert_eq!(state.scheduled_sales(), 1);
        assert_eq!(state.sales_last_month, 1);
        state.demand_level = 2.99;
        assert_eq!(state.scheduled_sales(), 2);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(RunOutcome::Completed.to_string(), "completed");
        assert!(RunOutcome::Halted(HaltReason::Exhausted).to_string().contains("exhausted"));
    }
}
