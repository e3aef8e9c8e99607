//! Error types for the FLY emission simulator.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")] NotFinite { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")] Negative { field: &'static str, value: f64 },
    #[error("{field} must be positive, got {value}")] NotPositive { field: &'static str, value: f64 },
    #[error("{0} must be non-zero")] Zero(&'static str),
    #[error("{field} must be at least {min}, got {value}")] BelowMinimum { field: &'static str, min: f64, value: f64 },
    #[error("demand growth decay must be in (0, 1], got {0}")] InvalidGrowthDecay(f64),
    #[error("initial avidity {value} outside [{min}, {max}]")] AvidityOutOfBounds { value: f64, min: f64, max: f64 },
    #[error("average asset value {asset} is smaller than unit value {unit}")] AssetBelowUnit { asset: u64, unit: u64 },
    #[error("unknown variant: {0}")] UnknownVariant(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("overdraft: requested {requested}, available {available}")] Overdraft { requested: f64, available: f64 },
    #[error("invalid debit amount: {0}")] InvalidAmount(f64),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("io: {0}")] Io(#[from] std::io::Error),
    #[error("csv: {0}")] Csv(String),
    #[error("report not started")] NotStarted,
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Report(#[from] ReportError),
}
