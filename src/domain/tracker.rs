//! Tracker run parameters.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// What an exit event does to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Exits are reported but the position stays open.
    #[default]
    Hold,
    /// The trade's shares are sold at the exit day's mark and credited to cash.
    Close,
}

impl FromStr for ExitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hold" => Ok(ExitPolicy::Hold),
            "close" => Ok(ExitPolicy::Close),
            other => Err(format!("unknown exit policy '{other}' (expected hold or close)")),
        }
    }
}

impl fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitPolicy::Hold => write!(f, "hold"),
            ExitPolicy::Close => write!(f, "close"),
        }
    }
}

/// How to value an open position on a day its ticker has no price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPricePolicy {
    /// Halt the walk with `MissingPrice`.
    #[default]
    Fail,
    /// Use the latest earlier price and record a warning.
    CarryForward,
}

impl FromStr for MissingPricePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(MissingPricePolicy::Fail),
            "carry_forward" | "carry-forward" => Ok(MissingPricePolicy::CarryForward),
            other => Err(format!(
                "unknown missing price policy '{other}' (expected fail or carry_forward)"
            )),
        }
    }
}

impl fmt::Display for MissingPricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPricePolicy::Fail => write!(f, "fail"),
            MissingPricePolicy::CarryForward => write!(f, "carry_forward"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_cash: f64,
    pub benchmark: String,
    pub exit_policy: ExitPolicy,
    pub missing_price: MissingPricePolicy,
    pub risk_free_rate: f64,
}

impl TrackerConfig {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, start_cash: f64) -> Self {
        TrackerConfig {
            start_date,
            end_date,
            start_cash,
            benchmark: "SPY".to_string(),
            exit_policy: ExitPolicy::default(),
            missing_price: MissingPricePolicy::default(),
            risk_free_rate: 0.0,
        }
    }
}
