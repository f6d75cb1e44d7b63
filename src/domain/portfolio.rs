//! Portfolio state carried through the daily walk, and the daily output rows.

use chrono::NaiveDate;

use super::position::PositionLedger;

/// One trading day of tracked performance. Appended once, never rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub benchmark_value: f64,
    pub cash: f64,
    pub equity: f64,
    pub drawdown_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub ledger: PositionLedger,
    pub all_time_high_equity: f64,
}

impl PortfolioState {
    pub fn new(start_cash: f64) -> Self {
        PortfolioState {
            cash: start_cash,
            ledger: PositionLedger::new(),
            all_time_high_equity: 0.0,
        }
    }

    /// Raise the all-time high if needed and return today's drawdown in percent.
    ///
    /// Zero while the high is not positive.
    pub fn record_high(&mut self, equity: f64) -> f64 {
        if equity > self.all_time_high_equity {
            self.all_time_high_equity = equity;
        }
        if self.all_time_high_equity <= 0.0 {
            return 0.0;
        }
        (equity / self.all_time_high_equity - 1.0) * 100.0
    }
}
