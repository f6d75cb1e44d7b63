//! Trade records and the ordered trade book.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use super::error::TrackerError;

/// One discretionary trade: a cash-funded long entry and an optional exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub ticker: String,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub amount: f64,
    pub buy_price: f64,
}

impl Trade {
    /// Shares bought by this trade: amount / buy_price.
    pub fn fill_shares(&self) -> f64 {
        self.amount / self.buy_price
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        let positive = |v: f64| v > 0.0 && v.is_finite();
        if self.ticker.trim().is_empty() || !positive(self.amount) || !positive(self.buy_price) {
            return Err(TrackerError::InvalidFill {
                ticker: self.ticker.clone(),
                shares: self.amount,
                price: self.buy_price,
            });
        }
        Ok(())
    }
}

/// Trades in source order, indexed by entry and exit date.
///
/// Index vectors keep source order so same-day trades are applied in the
/// order they appear in the trade log.
#[derive(Debug, Clone, Default)]
pub struct TradeBook {
    trades: Vec<Trade>,
    entries: HashMap<NaiveDate, Vec<usize>>,
    exits: HashMap<NaiveDate, Vec<usize>>,
}

impl TradeBook {
    pub fn new(trades: Vec<Trade>) -> Self {
        let mut entries: HashMap<NaiveDate, Vec<usize>> = HashMap::new();
        let mut exits: HashMap<NaiveDate, Vec<usize>> = HashMap::new();
        for (i, trade) in trades.iter().enumerate() {
            entries.entry(trade.entry_date).or_default().push(i);
            if let Some(exit) = trade.exit_date {
                exits.entry(exit).or_default().push(i);
            }
        }
        Self {
            trades,
            entries,
            exits,
        }
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn get(&self, index: usize) -> Option<&Trade> {
        self.trades.get(index)
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[usize] {
        self.entries.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn exits_on(&self, date: NaiveDate) -> &[usize] {
        self.exits.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct tickers, sorted.
    pub fn tickers(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self.trades.iter().map(|t| t.ticker.as_str()).collect();
        unique.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trade(ticker: &str, entry: NaiveDate, exit: Option<NaiveDate>) -> Trade {
        Trade {
            ticker: ticker.into(),
            entry_date: entry,
            exit_date: exit,
            amount: 10_000.0,
            buy_price: 50.0,
        }
    }

    #[test]
    fn fill_shares_is_amount_over_price() {
        let t = trade("AAPL", date(2024, 1, 2), None);
        assert!((t.fill_shares() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_non_positive_values() {
        let mut t = trade("AAPL", date(2024, 1, 2), None);
        assert!(t.validate().is_ok());

        t.amount = 0.0;
        assert!(matches!(
            t.validate(),
            Err(TrackerError::InvalidFill { .. })
        ));

        t.amount = 100.0;
        t.buy_price = -1.0;
        assert!(t.validate().is_err());

        t.buy_price = f64::NAN;
        assert!(t.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_ticker() {
        let t = trade("  ", date(2024, 1, 2), None);
        assert!(t.validate().is_err());
    }

    #[test]
    fn book_indexes_entries_in_source_order() {
        let d = date(2024, 1, 2);
        let book = TradeBook::new(vec![
            trade("MSFT", d, None),
            trade("AAPL", date(2024, 1, 3), Some(d)),
            trade("AAPL", d, None),
        ]);

        assert_eq!(book.entries_on(d), &[0, 2]);
        assert_eq!(book.entries_on(date(2024, 1, 3)), &[1]);
        assert_eq!(book.exits_on(d), &[1]);
        assert!(book.entries_on(date(2024, 1, 9)).is_empty());
    }

    #[test]
    fn book_tickers_are_unique_and_sorted() {
        let d = date(2024, 1, 2);
        let book = TradeBook::new(vec![
            trade("MSFT", d, None),
            trade("AAPL", d, None),
            trade("MSFT", d, None),
        ]);
        assert_eq!(book.tickers(), vec!["AAPL", "MSFT"]);
        assert_eq!(book.len(), 3);
    }
}
