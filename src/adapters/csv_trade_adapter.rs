//! CSV trade log adapter.
//!
//! Expected header: `Ticker,Entry Date,Exit Date,Amount,Buy Price` (the
//! snake_case spellings are accepted too). `Exit Date` may be empty.

use crate::domain::error::TrackerError;
use crate::domain::trade::{Trade, TradeBook};
use crate::ports::trade_port::TradeSource;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct TradeRow {
    #[serde(rename = "Ticker", alias = "ticker")]
    ticker: String,
    #[serde(rename = "Entry Date", alias = "entry_date")]
    entry_date: String,
    #[serde(rename = "Exit Date", alias = "exit_date", default)]
    exit_date: Option<String>,
    #[serde(rename = "Amount", alias = "amount")]
    amount: f64,
    #[serde(rename = "Buy Price", alias = "buy_price")]
    buy_price: f64,
}

impl TradeRow {
    fn into_trade(self, row: usize) -> Result<Trade, TrackerError> {
        let parse_date = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TrackerError::TradeParse {
                row,
                reason: format!("invalid date '{}', expected YYYY-MM-DD", s),
            })
        };

        let entry_date = parse_date(&self.entry_date)?;
        let exit_date = match self.exit_date.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(parse_date(s)?),
            _ => None,
        };

        let trade = Trade {
            ticker: self.ticker.trim().to_uppercase(),
            entry_date,
            exit_date,
            amount: self.amount,
            buy_price: self.buy_price,
        };
        trade.validate().map_err(|e| TrackerError::TradeParse {
            row,
            reason: e.to_string(),
        })?;
        Ok(trade)
    }
}

pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Parse a trade log from any reader. Rows are numbered from 1, header excluded.
pub fn read_trades<R: std::io::Read>(reader: R) -> Result<TradeBook, TrackerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut trades = Vec::new();
    for (i, result) in rdr.deserialize::<TradeRow>().enumerate() {
        let row = i + 1;
        let parsed = result.map_err(|e| TrackerError::TradeParse {
            row,
            reason: e.to_string(),
        })?;
        trades.push(parsed.into_trade(row)?);
    }

    Ok(TradeBook::new(trades))
}

impl TradeSource for CsvTradeAdapter {
    fn load(&self) -> Result<TradeBook, TrackerError> {
        let file = File::open(&self.path)?;
        let book = read_trades(file)?;
        tracing::debug!(path = %self.path.display(), trades = book.len(), "loaded trade log");
        Ok(book)
    }
}
