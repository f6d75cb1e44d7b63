#![allow(dead_code)]

use chrono::NaiveDate;
use samtracker::domain::error::TrackerError;
use samtracker::domain::price_series::PriceSeries;
use samtracker::domain::trade::{Trade, TradeBook};
use samtracker::domain::tracker::TrackerConfig;
use samtracker::ports::price_port::PriceSource;
use samtracker::ports::report_port::{Report, ReportPort};
use samtracker::ports::trade_port::TradeSource;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockPriceSource {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: &[(&str, f64)]) -> Self {
        let series = closes.iter().map(|&(d, p)| (parse_date(d), p)).collect();
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn call_count(&self, symbol: &str) -> usize {
        self.calls.borrow().iter().filter(|s| *s == symbol).count()
    }
}

impl PriceSource for MockPriceSource {
    fn series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TrackerError> {
        self.calls.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TrackerError::PriceData {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(series) => Ok(series.between(start_date, end_date)),
            None => Err(TrackerError::PriceData {
                symbol: symbol.to_string(),
                reason: "no price file".to_string(),
            }),
        }
    }
}

pub struct MockTradeSource {
    pub trades: Vec<Trade>,
    pub error: Option<String>,
}

impl MockTradeSource {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self {
            trades,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            trades: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl TradeSource for MockTradeSource {
    fn load(&self) -> Result<TradeBook, TrackerError> {
        if let Some(reason) = &self.error {
            return Err(TrackerError::TradeParse {
                row: 1,
                reason: reason.clone(),
            });
        }
        Ok(TradeBook::new(self.trades.clone()))
    }
}

/// Records what each `write` call saw instead of touching the filesystem.
pub struct MockReportPort {
    pub writes: Cell<usize>,
    pub record_counts: RefCell<Vec<usize>>,
    pub halted: RefCell<Vec<bool>>,
    pub outputs: RefCell<Vec<PathBuf>>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            writes: Cell::new(0),
            record_counts: RefCell::new(Vec::new()),
            halted: RefCell::new(Vec::new()),
            outputs: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, report: &Report<'_>, output: &Path) -> Result<(), TrackerError> {
        self.writes.set(self.writes.get() + 1);
        self.record_counts
            .borrow_mut()
            .push(report.result.records.len());
        self.halted
            .borrow_mut()
            .push(report.result.halted.is_some());
        self.outputs.borrow_mut().push(output.to_path_buf());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_trade(
    ticker: &str,
    entry: &str,
    exit: Option<&str>,
    amount: f64,
    buy_price: f64,
) -> Trade {
    Trade {
        ticker: ticker.to_string(),
        entry_date: parse_date(entry),
        exit_date: exit.map(parse_date),
        amount,
        buy_price,
    }
}

pub fn sample_config(start: &str, end: &str) -> TrackerConfig {
    TrackerConfig::new(parse_date(start), parse_date(end), 100_000.0)
}

/// Consecutive calendar days starting at `start`, one close per day.
pub fn generate_closes(start: &str, closes: &[f64]) -> Vec<(String, f64)> {
    let start = parse_date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let d = start + chrono::Duration::days(i as i64);
            (d.format("%Y-%m-%d").to_string(), c)
        })
        .collect()
}

pub fn as_refs(closes: &[(String, f64)]) -> Vec<(&str, f64)> {
    closes.iter().map(|(d, p)| (d.as_str(), *p)).collect()
}
