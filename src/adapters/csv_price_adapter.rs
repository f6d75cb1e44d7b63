//! CSV file price adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row. The
//! `date` column is required (YYYY-MM-DD). The adjusted close (`adj_close`
//! or `adj close`) is used when present, otherwise `close`.

use crate::domain::error::TrackerError;
use crate::domain::price_series::PriceSeries;
use crate::ports::price_port::PriceSource;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    pub fn list_symbols(&self) -> Result<Vec<String>, TrackerError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

fn column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

impl PriceSource for CsvPriceAdapter {
    fn series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TrackerError> {
        let path = self.csv_path(symbol);
        let data_err = |reason: String| TrackerError::PriceData {
            symbol: symbol.to_string(),
            reason,
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers()?.clone();
        let date_col =
            column(&headers, &["date"]).ok_or_else(|| data_err("missing date column".into()))?;
        let close_col = column(&headers, &["adj_close", "adj close", "close"])
            .ok_or_else(|| data_err("missing close column".into()))?;

        let mut series = PriceSeries::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            let line = i + 2;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| data_err(format!("line {}: invalid date '{}': {}", line, date_str, e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            let close_str = record.get(close_col).unwrap_or_default().trim();
            let close: f64 = close_str
                .parse()
                .map_err(|e| data_err(format!("line {}: invalid close '{}': {}", line, close_str, e)))?;

            series.insert(date, close);
        }

        Ok(series)
    }
}
