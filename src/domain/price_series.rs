//! Date-ordered price series and the pre-fetched per-ticker cache.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::ports::price_port::PriceSource;

/// Closing prices ordered by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    prices: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, price: f64) {
        self.prices.insert(date, price);
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.prices.get(&date).copied()
    }

    /// Most recent price strictly before `date`.
    pub fn last_before(&self, date: NaiveDate) -> Option<(NaiveDate, f64)> {
        self.prices
            .range(..date)
            .next_back()
            .map(|(&d, &p)| (d, p))
    }

    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.prices.iter().next().map(|(&d, &p)| (d, p))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.prices.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.prices.iter().map(|(&d, &p)| (d, p))
    }

    /// Sub-series for `[start_date, end_date]`.
    pub fn between(&self, start_date: NaiveDate, end_date: NaiveDate) -> PriceSeries {
        if start_date > end_date {
            return PriceSeries::new();
        }
        PriceSeries {
            prices: self
                .prices
                .range(start_date..=end_date)
                .map(|(&d, &p)| (d, p))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(NaiveDate, f64)> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        PriceSeries {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Per-ticker price series fetched once up front for the whole date range.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    series: HashMap<String, PriceSeries>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `series` call per ticker. A failed fetch leaves the ticker
    /// without prices; it only matters if a position in it must be valued.
    pub fn prefetch(
        source: &dyn PriceSource,
        tickers: &[String],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let mut cache = PriceCache::new();
        for ticker in tickers {
            match source.series(ticker, start_date, end_date) {
                Ok(series) => {
                    tracing::debug!(ticker = %ticker, days = series.len(), "prefetched prices");
                    cache.insert(ticker, series);
                }
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "price prefetch failed");
                }
            }
        }
        cache
    }

    pub fn insert(&mut self, ticker: &str, series: PriceSeries) {
        self.series.insert(ticker.to_string(), series);
    }

    pub fn price_on(&self, ticker: &str, date: NaiveDate) -> Option<f64> {
        self.series.get(ticker).and_then(|s| s.get(date))
    }

    pub fn last_before(&self, ticker: &str, date: NaiveDate) -> Option<(NaiveDate, f64)> {
        self.series.get(ticker).and_then(|s| s.last_before(date))
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.series.contains_key(ticker)
    }
}
