//! Market price access port trait.

use crate::domain::error::TrackerError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait PriceSource {
    /// Closing prices for `symbol` between `start_date` and `end_date`
    /// inclusive, one entry per trading day.
    fn series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TrackerError>;

    /// Single-day close. Fails with `MissingPrice` if `symbol` did not trade on `date`.
    fn price_on(&self, symbol: &str, date: NaiveDate) -> Result<f64, TrackerError> {
        self.series(symbol, date, date)?
            .get(date)
            .ok_or_else(|| TrackerError::MissingPrice {
                ticker: symbol.to_string(),
                date,
            })
    }
}
