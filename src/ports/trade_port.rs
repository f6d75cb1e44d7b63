//! Trade log access port trait.

use crate::domain::error::TrackerError;
use crate::domain::trade::TradeBook;

pub trait TradeSource {
    /// Load every trade, failing the whole load on the first malformed row.
    fn load(&self) -> Result<TradeBook, TrackerError>;
}
