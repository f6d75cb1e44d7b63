//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for samtracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("invalid fill for {ticker}: {shares} shares @ {price}")]
    InvalidFill {
        ticker: String,
        shares: f64,
        price: f64,
    },

    #[error("trade #{index} ({ticker}) rejected: {source}")]
    TradeRejected {
        index: usize,
        ticker: String,
        #[source]
        source: Box<TrackerError>,
    },

    #[error("no open position for {ticker}")]
    UnknownPosition { ticker: String },

    #[error("no price for {ticker} on {date}")]
    MissingPrice { ticker: String, date: NaiveDate },

    #[error("benchmark has no trading days between {start_date} and {end_date}")]
    EmptyCalendar {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("invalid benchmark price {price} on {date}")]
    InvalidBenchmarkPrice { date: NaiveDate, price: f64 },

    #[error("trade log row {row}: {reason}")]
    TradeParse { row: usize, reason: String },

    #[error("price data for {symbol}: {reason}")]
    PriceData { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TrackerError> for std::process::ExitCode {
    fn from(err: &TrackerError) -> Self {
        let code: u8 = match err {
            TrackerError::Io(_) | TrackerError::Csv(_) => 1,
            TrackerError::ConfigParse { .. }
            | TrackerError::ConfigMissing { .. }
            | TrackerError::ConfigInvalid { .. } => 2,
            TrackerError::TradeParse { .. }
            | TrackerError::PriceData { .. }
            | TrackerError::EmptyCalendar { .. }
            | TrackerError::InvalidBenchmarkPrice { .. } => 3,
            TrackerError::InvalidFill { .. }
            | TrackerError::TradeRejected { .. }
            | TrackerError::UnknownPosition { .. } => 4,
            TrackerError::MissingPrice { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
