//! Day-stepped performance engine.
//!
//! Walks the benchmark's trading calendar once, folding each day's trade
//! entries and exits into the portfolio state, valuing open positions at
//! that day's close and emitting one [`DailyRecord`] per day.

use chrono::NaiveDate;
use std::collections::HashSet;

use super::error::TrackerError;
use super::portfolio::{DailyRecord, PortfolioState};
use super::price_series::{PriceCache, PriceSeries};
use super::trade::TradeBook;
use super::tracker::{ExitPolicy, MissingPricePolicy, TrackerConfig};

/// An exit event from the trade log.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitEvent {
    pub date: NaiveDate,
    pub trade_index: usize,
    pub ticker: String,
    /// Zero under [`ExitPolicy::Hold`].
    pub shares_closed: f64,
    pub proceeds: f64,
}

/// A position valued with an earlier close because today's was missing.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceWarning {
    pub date: NaiveDate,
    pub ticker: String,
    pub used_date: NaiveDate,
    pub price: f64,
}

/// A trade whose entry date is not a trading day in range.
#[derive(Debug, Clone, PartialEq)]
pub struct UnappliedEntry {
    pub trade_index: usize,
    pub ticker: String,
    pub entry_date: NaiveDate,
}

/// A trade whose exit date falls inside the range but not on a trading day.
/// The exit is skipped under every exit policy.
#[derive(Debug, Clone, PartialEq)]
pub struct UnappliedExit {
    pub trade_index: usize,
    pub ticker: String,
    pub exit_date: NaiveDate,
}

#[derive(Debug)]
pub struct PerformanceResult {
    pub records: Vec<DailyRecord>,
    /// State after the last completed day.
    pub state: PortfolioState,
    pub benchmark_units: f64,
    pub exits: Vec<ExitEvent>,
    pub price_warnings: Vec<PriceWarning>,
    pub unapplied_entries: Vec<UnappliedEntry>,
    pub unapplied_exits: Vec<UnappliedExit>,
    /// Error that stopped the walk early. `records` holds every day before it.
    pub halted: Option<TrackerError>,
}

impl PerformanceResult {
    pub fn is_complete(&self) -> bool {
        self.halted.is_none()
    }

    pub fn last(&self) -> Option<&DailyRecord> {
        self.records.last()
    }
}

struct DayOutcome {
    record: DailyRecord,
    exits: Vec<ExitEvent>,
    warnings: Vec<PriceWarning>,
}

pub struct PerformanceEngine<'a> {
    config: &'a TrackerConfig,
    book: &'a TradeBook,
}

impl<'a> PerformanceEngine<'a> {
    pub fn new(config: &'a TrackerConfig, book: &'a TradeBook) -> Self {
        Self { config, book }
    }

    /// Run the walk over the benchmark dates within the configured range.
    ///
    /// Returns `Err` only for failures detected before the first day. Errors
    /// during the walk end it early and are reported in
    /// [`PerformanceResult::halted`] alongside the records already computed.
    pub fn run(
        &self,
        benchmark: &PriceSeries,
        prices: &PriceCache,
    ) -> Result<PerformanceResult, TrackerError> {
        let config = self.config;
        if !(config.start_cash > 0.0 && config.start_cash.is_finite()) {
            return Err(TrackerError::ConfigInvalid {
                section: "tracker".into(),
                key: "start_cash".into(),
                reason: "start_cash must be positive".into(),
            });
        }

        let calendar = benchmark.between(config.start_date, config.end_date);
        let (first_date, first_price) =
            calendar.first().ok_or(TrackerError::EmptyCalendar {
                start_date: config.start_date,
                end_date: config.end_date,
            })?;
        if !valid_price(first_price) {
            return Err(TrackerError::InvalidBenchmarkPrice {
                date: first_date,
                price: first_price,
            });
        }
        let benchmark_units = config.start_cash / first_price;

        let unapplied_entries = self.unapplied_entries(&calendar);
        for entry in &unapplied_entries {
            tracing::warn!(
                trade = entry.trade_index,
                ticker = %entry.ticker,
                entry_date = %entry.entry_date,
                "entry date is not a trading day in range, trade not applied"
            );
        }
        let unapplied_exits = self.unapplied_exits(&calendar);
        for exit in &unapplied_exits {
            tracing::warn!(
                trade = exit.trade_index,
                ticker = %exit.ticker,
                exit_date = %exit.exit_date,
                "exit date is not a trading day, exit skipped"
            );
        }
        let skipped: HashSet<usize> = unapplied_entries.iter().map(|e| e.trade_index).collect();

        tracing::info!(
            days = calendar.len(),
            trades = self.book.len(),
            start = %first_date,
            benchmark = %config.benchmark,
            exit_policy = %config.exit_policy,
            "walking portfolio"
        );

        let mut result = PerformanceResult {
            records: Vec::with_capacity(calendar.len()),
            state: PortfolioState::new(config.start_cash),
            benchmark_units,
            exits: Vec::new(),
            price_warnings: Vec::new(),
            unapplied_entries,
            unapplied_exits,
            halted: None,
        };

        for (date, benchmark_price) in calendar.iter() {
            if !valid_price(benchmark_price) {
                result.halted = Some(TrackerError::InvalidBenchmarkPrice {
                    date,
                    price: benchmark_price,
                });
                break;
            }

            // Day one is exactly start_cash.
            let benchmark_value = if date == first_date {
                config.start_cash
            } else {
                benchmark_price * benchmark_units
            };

            // A failing day leaves the committed state untouched.
            let mut next = result.state.clone();
            match self.step(&mut next, date, benchmark_value, prices, &skipped) {
                Ok(day) => {
                    result.state = next;
                    result.records.push(day.record);
                    result.exits.extend(day.exits);
                    result.price_warnings.extend(day.warnings);
                }
                Err(e) => {
                    tracing::error!(date = %date, error = %e, "walk halted");
                    result.halted = Some(e);
                    break;
                }
            }
        }

        if let Some(last) = result.records.last() {
            tracing::info!(
                days = result.records.len(),
                equity = last.equity,
                cash = last.cash,
                positions = result.state.ledger.len(),
                "walk finished"
            );
        }

        Ok(result)
    }

    fn step(
        &self,
        state: &mut PortfolioState,
        date: NaiveDate,
        benchmark_value: f64,
        prices: &PriceCache,
        skipped: &HashSet<usize>,
    ) -> Result<DayOutcome, TrackerError> {
        let mut exits = Vec::new();
        let mut warnings = Vec::new();

        for &i in self.book.entries_on(date) {
            let trade = &self.book.trades()[i];
            let fill_shares = trade.fill_shares();
            state
                .ledger
                .open_or_add(&trade.ticker, fill_shares, trade.buy_price)
                .map_err(|e| TrackerError::TradeRejected {
                    index: i,
                    ticker: trade.ticker.clone(),
                    source: Box::new(e),
                })?;
            state.cash -= trade.amount;
            tracing::debug!(
                date = %date,
                ticker = %trade.ticker,
                shares = fill_shares,
                price = trade.buy_price,
                cash = state.cash,
                "entry"
            );
        }

        for &i in self.book.exits_on(date) {
            let trade = &self.book.trades()[i];
            let mut event = ExitEvent {
                date,
                trade_index: i,
                ticker: trade.ticker.clone(),
                shares_closed: 0.0,
                proceeds: 0.0,
            };

            if self.config.exit_policy == ExitPolicy::Close {
                if skipped.contains(&i) {
                    tracing::warn!(
                        date = %date,
                        ticker = %trade.ticker,
                        trade = i,
                        "exit for a trade whose entry was not applied, nothing closed"
                    );
                } else if state.ledger.contains(&trade.ticker) {
                    let price = self.mark_price(prices, &trade.ticker, date, &mut warnings)?;
                    let closed = state
                        .ledger
                        .close_or_reduce(&trade.ticker, trade.fill_shares())
                        .map_err(|e| TrackerError::TradeRejected {
                            index: i,
                            ticker: trade.ticker.clone(),
                            source: Box::new(e),
                        })?;
                    event.shares_closed = closed;
                    event.proceeds = closed * price;
                    state.cash += event.proceeds;
                } else {
                    tracing::warn!(
                        date = %date,
                        ticker = %trade.ticker,
                        trade = i,
                        "exit for a ticker with no open position"
                    );
                }
            }

            tracing::info!(
                date = %date,
                ticker = %trade.ticker,
                shares_closed = event.shares_closed,
                proceeds = event.proceeds,
                "exit"
            );
            exits.push(event);
        }

        let mut position_value = 0.0;
        for position in state.ledger.all() {
            let price = self.mark_price(prices, &position.ticker, date, &mut warnings)?;
            position_value += position.market_value(price);
        }
        let equity = state.cash + position_value;
        let drawdown_pct = state.record_high(equity);

        Ok(DayOutcome {
            record: DailyRecord {
                date,
                benchmark_value,
                cash: state.cash,
                equity,
                drawdown_pct,
            },
            exits,
            warnings,
        })
    }

    fn mark_price(
        &self,
        prices: &PriceCache,
        ticker: &str,
        date: NaiveDate,
        warnings: &mut Vec<PriceWarning>,
    ) -> Result<f64, TrackerError> {
        if let Some(price) = prices.price_on(ticker, date) {
            return Ok(price);
        }
        if self.config.missing_price == MissingPricePolicy::CarryForward {
            if let Some((used_date, price)) = prices.last_before(ticker, date) {
                tracing::warn!(
                    date = %date,
                    ticker = %ticker,
                    used_date = %used_date,
                    price,
                    "no close, carrying forward"
                );
                warnings.push(PriceWarning {
                    date,
                    ticker: ticker.to_string(),
                    used_date,
                    price,
                });
                return Ok(price);
            }
        }
        Err(TrackerError::MissingPrice {
            ticker: ticker.to_string(),
            date,
        })
    }

    fn unapplied_entries(&self, calendar: &PriceSeries) -> Vec<UnappliedEntry> {
        self.book
            .trades()
            .iter()
            .enumerate()
            .filter(|(_, t)| calendar.get(t.entry_date).is_none())
            .map(|(i, t)| UnappliedEntry {
                trade_index: i,
                ticker: t.ticker.clone(),
                entry_date: t.entry_date,
            })
            .collect()
    }

    fn unapplied_exits(&self, calendar: &PriceSeries) -> Vec<UnappliedExit> {
        let config = self.config;
        self.book
            .trades()
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.exit_date.map(|d| (i, t, d)))
            .filter(|&(_, _, d)| {
                d >= config.start_date && d <= config.end_date && calendar.get(d).is_none()
            })
            .map(|(i, t, d)| UnappliedExit {
                trade_index: i,
                ticker: t.ticker.clone(),
                exit_date: d,
            })
            .collect()
    }
}

fn valid_price(price: f64) -> bool {
    price > 0.0 && price.is_finite()
}
