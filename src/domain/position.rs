//! Open positions and the weighted-average cost ledger.

use std::collections::HashMap;

use super::error::TrackerError;

/// Remaining size below which a reduced position is treated as closed.
const SHARE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: String,
    pub shares: f64,
    pub avg_price: f64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }

    pub fn cost_basis(&self) -> f64 {
        self.shares * self.avg_price
    }
}

/// Book of open positions keyed by ticker, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionLedger {
    positions: Vec<Position>,
    index: HashMap<String, usize>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a position or average a new fill into an existing one.
    ///
    /// new_avg = (shares * avg + fill_shares * fill_price) / (shares + fill_shares)
    pub fn open_or_add(
        &mut self,
        ticker: &str,
        fill_shares: f64,
        fill_price: f64,
    ) -> Result<(), TrackerError> {
        if !(fill_shares > 0.0 && fill_shares.is_finite())
            || !(fill_price > 0.0 && fill_price.is_finite())
        {
            return Err(TrackerError::InvalidFill {
                ticker: ticker.to_string(),
                shares: fill_shares,
                price: fill_price,
            });
        }

        match self.index.get(ticker) {
            Some(&i) => {
                let current = &self.positions[i];
                let shares = current.shares + fill_shares;
                let avg_price =
                    (current.cost_basis() + fill_shares * fill_price) / shares;
                self.positions[i] = Position {
                    ticker: ticker.to_string(),
                    shares,
                    avg_price,
                };
            }
            None => {
                self.index.insert(ticker.to_string(), self.positions.len());
                self.positions.push(Position {
                    ticker: ticker.to_string(),
                    shares: fill_shares,
                    avg_price: fill_price,
                });
            }
        }
        Ok(())
    }

    /// Reduce a position by up to `shares`, removing it once nothing is left.
    ///
    /// Returns the number of shares actually closed. The average price of
    /// what remains is unchanged.
    pub fn close_or_reduce(&mut self, ticker: &str, shares: f64) -> Result<f64, TrackerError> {
        if !(shares > 0.0 && shares.is_finite()) {
            return Err(TrackerError::InvalidFill {
                ticker: ticker.to_string(),
                shares,
                price: 0.0,
            });
        }
        let i = *self
            .index
            .get(ticker)
            .ok_or_else(|| TrackerError::UnknownPosition {
                ticker: ticker.to_string(),
            })?;

        let open = self.positions[i].shares;
        let closed = shares.min(open);
        let remaining = open - closed;

        if remaining <= SHARE_EPSILON {
            self.positions.remove(i);
            self.rebuild_index();
            Ok(open)
        } else {
            self.positions[i].shares = remaining;
            Ok(closed)
        }
    }

    pub fn get(&self, ticker: &str) -> Option<&Position> {
        self.index.get(ticker).map(|&i| &self.positions[i])
    }

    pub fn all(&self) -> &[Position] {
        &self.positions
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.index.contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn total_cost(&self) -> f64 {
        self.positions.iter().map(Position::cost_basis).sum()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| (p.ticker.clone(), i))
            .collect();
    }
}
