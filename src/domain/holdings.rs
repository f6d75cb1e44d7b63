//! Holdings breakdown of a portfolio state.
//!
//! Positions are valued at cost (shares * avg_price), not at market.

use super::portfolio::PortfolioState;

pub const CASH_LABEL: &str = "Cash";

#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub label: String,
    pub value: f64,
}

/// Cash first, then one entry per open position in ledger order.
pub fn holdings(state: &PortfolioState) -> Vec<Holding> {
    let mut out = Vec::with_capacity(state.ledger.len() + 1);
    out.push(Holding {
        label: CASH_LABEL.to_string(),
        value: state.cash,
    });
    out.extend(state.ledger.all().iter().map(|p| Holding {
        label: p.ticker.clone(),
        value: p.cost_basis(),
    }));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_only() {
        let state = PortfolioState::new(100_000.0);
        assert_eq!(
            holdings(&state),
            vec![Holding {
                label: "Cash".into(),
                value: 100_000.0
            }]
        );
    }

    #[test]
    fn positions_follow_cash_at_cost() {
        let mut state = PortfolioState::new(100_000.0);
        state.ledger.open_or_add("MSFT", 10.0, 300.0).unwrap();
        state.ledger.open_or_add("AAPL", 20.0, 150.0).unwrap();
        state.cash = 94_000.0;

        let h = holdings(&state);
        let labels: Vec<&str> = h.iter().map(|x| x.label.as_str()).collect();
        assert_eq!(labels, vec!["Cash", "MSFT", "AAPL"]);
        assert!((h[1].value - 3_000.0).abs() < f64::EPSILON);
        assert!((h[2].value - 3_000.0).abs() < f64::EPSILON);
    }
}
