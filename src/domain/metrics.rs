//! Run summary statistics over the daily performance series.

use super::portfolio::DailyRecord;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub trading_days: usize,
    pub final_equity: f64,
    pub final_benchmark: f64,
    pub total_return: f64,
    pub benchmark_return: f64,
    pub excess_return: f64,
    pub annualized_return: f64,
    /// Most negative daily drawdown, in percent (<= 0).
    pub max_drawdown_pct: f64,
    /// Longest run of consecutive days below the running high.
    pub max_drawdown_duration: usize,
    pub sharpe_ratio: f64,
}

impl Summary {
    pub fn compute(records: &[DailyRecord], start_cash: f64, risk_free_rate: f64) -> Self {
        let final_equity = records.last().map(|r| r.equity).unwrap_or(start_cash);
        let final_benchmark = records
            .last()
            .map(|r| r.benchmark_value)
            .unwrap_or(start_cash);

        let total_return = relative_change(start_cash, final_equity);
        let benchmark_return = relative_change(start_cash, final_benchmark);

        let years = records.len() as f64 / TRADING_DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 && total_return > -1.0 && total_return.is_finite() {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let max_drawdown_pct = records
            .iter()
            .map(|r| r.drawdown_pct)
            .fold(0.0_f64, f64::min);

        let mut max_drawdown_duration = 0usize;
        let mut current = 0usize;
        for r in records {
            if r.drawdown_pct < 0.0 {
                current += 1;
                max_drawdown_duration = max_drawdown_duration.max(current);
            } else {
                current = 0;
            }
        }

        Summary {
            trading_days: records.len(),
            final_equity,
            final_benchmark,
            total_return,
            benchmark_return,
            excess_return: total_return - benchmark_return,
            annualized_return,
            max_drawdown_pct,
            max_drawdown_duration,
            sharpe_ratio: compute_sharpe(records, risk_free_rate / TRADING_DAYS_PER_YEAR),
        }
    }
}

fn relative_change(from: f64, to: f64) -> f64 {
    if from > 0.0 { (to - from) / from } else { 0.0 }
}

fn compute_sharpe(records: &[DailyRecord], daily_rf: f64) -> f64 {
    if records.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = records
        .windows(2)
        .map(|w| relative_change(w[0].equity, w[1].equity))
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        ((mean - daily_rf) / stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}
