//! CSV report adapter implementing ReportPort.
//!
//! Writes `performance.csv`, `positions.csv`, `holdings.csv` and
//! `summary.csv` into the output directory, creating it if needed.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::domain::error::TrackerError;
use crate::ports::report_port::{Report, ReportPort};

pub const PERFORMANCE_FILE: &str = "performance.csv";
pub const POSITIONS_FILE: &str = "positions.csv";
pub const HOLDINGS_FILE: &str = "holdings.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

#[derive(Serialize)]
struct PerformanceRow {
    date: String,
    benchmark: f64,
    cash: f64,
    equity: f64,
    drawdown_pct: f64,
}

#[derive(Serialize)]
struct PositionRow<'a> {
    ticker: &'a str,
    shares: f64,
    avg_price: f64,
    cost_basis: f64,
}

#[derive(Serialize)]
struct HoldingRow<'a> {
    label: &'a str,
    value: f64,
}

#[derive(Serialize)]
struct SummaryRow {
    metric: &'static str,
    value: String,
}

fn summary_rows(report: &Report<'_>) -> Vec<SummaryRow> {
    let s = report.summary;
    let c = report.config;
    let row = |metric, value: String| SummaryRow { metric, value };
    vec![
        row("start_date", c.start_date.format("%Y-%m-%d").to_string()),
        row("end_date", c.end_date.format("%Y-%m-%d").to_string()),
        row("start_cash", c.start_cash.to_string()),
        row("benchmark", c.benchmark.clone()),
        row("exit_policy", c.exit_policy.to_string()),
        row("missing_price", c.missing_price.to_string()),
        row("trading_days", s.trading_days.to_string()),
        row("final_equity", s.final_equity.to_string()),
        row("final_benchmark", s.final_benchmark.to_string()),
        row("total_return", s.total_return.to_string()),
        row("benchmark_return", s.benchmark_return.to_string()),
        row("excess_return", s.excess_return.to_string()),
        row("annualized_return", s.annualized_return.to_string()),
        row("max_drawdown_pct", s.max_drawdown_pct.to_string()),
        row("max_drawdown_duration", s.max_drawdown_duration.to_string()),
        row("sharpe_ratio", s.sharpe_ratio.to_string()),
        row(
            "halted",
            report
                .result
                .halted
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default(),
        ),
    ]
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    /// The header is written up front so a file with no rows still has one.
    fn write_rows<T: Serialize>(
        path: &Path,
        header: &[&str],
        rows: impl IntoIterator<Item = T>,
    ) -> Result<(), TrackerError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        wtr.write_record(header)?;
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &Report<'_>, output: &Path) -> Result<(), TrackerError> {
        fs::create_dir_all(output)?;

        Self::write_rows(
            &output.join(PERFORMANCE_FILE),
            &["date", "benchmark", "cash", "equity", "drawdown_pct"],
            report.result.records.iter().map(|r| PerformanceRow {
                date: r.date.format("%Y-%m-%d").to_string(),
                benchmark: r.benchmark_value,
                cash: r.cash,
                equity: r.equity,
                drawdown_pct: r.drawdown_pct,
            }),
        )?;

        Self::write_rows(
            &output.join(POSITIONS_FILE),
            &["ticker", "shares", "avg_price", "cost_basis"],
            report.result.state.ledger.all().iter().map(|p| PositionRow {
                ticker: &p.ticker,
                shares: p.shares,
                avg_price: p.avg_price,
                cost_basis: p.cost_basis(),
            }),
        )?;

        Self::write_rows(
            &output.join(HOLDINGS_FILE),
            &["label", "value"],
            report.holdings.iter().map(|h| HoldingRow {
                label: &h.label,
                value: h.value,
            }),
        )?;

        Self::write_rows(
            &output.join(SUMMARY_FILE),
            &["metric", "value"],
            summary_rows(report),
        )?;

        tracing::info!(dir = %output.display(), "report written");
        Ok(())
    }
}
