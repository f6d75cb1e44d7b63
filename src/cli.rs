//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::csv_trade_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    DEFAULT_START_CASH, parse_date, parse_double, parse_exit_policy, parse_missing_price_policy,
    validate_data_config, validate_tracker_config,
};
use crate::domain::error::TrackerError;
use crate::domain::holdings::{Holding, holdings};
use crate::domain::metrics::Summary;
use crate::domain::performance::{PerformanceEngine, PerformanceResult};
use crate::domain::price_series::PriceCache;
use crate::domain::tracker::TrackerConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceSource;
use crate::ports::report_port::{Report, ReportPort};
use crate::ports::trade_port::TradeSource;

pub const DEFAULT_BENCHMARK: &str = "SPY";
pub const DEFAULT_OUTPUT_DIR: &str = "report";

#[derive(Parser, Debug)]
#[command(name = "samtracker", about = "Discretionary portfolio tracker")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay the trade log against daily prices and write a report
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Trade log, overrides [data] trades_file
        #[arg(short, long)]
        trades: Option<PathBuf>,
        /// Report directory, overrides [report] output_dir
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Benchmark symbol, overrides [tracker] benchmark
        #[arg(long)]
        benchmark: Option<String>,
    },
    /// Validate the config and trade log without pricing anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            trades,
            output,
            benchmark,
        } => run_tracker(&config, trades.as_ref(), output.as_ref(), benchmark.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_tracker_config(
    adapter: &dyn ConfigPort,
    benchmark_override: Option<&str>,
) -> Result<TrackerConfig, TrackerError> {
    let benchmark = match benchmark_override {
        Some(b) => b.trim().to_uppercase(),
        None => adapter
            .get_string("tracker", "benchmark")
            .map(|b| b.to_uppercase())
            .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string()),
    };
    if benchmark.is_empty() {
        return Err(TrackerError::ConfigInvalid {
            section: "tracker".into(),
            key: "benchmark".into(),
            reason: "benchmark symbol is empty".into(),
        });
    }

    Ok(TrackerConfig {
        start_date: parse_date(adapter, "start_date")?,
        end_date: parse_date(adapter, "end_date")?,
        start_cash: parse_double(adapter, "start_cash", DEFAULT_START_CASH)?,
        benchmark,
        exit_policy: parse_exit_policy(adapter)?,
        missing_price: parse_missing_price_policy(adapter)?,
        risk_free_rate: parse_double(adapter, "risk_free_rate", 0.0)?,
    })
}

/// Everything a finished (or halted) run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub result: PerformanceResult,
    pub summary: Summary,
    pub holdings: Vec<Holding>,
}

impl RunOutcome {
    pub fn exit_code(&self) -> ExitCode {
        match &self.result.halted {
            Some(e) => e.into(),
            None => ExitCode::SUCCESS,
        }
    }
}

/// Load trades, fetch prices, walk the calendar and write the report.
///
/// A walk halted mid-way still writes the days it completed; the halting
/// error is left in `result.halted`.
pub fn run_tracker_pipeline(
    config: &TrackerConfig,
    trade_source: &dyn TradeSource,
    price_source: &dyn PriceSource,
    report_port: &dyn ReportPort,
    output: &Path,
) -> Result<RunOutcome, TrackerError> {
    let book = trade_source.load()?;
    eprintln!("Loaded {} trades", book.len());

    let benchmark = price_source.series(&config.benchmark, config.start_date, config.end_date)?;
    let tickers = book.tickers();
    let prices = PriceCache::prefetch(price_source, &tickers, config.start_date, config.end_date);

    eprintln!(
        "Tracking {} tickers against {}: {} to {}",
        tickers.len(),
        config.benchmark,
        config.start_date,
        config.end_date,
    );

    let result = PerformanceEngine::new(config, &book).run(&benchmark, &prices)?;
    let summary = Summary::compute(&result.records, config.start_cash, config.risk_free_rate);
    let holdings = holdings(&result.state);

    report_port.write(
        &Report {
            config,
            result: &result,
            holdings: &holdings,
            summary: &summary,
        },
        output,
    )?;

    Ok(RunOutcome {
        result,
        summary,
        holdings,
    })
}

fn run_tracker(
    config_path: &Path,
    trades_override: Option<&PathBuf>,
    output_override: Option<&PathBuf>,
    benchmark_override: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_tracker_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let config = match build_tracker_config(&adapter, benchmark_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let price_dir = match adapter.get_string("data", "price_dir") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let e = TrackerError::ConfigMissing {
                section: "data".into(),
                key: "price_dir".into(),
            };
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let trades_path = match trades_override
        .cloned()
        .or_else(|| adapter.get_string("data", "trades_file").map(PathBuf::from))
    {
        Some(p) => p,
        None => {
            let e = TrackerError::ConfigMissing {
                section: "data".into(),
                key: "trades_file".into(),
            };
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let output = output_override.cloned().unwrap_or_else(|| {
        adapter
            .get_string("report", "output_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    });

    let outcome = match run_tracker_pipeline(
        &config,
        &CsvTradeAdapter::new(trades_path),
        &CsvPriceAdapter::new(price_dir),
        &CsvReportAdapter,
        &output,
    ) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_outcome(
        &config,
        &outcome,
        adapter.get_bool("report", "print_daily", false),
    );
    eprintln!("\nReport written to: {}", output.display());

    if let Some(e) = &outcome.result.halted {
        eprintln!(
            "error: walk halted after {} days: {e}",
            outcome.result.records.len()
        );
    }
    outcome.exit_code()
}

fn print_outcome(config: &TrackerConfig, outcome: &RunOutcome, print_daily: bool) {
    let result = &outcome.result;
    let summary = &outcome.summary;

    eprintln!("\n=== Open Positions ===");
    if result.state.ledger.is_empty() {
        eprintln!("  (none)");
    }
    for p in result.state.ledger.all() {
        eprintln!(
            "  {:<8} {:>12.4} shares @ {:>10.2}",
            p.ticker, p.shares, p.avg_price
        );
    }
    if !result.state.ledger.is_empty() {
        eprintln!("  cost basis: {:.2}", result.state.ledger.total_cost());
    }

    eprintln!("\n=== Summary ===");
    eprintln!("Trading Days:     {}", summary.trading_days);
    eprintln!("Final Equity:     {:.2}", summary.final_equity);
    eprintln!("Final {:<11} {:.2}", format!("{}:", config.benchmark), summary.final_benchmark);
    eprintln!("Total Return:     {:.2}%", summary.total_return * 100.0);
    eprintln!("Benchmark Return: {:.2}%", summary.benchmark_return * 100.0);
    eprintln!("Excess Return:    {:.2}%", summary.excess_return * 100.0);
    eprintln!("Annualized:       {:.2}%", summary.annualized_return * 100.0);
    eprintln!("Max Drawdown:     {:.1}%", summary.max_drawdown_pct);
    eprintln!("Drawdown Days:    {}", summary.max_drawdown_duration);
    eprintln!("Sharpe Ratio:     {:.2}", summary.sharpe_ratio);

    if !result.price_warnings.is_empty() {
        eprintln!("Carried Prices:   {}", result.price_warnings.len());
    }
    if !result.unapplied_entries.is_empty() {
        eprintln!("Unapplied Trades: {}", result.unapplied_entries.len());
    }
    if !result.unapplied_exits.is_empty() {
        eprintln!("Skipped Exits:    {}", result.unapplied_exits.len());
    }

    eprintln!("\n=== Holdings (at cost) ===");
    let total: f64 = outcome.holdings.iter().map(|h| h.value).sum();
    for h in &outcome.holdings {
        let share = if total > 0.0 { h.value / total * 100.0 } else { 0.0 };
        eprintln!("  {:<8} {:>14.2} {:>6.1}%", h.label, h.value, share);
    }

    // Daily series goes to stdout so it can be piped.
    if !print_daily {
        return;
    }
    for r in &result.records {
        println!(
            "{},{:.2},{:.2},{:.2},{:.4}",
            r.date, r.benchmark_value, r.cash, r.equity, r.drawdown_pct
        );
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_tracker_config(&adapter).and_then(|_| validate_data_config(&adapter))
    {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let config = match build_tracker_config(&adapter, None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Both keys are present after validate_data_config.
    let trades_path = adapter.get_string("data", "trades_file").unwrap_or_default();
    let price_dir = adapter.get_string("data", "price_dir").unwrap_or_default();

    let book = match CsvTradeAdapter::new(PathBuf::from(&trades_path)).load() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nTracker:");
    eprintln!("  range:         {} to {}", config.start_date, config.end_date);
    eprintln!("  start cash:    {:.2}", config.start_cash);
    eprintln!("  benchmark:     {}", config.benchmark);
    eprintln!("  exit policy:   {}", config.exit_policy);
    eprintln!("  missing price: {}", config.missing_price);

    let tickers = book.tickers();
    eprintln!("\nTrade log: {} trades, {} tickers", book.len(), tickers.len());

    match CsvPriceAdapter::new(PathBuf::from(&price_dir)).list_symbols() {
        Ok(available) => {
            let missing: Vec<&String> = std::iter::once(&config.benchmark)
                .chain(tickers.iter())
                .filter(|t| !available.contains(*t))
                .collect();
            for t in &missing {
                eprintln!("  warning: no price file for {t} in {price_dir}");
            }
        }
        Err(e) => eprintln!("  warning: cannot list {price_dir}: {e}"),
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
