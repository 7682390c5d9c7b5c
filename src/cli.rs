//! CLI definition and dispatch.

use chrono::{Days, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{
    run_analysis, AnalysisConfig, AnalysisResult, DEFAULT_HOLDING_PERIOD_DAYS,
    DEFAULT_LOOKBACK_RANGE_DAYS, DEFAULT_PRICE_THRESHOLD_PCT, DEFAULT_VOLUME_THRESHOLD_PCT,
};
use crate::domain::breakout::{scan, BreakoutEvent};
use crate::domain::config_validation::{validate_analysis_config, SECTION};
use crate::domain::error::BreakscanError;
use crate::domain::returns::ReturnRecord;
use crate::domain::series::Series;
use crate::domain::summary::Summary;
use crate::ports::config_port::{ConfigPort, DATE_FORMAT};
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT: &str = "breakout_results.csv";
pub const NO_BREAKOUTS_MESSAGE: &str = "No breakout days found with the given criteria.";

#[derive(Parser, Debug)]
#[command(
    name = "breakscan",
    version,
    about = "Volume/price breakout scanner with a fixed holding-period backtest"
)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Analysis parameters that override the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct ParamArgs {
    /// Ticker symbol, e.g. AAPL
    #[arg(short, long)]
    pub ticker: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    /// Volume breakout threshold, percent of the 20-day average
    #[arg(long, allow_negative_numbers = true)]
    pub volume_threshold: Option<f64>,
    /// Daily close-to-close change threshold, percent
    #[arg(long, allow_negative_numbers = true)]
    pub price_threshold: Option<f64>,
    /// Holding period in calendar days
    #[arg(long, allow_negative_numbers = true)]
    pub holding_period: Option<i64>,
    /// Directory holding <TICKER>.csv files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan for breakouts and backtest the holding period
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        params: ParamArgs,
        /// CSV file for the results
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Validate and print the resolved parameters only
        #[arg(long)]
        dry_run: bool,
    },
    /// List breakout days without evaluating returns
    Scan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show the data range held for a ticker
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        ticker: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            params,
            output,
            dry_run,
        } => run_backtest(config.as_ref(), &params, output.as_ref(), dry_run),
        Command::Scan { config, params } => run_scan(config.as_ref(), &params),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config, data_dir } => {
            run_list_symbols(config.as_ref(), data_dir.as_ref())
        }
        Command::Info {
            config,
            ticker,
            data_dir,
        } => run_info(config.as_ref(), ticker.as_deref(), data_dir.as_ref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Config layer where CLI flags shadow values from the file.
pub struct OverrideConfig<'a> {
    base: &'a dyn ConfigPort,
    values: HashMap<(String, String), String>,
}

impl<'a> OverrideConfig<'a> {
    pub fn new(base: &'a dyn ConfigPort) -> Self {
        Self {
            base,
            values: HashMap::new(),
        }
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl ToString) {
        self.values
            .insert((section.to_string(), key.to_string()), value.to_string());
    }

    pub fn with_params(base: &'a dyn ConfigPort, params: &ParamArgs) -> Self {
        let mut layered = Self::new(base);
        if let Some(ref t) = params.ticker {
            layered.set(SECTION, "ticker", t);
        }
        if let Some(ref s) = params.start {
            layered.set(SECTION, "start_date", s);
        }
        if let Some(ref e) = params.end {
            layered.set(SECTION, "end_date", e);
        }
        if let Some(v) = params.volume_threshold {
            layered.set(SECTION, "volume_threshold", v);
        }
        if let Some(p) = params.price_threshold {
            layered.set(SECTION, "price_threshold", p);
        }
        if let Some(h) = params.holding_period {
            layered.set(SECTION, "holding_period", h);
        }
        if let Some(ref d) = params.data_dir {
            layered.set("data", "path", d.display());
        }
        layered
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&String> {
        self.values.get(&(section.to_string(), key.to_string()))
    }
}

impl ConfigPort for OverrideConfig<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.lookup(section, key)
            .cloned()
            .or_else(|| self.base.get_string(section, key))
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.lookup(section, key) {
            Some(v) => v.trim().parse().unwrap_or(default),
            None => self.base.get_int(section, key, default),
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.lookup(section, key) {
            Some(v) => v.trim().parse().unwrap_or(default),
            None => self.base.get_double(section, key, default),
        }
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, BreakscanError> {
    match path {
        Some(p) => {
            tracing::info!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Resolve analysis parameters, filling dates relative to `today`.
///
/// Missing end date means `today`; missing start date means one year before
/// the end date.
pub fn build_analysis_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<AnalysisConfig, BreakscanError> {
    let ticker = config
        .get_string(SECTION, "ticker")
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BreakscanError::ConfigMissing {
            section: SECTION.into(),
            key: "ticker".into(),
        })?;

    let end_date = config.get_date(SECTION, "end_date")?.unwrap_or(today);
    let start_date = match config.get_date(SECTION, "start_date")? {
        Some(d) => d,
        None => end_date
            .checked_sub_days(Days::new(DEFAULT_LOOKBACK_RANGE_DAYS))
            .unwrap_or(NaiveDate::MIN),
    };
    if start_date >= end_date {
        return Err(BreakscanError::ConfigInvalid {
            section: SECTION.into(),
            key: "start_date".into(),
            reason: format!("start_date {start_date} must be before end_date {end_date}"),
        });
    }

    Ok(AnalysisConfig {
        ticker,
        start_date,
        end_date,
        volume_threshold_pct: config.get_double(
            SECTION,
            "volume_threshold",
            DEFAULT_VOLUME_THRESHOLD_PCT,
        ),
        price_threshold_pct: config.get_double(
            SECTION,
            "price_threshold",
            DEFAULT_PRICE_THRESHOLD_PCT,
        ),
        holding_period_days: config.get_int(SECTION, "holding_period", DEFAULT_HOLDING_PERIOD_DAYS),
    })
}

pub fn resolve_data_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("data", "path")
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn resolve_output(config: &dyn ConfigPort, output_override: Option<&PathBuf>) -> PathBuf {
    if let Some(p) = output_override {
        return p.clone();
    }
    config
        .get_string("report", "output")
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fetch the series for `analysis`, treating an empty result as an error.
pub fn fetch_series(
    data_port: &dyn MarketDataPort,
    analysis: &AnalysisConfig,
) -> Result<Series, BreakscanError> {
    tracing::info!(
        ticker = %analysis.ticker,
        start = %analysis.start_date,
        end = %analysis.end_date,
        "fetching series"
    );
    let series = data_port.fetch_series(&analysis.ticker, analysis.start_date, analysis.end_date)?;
    if series.is_empty() {
        return Err(BreakscanError::NoData {
            ticker: analysis.ticker.clone(),
        });
    }
    tracing::info!(ticker = %analysis.ticker, points = series.len(), "series loaded");
    Ok(series)
}

/// Fetch, scan, evaluate, print and export.
///
/// Returns the analysis result; the report is only written when at least one
/// return record exists.
pub fn run_backtest_pipeline(
    data_port: &dyn MarketDataPort,
    report_port: &dyn ReportPort,
    analysis: &AnalysisConfig,
    output: &Path,
) -> Result<AnalysisResult, BreakscanError> {
    let series = fetch_series(data_port, analysis)?;
    let result = run_analysis(&series, analysis)?;

    if result.events.is_empty() {
        println!("{NO_BREAKOUTS_MESSAGE}");
        return Ok(result);
    }

    if result.records.is_empty() {
        println!("{}", no_records_message(&result, analysis.holding_period_days));
        return Ok(result);
    }

    println!("Breakout results for {}:", analysis.ticker);
    print!("{}", format_records_table(&result.records));
    println!();
    print!("{}", format_summary(&result.summary, result.dropped()));

    report_port.write(&result.records, output)?;
    tracing::info!(path = %output.display(), records = result.records.len(), "results written");
    eprintln!("\nResults saved as '{}'.", output.display());

    Ok(result)
}

pub fn run_scan_pipeline(
    data_port: &dyn MarketDataPort,
    analysis: &AnalysisConfig,
) -> Result<Vec<BreakoutEvent>, BreakscanError> {
    let series = fetch_series(data_port, analysis)?;
    let events = scan(
        &series,
        analysis.volume_threshold_pct,
        analysis.price_threshold_pct,
    )?;

    if events.is_empty() {
        println!("{NO_BREAKOUTS_MESSAGE}");
    } else {
        println!("Breakout days for {}:", analysis.ticker);
        print!("{}", format_events_table(&events));
    }
    Ok(events)
}

pub fn no_records_message(result: &AnalysisResult, holding_period_days: i64) -> String {
    format!(
        "Found {} breakout day(s), but none had a trading day exactly {} calendar day(s) later; no returns to report.",
        result.events.len(),
        holding_period_days
    )
}

pub fn format_events_table(events: &[BreakoutEvent]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>10}", "Buy Date", "Buy Price");
    for e in events {
        let _ = writeln!(
            out,
            "{:<12} {:>10.2}",
            e.trigger_date.format(DATE_FORMAT).to_string(),
            e.buy_price
        );
    }
    out
}

pub fn format_records_table(records: &[ReturnRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>10} {:>10} {:>10}",
        "Buy Date", "Buy Price", "Sell Price", "Return (%)"
    );
    for r in records {
        let _ = writeln!(
            out,
            "{:<12} {:>10.2} {:>10.2} {:>10.2}",
            r.buy_date.format(DATE_FORMAT).to_string(),
            r.buy_price,
            r.sell_price,
            r.return_pct
        );
    }
    out
}

pub fn format_summary(summary: &Summary, dropped: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trades:          {}", summary.total_trades);
    let _ = writeln!(
        out,
        "Won/Lost/Flat:   {}/{}/{}",
        summary.trades_won, summary.trades_lost, summary.trades_breakeven
    );
    let _ = writeln!(out, "Win Rate:        {:.1}%", summary.win_rate * 100.0);
    let _ = writeln!(out, "Average Return:  {:.2}%", summary.avg_return_pct);
    let _ = writeln!(out, "Best Return:     {:.2}%", summary.best_return_pct);
    let _ = writeln!(out, "Worst Return:    {:.2}%", summary.worst_return_pct);
    if dropped > 0 {
        let _ = writeln!(out, "Dropped:         {} (no trading day on exit date)", dropped);
    }
    out
}

fn resolve_analysis(
    config_path: Option<&PathBuf>,
    params: &ParamArgs,
) -> Result<(AnalysisConfig, PathBuf, FileConfigAdapter), BreakscanError> {
    let file = load_config(config_path)?;
    let (analysis, data_dir) = {
        let layered = OverrideConfig::with_params(&file, params);
        validate_analysis_config(&layered)?;
        (build_analysis_config(&layered, today())?, resolve_data_dir(&layered))
    };
    Ok((analysis, data_dir, file))
}

fn run_backtest(
    config_path: Option<&PathBuf>,
    params: &ParamArgs,
    output_override: Option<&PathBuf>,
    dry_run: bool,
) -> Result<(), BreakscanError> {
    let (analysis, data_dir, file) = resolve_analysis(config_path, params)?;
    let output = resolve_output(&file, output_override);

    if dry_run {
        println!("Ticker:            {}", analysis.ticker);
        println!("Date range:        {} to {}", analysis.start_date, analysis.end_date);
        println!("Volume threshold:  {}%", analysis.volume_threshold_pct);
        println!("Price threshold:   {}%", analysis.price_threshold_pct);
        println!("Holding period:    {} day(s)", analysis.holding_period_days);
        println!("Data directory:    {}", data_dir.display());
        println!("Output:            {}", output.display());
        eprintln!("\nDry run complete: configuration is valid");
        return Ok(());
    }

    let data_port = CsvAdapter::new(data_dir);
    run_backtest_pipeline(&data_port, &CsvReportAdapter::new(), &analysis, &output)?;
    Ok(())
}

fn run_scan(config_path: Option<&PathBuf>, params: &ParamArgs) -> Result<(), BreakscanError> {
    let (analysis, data_dir, _) = resolve_analysis(config_path, params)?;
    let data_port = CsvAdapter::new(data_dir);
    run_scan_pipeline(&data_port, &analysis)?;
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), BreakscanError> {
    eprintln!("Validating config: {}", config_path.display());
    let file = load_config(Some(config_path))?;
    validate_analysis_config(&file)?;
    let analysis = build_analysis_config(&file, today())?;
    eprintln!(
        "Configuration is valid: {} from {} to {}",
        analysis.ticker, analysis.start_date, analysis.end_date
    );
    Ok(())
}

fn run_list_symbols(
    config_path: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
) -> Result<(), BreakscanError> {
    let file = load_config(config_path)?;
    let dir = data_dir.cloned().unwrap_or_else(|| resolve_data_dir(&file));
    let tickers = CsvAdapter::new(dir.clone()).list_tickers()?;

    if tickers.is_empty() {
        eprintln!("No tickers found in {}", dir.display());
    } else {
        for ticker in &tickers {
            println!("{}", ticker);
        }
        eprintln!("{} tickers found", tickers.len());
    }
    Ok(())
}

fn run_info(
    config_path: Option<&PathBuf>,
    ticker: Option<&str>,
    data_dir: Option<&PathBuf>,
) -> Result<(), BreakscanError> {
    let file = load_config(config_path)?;
    let ticker = match ticker {
        Some(t) => t.trim().to_uppercase(),
        None => file
            .get_string(SECTION, "ticker")
            .map(|t| t.trim().to_uppercase())
            .ok_or_else(|| BreakscanError::ConfigMissing {
                section: SECTION.into(),
                key: "ticker".into(),
            })?,
    };
    let dir = data_dir.cloned().unwrap_or_else(|| resolve_data_dir(&file));

    match CsvAdapter::new(dir).get_data_range(&ticker)? {
        Some((first, last, count)) => {
            println!("{}: {} points, {} to {}", ticker, count, first, last);
            Ok(())
        }
        None => Err(BreakscanError::NoData { ticker }),
    }
}
