//! Analysis parameters and the scan-then-evaluate pipeline.

use crate::domain::breakout::{scan, BreakoutEvent};
use crate::domain::error::BreakscanError;
use crate::domain::returns::{evaluate, ReturnRecord};
use crate::domain::series::Series;
use crate::domain::summary::Summary;
use chrono::NaiveDate;

pub const DEFAULT_VOLUME_THRESHOLD_PCT: f64 = 200.0;
pub const DEFAULT_PRICE_THRESHOLD_PCT: f64 = 2.0;
pub const DEFAULT_HOLDING_PERIOD_DAYS: i64 = 10;
/// Default date range length when no start date is given.
pub const DEFAULT_LOOKBACK_RANGE_DAYS: u64 = 365;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub volume_threshold_pct: f64,
    pub price_threshold_pct: f64,
    pub holding_period_days: i64,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub events: Vec<BreakoutEvent>,
    pub records: Vec<ReturnRecord>,
    pub summary: Summary,
}

impl AnalysisResult {
    /// Breakouts whose exit date had no matching trading day.
    pub fn dropped(&self) -> usize {
        self.events.len() - self.records.len()
    }
}

/// Scan `series` and evaluate every breakout found.
///
/// The holding period is checked before scanning so that a bad parameter
/// never produces partial output.
pub fn run_analysis(
    series: &Series,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, BreakscanError> {
    if config.holding_period_days < 1 {
        return Err(BreakscanError::InvalidParameter {
            name: "holding_period".to_string(),
            reason: format!("must be at least 1 day, got {}", config.holding_period_days),
        });
    }

    let events = scan(
        series,
        config.volume_threshold_pct,
        config.price_threshold_pct,
    )?;
    tracing::info!(
        ticker = %config.ticker,
        points = series.len(),
        breakouts = events.len(),
        "scan complete"
    );

    let records = evaluate(series, &events, config.holding_period_days)?;
    let summary = Summary::compute(&records);
    tracing::info!(
        ticker = %config.ticker,
        trades = records.len(),
        dropped = events.len() - records.len(),
        "evaluation complete"
    );

    Ok(AnalysisResult {
        events,
        records,
        summary,
    })
}
