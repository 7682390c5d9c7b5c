#![allow(dead_code)]

use breakscan::domain::analysis::AnalysisConfig;
use breakscan::domain::error::BreakscanError;
use breakscan::domain::returns::ReturnRecord;
pub use breakscan::domain::series::{PricePoint, Series};
use breakscan::ports::data_port::MarketDataPort;
use breakscan::ports::report_port::ReportPort;
use chrono::{Duration, NaiveDate};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Series, BreakscanError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(BreakscanError::Data {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(ticker)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Series::new(points)
    }

    fn list_tickers(&self) -> Result<Vec<String>, BreakscanError> {
        let mut tickers: Vec<_> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BreakscanError> {
        match self.data.get(ticker) {
            Some(points) if !points.is_empty() => Ok(Some((
                points[0].date,
                points[points.len() - 1].date,
                points.len(),
            ))),
            _ => Ok(None),
        }
    }
}

/// Records what would have been exported instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingReportPort {
    pub writes: RefCell<Vec<(Vec<ReturnRecord>, PathBuf)>>,
}

impl ReportPort for RecordingReportPort {
    fn write(&self, records: &[ReturnRecord], output_path: &Path) -> Result<(), BreakscanError> {
        self.writes
            .borrow_mut()
            .push((records.to_vec(), output_path.to_path_buf()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `count` consecutive calendar days of flat close and volume.
pub fn flat_points(start: NaiveDate, count: usize, close: f64, volume: u64) -> Vec<PricePoint> {
    (0..count)
        .map(|i| PricePoint::new(start + Duration::days(i as i64), close, volume))
        .collect()
}

/// The 25-point breakout scenario: flat 100 / 1000 with a 105 / 3000 spike
/// on the 21st point, and a final point ten days after the spike closing at 110.
pub fn breakout_scenario() -> Vec<PricePoint> {
    let start = date(2024, 1, 1);
    let mut points = flat_points(start, 24, 100.0, 1000);
    points[20].close = 105.0;
    points[20].volume = 3000;
    points.push(PricePoint::new(start + Duration::days(30), 110.0, 1000));
    points
}

pub fn sample_analysis(ticker: &str) -> AnalysisConfig {
    AnalysisConfig {
        ticker: ticker.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        volume_threshold_pct: 200.0,
        price_threshold_pct: 2.0,
        holding_period_days: 10,
    }
}

pub fn to_csv(points: &[PricePoint]) -> String {
    let mut out = String::from("date,close,volume\n");
    for p in points {
        out.push_str(&format!("{},{},{}\n", p.date, p.close, p.volume));
    }
    out
}
