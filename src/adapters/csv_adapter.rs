//! CSV file market data adapter.
//!
//! Each ticker lives in `<base_path>/<TICKER>.csv`. Columns are located by
//! header name (`date`, `close`, `volume`, case-insensitive) so a plain
//! `date,close,volume` file and a full OHLCV download both load.

use crate::domain::error::BreakscanError;
use crate::domain::series::{PricePoint, Series};
use crate::ports::config_port::DATE_FORMAT;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
    volume: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_points(&self, ticker: &str) -> Result<Vec<PricePoint>, BreakscanError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| BreakscanError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| BreakscanError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = resolve_columns(headers)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| BreakscanError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let field = |index: usize, name: &str| {
                record.get(index).ok_or_else(|| BreakscanError::Data {
                    reason: format!("missing {} column", name),
                })
            };

            let date_str = field(columns.date, "date")?;
            // Tolerate timestamps like "2024-01-02 00:00:00-05:00".
            let date_part = date_str.get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|e| {
                BreakscanError::Data {
                    reason: format!("invalid date {:?}: {}", date_str, e),
                }
            })?;

            let close: f64 = field(columns.close, "close")?
                .parse()
                .map_err(|e| BreakscanError::Data {
                    reason: format!("invalid close value on {}: {}", date, e),
                })?;

            let volume = parse_volume(field(columns.volume, "volume")?).ok_or_else(|| {
                BreakscanError::Data {
                    reason: format!("invalid volume value on {}", date),
                }
            })?;

            points.push(PricePoint::new(date, close, volume));
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, BreakscanError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| BreakscanError::Data {
                reason: format!("missing {} column", name),
            })
    };
    Ok(Columns {
        date: find("date")?,
        close: find("close")?,
        volume: find("volume")?,
    })
}

/// Integer volume, also accepting integral decimals such as `1200.0`.
fn parse_volume(value: &str) -> Option<u64> {
    if let Ok(v) = value.parse::<u64>() {
        return Some(v);
    }
    let v: f64 = value.parse().ok()?;
    if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
        Some(v as u64)
    } else {
        None
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Series, BreakscanError> {
        // Unknown ticker: nothing held for it.
        if !self.csv_path(ticker).exists() {
            return Ok(Series::default());
        }
        let points = self
            .read_points(ticker)?
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect();
        Series::new(points)
    }

    fn list_tickers(&self) -> Result<Vec<String>, BreakscanError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| BreakscanError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BreakscanError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                if !ticker.is_empty() {
                    tickers.push(ticker.to_string());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BreakscanError> {
        if !self.csv_path(ticker).exists() {
            return Ok(None);
        }
        let points = self.read_points(ticker)?;
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, points.len()))),
            _ => Ok(None),
        }
    }
}
