//! CSV export of return records.

use crate::domain::error::BreakscanError;
use crate::domain::returns::ReturnRecord;
use crate::ports::config_port::DATE_FORMAT;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub const HEADER: [&str; 4] = ["Buy Date", "Buy Price", "Sell Price", "Return (%)"];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Render records as CSV text.
    pub fn render(records: &[ReturnRecord]) -> Result<String, BreakscanError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_records(&mut wtr, records)?;
        let bytes = wtr.into_inner().map_err(|e| BreakscanError::Data {
            reason: format!("CSV write error: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| BreakscanError::Data {
            reason: format!("CSV encoding error: {}", e),
        })
    }
}

fn write_records<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    records: &[ReturnRecord],
) -> Result<(), BreakscanError> {
    let to_err = |e: csv::Error| BreakscanError::Data {
        reason: format!("CSV write error: {}", e),
    };
    wtr.write_record(HEADER).map_err(to_err)?;
    for r in records {
        wtr.write_record([
            r.buy_date.format(DATE_FORMAT).to_string(),
            format!("{:.2}", r.buy_price),
            format!("{:.2}", r.sell_price),
            format!("{:.2}", r.return_pct),
        ])
        .map_err(to_err)?;
    }
    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, records: &[ReturnRecord], output_path: &Path) -> Result<(), BreakscanError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| BreakscanError::Data {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;
        write_records(&mut wtr, records)
    }
}
