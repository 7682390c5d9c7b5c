//! Tabular export port.

use crate::domain::error::BreakscanError;
use crate::domain::returns::ReturnRecord;
use std::path::Path;

/// Port for materializing return records.
pub trait ReportPort {
    fn write(&self, records: &[ReturnRecord], output_path: &Path) -> Result<(), BreakscanError>;
}
