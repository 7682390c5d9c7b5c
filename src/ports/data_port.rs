//! Market data access port.

use crate::domain::error::BreakscanError;
use crate::domain::series::Series;
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// Daily series for `ticker` with dates in `[start_date, end_date]`.
    ///
    /// An unknown ticker or an empty range may come back as an empty series;
    /// callers decide whether that is an error.
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Series, BreakscanError>;

    fn list_tickers(&self) -> Result<Vec<String>, BreakscanError>;

    /// First date, last date and point count of everything held for `ticker`.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BreakscanError>;
}
