//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for breakscan.
#[derive(Debug, thiserror::Error)]
pub enum BreakscanError {
    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("no data found for ticker: {ticker}")]
    NoData { ticker: String },

    #[error("dates not strictly increasing at index {index}: {date} follows {previous}")]
    UnorderedDates {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("invalid close price {close} on {date}")]
    InvalidClose { date: NaiveDate, close: f64 },

    #[error("zero close price on {date}, price change is undefined")]
    ZeroClose { date: NaiveDate },

    #[error("buy price on {date} rounds to 0.00, return is undefined")]
    ZeroBuyPrice { date: NaiveDate },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BreakscanError {
    /// True for the degenerate-input family (bad or empty series).
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            BreakscanError::Data { .. }
                | BreakscanError::NoData { .. }
                | BreakscanError::UnorderedDates { .. }
                | BreakscanError::InvalidClose { .. }
                | BreakscanError::ZeroClose { .. }
                | BreakscanError::ZeroBuyPrice { .. }
        )
    }

    /// True for out-of-range parameters and config file problems.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BreakscanError::InvalidParameter { .. }
                | BreakscanError::ConfigParse { .. }
                | BreakscanError::ConfigMissing { .. }
                | BreakscanError::ConfigInvalid { .. }
        )
    }
}

impl From<&BreakscanError> for std::process::ExitCode {
    fn from(err: &BreakscanError) -> Self {
        let code: u8 = match err {
            BreakscanError::Io(_) => 1,
            BreakscanError::InvalidParameter { .. }
            | BreakscanError::ConfigParse { .. }
            | BreakscanError::ConfigMissing { .. }
            | BreakscanError::ConfigInvalid { .. } => 2,
            BreakscanError::Data { .. } => 3,
            BreakscanError::NoData { .. }
            | BreakscanError::UnorderedDates { .. }
            | BreakscanError::InvalidClose { .. }
            | BreakscanError::ZeroClose { .. }
            | BreakscanError::ZeroBuyPrice { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
