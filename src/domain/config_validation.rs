//! Configuration validation.
//!
//! Applies the input ranges of the interactive parameter source (ticker
//! present, ISO dates in order, volume threshold at least 100%, price
//! threshold at least 1%, holding period at least one day) to a config file
//! before any data is read. The analytical functions themselves accept any
//! threshold.

use crate::domain::error::BreakscanError;
use crate::ports::config_port::ConfigPort;

pub const SECTION: &str = "analysis";
pub const MIN_VOLUME_THRESHOLD_PCT: f64 = 100.0;
pub const MIN_PRICE_THRESHOLD_PCT: f64 = 1.0;
pub const MIN_HOLDING_PERIOD_DAYS: i64 = 1;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), BreakscanError> {
    validate_ticker(config)?;
    validate_dates(config)?;
    validate_volume_threshold(config)?;
    validate_price_threshold(config)?;
    validate_holding_period(config)?;
    Ok(())
}

fn invalid(key: &str, reason: impl Into<String>) -> BreakscanError {
    BreakscanError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), BreakscanError> {
    match config.get_string(SECTION, "ticker") {
        Some(s) if !s.trim().is_empty() => {
            if s.trim().chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
                return Err(invalid("ticker", "ticker must be a single symbol"));
            }
            Ok(())
        }
        _ => Err(BreakscanError::ConfigMissing {
            section: SECTION.to_string(),
            key: "ticker".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BreakscanError> {
    let start = config.get_date(SECTION, "start_date")?;
    let end = config.get_date(SECTION, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid("start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

/// Parse an optional numeric key, rejecting values that are present but not numbers.
fn parse_number<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<T>, BreakscanError> {
    match config.get_string(SECTION, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(key, format!("{key} must be a number"))),
    }
}

fn validate_volume_threshold(config: &dyn ConfigPort) -> Result<(), BreakscanError> {
    if let Some(value) = parse_number::<f64>(config, "volume_threshold")? {
        if !value.is_finite() || value < MIN_VOLUME_THRESHOLD_PCT {
            return Err(invalid(
                "volume_threshold",
                format!("volume_threshold must be at least {MIN_VOLUME_THRESHOLD_PCT}"),
            ));
        }
    }
    Ok(())
}

fn validate_price_threshold(config: &dyn ConfigPort) -> Result<(), BreakscanError> {
    if let Some(value) = parse_number::<f64>(config, "price_threshold")? {
        if !value.is_finite() || value < MIN_PRICE_THRESHOLD_PCT {
            return Err(invalid(
                "price_threshold",
                format!("price_threshold must be at least {MIN_PRICE_THRESHOLD_PCT}"),
            ));
        }
    }
    Ok(())
}

fn validate_holding_period(config: &dyn ConfigPort) -> Result<(), BreakscanError> {
    if let Some(value) = parse_number::<i64>(config, "holding_period")? {
        if value < MIN_HOLDING_PERIOD_DAYS {
            return Err(invalid(
                "holding_period",
                format!("holding_period must be at least {MIN_HOLDING_PERIOD_DAYS}"),
            ));
        }
    }
    Ok(())
}
