//! Fixed holding-period return evaluation.
//!
//! Each breakout is sold exactly `holding_period_days` calendar days after
//! its trigger date. When no point exists on that exact date (weekend,
//! holiday, past the end of the data) the breakout is dropped.

use crate::domain::breakout::BreakoutEvent;
use crate::domain::error::BreakscanError;
use crate::domain::series::{round2, Series};
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnRecord {
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub sell_price: f64,
    pub return_pct: f64,
}

/// Exit date for a trade opened on `buy_date`, or `None` past the calendar's range.
pub fn exit_date(buy_date: NaiveDate, holding_period_days: u64) -> Option<NaiveDate> {
    buy_date.checked_add_days(Days::new(holding_period_days))
}

pub fn evaluate(
    series: &Series,
    events: &[BreakoutEvent],
    holding_period_days: i64,
) -> Result<Vec<ReturnRecord>, BreakscanError> {
    if holding_period_days < 1 {
        return Err(BreakscanError::InvalidParameter {
            name: "holding_period".to_string(),
            reason: format!("must be at least 1 day, got {holding_period_days}"),
        });
    }
    let holding = holding_period_days as u64;

    let mut records = Vec::with_capacity(events.len());
    for event in events {
        let Some(sell_date) = exit_date(event.trigger_date, holding) else {
            continue;
        };
        let Some(exit) = series.get_by_date(sell_date) else {
            tracing::debug!(
                buy_date = %event.trigger_date,
                %sell_date,
                "no trading day on exit date, dropping breakout"
            );
            continue;
        };

        if event.buy_price == 0.0 {
            return Err(BreakscanError::ZeroBuyPrice {
                date: event.trigger_date,
            });
        }

        // Return uses the unrounded exit close; only the record is rounded.
        let return_pct = round2((exit.close - event.buy_price) / event.buy_price * 100.0);
        records.push(ReturnRecord {
            buy_date: event.trigger_date,
            buy_price: round2(event.buy_price),
            sell_price: round2(exit.close),
            return_pct,
        });
    }

    Ok(records)
}
