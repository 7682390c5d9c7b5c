//! Breakout detection.
//!
//! A breakout day is one whose volume is at least `volume_threshold_pct`
//! percent of the average volume over the preceding [`LOOKBACK_DAYS`] points
//! AND whose close-to-close change is at least `price_threshold_pct` percent.

use crate::domain::error::BreakscanError;
use crate::domain::series::{round2, Series};
use chrono::NaiveDate;

/// Number of trading days in the baseline volume window.
pub const LOOKBACK_DAYS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakoutEvent {
    pub trigger_date: NaiveDate,
    pub buy_price: f64,
}

/// Scan `series` for breakout days.
///
/// Returns events in series order. Series with no more than
/// [`LOOKBACK_DAYS`] points produce no events. Thresholds are used as given;
/// range checks belong to the caller.
pub fn scan(
    series: &Series,
    volume_threshold_pct: f64,
    price_threshold_pct: f64,
) -> Result<Vec<BreakoutEvent>, BreakscanError> {
    let points = series.points();
    let mut events = Vec::new();
    if points.len() <= LOOKBACK_DAYS {
        return Ok(events);
    }

    let volume_multiple = volume_threshold_pct / 100.0;
    // Sum of volumes over [i - LOOKBACK_DAYS, i).
    let mut window_sum: u128 = points[..LOOKBACK_DAYS]
        .iter()
        .map(|p| p.volume as u128)
        .sum();

    for i in LOOKBACK_DAYS..points.len() {
        let prev = &points[i - 1];
        let current = &points[i];

        if prev.close == 0.0 {
            return Err(BreakscanError::ZeroClose { date: prev.date });
        }

        let avg_volume = window_sum as f64 / LOOKBACK_DAYS as f64;
        let price_change_pct = (current.close - prev.close) / prev.close * 100.0;

        if current.volume as f64 >= avg_volume * volume_multiple
            && price_change_pct >= price_threshold_pct
        {
            tracing::debug!(
                date = %current.date,
                volume = current.volume,
                avg_volume,
                price_change_pct,
                "breakout"
            );
            events.push(BreakoutEvent {
                trigger_date: current.date,
                buy_price: round2(current.close),
            });
        }

        window_sum += current.volume as u128;
        window_sum -= points[i - LOOKBACK_DAYS].volume as u128;
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use chrono::Duration;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn flat_series(len: usize, close: f64, volume: u64) -> Vec<PricePoint> {
        (0..len)
            .map(|i| PricePoint::new(start() + Duration::days(i as i64), close, volume))
            .collect()
    }

    #[test]
    fn short_series_yields_nothing() {
        for len in [0, 1, 20] {
            let mut points = flat_series(len, 100.0, 1000);
            if let Some(last) = points.last_mut() {
                last.close = 200.0;
                last.volume = 1_000_000;
            }
            let series = Series::new(points).unwrap();
            assert!(scan(&series, 100.0, 1.0).unwrap().is_empty());
        }
    }

    #[test]
    fn detects_volume_and_price_spike() {
        let mut points = flat_series(25, 100.0, 1000);
        points[20].volume = 3000;
        points[20].close = 105.0;
        let series = Series::new(points).unwrap();

        let events = scan(&series, 200.0, 2.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].trigger_date, start() + Duration::days(20));
        assert_eq!(events[0].buy_price, 105.0);
    }

    #[test]
    fn price_move_without_volume_is_ignored() {
        let mut points = flat_series(25, 100.0, 1000);
        points[22].close = 110.0;
        let series = Series::new(points).unwrap();

        assert!(scan(&series, 200.0, 2.0).unwrap().is_empty());
    }

    #[test]
    fn volume_without_price_move_is_ignored() {
        let mut points = flat_series(25, 100.0, 1000);
        points[22].volume = 10_000;
        points[22].close = 101.0;
        let series = Series::new(points).unwrap();

        assert!(scan(&series, 200.0, 2.0).unwrap().is_empty());
    }

    #[test]
    fn thresholds_are_inclusive() {
        let mut points = flat_series(21, 100.0, 1000);
        points[20].volume = 2000;
        points[20].close = 102.0;
        let series = Series::new(points).unwrap();

        let events = scan(&series, 200.0, 2.0).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn window_excludes_current_day() {
        // A huge volume on day 20 must not raise its own baseline.
        let mut points = flat_series(21, 100.0, 1000);
        points[20].volume = 1_000_000;
        points[20].close = 103.0;
        let series = Series::new(points).unwrap();

        assert_eq!(scan(&series, 50_000.0, 2.0).unwrap().len(), 1);
    }

    #[test]
    fn window_slides_forward() {
        // Day 20 spikes; by day 41 that spike has left the window.
        let mut points = flat_series(42, 100.0, 1000);
        points[20].volume = 21_000;
        points[20].close = 100.0;
        points[41].volume = 2000;
        points[41].close = 103.0;
        let series = Series::new(points.clone()).unwrap();
        let events = scan(&series, 200.0, 2.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].trigger_date, points[41].date);

        // Same jump while the spike is still in the window: avg = 2000.
        let mut points = flat_series(42, 100.0, 1000);
        points[20].volume = 21_000;
        points[30].volume = 2000;
        points[30].close = 103.0;
        let series = Series::new(points).unwrap();
        assert!(scan(&series, 200.0, 2.0).unwrap().is_empty());
    }

    #[test]
    fn buy_price_is_rounded() {
        let mut points = flat_series(21, 100.0, 1000);
        points[20].volume = 5000;
        points[20].close = 104.996;
        let series = Series::new(points).unwrap();

        let events = scan(&series, 200.0, 2.0).unwrap();
        assert_eq!(events[0].buy_price, 105.0);
    }

    #[test]
    fn zero_previous_close_is_data_error() {
        let mut points = flat_series(22, 100.0, 1000);
        points[20].close = 0.0;
        let series = Series::new(points).unwrap();

        let err = scan(&series, 200.0, 2.0).unwrap_err();
        assert!(matches!(err, BreakscanError::ZeroClose { date } if date == start() + Duration::days(20)));
    }

    #[test]
    fn zero_close_inside_lookback_only_is_fine() {
        // Only close[19] onwards feeds a price change.
        let mut points = flat_series(22, 100.0, 1000);
        points[5].close = 0.0;
        let series = Series::new(points).unwrap();

        assert!(scan(&series, 200.0, 2.0).is_ok());
    }

    #[test]
    fn non_positive_thresholds_are_taken_literally() {
        let series = Series::new(flat_series(23, 100.0, 1000)).unwrap();

        // Flat prices: 0% change >= 0%, and any volume >= 0.
        let events = scan(&series, 0.0, 0.0).unwrap();
        assert_eq!(events.len(), 3);

        let events = scan(&series, -100.0, -5.0).unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn zero_volume_window_qualifies_any_volume() {
        let mut points = flat_series(21, 100.0, 0);
        points[20].close = 103.0;
        let series = Series::new(points).unwrap();

        assert_eq!(scan(&series, 200.0, 2.0).unwrap().len(), 1);
    }
}
