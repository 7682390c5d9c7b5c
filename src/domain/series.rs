//! Daily price/volume series.
//!
//! A [`Series`] is an ordered run of [`PricePoint`]s with strictly increasing
//! dates. Gaps (weekends, holidays) are expected; duplicates are not.

use crate::domain::error::BreakscanError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<PricePoint>,
}

impl Series {
    /// Build a series, checking date order and close prices.
    ///
    /// Zero closes are allowed here; they only become an error when a
    /// price change has to be computed against them.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, BreakscanError> {
        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close < 0.0 {
                return Err(BreakscanError::InvalidClose {
                    date: point.date,
                    close: point.close,
                });
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(BreakscanError::UnorderedDates {
                    index: i,
                    previous: points[i - 1].date,
                    date: point.date,
                });
            }
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Position of `date` in the series, by exact match.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.points.binary_search_by_key(&date, |p| p.date).ok()
    }

    pub fn get_by_date(&self, date: NaiveDate) -> Option<&PricePoint> {
        self.index_of(date).map(|i| &self.points[i])
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Round to two decimal places, normalizing negative zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
