//! Descriptive statistics over a set of return records.

use crate::domain::returns::ReturnRecord;
use crate::domain::series::round2;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    /// Fraction of trades with a positive return, 0.0 when there are none.
    pub win_rate: f64,
    pub avg_return_pct: f64,
    pub best_return_pct: f64,
    pub worst_return_pct: f64,
}

impl Summary {
    pub fn compute(records: &[ReturnRecord]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total = 0.0_f64;
        let mut best = f64::NEG_INFINITY;
        let mut worst = f64::INFINITY;

        for record in records {
            let r = record.return_pct;
            if r > 0.0 {
                trades_won += 1;
            } else if r < 0.0 {
                trades_lost += 1;
            } else {
                trades_breakeven += 1;
            }
            total += r;
            best = best.max(r);
            worst = worst.min(r);
        }

        let total_trades = records.len();
        if total_trades == 0 {
            return Self {
                total_trades,
                trades_won,
                trades_lost,
                trades_breakeven,
                win_rate: 0.0,
                avg_return_pct: 0.0,
                best_return_pct: 0.0,
                worst_return_pct: 0.0,
            };
        }

        Self {
            total_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate: trades_won as f64 / total_trades as f64,
            avg_return_pct: round2(total / total_trades as f64),
            best_return_pct: best,
            worst_return_pct: worst,
        }
    }
}
