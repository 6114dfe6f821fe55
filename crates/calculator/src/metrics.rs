//! Per-day percentage change and whole-range summary.

use common::{DailyResult, Error, RateSeries, Result, SummaryResult};
use tracing::warn;

use crate::rounding::{round_pct, round_rate};

/// Percent change from `old` to `new`, unrounded. `None` when `old` is zero.
pub fn pct_change(old: f64, new: f64) -> Option<f64> {
    if old == 0.0 {
        warn!("Zero denominator in percentage change; reporting null");
        return None;
    }
    Some((new - old) / old * 100.0)
}

/// One `DailyResult` per entry, in series order.
pub fn daily_breakdown(series: &RateSeries) -> Vec<DailyResult> {
    let mut previous: Option<f64> = None;

    series
        .points()
        .iter()
        .map(|point| {
            let change = previous.and_then(|prev| pct_change(prev, point.rate));
            previous = Some(point.rate);
            DailyResult {
                date: point.date,
                rate: round_rate(point.rate),
                pct_change: change.map(round_pct),
            }
        })
        .collect()
}

/// Start, end, mean, and total change over the whole series.
///
/// The mean is accumulated at full precision and rounded once.
pub fn summarize(series: &RateSeries) -> Result<SummaryResult> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(Error::EmptySeries);
    };

    let mean = series.rates().sum::<f64>() / series.len() as f64;

    Ok(SummaryResult {
        start_rate: round_rate(first.rate),
        end_rate: round_rate(last.rate),
        total_pct_change: pct_change(first.rate, last.rate).map(round_pct),
        mean_rate: round_rate(mean),
    })
}
