//! Domain types shared across the service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Currency rates are quoted from.
pub const BASE_CURRENCY: &str = "EUR";
/// Currency rates are quoted in.
pub const SYMBOL_CURRENCY: &str = "USD";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

// ── Rate series ───────────────────────────────────────────────────────

/// One day's EUR→USD rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Date-ascending rates with at most one entry per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateSeries {
    points: Vec<RatePoint>,
}

impl RateSeries {
    /// Build from a date-keyed map. Ordering and uniqueness come from the map.
    pub fn from_map(map: BTreeMap<NaiveDate, f64>) -> Self {
        let points = map
            .into_iter()
            .map(|(date, rate)| RatePoint { date, rate })
            .collect();
        Self { points }
    }

    /// Build from arbitrary pairs. A repeated date keeps the last rate seen.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::from_map(pairs.into_iter().collect())
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&RatePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&RatePoint> {
        self.points.last()
    }

    pub fn rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.rate)
    }

    /// Entries whose date falls in `[start, end]` inclusive.
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> RateSeries {
        let points = self
            .points
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect();
        Self { points }
    }
}

// ── Calculation output ────────────────────────────────────────────────

/// Per-day rate and change from the previous published day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyResult {
    pub date: NaiveDate,
    /// Rate rounded to 6 decimal places.
    pub rate: f64,
    /// Percent change rounded to 4 decimal places; `None` on the first day or
    /// when the previous rate is zero.
    pub pct_change: Option<f64>,
}

/// Aggregate metrics over a whole series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub start_rate: f64,
    pub end_rate: f64,
    pub total_pct_change: Option<f64>,
    pub mean_rate: f64,
}

/// Most recently published rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestRate {
    pub date: NaiveDate,
    pub rate: f64,
}
