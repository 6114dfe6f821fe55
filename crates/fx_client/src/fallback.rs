//! Static fallback dataset used when the live API is unavailable.

use std::path::Path;

use chrono::NaiveDate;
use common::{LatestRate, RateSeries, SYMBOL_CURRENCY};
use tracing::info;

use crate::payload::RatesPayload;

const BUNDLED_SAMPLE: &str = include_str!("../data/sample_fx.json");

/// Read-only date→rate table, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct FallbackStore {
    series: RateSeries,
}

impl FallbackStore {
    pub fn new(series: RateSeries) -> Self {
        Self { series }
    }

    /// A store with no data; every lookup comes back empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The January 2025 snapshot compiled into the binary.
    pub fn bundled() -> common::Result<Self> {
        Self::from_json(BUNDLED_SAMPLE)
    }

    pub fn from_json(raw: &str) -> common::Result<Self> {
        let payload: RatesPayload = serde_json::from_str(raw)?;
        Ok(Self::new(payload.to_series(SYMBOL_CURRENCY)))
    }

    /// Load a snapshot written by `fx-summary snapshot` (or the live API).
    pub fn load(path: &Path) -> common::Result<Self> {
        info!("Loading fallback data from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        let store = Self::from_json(&raw)?;
        info!("Fallback dataset holds {} days", store.len());
        Ok(store)
    }

    /// Entries in `[start, end]` inclusive.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> RateSeries {
        self.series.within(start, end)
    }

    /// Most recent entry in the dataset.
    pub fn latest(&self) -> Option<LatestRate> {
        self.series.last().map(|p| LatestRate {
            date: p.date,
            rate: p.rate,
        })
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
